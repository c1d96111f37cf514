//! ForestError: Unified error type for amr-forest public APIs
//!
//! Recoverable misuse (forests assembled from external element arrays, decoding
//! persisted keys) is reported through this type. Closed-contract violations
//! inside the codecs and the adaptation driver are assertions instead.

use crate::element::Shape;
use thiserror::Error;

/// Unified error type for forest construction and key decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForestError {
    /// A tree of the coarse mesh has a shape the forest's scheme cannot serve.
    #[error("Tree {tree_id}: scheme expects {expected:?} trees, coarse mesh has {found:?}")]
    ShapeMismatch {
        /// Tree index in the coarse mesh.
        tree_id: usize,
        /// Shape served by the scheme.
        expected: Shape,
        /// Shape reported for the tree.
        found: Shape,
    },
    /// A refinement level exceeds the admissible maximum.
    #[error("Refinement level {level} exceeds the maximum level {max_level}")]
    LevelOutOfRange {
        /// Requested level.
        level: u8,
        /// Maximum admissible level.
        max_level: u8,
    },
    /// Two consecutive elements of a tree are not in strict space-filling-curve order.
    #[error("Tree {tree_id}: element {index} is not strictly after its predecessor")]
    UnsortedElements {
        /// Tree index.
        tree_id: usize,
        /// Index of the offending element in the tree.
        index: usize,
    },
    /// An element is not a descendant of its tree's root.
    #[error("Tree {tree_id}: element {index} is not a valid key of the tree")]
    InvalidElement {
        /// Tree index.
        tree_id: usize,
        /// Index of the offending element in the tree.
        index: usize,
    },
    /// A uniform refinement would produce more elements than fit into memory indices.
    #[error("Uniform refinement produces {count} elements per tree, which does not fit into usize")]
    ElementCountOverflow {
        /// Number of elements requested.
        count: u64,
    },
    /// A packed key carries a type tag unknown to the target element type.
    #[error("Invalid element type tag {tag}")]
    InvalidTypeTag {
        /// The offending tag.
        tag: u8,
    },
    /// A packed key's anchor is outside the root cell or not aligned to its level.
    #[error("Anchor {coords:?} is not aligned to level {level} or lies outside the root cell")]
    MisalignedAnchor {
        /// Decoded anchor coordinates.
        coords: [i32; 3],
        /// Decoded level.
        level: u8,
    },
    /// A byte buffer is not a whole number of packed keys.
    #[error("Buffer of {len} bytes is not a multiple of the {key_size}-byte key size")]
    PackedBufferLength {
        /// Buffer length in bytes.
        len: usize,
        /// Size of one packed key.
        key_size: usize,
    },
}
