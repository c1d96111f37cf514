#![cfg_attr(docsrs, feature(doc_cfg))]
//! # amr-forest
//!
//! amr-forest manages forests of adaptively refined space-trees. Every tree
//! refines one reference cell; its leaves are stored as bit-packed element
//! keys in space-filling-curve order, and all tree arithmetic (parents,
//! children, families, linear ids, successors) is derived from the keys alone.
//!
//! ## Features
//! - A uniform [`ElementScheme`](element::ElementScheme) contract with
//!   tetrahedral, line/quad/hex and hybrid pyramid implementations. Pyramids
//!   refine into pyramids and tetrahedra, so a pyramid tree mixes both shapes.
//! - An adaptation driver that detects complete and incomplete sibling
//!   families, supports one-shot and recursive refine/coarsen, element
//!   removal and a maximum refinement level.
//! - A 16-byte `bytemuck`/`serde` key layout for persisting element arrays.
//!
//! ## Determinism
//!
//! Adaptation is single-threaded and visits elements in curve order, so a
//! pure decision callback always produces the same forest.
//!
//! ## Usage
//!
//! ```
//! use amr_forest::prelude::*;
//!
//! let forest = Forest::new_uniform(QuadScheme::new(), &[Shape::Quad], 2)?;
//! let refined = forest.adapt(AdaptOptions::default(), |query| {
//!     if query.element_id() == 0 { Decision::Refine } else { Decision::Keep }
//! });
//! assert_eq!(refined.local_num_elements(), 19);
//! # Ok::<(), amr_forest::forest_error::ForestError>(())
//! ```

pub mod debug_invariants;
pub mod element;
pub mod forest;
pub mod forest_error;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::element::{
        CubeElement, ElementScheme, HexScheme, LineScheme, PackedElement, PackedKey,
        PyramidElement, PyramidKind, PyramidScheme, QuadScheme, Shape, TetElement, TetScheme,
        TetType,
    };
    pub use crate::forest::{
        AdaptOptions, AdaptQuery, CoarseMesh, Decision, Forest, ForestBuilder, Tree,
    };
    pub use crate::forest_error::ForestError;
}
