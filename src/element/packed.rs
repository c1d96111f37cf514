//! Persisted 16-byte key layout.
//!
//! Every element key of every shape packs into one [`PackedElement`]: three
//! little-endian anchor coordinates (unused axes zero), the level and the
//! type tag. Byte buffers of packed keys are what forests exchange with
//! files or other processes; decoding validates each key.

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::hypercube::CubeElement;
use super::pyramid::{PyramidElement, PyramidKind};
use super::tet::{TetElement, TetType};
use super::{Coord, MAX_LEVEL, is_aligned};
use crate::forest_error::ForestError;

/// Plain-old-data element key.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct PackedElement {
    /// Anchor coordinates, stored little-endian.
    pub coords_le: [i32; 3],
    /// Refinement level.
    pub level: u8,
    /// Shape-specific type tag; 0 for hypercubes.
    pub type_tag: u8,
    /// Keep zero.
    pub reserved: [u8; 2],
}

static_assertions::assert_eq_size!(PackedElement, [u8; 16]);
static_assertions::const_assert_eq!(std::mem::align_of::<PackedElement>(), 4);

impl PackedElement {
    /// Size of one key in bytes.
    pub const SIZE: usize = size_of::<Self>();

    /// Packs host-order coordinates.
    pub fn new(coords: [Coord; 3], level: u8, type_tag: u8) -> Self {
        Self {
            coords_le: coords.map(i32::to_le),
            level,
            type_tag,
            reserved: [0; 2],
        }
    }

    /// Host-order anchor coordinates.
    pub fn coords(&self) -> [Coord; 3] {
        self.coords_le.map(i32::from_le)
    }

    /// Checks level range and anchor alignment of the first `dim` axes;
    /// the remaining axes must be zero.
    fn check_anchor(&self, dim: usize) -> Result<[Coord; 3], ForestError> {
        if self.level > MAX_LEVEL {
            return Err(ForestError::LevelOutOfRange {
                level: self.level,
                max_level: MAX_LEVEL,
            });
        }
        let coords = self.coords();
        if !is_aligned(&coords[..dim], self.level) || coords[dim..].iter().any(|&c| c != 0) {
            return Err(ForestError::MisalignedAnchor {
                coords,
                level: self.level,
            });
        }
        Ok(coords)
    }
}

/// Conversion between an element key and its packed layout.
pub trait PackedKey: Sized {
    /// Packs the key.
    fn pack(&self) -> PackedElement;

    /// Unpacks a key, rejecting malformed levels, anchors and type tags.
    fn unpack(packed: &PackedElement) -> Result<Self, ForestError>;
}

impl PackedKey for TetElement {
    fn pack(&self) -> PackedElement {
        PackedElement::new(self.anchor, self.level, self.tet_type.get())
    }

    fn unpack(packed: &PackedElement) -> Result<Self, ForestError> {
        let anchor = packed.check_anchor(3)?;
        Ok(Self {
            anchor,
            level: packed.level,
            tet_type: TetType::try_from(packed.type_tag)?,
        })
    }
}

impl PackedKey for PyramidElement {
    fn pack(&self) -> PackedElement {
        PackedElement::new(self.anchor, self.level, self.kind.code())
    }

    fn unpack(packed: &PackedElement) -> Result<Self, ForestError> {
        let anchor = packed.check_anchor(3)?;
        Ok(Self {
            anchor,
            level: packed.level,
            kind: PyramidKind::try_from(packed.type_tag)?,
        })
    }
}

impl<const D: usize> PackedKey for CubeElement<D> {
    fn pack(&self) -> PackedElement {
        let mut coords = [0; 3];
        coords[..D].copy_from_slice(&self.anchor);
        PackedElement::new(coords, self.level, 0)
    }

    fn unpack(packed: &PackedElement) -> Result<Self, ForestError> {
        if packed.type_tag != 0 {
            return Err(ForestError::InvalidTypeTag {
                tag: packed.type_tag,
            });
        }
        let coords = packed.check_anchor(D)?;
        let mut anchor = [0; D];
        anchor.copy_from_slice(&coords[..D]);
        Ok(Self {
            level: packed.level,
            anchor,
        })
    }
}

/// Serializes keys into a contiguous byte buffer.
pub fn encode_elements<E: PackedKey>(elements: &[E]) -> Vec<u8> {
    let packed: Vec<PackedElement> = elements.iter().map(PackedKey::pack).collect();
    bytemuck::cast_slice(&packed).to_vec()
}

/// Deserializes a byte buffer produced by [`encode_elements`]. The buffer
/// need not be aligned.
pub fn decode_elements<E: PackedKey>(bytes: &[u8]) -> Result<Vec<E>, ForestError> {
    if bytes.len() % PackedElement::SIZE != 0 {
        return Err(ForestError::PackedBufferLength {
            len: bytes.len(),
            key_size: PackedElement::SIZE,
        });
    }
    bytes
        .chunks_exact(PackedElement::SIZE)
        .map(|chunk| E::unpack(&bytemuck::pod_read_unaligned(chunk)))
        .collect()
}
