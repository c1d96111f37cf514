//! Tetrahedral elements: Bey refinement in tetrahedral Morton order.
//!
//! A tetrahedron is identified by the anchor of the cube it lies in, its level
//! and one of six types (the simplices of that cube sharing its main diagonal).
//! Each refinement step splits it into eight tetrahedra whose types and cube
//! ids are fixed functions of the parent type; see [`tables`].

mod tables;

use serde::{Deserialize, Serialize};

use super::{Coord, ElementScheme, MAX_LEVEL, Shape, cell_len, cube_id, is_aligned};
use crate::forest_error::ForestError;

/// One of the six tetrahedral types.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(transparent)]
pub struct TetType(u8);

impl TetType {
    /// Number of tetrahedral types.
    pub const COUNT: u8 = 6;

    /// Returns the type with the given numeric code, if it is below [`Self::COUNT`].
    #[inline]
    pub const fn new(raw: u8) -> Option<Self> {
        if raw < Self::COUNT { Some(Self(raw)) } else { None }
    }

    /// Numeric code of this type.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Unchecked constructor for table lookups.
    #[inline]
    pub(crate) const fn from_table(raw: u8) -> Self {
        debug_assert!(raw < Self::COUNT);
        Self(raw)
    }
}

impl TryFrom<u8> for TetType {
    type Error = ForestError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(ForestError::InvalidTypeTag { tag: raw })
    }
}

impl From<TetType> for u8 {
    fn from(tet_type: TetType) -> Self {
        tet_type.get()
    }
}

/// Number of descendants `level_diff` levels below a tetrahedron.
#[inline]
pub(crate) const fn num_descendants(level_diff: u8) -> u64 {
    1 << (3 * level_diff as u32)
}

/// A tetrahedral element key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TetElement {
    /// Anchor of the cube containing the tetrahedron.
    pub anchor: [Coord; 3],
    /// Refinement level (0 is the root).
    pub level: u8,
    /// Type within the anchor cube.
    pub tet_type: TetType,
}

impl TetElement {
    /// The root tetrahedron (type 0).
    pub const fn root() -> Self {
        Self {
            anchor: [0; 3],
            level: 0,
            tet_type: TetType(0),
        }
    }

    /// Cube id of the anchor at `level`.
    #[inline]
    pub fn cube_id(&self, level: u8) -> usize {
        cube_id(&self.anchor, level)
    }

    /// The `child_id`-th child in Morton order.
    pub fn child(&self, child_id: usize) -> Self {
        debug_assert!(child_id < 8);
        debug_assert!(self.level < MAX_LEVEL);
        let t = self.tet_type.index();
        let cube_id = tables::CHILD_CUBE_ID[t][child_id];
        let level = self.level + 1;
        let h = cell_len(level);
        let mut anchor = self.anchor;
        for (axis, coord) in anchor.iter_mut().enumerate() {
            if cube_id & (1 << axis) != 0 {
                *coord |= h;
            }
        }
        Self {
            anchor,
            level,
            tet_type: TetType::from_table(tables::CHILD_TYPE[t][child_id]),
        }
    }

    /// Parent tetrahedron together with this element's child id.
    pub fn parent_and_child_id(&self) -> (Self, usize) {
        debug_assert!(self.level > 0);
        let cube_id = self.cube_id(self.level);
        let h = cell_len(self.level);
        let parent = Self {
            anchor: self.anchor.map(|c| c & !h),
            level: self.level - 1,
            tet_type: TetType::from_table(tables::PARENT_TYPE[cube_id][self.tet_type.index()]),
        };
        let child_id = tables::CHILD_ID[self.tet_type.index()][cube_id];
        (parent, usize::from(child_id))
    }

    /// Parent tetrahedron.
    #[inline]
    pub fn parent(&self) -> Self {
        self.parent_and_child_id().0
    }

    /// Position among the siblings.
    #[inline]
    pub fn child_id(&self) -> usize {
        if self.level == 0 {
            return 0;
        }
        usize::from(tables::CHILD_ID[self.tet_type.index()][self.cube_id(self.level)])
    }

    /// First descendant at `level`: same anchor and type.
    pub fn first_descendant(&self, level: u8) -> Self {
        debug_assert!(self.level <= level && level <= MAX_LEVEL);
        Self { level, ..*self }
    }

    /// Last descendant at `level`: the anchor moves to the far corner cube.
    pub fn last_descendant(&self, level: u8) -> Self {
        debug_assert!(self.level <= level && level <= MAX_LEVEL);
        let offset = cell_len(self.level) - cell_len(level);
        Self {
            anchor: self.anchor.map(|c| c | offset),
            level,
            ..*self
        }
    }

    /// Lattice coordinates of vertex `vertex` (0..4).
    pub fn vertex_coords(&self, vertex: usize) -> [Coord; 3] {
        debug_assert!(vertex < 4);
        let h = cell_len(self.level);
        let t = self.tet_type.index();
        let ei = t / 2;
        let ej = (ei + 2 - t % 2) % 3;
        let mut coords = self.anchor;
        match vertex {
            0 => {}
            1 => coords[ei] += h,
            2 => {
                coords[ei] += h;
                coords[ej] += h;
            }
            _ => coords.iter_mut().for_each(|c| *c += h),
        }
        coords
    }

    /// True if the ancestry of this key ends in `root`.
    fn descends_from(&self, root: &Self) -> bool {
        if !is_aligned(&self.anchor, self.level) {
            return false;
        }
        let mut current = *self;
        while current.level > 0 {
            current = current.parent();
        }
        current == *root
    }
}

/// Scheme for trees whose root is a tetrahedron.
#[derive(Clone, Copy, Debug, Default)]
pub struct TetScheme;

impl ElementScheme for TetScheme {
    type Element = TetElement;

    fn shape(&self) -> Shape {
        Shape::Tet
    }

    fn root(&self) -> TetElement {
        TetElement::root()
    }

    fn level(&self, element: &TetElement) -> u8 {
        element.level
    }

    fn element_shape(&self, _element: &TetElement) -> Shape {
        Shape::Tet
    }

    fn num_children(&self, _element: &TetElement) -> usize {
        8
    }

    fn child_id(&self, element: &TetElement) -> usize {
        element.child_id()
    }

    fn parent(&self, element: &TetElement) -> TetElement {
        element.parent()
    }

    fn child(&self, element: &TetElement, child_id: usize) -> TetElement {
        element.child(child_id)
    }

    fn parent_and_child_id(&self, element: &TetElement) -> (TetElement, usize) {
        element.parent_and_child_id()
    }

    fn num_siblings(&self, element: &TetElement) -> usize {
        if element.level == 0 { 1 } else { 8 }
    }

    fn num_descendants(&self, element: &TetElement, level: u8) -> u64 {
        debug_assert!(element.level <= level);
        num_descendants(level - element.level)
    }

    fn first_descendant(&self, element: &TetElement, level: u8) -> TetElement {
        element.first_descendant(level)
    }

    fn last_descendant(&self, element: &TetElement, level: u8) -> TetElement {
        element.last_descendant(level)
    }

    fn num_vertices(&self, _element: &TetElement) -> usize {
        4
    }

    fn vertex_coords(&self, element: &TetElement, vertex: usize) -> [Coord; 3] {
        element.vertex_coords(vertex)
    }

    fn is_valid(&self, element: &TetElement) -> bool {
        element.descends_from(&TetElement::root())
    }
}
