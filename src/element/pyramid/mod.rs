//! Hybrid pyramid elements.
//!
//! Refining a pyramid yields six pyramids and four tetrahedra, so a pyramid
//! tree holds both shapes. Keys share the tetrahedral layout (anchor, level,
//! type code) with two extra codes: 6 for an upward and 7 for a downward
//! pyramid. Tetrahedra below a tetrahedron refine exactly as in [`crate::element::tet`].
//!
//! The subtle part is the parent of a tetrahedron: a tetrahedron of type 0
//! or 3 can be the child of either a pyramid or a tetrahedron, depending on
//! which one occupies the candidate cell one level up. The table slot alone
//! cannot tell; [`PyramidElement::is_pyramid_cell`] resolves it by checking
//! that the candidate pyramid is itself reachable from the root.

mod tables;

use serde::{Deserialize, Serialize};

use super::tet::{self, TetElement, TetType};
use super::{Coord, ElementScheme, MAX_LEVEL, Shape, cell_len, cube_id, is_aligned};
use crate::forest_error::ForestError;

/// Type code stored in a pyramid-tree key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PyramidKind {
    /// A tetrahedron of the given type (codes 0..6).
    Tet(TetType),
    /// Pyramid with its base on the bottom face of the anchor cube (code 6).
    Upward,
    /// Pyramid with its base on the top face of the anchor cube (code 7).
    Downward,
}

impl PyramidKind {
    /// Numeric type code.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Self::Tet(t) => t.get(),
            Self::Upward => 6,
            Self::Downward => 7,
        }
    }

    /// Kind with the given type code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            6 => Some(Self::Upward),
            7 => Some(Self::Downward),
            _ => match TetType::new(code) {
                Some(t) => Some(Self::Tet(t)),
                None => None,
            },
        }
    }

    /// Shape of an element of this kind.
    #[inline]
    pub const fn shape(self) -> Shape {
        match self {
            Self::Tet(_) => Shape::Tet,
            Self::Upward | Self::Downward => Shape::Pyramid,
        }
    }

    #[inline]
    const fn is_pyramid(self) -> bool {
        !matches!(self, Self::Tet(_))
    }
}

impl TryFrom<u8> for PyramidKind {
    type Error = ForestError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(ForestError::InvalidTypeTag { tag: code })
    }
}

impl From<PyramidKind> for u8 {
    fn from(kind: PyramidKind) -> Self {
        kind.code()
    }
}

/// Number of descendants `level_diff` levels below a pyramid: `2·8^d − 6^d`.
#[inline]
pub(crate) fn num_descendants(level_diff: u8) -> u64 {
    let d = u32::from(level_diff);
    let eight = 1u64 << (3 * d);
    // 2·8^21 overflows; subtract before adding the second term.
    eight - 6u64.pow(d) + eight
}

/// An element key of a pyramid tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PyramidElement {
    /// Anchor of the cube containing the element.
    pub anchor: [Coord; 3],
    /// Refinement level (0 is the root).
    pub level: u8,
    /// Pyramid orientation or tetrahedral type.
    pub kind: PyramidKind,
}

impl From<TetElement> for PyramidElement {
    fn from(tet: TetElement) -> Self {
        Self {
            anchor: tet.anchor,
            level: tet.level,
            kind: PyramidKind::Tet(tet.tet_type),
        }
    }
}

impl PyramidElement {
    /// The root: an upward pyramid filling the reference pyramid.
    pub const fn root() -> Self {
        Self {
            anchor: [0; 3],
            level: 0,
            kind: PyramidKind::Upward,
        }
    }

    /// The tetrahedral view of this key, if it is a tetrahedron.
    #[inline]
    pub fn as_tet(&self) -> Option<TetElement> {
        match self.kind {
            PyramidKind::Tet(tet_type) => Some(TetElement {
                anchor: self.anchor,
                level: self.level,
                tet_type,
            }),
            PyramidKind::Upward | PyramidKind::Downward => None,
        }
    }

    /// Cube id of the anchor at `level`.
    #[inline]
    pub fn cube_id(&self, level: u8) -> usize {
        cube_id(&self.anchor, level)
    }

    /// Number of children: 10 for a pyramid, 8 for a tetrahedron.
    #[inline]
    pub fn num_children(&self) -> usize {
        if self.kind.is_pyramid() { 10 } else { 8 }
    }

    /// The `child_id`-th child.
    pub fn child(&self, child_id: usize) -> Self {
        debug_assert!(child_id < self.num_children());
        debug_assert!(self.level < MAX_LEVEL);
        let row = match self.kind {
            PyramidKind::Tet(tet_type) => {
                let tet = TetElement {
                    anchor: self.anchor,
                    level: self.level,
                    tet_type,
                };
                return tet.child(child_id).into();
            }
            PyramidKind::Upward => 0,
            PyramidKind::Downward => 1,
        };
        let cube_id = tables::CHILD_CUBE_ID[row][child_id];
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
            kind: tables::CHILD_KIND[row][child_id],
        }
    }

    /// The pyramid this key would be a child of if its parent were a
    /// pyramid, with the child id it would have there.
    fn try_parent_slot(&self) -> Option<(Self, usize)> {
        debug_assert!(self.level > 0);
        let slot = tables::PARENT_SLOT[usize::from(self.kind.code())][self.cube_id(self.level)];
        let h = cell_len(self.level);
        slot.map(|(kind, child_id)| {
            let parent = Self {
                anchor: self.anchor.map(|c| c & !h),
                level: self.level - 1,
                kind,
            };
            (parent, usize::from(child_id))
        })
    }

    /// True if this key is a pyramid that occurs in the refinement of the root.
    ///
    /// Pyramids only ever descend from pyramids, so the ancestry is walked
    /// through the pyramid parent slots; a missing slot or a level-0 cell
    /// other than the root means the cell is occupied by tetrahedra.
    pub fn is_pyramid_cell(&self) -> bool {
        let mut current = *self;
        while current.level > 0 {
            if !current.kind.is_pyramid() {
                return false;
            }
            match current.try_parent_slot() {
                Some((parent, _)) => current = parent,
                None => return false,
            }
        }
        current == Self::root()
    }

    /// Parent together with this element's child id.
    ///
    /// # Panics
    /// Panics if this is a pyramid with no pyramid parent slot; such a key
    /// cannot occur in a pyramid tree.
    pub fn parent_and_child_id(&self) -> (Self, usize) {
        debug_assert!(self.level > 0);
        match self.kind {
            PyramidKind::Tet(tet_type) => match self.try_parent_slot() {
                Some((parent, child_id)) if parent.is_pyramid_cell() => (parent, child_id),
                _ => {
                    let tet = TetElement {
                        anchor: self.anchor,
                        level: self.level,
                        tet_type,
                    };
                    let (parent, child_id) = tet.parent_and_child_id();
                    (parent.into(), child_id)
                }
            },
            PyramidKind::Upward | PyramidKind::Downward => {
                self.try_parent_slot().unwrap_or_else(|| {
                    panic!(
                        "pyramid {:?} at level {} has no parent: cube id {} is never a pyramid child",
                        self.anchor,
                        self.level,
                        self.cube_id(self.level)
                    )
                })
            }
        }
    }

    /// Parent element.
    #[inline]
    pub fn parent(&self) -> Self {
        self.parent_and_child_id().0
    }

    /// Position among the siblings.
    #[inline]
    pub fn child_id(&self) -> usize {
        if self.level == 0 {
            0
        } else {
            self.parent_and_child_id().1
        }
    }

    /// Number of descendants at `level`.
    pub fn num_descendants(&self, level: u8) -> u64 {
        debug_assert!(self.level <= level);
        let diff = level - self.level;
        if self.kind.is_pyramid() {
            num_descendants(diff)
        } else {
            tet::num_descendants(diff)
        }
    }

    /// First descendant at `level`: same anchor and kind.
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

    /// Number of corners: 5 for a pyramid, 4 for a tetrahedron.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        if self.kind.is_pyramid() { 5 } else { 4 }
    }

    /// Lattice coordinates of corner `vertex`. Pyramid corners list the
    /// base counter-clockwise from the anchor side, then the apex.
    pub fn vertex_coords(&self, vertex: usize) -> [Coord; 3] {
        debug_assert!(vertex < self.num_vertices());
        let h = cell_len(self.level);
        let (base_z, apex) = match self.kind {
            PyramidKind::Tet(tet_type) => {
                let tet = TetElement {
                    anchor: self.anchor,
                    level: self.level,
                    tet_type,
                };
                return tet.vertex_coords(vertex);
            }
            PyramidKind::Upward => (0, [h, h, h]),
            PyramidKind::Downward => (h, [0, 0, 0]),
        };
        let offset = match vertex {
            0 => [0, 0, base_z],
            1 => [h, 0, base_z],
            2 => [0, h, base_z],
            3 => [h, h, base_z],
            _ => apex,
        };
        let [x, y, z] = self.anchor;
        [x + offset[0], y + offset[1], z + offset[2]]
    }

    /// True if walking the parents of this key ends at the root.
    fn descends_from_root(&self) -> bool {
        if !is_aligned(&self.anchor, self.level) {
            return false;
        }
        let mut current = *self;
        while current.level > 0 {
            if current.kind.is_pyramid() {
                return current.is_pyramid_cell();
            }
            current = current.parent();
        }
        current == Self::root()
    }
}

/// Scheme for trees whose root is a pyramid.
#[derive(Clone, Copy, Debug, Default)]
pub struct PyramidScheme;

impl ElementScheme for PyramidScheme {
    type Element = PyramidElement;

    fn shape(&self) -> Shape {
        Shape::Pyramid
    }

    fn root(&self) -> PyramidElement {
        PyramidElement::root()
    }

    fn level(&self, element: &PyramidElement) -> u8 {
        element.level
    }

    fn element_shape(&self, element: &PyramidElement) -> Shape {
        element.kind.shape()
    }

    fn num_children(&self, element: &PyramidElement) -> usize {
        element.num_children()
    }

    fn child_id(&self, element: &PyramidElement) -> usize {
        element.child_id()
    }

    fn parent(&self, element: &PyramidElement) -> PyramidElement {
        element.parent()
    }

    fn child(&self, element: &PyramidElement, child_id: usize) -> PyramidElement {
        element.child(child_id)
    }

    fn parent_and_child_id(&self, element: &PyramidElement) -> (PyramidElement, usize) {
        element.parent_and_child_id()
    }

    fn num_descendants(&self, element: &PyramidElement, level: u8) -> u64 {
        element.num_descendants(level)
    }

    fn first_descendant(&self, element: &PyramidElement, level: u8) -> PyramidElement {
        element.first_descendant(level)
    }

    fn last_descendant(&self, element: &PyramidElement, level: u8) -> PyramidElement {
        element.last_descendant(level)
    }

    fn num_vertices(&self, element: &PyramidElement) -> usize {
        element.num_vertices()
    }

    fn vertex_coords(&self, element: &PyramidElement, vertex: usize) -> [Coord; 3] {
        element.vertex_coords(vertex)
    }

    fn is_valid(&self, element: &PyramidElement) -> bool {
        element.descends_from_root()
    }
}
