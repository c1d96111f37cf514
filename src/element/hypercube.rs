//! Lines, quadrilaterals and hexahedra.
//!
//! A `D`-cube refines into `2^D` children numbered by their cube id, so the
//! curve order is plain Morton order and linear ids are the interleaved
//! anchor bits. The scheme overrides the generic id walk with that closed form.

use std::marker::PhantomData;

use super::{Coord, ElementScheme, MAX_LEVEL, Shape, cell_len, cube_id, is_aligned};

/// A `D`-dimensional cube key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeElement<const D: usize> {
    /// Refinement level (0 is the root).
    pub level: u8,
    /// Lower corner on the lattice.
    pub anchor: [Coord; D],
}

impl<const D: usize> CubeElement<D> {
    /// Number of children of every cube.
    pub const NUM_CHILDREN: usize = 1 << D;

    /// The root cube.
    pub const fn root() -> Self {
        Self {
            level: 0,
            anchor: [0; D],
        }
    }

    /// The child with the given cube id.
    pub fn child(&self, child_id: usize) -> Self {
        debug_assert!(child_id < Self::NUM_CHILDREN);
        debug_assert!(self.level < MAX_LEVEL);
        let level = self.level + 1;
        let h = cell_len(level);
        let mut anchor = self.anchor;
        for (axis, coord) in anchor.iter_mut().enumerate() {
            if (child_id >> axis) & 1 == 1 {
                *coord |= h;
            }
        }
        Self { level, anchor }
    }

    /// The enclosing cube one level up.
    pub fn parent(&self) -> Self {
        debug_assert!(self.level > 0);
        let h = cell_len(self.level);
        Self {
            level: self.level - 1,
            anchor: self.anchor.map(|c| c & !h),
        }
    }

    /// Position among the siblings, equal to the cube id.
    #[inline]
    pub fn child_id(&self) -> usize {
        cube_id(&self.anchor, self.level)
    }

    /// Morton index of the cube containing the anchor at `level`.
    pub fn morton_index(&self, level: u8) -> u64 {
        let shift = MAX_LEVEL - level;
        let mut index = 0u64;
        for bit in 0..u32::from(level) {
            for (axis, &c) in self.anchor.iter().enumerate() {
                let value = ((c >> shift) >> bit) & 1;
                index |= (value as u64) << (bit as usize * D + axis);
            }
        }
        index
    }

    /// The cube at `level` with the given Morton index.
    pub fn from_morton_index(level: u8, index: u64) -> Self {
        let shift = MAX_LEVEL - level;
        let mut anchor = [0; D];
        for bit in 0..usize::from(level) {
            for (axis, coord) in anchor.iter_mut().enumerate() {
                let value = ((index >> (bit * D + axis)) & 1) as Coord;
                *coord |= value << (bit + usize::from(shift));
            }
        }
        Self { level, anchor }
    }
}

/// Scheme for `D`-cube trees: [`LineScheme`], [`QuadScheme`], [`HexScheme`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HypercubeScheme<const D: usize> {
    _dim: PhantomData<[(); D]>,
}

/// Scheme for line trees.
pub type LineScheme = HypercubeScheme<1>;
/// Scheme for quadrilateral trees.
pub type QuadScheme = HypercubeScheme<2>;
/// Scheme for hexahedral trees.
pub type HexScheme = HypercubeScheme<3>;

impl<const D: usize> HypercubeScheme<D> {
    const DIMENSION_CHECK: () = assert!(D >= 1 && D <= 3, "hypercubes exist in 1..=3 dimensions");

    /// Creates the scheme.
    pub const fn new() -> Self {
        let () = Self::DIMENSION_CHECK;
        Self { _dim: PhantomData }
    }
}

impl<const D: usize> ElementScheme for HypercubeScheme<D> {
    type Element = CubeElement<D>;

    fn shape(&self) -> Shape {
        let () = Self::DIMENSION_CHECK;
        match D {
            1 => Shape::Line,
            2 => Shape::Quad,
            _ => Shape::Hex,
        }
    }

    fn root(&self) -> CubeElement<D> {
        CubeElement::root()
    }

    fn level(&self, element: &CubeElement<D>) -> u8 {
        element.level
    }

    fn element_shape(&self, _element: &CubeElement<D>) -> Shape {
        self.shape()
    }

    fn num_children(&self, _element: &CubeElement<D>) -> usize {
        CubeElement::<D>::NUM_CHILDREN
    }

    fn child_id(&self, element: &CubeElement<D>) -> usize {
        element.child_id()
    }

    fn parent(&self, element: &CubeElement<D>) -> CubeElement<D> {
        element.parent()
    }

    fn child(&self, element: &CubeElement<D>, child_id: usize) -> CubeElement<D> {
        element.child(child_id)
    }

    fn num_siblings(&self, element: &CubeElement<D>) -> usize {
        if element.level == 0 {
            1
        } else {
            CubeElement::<D>::NUM_CHILDREN
        }
    }

    fn num_descendants(&self, element: &CubeElement<D>, level: u8) -> u64 {
        debug_assert!(element.level <= level);
        1 << (D * usize::from(level - element.level))
    }

    fn first_descendant(&self, element: &CubeElement<D>, level: u8) -> CubeElement<D> {
        debug_assert!(element.level <= level && level <= MAX_LEVEL);
        CubeElement {
            level,
            anchor: element.anchor,
        }
    }

    fn last_descendant(&self, element: &CubeElement<D>, level: u8) -> CubeElement<D> {
        debug_assert!(element.level <= level && level <= MAX_LEVEL);
        let offset = cell_len(element.level) - cell_len(level);
        CubeElement {
            level,
            anchor: element.anchor.map(|c| c | offset),
        }
    }

    fn num_vertices(&self, _element: &CubeElement<D>) -> usize {
        1 << D
    }

    fn vertex_coords(&self, element: &CubeElement<D>, vertex: usize) -> [Coord; 3] {
        debug_assert!(vertex < 1 << D);
        let h = cell_len(element.level);
        let mut coords = [0; 3];
        for (axis, &c) in element.anchor.iter().enumerate() {
            coords[axis] = c + h * ((vertex >> axis) & 1) as Coord;
        }
        coords
    }

    fn is_valid(&self, element: &CubeElement<D>) -> bool {
        is_aligned(&element.anchor, element.level)
    }

    fn linear_id(&self, element: &CubeElement<D>, level: u8) -> u64 {
        debug_assert!(level <= MAX_LEVEL);
        element.morton_index(level)
    }

    fn from_linear_id(&self, level: u8, id: u64) -> CubeElement<D> {
        debug_assert!(id < self.num_descendants(&self.root(), level));
        CubeElement::from_morton_index(level, id)
    }

    fn successor(&self, element: &CubeElement<D>, level: u8) -> CubeElement<D> {
        let id = element.morton_index(level) + 1;
        assert!(
            id < self.num_descendants(&self.root(), level),
            "the last element of a tree has no successor"
        );
        CubeElement::from_morton_index(level, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_id<const D: usize>(element: &CubeElement<D>) -> u64 {
        let mut id = 0;
        let mut current = *element;
        let mut weight = 1;
        while current.level > 0 {
            id += current.child_id() as u64 * weight;
            weight <<= D;
            current = current.parent();
        }
        id
    }

    #[test]
    fn morton_index_matches_the_child_path() {
        let scheme = QuadScheme::new();
        let mut level_three = vec![scheme.root()];
        for _ in 0..3 {
            level_three = level_three.iter().flat_map(|e| scheme.children(e)).collect();
        }
        for (position, element) in level_three.iter().enumerate() {
            assert_eq!(scheme.linear_id(element, 3), position as u64);
            assert_eq!(path_id(element), position as u64);
            assert_eq!(scheme.from_linear_id(3, position as u64), *element);
        }
    }

    #[test]
    fn successor_walks_the_whole_level() {
        let scheme = HexScheme::new();
        let mut current = scheme.first_descendant(&scheme.root(), 2);
        let mut visited = 1;
        while current != scheme.last_descendant(&scheme.root(), 2) {
            let next = scheme.successor(&current, 2);
            assert_eq!(scheme.compare(&current, &next), std::cmp::Ordering::Less);
            current = next;
            visited += 1;
        }
        assert_eq!(visited, 64);
    }

    #[test]
    fn linear_id_of_coarser_and_finer_levels() {
        let scheme = QuadScheme::new();
        let element = scheme.root().child(3).child(1);
        assert_eq!(scheme.linear_id(&element, 2), 13);
        assert_eq!(scheme.linear_id(&element, 1), 3);
        assert_eq!(scheme.linear_id(&element, 4), 13 * 16);
    }

    #[test]
    fn deepest_hex_ids_fit() {
        let scheme = HexScheme::new();
        let last = scheme.last_descendant(&scheme.root(), MAX_LEVEL);
        assert_eq!(scheme.linear_id(&last, MAX_LEVEL), (1 << 63) - 1);
    }

    #[test]
    fn vertices_span_the_cell() {
        let scheme = QuadScheme::new();
        let element = scheme.root().child(2);
        let h = cell_len(1);
        assert_eq!(scheme.vertex_coords(&element, 0), [0, h, 0]);
        assert_eq!(scheme.vertex_coords(&element, 3), [h, 2 * h, 0]);
        assert_eq!(scheme.centroid(&element), [0.25, 0.75, 0.0]);
    }

    #[test]
    fn shapes_and_validity() {
        assert_eq!(LineScheme::new().shape(), Shape::Line);
        assert_eq!(QuadScheme::new().shape(), Shape::Quad);
        assert_eq!(HexScheme::new().shape(), Shape::Hex);
        let scheme = QuadScheme::new();
        assert!(scheme.is_valid(&scheme.root().child(1)));
        assert!(!scheme.is_valid(&CubeElement {
            level: 1,
            anchor: [1, 0]
        }));
        assert!(!scheme.is_valid(&CubeElement {
            level: 0,
            anchor: [-2, 0]
        }));
    }
}
