//! The element-scheme contract.
//!
//! A scheme implements the shape-specific key arithmetic (`parent`, `child`,
//! `child_id`, descendants, vertices). Everything derived from those, such as
//! family detection, linear ids, ordering and successors, is provided here once
//! for all shapes; schemes override a provided method only when they have a
//! cheaper closed form (Morton interleaving for hypercubes).

use std::cmp::Ordering;
use std::fmt::Debug;

use super::{Coord, MAX_LEVEL, ROOT_LEN, Shape};

/// Uniform operation set over the elements of one tree shape.
///
/// # Contract
/// Inputs are trusted. Level bounds and child indices are checked with
/// `debug_assert!` only; keys that are structurally impossible for the shape
/// make the codec panic rather than return a wrong key.
pub trait ElementScheme {
    /// Key type of this shape.
    type Element: Copy + Eq + Debug;

    /// Shape of the tree roots served by this scheme.
    fn shape(&self) -> Shape;

    /// Deepest level this scheme can represent.
    fn max_level(&self) -> u8 {
        MAX_LEVEL
    }

    /// The level-0 element covering the whole tree.
    fn root(&self) -> Self::Element;

    /// Refinement level of `element`.
    fn level(&self, element: &Self::Element) -> u8;

    /// Shape of `element` itself; differs from [`Self::shape`] for hybrid trees.
    fn element_shape(&self, element: &Self::Element) -> Shape;

    /// Number of children `element` refines into.
    fn num_children(&self, element: &Self::Element) -> usize;

    /// Position of `element` among its siblings.
    fn child_id(&self, element: &Self::Element) -> usize;

    /// The element `element` was refined from. Requires `level > 0`.
    fn parent(&self, element: &Self::Element) -> Self::Element;

    /// The `child_id`-th child of `element`. Requires `level < max_level`.
    fn child(&self, element: &Self::Element, child_id: usize) -> Self::Element;

    /// Number of descendants of `element` at the absolute `level`.
    fn num_descendants(&self, element: &Self::Element, level: u8) -> u64;

    /// The first descendant of `element` at `level` in curve order.
    fn first_descendant(&self, element: &Self::Element, level: u8) -> Self::Element;

    /// The last descendant of `element` at `level` in curve order.
    fn last_descendant(&self, element: &Self::Element, level: u8) -> Self::Element;

    /// Number of corner vertices of `element`.
    fn num_vertices(&self, element: &Self::Element) -> usize;

    /// Lattice coordinates of corner `vertex`. Unused axes are zero.
    fn vertex_coords(&self, element: &Self::Element, vertex: usize) -> [Coord; 3];

    /// True if `element` is a well-formed key of a tree rooted at [`Self::root`].
    fn is_valid(&self, element: &Self::Element) -> bool;

    /// Parent and child id in one step. Hybrid schemes override this to share
    /// the parent-shape detection between both results.
    fn parent_and_child_id(&self, element: &Self::Element) -> (Self::Element, usize) {
        (self.parent(element), self.child_id(element))
    }

    /// Size of the family `element` belongs to; 1 for the root.
    fn num_siblings(&self, element: &Self::Element) -> usize {
        if self.level(element) == 0 {
            1
        } else {
            self.num_children(&self.parent(element))
        }
    }

    /// All children of `element` in child-id order.
    fn children(&self, element: &Self::Element) -> Vec<Self::Element> {
        (0..self.num_children(element))
            .map(|child_id| self.child(element, child_id))
            .collect()
    }

    /// The ancestor of `element` at `level` (`element` itself at its own level).
    fn ancestor(&self, element: &Self::Element, level: u8) -> Self::Element {
        debug_assert!(level <= self.level(element));
        let mut current = *element;
        while self.level(&current) > level {
            current = self.parent(&current);
        }
        current
    }

    /// True if `ancestor` equals `element` or one of its ancestors.
    fn is_ancestor(&self, ancestor: &Self::Element, element: &Self::Element) -> bool {
        let level = self.level(ancestor);
        level <= self.level(element) && self.ancestor(element, level) == *ancestor
    }

    /// True iff `elements` are exactly the children of one parent, in
    /// child-id order.
    fn is_family(&self, elements: &[Self::Element]) -> bool {
        let Some(first) = elements.first() else {
            return false;
        };
        if self.level(first) == 0 {
            return false;
        }
        let parent = self.parent(first);
        elements.len() == self.num_children(&parent)
            && elements
                .iter()
                .enumerate()
                .all(|(slot, element)| self.parent_and_child_id(element) == (parent, slot))
    }

    /// Dense position of `element` among all elements at `level` of the tree.
    ///
    /// For `level` below the element's own level the ancestor's id is
    /// returned, above it the id of the first descendant. Each preceding
    /// sibling on the path from the root contributes its descendant count at
    /// `level`, which keeps ids dense when child counts vary by type.
    fn linear_id(&self, element: &Self::Element, level: u8) -> u64 {
        debug_assert!(level <= self.max_level());
        let mut current = if level <= self.level(element) {
            self.ancestor(element, level)
        } else {
            self.first_descendant(element, level)
        };
        let mut id = 0;
        while self.level(&current) > 0 {
            let (parent, child_id) = self.parent_and_child_id(&current);
            for sibling in 0..child_id {
                id += self.num_descendants(&self.child(&parent, sibling), level);
            }
            current = parent;
        }
        id
    }

    /// Inverse of [`Self::linear_id`]: the element at `level` with the given id.
    fn from_linear_id(&self, level: u8, id: u64) -> Self::Element {
        debug_assert!(level <= self.max_level());
        debug_assert!(id < self.num_descendants(&self.root(), level));
        let mut remaining = id;
        let mut current = self.root();
        while self.level(&current) < level {
            let mut next = None;
            for child_id in 0..self.num_children(&current) {
                let child = self.child(&current, child_id);
                let count = self.num_descendants(&child, level);
                if remaining < count {
                    next = Some(child);
                    break;
                }
                remaining -= count;
            }
            current = next
                .unwrap_or_else(|| panic!("linear id {id} is out of range at level {level}"));
        }
        current
    }

    /// Curve order: linear id at the coarser of both levels, ancestors first.
    fn compare(&self, a: &Self::Element, b: &Self::Element) -> Ordering {
        let (level_a, level_b) = (self.level(a), self.level(b));
        let level = level_a.min(level_b);
        self.linear_id(a, level)
            .cmp(&self.linear_id(b, level))
            .then(level_a.cmp(&level_b))
    }

    /// The element following `element`'s ancestor at `level` in curve order.
    ///
    /// # Panics
    /// Panics when called on the last element of the tree at `level`.
    fn successor(&self, element: &Self::Element, level: u8) -> Self::Element {
        assert!(level > 0, "the last element of a tree has no successor");
        let current = self.ancestor(element, level);
        let (parent, child_id) = self.parent_and_child_id(&current);
        if child_id + 1 == self.num_children(&parent) {
            let next_parent = self.successor(&parent, level - 1);
            self.child(&next_parent, 0)
        } else {
            self.child(&parent, child_id + 1)
        }
    }

    /// Corner `vertex` scaled to the unit reference cell.
    fn vertex_reference_coords(&self, element: &Self::Element, vertex: usize) -> [f64; 3] {
        self.vertex_coords(element, vertex)
            .map(|c| f64::from(c) / f64::from(ROOT_LEN))
    }

    /// Vertex average of `element` in reference coordinates.
    fn centroid(&self, element: &Self::Element) -> [f64; 3] {
        let n = self.num_vertices(element);
        let mut sum = [0.0; 3];
        for vertex in 0..n {
            let coords = self.vertex_reference_coords(element, vertex);
            for (acc, c) in sum.iter_mut().zip(coords) {
                *acc += c;
            }
        }
        sum.map(|c| c / n as f64)
    }
}
