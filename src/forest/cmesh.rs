//! Coarse mesh: the tree topology a forest is built on.

use crate::element::Shape;

/// Read-only view of the coarse mesh a forest refines.
///
/// Tree connectivity and ownership live outside this crate; forests only
/// need the number of trees and the shape of each root.
pub trait CoarseMesh {
    /// Number of trees.
    fn num_trees(&self) -> usize;

    /// Shape of the root of tree `tree_id`.
    fn tree_shape(&self, tree_id: usize) -> Shape;
}

impl CoarseMesh for [Shape] {
    fn num_trees(&self) -> usize {
        self.len()
    }

    fn tree_shape(&self, tree_id: usize) -> Shape {
        self[tree_id]
    }
}

impl CoarseMesh for Vec<Shape> {
    fn num_trees(&self) -> usize {
        self.len()
    }

    fn tree_shape(&self, tree_id: usize) -> Shape {
        self[tree_id]
    }
}

impl<const N: usize> CoarseMesh for [Shape; N] {
    fn num_trees(&self) -> usize {
        N
    }

    fn tree_shape(&self, tree_id: usize) -> Shape {
        self[tree_id]
    }
}
