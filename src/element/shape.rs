//! Reference shapes of trees and elements.

use serde::{Deserialize, Serialize};

/// Cell shapes a tree root (or an element produced by refinement) can have.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// 0D vertex.
    #[default]
    Vertex,
    /// 1D line segment.
    Line,
    /// 2D tensor-product cell.
    Quad,
    /// 2D simplex.
    Triangle,
    /// 3D tensor-product cell.
    Hex,
    /// 3D simplex.
    Tet,
    /// 3D wedge.
    Prism,
    /// 3D pyramid; refines into pyramids and tetrahedra.
    Pyramid,
}

impl Shape {
    /// Returns the topological dimension of the shape.
    pub fn dimension(self) -> u8 {
        match self {
            Shape::Vertex => 0,
            Shape::Line => 1,
            Shape::Triangle | Shape::Quad => 2,
            Shape::Tet | Shape::Hex | Shape::Prism | Shape::Pyramid => 3,
        }
    }

    /// Number of corner vertices.
    pub fn num_vertices(self) -> usize {
        match self {
            Shape::Vertex => 1,
            Shape::Line => 2,
            Shape::Triangle => 3,
            Shape::Quad | Shape::Tet => 4,
            Shape::Pyramid => 5,
            Shape::Prism => 6,
            Shape::Hex => 8,
        }
    }

    /// Number of children produced by one refinement step of this shape.
    pub fn num_children(self) -> usize {
        match self {
            Shape::Vertex => 1,
            Shape::Line => 2,
            Shape::Triangle | Shape::Quad => 4,
            Shape::Tet | Shape::Hex | Shape::Prism => 8,
            Shape::Pyramid => 10,
        }
    }

    /// True for shapes whose refinement mixes child shapes.
    pub fn is_hybrid(self) -> bool {
        matches!(self, Shape::Pyramid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{
        ElementScheme, HexScheme, LineScheme, PyramidScheme, QuadScheme, TetScheme,
    };

    fn check_root<S: ElementScheme>(scheme: S) {
        let shape = scheme.shape();
        let root = scheme.root();
        assert_eq!(scheme.element_shape(&root), shape);
        assert_eq!(scheme.num_children(&root), shape.num_children());
        assert_eq!(scheme.num_vertices(&root), shape.num_vertices());
        let spanned = (0..3)
            .filter(|&axis| {
                (0..shape.num_vertices()).any(|v| scheme.vertex_coords(&root, v)[axis] != 0)
            })
            .count();
        assert_eq!(spanned, usize::from(shape.dimension()));
    }

    #[test]
    fn schemes_agree_with_their_root_shape() {
        check_root(LineScheme::new());
        check_root(QuadScheme::new());
        check_root(HexScheme::new());
        check_root(TetScheme);
        check_root(PyramidScheme);
    }

    #[test]
    fn dimensions_and_hybrids() {
        assert_eq!(Shape::Line.dimension(), 1);
        assert_eq!(Shape::Quad.dimension(), 2);
        assert_eq!(Shape::Pyramid.dimension(), 3);
        assert!(Shape::Pyramid.is_hybrid());
        assert!(!Shape::Tet.is_hybrid());
        assert_eq!(Shape::default(), Shape::Vertex);
    }
}
