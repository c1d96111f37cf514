//! Refinement tables of the hybrid pyramid codec.
//!
//! An upward pyramid with anchor `a` and edge length `h` has its square base
//! on the bottom face of its anchor cube and its apex at `a + h·(1, 1, 1)`;
//! a downward pyramid has its base on the top face and its apex at `a`.
//! Refinement produces six pyramids and four tetrahedra of types 0 and 3.
//! Children are numbered by ascending cube id, ties broken by type code
//! (tetrahedra 0..5 before pyramids 6, 7).

use super::PyramidKind;
use crate::element::tet::TetType;

const UP: PyramidKind = PyramidKind::Upward;
const DOWN: PyramidKind = PyramidKind::Downward;
const TET0: PyramidKind = PyramidKind::Tet(TetType::from_table(0));
const TET3: PyramidKind = PyramidKind::Tet(TetType::from_table(3));

/// Kind of the `i`-th child of an upward (`[0]`) or downward (`[1]`) pyramid.
pub(crate) const CHILD_KIND: [[PyramidKind; 10]; 2] = [
    [UP, TET3, UP, TET0, UP, TET0, TET3, UP, DOWN, UP],
    [DOWN, TET0, TET3, UP, DOWN, TET3, DOWN, TET0, DOWN, DOWN],
];

/// Cube id of the `i`-th child of an upward (`[0]`) or downward (`[1]`) pyramid.
pub(crate) const CHILD_CUBE_ID: [[u8; 10]; 2] = [
    [0, 1, 1, 2, 2, 3, 3, 3, 3, 7],
    [0, 4, 4, 4, 4, 5, 5, 6, 6, 7],
];

/// Pyramid parent kind and child id of a key with type code `k` and cube
/// id `c`: `[k][c]`. `None` where no pyramid has such a child.
pub(crate) const PARENT_SLOT: [[Option<(PyramidKind, u8)>; 8]; 8] = [
    // tet type 0
    [None, None, Some((UP, 3)), Some((UP, 5)), Some((DOWN, 1)), None, Some((DOWN, 7)), None],
    [None; 8],
    [None; 8],
    // tet type 3
    [None, Some((UP, 1)), None, Some((UP, 6)), Some((DOWN, 2)), Some((DOWN, 5)), None, None],
    [None; 8],
    [None; 8],
    // upward pyramid
    [
        Some((UP, 0)),
        Some((UP, 2)),
        Some((UP, 4)),
        Some((UP, 7)),
        Some((DOWN, 3)),
        None,
        None,
        Some((UP, 9)),
    ],
    // downward pyramid
    [
        Some((DOWN, 0)),
        None,
        None,
        Some((UP, 8)),
        Some((DOWN, 4)),
        Some((DOWN, 6)),
        Some((DOWN, 8)),
        Some((DOWN, 9)),
    ],
];
