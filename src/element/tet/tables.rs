//! Refinement tables of the tetrahedral codec.
//!
//! A tetrahedron of type `t` with anchor `a` and edge length `h` has the
//! vertices `a`, `a + h·e_i`, `a + h·(e_i + e_j)` and `a + h·(1, 1, 1)` with
//! `i = t / 2` and `j = (i + 2 - t % 2) % 3`, i.e. the six types are the six
//! simplices of the cube sharing its main diagonal. Children are numbered in
//! Morton order: ascending cube id, ties broken by ascending type.

/// Type of the `i`-th child of a tetrahedron of type `t`: `[t][i]`.
pub(crate) const CHILD_TYPE: [[u8; 8]; 6] = [
    [0, 0, 4, 5, 0, 1, 2, 0],
    [1, 1, 2, 3, 0, 1, 5, 1],
    [2, 0, 1, 2, 2, 3, 4, 2],
    [3, 3, 4, 5, 1, 2, 3, 3],
    [4, 2, 3, 4, 0, 4, 5, 4],
    [5, 0, 1, 5, 3, 4, 5, 5],
];

/// Cube id of the `i`-th child of a tetrahedron of type `t`: `[t][i]`.
pub(crate) const CHILD_CUBE_ID: [[u8; 8]; 6] = [
    [0, 1, 1, 1, 5, 5, 5, 7],
    [0, 1, 1, 1, 3, 3, 3, 7],
    [0, 2, 2, 2, 3, 3, 3, 7],
    [0, 2, 2, 2, 6, 6, 6, 7],
    [0, 4, 4, 4, 6, 6, 6, 7],
    [0, 4, 4, 4, 5, 5, 5, 7],
];

/// Parent type of a child with cube id `c` and type `t`: `[c][t]`.
pub(crate) const PARENT_TYPE: [[u8; 6]; 8] = [
    [0, 1, 2, 3, 4, 5],
    [0, 1, 1, 1, 0, 0],
    [2, 2, 2, 3, 3, 3],
    [1, 1, 2, 2, 2, 1],
    [5, 5, 4, 4, 4, 5],
    [0, 0, 0, 5, 5, 5],
    [4, 3, 3, 3, 4, 4],
    [0, 1, 2, 3, 4, 5],
];

/// Child id of a child with type `t` and cube id `c`: `[t][c]`.
pub(crate) const CHILD_ID: [[u8; 8]; 6] = [
    [0, 1, 1, 4, 1, 4, 4, 7],
    [0, 1, 2, 5, 2, 5, 4, 7],
    [0, 2, 3, 4, 1, 6, 5, 7],
    [0, 3, 1, 5, 2, 4, 6, 7],
    [0, 2, 2, 6, 3, 5, 5, 7],
    [0, 3, 3, 6, 3, 6, 6, 7],
];
