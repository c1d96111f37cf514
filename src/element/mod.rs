//! Element keys and the per-shape schemes that operate on them.
//!
//! Every element is a bit-packed key: an anchor on the integer lattice
//! `[0, 2^MAX_LEVEL)^d`, a refinement level and (for simplicial and hybrid
//! shapes) a type tag. All parent/child/ordering arithmetic is derived from
//! the key alone; the [`ElementScheme`] trait exposes it uniformly so the
//! adaptation driver never branches on shape.
//!
//! - [`tet`]: tetrahedra, Bey refinement in Morton order.
//! - [`pyramid`]: the hybrid pyramid whose refinement yields pyramids and tetrahedra.
//! - [`hypercube`]: lines, quads and hexes in Morton order.
//! - [`packed`]: the persisted 16-byte key layout.

pub mod hypercube;
pub mod packed;
pub mod pyramid;
pub mod scheme;
pub mod shape;
pub mod tet;

pub use hypercube::{CubeElement, HexScheme, HypercubeScheme, LineScheme, QuadScheme};
pub use packed::{PackedElement, PackedKey, decode_elements, encode_elements};
pub use pyramid::{PyramidElement, PyramidKind, PyramidScheme};
pub use scheme::ElementScheme;
pub use shape::Shape;
pub use tet::{TetElement, TetScheme, TetType};

/// Integer anchor coordinate type.
pub type Coord = i32;

/// Deepest refinement level. Linear ids of the densest tree (the pyramid)
/// still fit into a `u64` at this level.
pub const MAX_LEVEL: u8 = 21;

/// Edge length of a cell at `level`, in lattice units.
#[inline]
pub const fn cell_len(level: u8) -> Coord {
    1 << (MAX_LEVEL - level)
}

/// Edge length of the root cell.
pub const ROOT_LEN: Coord = cell_len(0);

/// Bit pattern of the anchor coordinates at `level`: bit `i` is set when the
/// anchor lies in the upper half of its parent cell along axis `i`.
#[inline]
pub(crate) fn cube_id(anchor: &[Coord], level: u8) -> usize {
    if level == 0 {
        return 0;
    }
    let h = cell_len(level);
    anchor
        .iter()
        .enumerate()
        .fold(0, |id, (axis, &c)| id | (usize::from(c & h != 0) << axis))
}

/// True if every coordinate is a multiple of the cell length at `level` and
/// lies inside the root cell.
#[inline]
pub(crate) fn is_aligned(anchor: &[Coord], level: u8) -> bool {
    level <= MAX_LEVEL
        && anchor
            .iter()
            .all(|&c| (0..ROOT_LEN).contains(&c) && c & (cell_len(level) - 1) == 0)
}
