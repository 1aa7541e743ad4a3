//! Mixed-radix neighbor indexing.
//!
//! A `d`-dimensional cell sees its neighborhood as relative coordinates in
//! `{-1, 0, 1}^d`. Each coordinate is recentered by `+1` per component so the
//! components become base-3 digits, the digits are folded into a positional
//! index, and the slot that would represent the cell itself (the all-zero
//! offset) is removed by shifting every later index down by one. The result
//! addresses one of the `3^d - 1` slots of a cell's neighbor table.
//!
//! [`neighbor_index`] composes the whole pipeline and is the single entry
//! point the rest of the crate routes through; the individual steps are
//! exposed for reuse and testing.

use itertools::Itertools;

use crate::error::{LatticeError, LatticeResult};

/// Returns the number of neighbor slots for a `ndim`-dimensional cell:
/// `3^d - 1`, which is `0` for zero dimensions.
#[inline]
pub fn neighbor_count(ndim: usize) -> usize {
    3_usize.pow(ndim as u32) - 1
}

/// Returns the all-ones recentering offset for `ndim` dimensions.
///
/// Neighbor lookups treat the current cell as the origin; index generation
/// treats it as `(1, 1, ...)` so every digit is non-negative.
#[inline]
pub fn recentering_offset(ndim: usize) -> Vec<isize> {
    vec![1; ndim]
}

/// Adds `offset` to `coords` elementwise.
pub fn apply_offset(offset: &[isize], coords: &[isize]) -> LatticeResult<Vec<isize>> {
    if offset.len() != coords.len() {
        return Err(LatticeError::OffsetLength {
            offset: offset.len(),
            coords: coords.len(),
        });
    }
    Ok(offset.iter().zip(coords).map(|(&o, &c)| o + c).collect())
}

/// Folds already-recentered (non-negative) digits into a base-3 positional
/// index: `sum(coords[i] * 3^i)`.
#[inline]
pub fn mixed_radix_index(coords: &[isize]) -> usize {
    coords
        .iter()
        .enumerate()
        .map(|(i, &c)| c as usize * 3_usize.pow(i as u32))
        .sum()
}

/// Checks that `coords` is a valid relative neighbor coordinate for a
/// `ndim`-dimensional cell: correct arity, every component in `{-1, 0, 1}`,
/// and not the all-zero coordinate (which addresses the cell itself).
pub fn check_neighbor_coords(ndim: usize, coords: &[isize]) -> LatticeResult<()> {
    if coords.len() != ndim {
        return Err(LatticeError::CoordinateCount {
            expected: ndim,
            actual: coords.len(),
        });
    }
    for &c in coords {
        if c.abs() > 1 {
            return Err(LatticeError::ComponentOutOfRange(c));
        }
    }
    if coords.iter().all(|&c| c == 0) {
        return Err(LatticeError::SelfReference);
    }
    Ok(())
}

/// Compacts an including-self mixed-radix index into the self-excluding
/// neighbor-table index space by removing the slot at `self_index` and
/// shifting everything after it down by one.
#[inline]
pub fn exclude_self_index(self_index: usize, raw: usize) -> usize {
    if raw < self_index {
        raw
    } else {
        raw - 1
    }
}

/// Computes the neighbor-table slot for the relative coordinate `coords`.
///
/// `self_index` is the mixed-radix index the cell itself would occupy in the
/// including-self scheme (the index of the recentered origin) and `offset` is
/// the cell's recentering offset. This validates the coordinate, recenters
/// it, folds it, and removes the self slot; it is the only path by which the
/// crate turns a coordinate into a table index.
pub fn neighbor_index(
    ndim: usize,
    self_index: usize,
    offset: &[isize],
    coords: &[isize],
) -> LatticeResult<usize> {
    check_neighbor_coords(ndim, coords)?;
    let raw = mixed_radix_index(&apply_offset(offset, coords)?);
    Ok(exclude_self_index(self_index, raw))
}

/// Returns every valid relative neighbor coordinate in `{-1, 0, 1}^ndim`,
/// excluding the all-zero self coordinate, in mixed-radix slot order.
pub fn relative_offsets(ndim: usize) -> impl Iterator<Item = Vec<isize>> {
    // multi_cartesian_product varies the last factor fastest, but slot order
    // weights the first component lowest, so build back-to-front and flip.
    (0..ndim)
        .map(|_| -1_isize..=1)
        .multi_cartesian_product()
        .map(|mut coords: Vec<isize>| {
            coords.reverse();
            coords
        })
        .filter(|coords| coords.iter().any(|&c| c != 0))
}
