//! N-dimensional generalization of Conway's Game of Life.
//!
//! Every cell in a board is linked to every cell within one step along each
//! axis, so a `d`-dimensional cell has up to `3^d - 1` neighbors. The crate
//! provides the topology core only: the mixed-radix neighbor indexing scheme,
//! the arena-backed cell lattice with shared-boundary construction, and the
//! synchronous generation advance ([`Board::tick`]). Rule semantics and
//! initial states are supplied by the caller through the [`Rule`] and
//! [`InitialState`] traits.
//!
//! ```
//! use ndlife::{Board, CellRef, Rule, Uniform};
//!
//! #[derive(Debug)]
//! struct Die;
//! impl Rule<bool> for Die {
//!     fn apply(&self, _cell: CellRef<'_, bool>) -> bool {
//!         false
//!     }
//! }
//!
//! let board = Board::new(vec![Die.into_arc()], Uniform(true), &[3, 3]);
//! let next = board.tick();
//! assert_eq!(*next.cell(&[1, 1]).unwrap().state(), false);
//! ```

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

mod board;
mod cell;
mod error;
pub mod index;
mod lattice;
mod rule;

pub use board::Board;
pub use cell::{CellId, CellRef};
pub use error::{LatticeError, LatticeResult};
pub use lattice::Lattice;
pub use rule::{InitialState, Rule, State, Uniform};

/// Re-exports of the most commonly used types and traits.
pub mod prelude {
    pub use crate::board::Board;
    pub use crate::cell::{CellId, CellRef};
    pub use crate::error::{LatticeError, LatticeResult};
    pub use crate::rule::{InitialState, Rule, State, Uniform};
}

#[cfg(test)]
mod tests;
