//! Errors reported by the topology core.
//!
//! Every variant signals a malformed call or a violated internal invariant,
//! not an environmental failure; none of them are retried or recovered from.

use thiserror::Error;

/// Result type returned by fallible lattice routines.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Error encountered while indexing, building, or querying a lattice.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum LatticeError {
    /// The wrong number of coordinates was supplied for a cell or neighbor
    /// lookup. This signals API misuse and is not meant to be caught; the
    /// expected count is carried for the diagnostic.
    #[error("expected {expected} coordinates but got {actual}")]
    CoordinateCount {
        /// The number of coordinates the lattice requires.
        expected: usize,
        /// The number of coordinates actually supplied.
        actual: usize,
    },

    /// A recentering offset and a coordinate vector had different lengths.
    #[error("offset length {offset} does not match coordinate count {coords}")]
    OffsetLength {
        /// Length of the offset vector.
        offset: usize,
        /// Length of the coordinate vector.
        coords: usize,
    },

    /// A relative coordinate component was outside `{-1, 0, 1}`.
    #[error("relative coordinate component {0} is outside the neighborhood")]
    ComponentOutOfRange(isize),

    /// The all-zero relative coordinate addresses the cell itself, which is
    /// never a neighbor.
    #[error("the all-zero coordinate addresses the cell itself, not a neighbor")]
    SelfReference,

    /// An axis index was outside `[0, ndim)`.
    #[error("axis {axis} is out of range for a {ndim}-dimensional board")]
    AxisOutOfRange {
        /// The requested axis.
        axis: usize,
        /// The board's dimension count.
        ndim: usize,
    },

    /// An absolute board position was outside its axis extent.
    #[error("position {position} on axis {axis} is outside the extent {extent}")]
    PositionOutOfBounds {
        /// The axis on which the position was out of range.
        axis: usize,
        /// The offending position.
        position: usize,
        /// The exclusive upper bound for that axis.
        extent: usize,
    },

    /// An in-bounds traversal hit an unlinked neighbor slot. A completed
    /// lattice links every adjacent pair, so this indicates a construction
    /// invariant violation.
    #[error("missing neighbor link on an in-bounds traversal")]
    MissingLink,
}
