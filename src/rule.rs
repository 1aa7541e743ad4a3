//! Collaborator contracts at the boundary of the topology core.
//!
//! The core never decides what a state value means; it only threads values
//! produced by an [`InitialState`] supplier and an ordered list of [`Rule`]
//! evaluators through the lattice.

use std::fmt;
use std::sync::Arc;

use crate::cell::CellRef;

/// Bounds required of a cell state value.
///
/// Only equality is ever consulted (to detect a dissenting rule); states are
/// cloned into the next generation and shared across the parallel next-state
/// phase.
pub trait State: Clone + PartialEq + Send + Sync {}
impl<T: Clone + PartialEq + Send + Sync> State for T {}

/// A single rule of the game, applied to a cell to produce a candidate next
/// state.
///
/// Rules run in list order and the first rule whose output differs from the
/// cell's current state wins; later rules never observe earlier outputs. A
/// rule may read the cell's current state and its neighbors' current states
/// but must not mutate anything and must not read any cell's *next* state,
/// since it runs while the whole generation is still being evaluated.
pub trait Rule<S: State>: fmt::Debug + Send + Sync {
    /// Produces this rule's candidate next state for `cell`.
    fn apply(&self, cell: CellRef<'_, S>) -> S;

    /// Returns the rule as an `Arc<dyn Rule<S>>`.
    fn into_arc(self) -> Arc<dyn Rule<S>>
    where
        Self: 'static + Sized,
    {
        Arc::new(self)
    }
}

/// Supplies the state for each newly created cell.
///
/// The lattice builder does not deduplicate calls: every cell it creates gets
/// its own invocation, so the supplier must be pure from the core's
/// perspective.
pub trait InitialState<S: State>: fmt::Debug + Send + Sync {
    /// Returns an initial state for one cell.
    fn state(&self) -> S;
}

/// An initial-state supplier that gives every cell the same value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Uniform<S>(pub S);

impl<S: State + fmt::Debug> InitialState<S> for Uniform<S> {
    fn state(&self) -> S {
        self.0.clone()
    }
}
