//! Cells and borrowed cell views.
//!
//! The neighbor graph is cyclic, so cells never own each other: every cell
//! lives in the arena of its [`Lattice`](crate::Lattice) and refers to its
//! neighbors by [`CellId`]. The public surface hands out [`CellRef`] views
//! that pair a lattice borrow with a handle.

use std::fmt;
use std::sync::OnceLock;

use crate::error::LatticeResult;
use crate::index;
use crate::lattice::Lattice;
use crate::rule::State;

/// Stable handle to a cell within its lattice's arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) usize);

/// One lattice point: an immutable current state, a write-once next-state
/// slot, and a fixed table of `3^d - 1` optional neighbor handles.
#[derive(Debug)]
pub(crate) struct Cell<S> {
    pub(crate) state: S,
    /// Memoized next state. Written at most once per generation; absent means
    /// "not yet computed", never "unchanged".
    pub(crate) next: OnceLock<S>,
    pub(crate) neighbors: Vec<Option<CellId>>,
}

impl<S: State> Cell<S> {
    /// Creates a cell with an empty neighbor table of `slots` entries.
    pub(crate) fn new(state: S, slots: usize) -> Self {
        Self {
            state,
            next: OnceLock::new(),
            neighbors: vec![None; slots],
        }
    }

    /// Creates a cell from a pre-seeded neighbor table.
    ///
    /// Panics if the table does not have exactly `3^d - 1` slots; a wrongly
    /// sized table means the lattice construction itself is broken.
    pub(crate) fn with_table(
        state: S,
        neighbors: Vec<Option<CellId>>,
        expected_slots: usize,
    ) -> Self {
        assert_eq!(
            expected_slots,
            neighbors.len(),
            "neighbor table has the wrong number of slots for this dimension count",
        );
        Self {
            state,
            next: OnceLock::new(),
            neighbors,
        }
    }
}

/// Borrowed view of one cell.
///
/// Cheap to copy; all cell queries go through a view so that neighbor lookups
/// can resolve handles against the owning lattice.
pub struct CellRef<'a, S: State> {
    lattice: &'a Lattice<S>,
    id: CellId,
}

impl<'a, S: State> CellRef<'a, S> {
    pub(crate) fn new(lattice: &'a Lattice<S>, id: CellId) -> Self {
        Self { lattice, id }
    }

    fn cell(&self) -> &'a Cell<S> {
        self.lattice.cell_data(self.id)
    }

    /// Returns this cell's handle.
    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Returns the number of dimensions this cell's lattice supports.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.lattice.ndim()
    }

    /// Returns the number of neighbor slots this cell has.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        index::neighbor_count(self.ndim())
    }

    /// Returns the cell's current-generation state.
    #[inline]
    pub fn state(&self) -> &'a S {
        &self.cell().state
    }

    /// Returns the cell's next-generation state, computing and memoizing it
    /// on first call.
    ///
    /// The candidate starts as the current state; rules run in list order and
    /// the first rule whose output differs from the current state supplies
    /// the result. If no rule dissents (or there are no rules), the next
    /// state equals the current state.
    pub fn next_state(&self) -> &'a S {
        let cell = self.cell();
        cell.next.get_or_init(|| {
            for rule in self.lattice.rules() {
                let candidate = rule.apply(Self::new(self.lattice, self.id));
                if candidate != cell.state {
                    return candidate;
                }
            }
            cell.state.clone()
        })
    }

    /// Returns the neighbor at the relative coordinate `coords`, where this
    /// cell is the origin. `Ok(None)` means the slot is valid but empty (the
    /// lattice ends there).
    pub fn neighbor(&self, coords: &[isize]) -> LatticeResult<Option<CellRef<'a, S>>> {
        let slot = self.lattice.slot(coords)?;
        Ok(self.cell().neighbors[slot].map(|id| Self::new(self.lattice, id)))
    }

    /// Returns all neighbor slots in slot order.
    pub fn neighbors(&self) -> impl Iterator<Item = Option<CellRef<'a, S>>> + 'a {
        let lattice = self.lattice;
        self.cell()
            .neighbors
            .iter()
            .map(move |slot| slot.map(|id| Self::new(lattice, id)))
    }
}

impl<'a, S: State> Copy for CellRef<'a, S> {}
impl<'a, S: State> Clone for CellRef<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

/// Identity comparison: same cell of the same lattice.
impl<'a, S: State> PartialEq for CellRef<'a, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.lattice, other.lattice) && self.id == other.id
    }
}
impl<'a, S: State> Eq for CellRef<'a, S> {}

impl<'a, S: State> fmt::Debug for CellRef<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRef")
            .field("id", &self.id)
            .field("ndim", &self.ndim())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::board::Board;
    use crate::error::LatticeError;
    use crate::rule::{Rule, Uniform};

    use super::*;

    /// Rule that counts its invocations and returns a fixed value.
    #[derive(Debug)]
    struct Counting {
        output: u8,
        calls: Arc<AtomicUsize>,
    }
    impl Rule<u8> for Counting {
        fn apply(&self, _cell: CellRef<'_, u8>) -> u8 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.output
        }
    }

    fn counting(output: u8) -> (Arc<dyn Rule<u8>>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let rule = Counting {
            output,
            calls: Arc::clone(&calls),
        };
        (rule.into_arc(), calls)
    }

    #[test]
    fn next_state_without_rules_is_the_current_state() {
        let board = Board::new(Vec::new(), Uniform(7_u8), &[1]);
        let cell = board.cell(&[0]).unwrap();
        assert_eq!(&7, cell.next_state());
    }

    #[test]
    fn first_dissenting_rule_wins() {
        let (agree, agree_calls) = counting(7);
        let (dissent, dissent_calls) = counting(9);
        let (unreached, unreached_calls) = counting(3);
        let board = Board::new(vec![agree, dissent, unreached], Uniform(7_u8), &[1]);

        let cell = board.cell(&[0]).unwrap();
        assert_eq!(&9, cell.next_state());
        assert_eq!(1, agree_calls.load(Ordering::SeqCst));
        assert_eq!(1, dissent_calls.load(Ordering::SeqCst));
        assert_eq!(0, unreached_calls.load(Ordering::SeqCst));
    }

    #[test]
    fn next_state_is_computed_once() {
        let (dissent, calls) = counting(1);
        let board = Board::new(vec![dissent], Uniform(0_u8), &[1]);

        let cell = board.cell(&[0]).unwrap();
        assert_eq!(&1, cell.next_state());
        assert_eq!(&1, cell.next_state());
        assert_eq!(1, calls.load(Ordering::SeqCst));
    }

    #[test]
    #[should_panic(expected = "wrong number of slots")]
    fn table_length_invariant_is_enforced() {
        Cell::with_table(0_u8, vec![None; 3], 8);
    }

    #[test]
    fn neighbor_rejects_invalid_coordinates() {
        let board = Board::new(Vec::new(), Uniform(0_u8), &[2, 2]);
        let cell = board.cell(&[0, 0]).unwrap();
        assert_eq!(Err(LatticeError::SelfReference), cell.neighbor(&[0, 0]).map(|_| ()));
        assert_eq!(
            Err(LatticeError::ComponentOutOfRange(2)),
            cell.neighbor(&[2, 0]).map(|_| ()),
        );
        assert_eq!(
            Err(LatticeError::CoordinateCount {
                expected: 2,
                actual: 3
            }),
            cell.neighbor(&[0, 1, 0]).map(|_| ()),
        );
    }
}
