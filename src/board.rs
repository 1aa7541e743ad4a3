//! The board facade: extents, rules, initial state, and the lattice.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::cell::CellRef;
use crate::error::{LatticeError, LatticeResult};
use crate::lattice::{unit_step, Lattice};
use crate::rule::{InitialState, Rule, State};

/// A finite N-dimensional Game of Life board.
///
/// A board is built once and never mutated; [`Board::tick`] returns a fresh
/// board holding the next generation. The number of extents supplied at
/// construction *is* the board's dimension count, and each extent is the
/// exclusive upper bound of its axis.
pub struct Board<S: State> {
    extents: Vec<usize>,
    initial_state: Arc<dyn InitialState<S>>,
    lattice: Lattice<S>,
}

impl<S: State> Board<S> {
    /// Builds a board spanning `[0, extent)` along each axis, with every cell
    /// initialized from `initial_state` and sharing the ordered rule list.
    pub fn new(
        rules: Vec<Arc<dyn Rule<S>>>,
        initial_state: impl InitialState<S> + 'static,
        extents: &[usize],
    ) -> Self {
        let rules: Arc<[Arc<dyn Rule<S>>]> = rules.into();
        let initial_state: Arc<dyn InitialState<S>> = Arc::new(initial_state);
        let lattice = Lattice::build(rules, initial_state.as_ref(), extents);
        debug!(
            "new board: extents {:?}, {} cells, {} rules",
            extents,
            lattice.len(),
            lattice.rules().len()
        );
        Self {
            extents: extents.to_vec(),
            initial_state,
            lattice,
        }
    }

    /// Returns the number of dimensions the board supports.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.extents.len()
    }

    /// Returns the extent of every axis.
    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Returns the board's lattice.
    #[inline]
    pub fn lattice(&self) -> &Lattice<S> {
        &self.lattice
    }

    /// Returns the ordered rule list shared by every cell.
    #[inline]
    pub fn rules(&self) -> &[Arc<dyn Rule<S>>] {
        self.lattice.rules()
    }

    /// Returns the extent of `axis`.
    pub fn dimension_size(&self, axis: usize) -> LatticeResult<usize> {
        self.extents
            .get(axis)
            .copied()
            .ok_or(LatticeError::AxisOutOfRange {
                axis,
                ndim: self.ndim(),
            })
    }

    /// Returns the cell at the absolute position `coords`.
    ///
    /// The coordinate count must equal the dimension count exactly; a
    /// mismatch is an API-misuse error, reported with the expected count and
    /// not meant to be caught. Positions at or beyond an extent are range
    /// errors.
    pub fn cell(&self, coords: &[usize]) -> LatticeResult<CellRef<'_, S>> {
        if coords.len() != self.ndim() {
            return Err(LatticeError::CoordinateCount {
                expected: self.ndim(),
                actual: coords.len(),
            });
        }
        for (axis, (&position, &extent)) in coords.iter().zip(&self.extents).enumerate() {
            if position >= extent {
                return Err(LatticeError::PositionOutOfBounds {
                    axis,
                    position,
                    extent,
                });
            }
        }

        // Walk the neighbor graph from the root, one axis at a time.
        let mut cell = self.lattice.root();
        for (axis, &position) in coords.iter().enumerate() {
            let step = unit_step(self.ndim(), axis);
            for _ in 0..position {
                cell = cell.neighbor(&step)?.ok_or(LatticeError::MissingLink)?;
            }
        }
        Ok(cell)
    }

    /// Returns every cell on the board.
    pub fn cells(&self) -> impl Iterator<Item = CellRef<'_, S>> {
        self.lattice.cells()
    }

    /// Advances the board one generation.
    ///
    /// Every cell of the returned board holds the state this board's
    /// corresponding cell reports from
    /// [`next_state`](crate::CellRef::next_state); the receiver is left
    /// untouched. Next states are evaluated against the current generation
    /// only, so the evaluation fans out across the rayon pool.
    pub fn tick(&self) -> Self {
        Self {
            extents: self.extents.clone(),
            initial_state: Arc::clone(&self.initial_state),
            lattice: self.lattice.advance(),
        }
    }
}

impl<S: State> fmt::Debug for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("extents", &self.extents)
            .field("cells", &self.lattice.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::rule::Uniform;

    use super::*;

    const WIDTH: usize = 10;
    const HEIGHT: usize = 5;
    const DEPTH: usize = 3;

    fn board(extents: &[usize]) -> Board<bool> {
        Board::new(Vec::new(), Uniform(true), extents)
    }

    #[test]
    fn dimension_sizes() {
        let two_d = board(&[WIDTH, HEIGHT]);
        assert_eq!(Ok(WIDTH), two_d.dimension_size(0));
        assert_eq!(Ok(HEIGHT), two_d.dimension_size(1));

        let three_d = board(&[WIDTH, HEIGHT, DEPTH]);
        assert_eq!(Ok(DEPTH), three_d.dimension_size(2));

        assert_eq!(
            Err(LatticeError::AxisOutOfRange { axis: 2, ndim: 2 }),
            two_d.dimension_size(2),
        );
        assert_eq!(
            Err(LatticeError::AxisOutOfRange { axis: 0, ndim: 0 }),
            board(&[]).dimension_size(0),
        );
    }

    #[test]
    fn cell_lookup_returns_initial_state() {
        let one_d = board(&[WIDTH]);
        assert_eq!(&true, one_d.cell(&[0]).unwrap().state());
        assert_eq!(&true, one_d.cell(&[WIDTH - 1]).unwrap().state());

        let two_d = board(&[WIDTH, HEIGHT]);
        assert_eq!(&true, two_d.cell(&[3, 4]).unwrap().state());

        let zero_d = board(&[]);
        assert_eq!(&true, zero_d.cell(&[]).unwrap().state());
    }

    #[test]
    fn cell_lookup_agrees_with_the_neighbor_graph() {
        let two_d = board(&[3, 3]);
        let center = two_d.cell(&[1, 1]).unwrap();
        let corner = two_d.cell(&[0, 0]).unwrap();
        assert_eq!(Some(center), corner.neighbor(&[1, 1]).unwrap());
        assert_eq!(Some(corner), center.neighbor(&[-1, -1]).unwrap());
    }

    #[test]
    fn cell_rejects_wrong_coordinate_counts() {
        // A zero-dimension board accepts exactly zero coordinates.
        assert_eq!(
            Err(LatticeError::CoordinateCount {
                expected: 0,
                actual: 1
            }),
            board(&[]).cell(&[0]).map(|_| ()),
        );
        assert_eq!(
            Err(LatticeError::CoordinateCount {
                expected: 1,
                actual: 2
            }),
            board(&[WIDTH]).cell(&[0, 0]).map(|_| ()),
        );
        assert_eq!(
            Err(LatticeError::CoordinateCount {
                expected: 2,
                actual: 3
            }),
            board(&[WIDTH, HEIGHT]).cell(&[0, 0, 0]).map(|_| ()),
        );
    }

    #[test]
    fn cell_rejects_out_of_bounds_positions() {
        // Extents are exclusive upper bounds, so the at-edge index is out.
        assert_eq!(
            Err(LatticeError::PositionOutOfBounds {
                axis: 0,
                position: WIDTH,
                extent: WIDTH
            }),
            board(&[WIDTH]).cell(&[WIDTH]).map(|_| ()),
        );
        assert_eq!(
            Err(LatticeError::PositionOutOfBounds {
                axis: 1,
                position: HEIGHT,
                extent: HEIGHT
            }),
            board(&[WIDTH, HEIGHT]).cell(&[0, HEIGHT]).map(|_| ()),
        );
    }

    #[test]
    fn construction_is_idempotent() {
        let a = board(&[3, 3]);
        let b = board(&[3, 3]);
        for x in 0..3 {
            for y in 0..3 {
                assert_eq!(
                    a.cell(&[x, y]).unwrap().state(),
                    b.cell(&[x, y]).unwrap().state(),
                );
            }
        }
    }

    mod tick {
        use crate::cell::CellRef;
        use crate::rule::Rule;

        use super::*;

        /// Rule that always reports a dead cell.
        #[derive(Debug)]
        struct AlwaysDead;
        impl Rule<bool> for AlwaysDead {
            fn apply(&self, _cell: CellRef<'_, bool>) -> bool {
                false
            }
        }

        fn false_rule_board(extents: &[usize]) -> Board<bool> {
            Board::new(vec![AlwaysDead.into_arc()], Uniform(true), extents)
        }

        #[test]
        fn advances_every_cell() {
            let board = false_rule_board(&[3, 3]);
            let next = board.tick();
            for x in 0..3 {
                for y in 0..3 {
                    assert_eq!(&false, next.cell(&[x, y]).unwrap().state());
                }
            }
        }

        #[test]
        fn does_not_mutate_the_receiver() {
            let board = false_rule_board(&[3, 3]);
            let _ = board.tick();
            for x in 0..3 {
                for y in 0..3 {
                    assert_eq!(&true, board.cell(&[x, y]).unwrap().state());
                }
            }
        }

        #[test]
        fn preserves_the_topology() {
            let board = false_rule_board(&[3, 3]);
            let next = board.tick();
            assert_eq!(board.lattice().len(), next.lattice().len());
            let center = next.cell(&[1, 1]).unwrap();
            assert_eq!(8, center.neighbors().flatten().count());
        }

        #[test]
        fn zero_dimension_board_ticks() {
            let board = false_rule_board(&[]);
            let next = board.tick();
            assert_eq!(&false, next.cell(&[]).unwrap().state());
        }
    }
}
