//! Arena-owned cell lattice and its recursive builder.
//!
//! The neighbor graph is cyclic, so the lattice owns every cell in a single
//! arena and cells name each other by [`CellId`]. Construction is recursive:
//! from each cell, one new cell is grown per axis that still has distance
//! left to the board edge, its neighbor table pre-seeded from the viewpoint
//! shift of the cell it grew from and completed from the builder's map of
//! already-resolved positions, so shared corner and edge cells are created
//! exactly once and every adjacent pair ends up linked both ways.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use rayon::prelude::*;

use crate::cell::{Cell, CellId, CellRef};
use crate::error::LatticeResult;
use crate::index;
use crate::rule::{InitialState, Rule, State};

/// The full graph of cells spanning the Cartesian product of a board's axis
/// extents.
pub struct Lattice<S: State> {
    ndim: usize,
    /// All-ones recentering offset, cached once for the whole lattice.
    offset: Vec<isize>,
    /// Mixed-radix index of the recentered origin, used for self-exclusion.
    self_index: usize,
    rules: Arc<[Arc<dyn Rule<S>>]>,
    cells: Vec<Cell<S>>,
    root: CellId,
}

impl<S: State> Lattice<S> {
    /// Builds the lattice covering `[0, extent_a)` along every axis, rooted
    /// at the all-zero position. The supplier is invoked once per cell.
    pub(crate) fn build(
        rules: Arc<[Arc<dyn Rule<S>>]>,
        initial_state: &dyn InitialState<S>,
        extents: &[usize],
    ) -> Self {
        let ndim = extents.len();
        let offset = index::recentering_offset(ndim);
        let self_index = index::mixed_radix_index(&offset);
        let mut lattice = Self {
            ndim,
            offset,
            self_index,
            rules,
            cells: Vec::new(),
            root: CellId(0),
        };
        let root = lattice.push(Cell::new(
            initial_state.state(),
            index::neighbor_count(ndim),
        ));
        lattice.root = root;

        let origin = vec![0; ndim];
        // The remaining distance to the board edge along each axis; an axis
        // with extent zero never grows.
        let distances: Vec<usize> = extents.iter().map(|&e| e.saturating_sub(1)).collect();
        let mut builder = Builder {
            lattice: &mut lattice,
            positions: HashMap::new(),
            initial_state,
        };
        builder.positions.insert(origin.clone(), root);
        // A zero extent anywhere makes the board empty; only the root exists.
        if extents.iter().all(|&e| e > 0) {
            builder.grow(root, &origin, &distances);
        }

        debug!(
            "built {}-dimensional lattice of {} cells (extents {:?})",
            ndim,
            lattice.cells.len(),
            extents
        );
        lattice
    }

    /// Returns the number of dimensions the lattice supports.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Returns the number of cells in the lattice.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the lattice has no cells. A built lattice always
    /// contains at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at the lattice origin.
    #[inline]
    pub fn root(&self) -> CellRef<'_, S> {
        CellRef::new(self, self.root)
    }

    /// Returns every cell in the lattice, in creation order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef<'_, S>> {
        (0..self.cells.len()).map(move |i| CellRef::new(self, CellId(i)))
    }

    pub(crate) fn rules(&self) -> &[Arc<dyn Rule<S>>] {
        &self.rules
    }

    pub(crate) fn cell_data(&self, id: CellId) -> &Cell<S> {
        &self.cells[id.0]
    }

    /// Validated coordinate-to-slot conversion; the only path by which caller
    /// coordinates reach a neighbor table.
    pub(crate) fn slot(&self, coords: &[isize]) -> LatticeResult<usize> {
        index::neighbor_index(self.ndim, self.self_index, &self.offset, coords)
    }

    /// Slot conversion for coordinates produced by [`index::relative_offsets`],
    /// which are valid by construction.
    fn slot_trusted(&self, coords: &[isize]) -> usize {
        debug_assert!(index::check_neighbor_coords(self.ndim, coords).is_ok());
        let raw = coords
            .iter()
            .enumerate()
            .map(|(i, &c)| (c + 1) as usize * 3_usize.pow(i as u32))
            .sum();
        index::exclude_self_index(self.self_index, raw)
    }

    fn push(&mut self, cell: Cell<S>) -> CellId {
        let id = CellId(self.cells.len());
        self.cells.push(cell);
        id
    }

    /// Computes what `cell`'s neighbor table looks like from the viewpoint of
    /// its would-be neighbor at `offset`: the slot for `offset`'s inverse
    /// holds `cell` itself, every target still within one step of `cell`
    /// resolves through `cell`'s own table, and anything out of reach stays
    /// empty.
    pub(crate) fn neighbors_shifted_by(
        &self,
        cell: CellId,
        offset: &[isize],
    ) -> Vec<Option<CellId>> {
        let mut table = vec![None; index::neighbor_count(self.ndim)];
        let inverse: Vec<isize> = offset.iter().map(|&c| -c).collect();
        for coords in index::relative_offsets(self.ndim) {
            let slot = self.slot_trusted(&coords);
            if coords == inverse {
                table[slot] = Some(cell);
                continue;
            }
            // The viewpoint cell's neighbor at `coords` sits at
            // `offset + coords` relative to `cell`.
            let through: Vec<isize> = offset.iter().zip(&coords).map(|(&o, &c)| o + c).collect();
            if index::check_neighbor_coords(self.ndim, &through).is_ok() {
                table[slot] = self.cell_data(cell).neighbors[self.slot_trusted(&through)];
            }
        }
        table
    }

    /// Produces the next-generation lattice: identical topology, every cell's
    /// state advanced to its memoized next state.
    ///
    /// The evaluation phase only ever reads current-generation states, so it
    /// fans out across the rayon pool.
    pub(crate) fn advance(&self) -> Self {
        (0..self.cells.len()).into_par_iter().for_each(|i| {
            CellRef::new(self, CellId(i)).next_state();
        });
        trace!("advanced {} cells one generation", self.cells.len());

        let cells = (0..self.cells.len())
            .map(|i| {
                let next = CellRef::new(self, CellId(i)).next_state().clone();
                Cell::with_table(
                    next,
                    self.cells[i].neighbors.clone(),
                    index::neighbor_count(self.ndim),
                )
            })
            .collect();
        Self {
            ndim: self.ndim,
            offset: self.offset.clone(),
            self_index: self.self_index,
            rules: Arc::clone(&self.rules),
            cells,
            root: self.root,
        }
    }
}

impl<S: State> fmt::Debug for Lattice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lattice")
            .field("ndim", &self.ndim)
            .field("cells", &self.cells.len())
            .finish()
    }
}

/// Recursive lattice construction state.
struct Builder<'a, S: State> {
    lattice: &'a mut Lattice<S>,
    /// Already-resolved cells by absolute position, consulted before any
    /// creation so shared boundaries are reused instead of rebuilt.
    positions: HashMap<Vec<usize>, CellId>,
    initial_state: &'a dyn InitialState<S>,
}

impl<'a, S: State> Builder<'a, S> {
    /// Grows the lattice outward from `cell` at absolute position `pos`,
    /// with `distances` steps left to the board edge along each axis.
    fn grow(&mut self, cell: CellId, pos: &[usize], distances: &[usize]) {
        let ndim = self.lattice.ndim;
        for axis in 0..ndim {
            if distances[axis] == 0 {
                continue;
            }
            let forward = unit_step(ndim, axis);
            let slot = self.lattice.slot_trusted(&forward);
            if self.lattice.cell_data(cell).neighbors[slot].is_some() {
                // A sibling branch already built this cell and linked back.
                continue;
            }

            let mut new_pos = pos.to_vec();
            new_pos[axis] += 1;

            // Seed the new cell's table from this cell's viewpoint, then
            // complete it from positions resolved by other branches that this
            // cell cannot see through its own table.
            let mut table = self.lattice.neighbors_shifted_by(cell, &forward);
            for coords in index::relative_offsets(ndim) {
                let s = self.lattice.slot_trusted(&coords);
                if table[s].is_none() {
                    if let Some(target) = offset_position(&new_pos, &coords) {
                        table[s] = self.positions.get(&target).copied();
                    }
                }
            }

            let new_cell = self.lattice.push(Cell::with_table(
                self.initial_state.state(),
                table,
                index::neighbor_count(ndim),
            ));
            self.positions.insert(new_pos.clone(), new_cell);
            trace!("created cell {:?} at {:?}", new_cell, new_pos);

            // Reciprocal links, including the back-link to this cell at the
            // reverse coordinate.
            for coords in index::relative_offsets(ndim) {
                let s = self.lattice.slot_trusted(&coords);
                if let Some(neighbor) = self.lattice.cell_data(new_cell).neighbors[s] {
                    let inverse: Vec<isize> = coords.iter().map(|&c| -c).collect();
                    let back = self.lattice.slot_trusted(&inverse);
                    self.lattice.cells[neighbor.0].neighbors[back] = Some(new_cell);
                }
            }

            let mut remaining = distances.to_vec();
            remaining[axis] -= 1;
            self.grow(new_cell, &new_pos, &remaining);
        }
    }
}

/// Unit relative coordinate: `+1` along `axis`, zero elsewhere.
pub(crate) fn unit_step(ndim: usize, axis: usize) -> Vec<isize> {
    let mut step = vec![0; ndim];
    step[axis] = 1;
    step
}

/// Absolute position of `pos + coords`, or `None` if it would leave the
/// non-negative quadrant.
fn offset_position(pos: &[usize], coords: &[isize]) -> Option<Vec<usize>> {
    pos.iter()
        .zip(coords)
        .map(|(&p, &c)| {
            let q = p as isize + c;
            if q < 0 {
                None
            } else {
                Some(q as usize)
            }
        })
        .collect()
}
