//! Crate-level integration tests.

use crate::prelude::*;


#[test]
fn prelude_smoke_test() {
    let board: Board<bool> = Board::new(Vec::new(), Uniform(false), &[2, 2]);
    assert_eq!(2, board.ndim());
    assert_eq!(4, board.cells().count());
    assert!(board.cells().all(|cell| !*cell.state()));
}
