//! Property tests for the Go capture/suicide invariant.

use goban_engine::{Cell, GameConfig, GameState, Move, Point, Variant};
use proptest::prelude::*;

const SIZE: usize = 7;

/// Every stone on the board must belong to a chain with at least one
/// liberty after any accepted move: captures remove dead opponent chains
/// and suicide is rejected outright.
fn assert_no_dead_chains(state: &GameState) {
    for y in 0..SIZE {
        for x in 0..SIZE {
            let point = Point::new(x, y);
            if matches!(state.board().get(point), Ok(Cell::Stone(_))) {
                let group = state.board().group_of(point);
                assert!(
                    state.board().liberties_of(&group) > 0,
                    "chain at {point} has no liberties:\n{}",
                    state.board().display()
                );
            }
        }
    }
}

proptest! {
    #[test]
    fn go_positions_never_hold_zero_liberty_chains(
        points in prop::collection::vec((0..SIZE, 0..SIZE), 1..80)
    ) {
        let mut state = GameState::new(GameConfig::new(SIZE, Variant::Go));
        for (x, y) in points {
            let mv = Move::new(state.current_turn(), Point::new(x, y));
            if state.play(mv).is_ok() {
                assert_no_dead_chains(&state);
            }
        }
    }

    #[test]
    fn rejected_moves_leave_the_state_identical(
        points in prop::collection::vec((0..SIZE, 0..SIZE), 1..80)
    ) {
        let mut state = GameState::new(GameConfig::new(SIZE, Variant::Go));
        for (x, y) in points {
            let mv = Move::new(state.current_turn(), Point::new(x, y));
            let before = state.clone();
            if state.play(mv).is_err() {
                prop_assert_eq!(&state, &before);
            }
        }
    }
}
