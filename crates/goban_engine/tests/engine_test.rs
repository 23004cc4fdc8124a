//! Rule-engine scenarios: captures, suicide rollback, ko, Gomoku outcomes.

use goban_engine::{Cell, Color, GameConfig, GameState, Move, MoveError, Point, Variant};

fn play_all(state: &mut GameState, moves: &[(Color, usize, usize)]) {
    for &(color, x, y) in moves {
        state
            .play(Move::new(color, Point::new(x, y)))
            .unwrap_or_else(|e| panic!("move {:?} at ({}, {}) rejected: {}", color, x, y, e));
    }
}

#[test]
fn surrounding_a_stone_captures_it() {
    // White surrounds the black stone at (5,5); the final white move
    // removes it from the board.
    let mut state = GameState::new(GameConfig::new(19, Variant::Go));
    play_all(
        &mut state,
        &[
            (Color::Black, 5, 5),
            (Color::White, 4, 5),
            (Color::Black, 10, 10),
            (Color::White, 6, 5),
            (Color::Black, 10, 11),
            (Color::White, 5, 4),
            (Color::Black, 10, 12),
        ],
    );

    let outcome = state
        .play(Move::new(Color::White, Point::new(5, 6)))
        .unwrap();
    assert_eq!(outcome.captured, 1);
    assert_eq!(state.board().get(Point::new(5, 5)).unwrap(), Cell::Empty);
    // The surrounding white stones are all still there.
    for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
        assert_eq!(
            state.board().get(Point::new(x, y)).unwrap(),
            Cell::Stone(Color::White)
        );
    }
}

#[test]
fn suicide_is_rejected_and_state_untouched() {
    let mut state = GameState::new(GameConfig::new(5, Variant::Go));
    play_all(
        &mut state,
        &[
            (Color::Black, 4, 4),
            (Color::White, 1, 0),
            (Color::Black, 3, 3),
            (Color::White, 0, 1),
        ],
    );

    let before = state.clone();
    let result = state.play(Move::new(Color::Black, Point::new(0, 0)));
    assert_eq!(result, Err(MoveError::SuicideMove));
    assert_eq!(state, before);
}

#[test]
fn capturing_into_a_surrounded_point_is_not_suicide() {
    // Black fills White's last liberty at (2,1) by playing into a point
    // with no liberties of its own; the capture resolves first.
    let mut state = GameState::new(GameConfig::new(7, Variant::Go));
    play_all(
        &mut state,
        &[
            (Color::Black, 1, 0),
            (Color::White, 2, 0),
            (Color::Black, 0, 1),
            (Color::White, 3, 1),
            (Color::Black, 1, 2),
            (Color::White, 2, 2),
            (Color::Black, 5, 5),
            (Color::White, 1, 1),
        ],
    );

    let outcome = state
        .play(Move::new(Color::Black, Point::new(2, 1)))
        .unwrap();
    assert_eq!(outcome.captured, 1);
    assert_eq!(state.board().get(Point::new(1, 1)).unwrap(), Cell::Empty);
}

#[test]
fn immediate_ko_recapture_is_rejected_then_legal_later() {
    let mut state = GameState::new(GameConfig::new(7, Variant::Go));
    play_all(
        &mut state,
        &[
            (Color::Black, 1, 0),
            (Color::White, 2, 0),
            (Color::Black, 0, 1),
            (Color::White, 3, 1),
            (Color::Black, 1, 2),
            (Color::White, 2, 2),
            (Color::Black, 5, 5),
            (Color::White, 1, 1),
            // Black captures the ko stone.
            (Color::Black, 2, 1),
        ],
    );

    // Immediate recapture would recreate the previous position.
    let before = state.clone();
    let result = state.play(Move::new(Color::White, Point::new(1, 1)));
    assert_eq!(result, Err(MoveError::KoViolation));
    assert_eq!(state, before);

    // After an exchange elsewhere the recapture is legal.
    play_all(
        &mut state,
        &[(Color::White, 6, 6), (Color::Black, 6, 5)],
    );
    let outcome = state
        .play(Move::new(Color::White, Point::new(1, 1)))
        .unwrap();
    assert_eq!(outcome.captured, 1);
    assert_eq!(state.board().get(Point::new(2, 1)).unwrap(), Cell::Empty);
}

#[test]
fn gomoku_five_in_a_row_wins() {
    let mut state = GameState::new(GameConfig::new(15, Variant::Gomoku));
    play_all(
        &mut state,
        &[
            (Color::Black, 7, 7),
            (Color::White, 0, 0),
            (Color::Black, 7, 8),
            (Color::White, 0, 1),
            (Color::Black, 7, 9),
            (Color::White, 0, 2),
            (Color::Black, 7, 10),
            (Color::White, 0, 3),
        ],
    );
    assert_eq!(state.winner(), None);

    state
        .play(Move::new(Color::Black, Point::new(7, 11)))
        .unwrap();
    assert_eq!(state.winner(), Some(Color::Black));
    assert!(state.is_terminal());

    // Terminal is absorbing.
    assert_eq!(
        state.play(Move::new(Color::White, Point::new(1, 1))),
        Err(MoveError::GameOver)
    );
}

#[test]
fn gomoku_diagonal_win_is_detected() {
    let mut state = GameState::new(GameConfig::new(15, Variant::Gomoku));
    play_all(
        &mut state,
        &[
            (Color::Black, 3, 3),
            (Color::White, 0, 0),
            (Color::Black, 4, 4),
            (Color::White, 0, 1),
            (Color::Black, 5, 5),
            (Color::White, 0, 2),
            (Color::Black, 7, 7),
            (Color::White, 0, 3),
        ],
    );
    // Filling the gap completes the five.
    state
        .play(Move::new(Color::Black, Point::new(6, 6)))
        .unwrap();
    assert_eq!(state.winner(), Some(Color::Black));
}

#[test]
fn gomoku_full_board_without_winner_is_a_draw() {
    // Five in a row is impossible on 3x3, so filling the board draws.
    let mut state = GameState::new(GameConfig::new(3, Variant::Gomoku));
    let mut turn = Color::Black;
    for y in 0..3 {
        for x in 0..3 {
            state.play(Move::new(turn, Point::new(x, y))).unwrap();
            turn = turn.opponent();
        }
    }
    assert!(state.is_draw());
    assert_eq!(state.winner(), None);
    assert_eq!(
        state.play(Move::new(turn, Point::new(0, 0))),
        Err(MoveError::GameOver)
    );
}

#[test]
fn restart_round_trip_yields_a_fresh_state() {
    let mut state = GameState::new(GameConfig::new(19, Variant::Go));
    play_all(&mut state, &[(Color::Black, 3, 3), (Color::White, 15, 15)]);
    state.restart(15, Variant::Gomoku);

    assert!(state.board().cells().iter().all(|c| *c == Cell::Empty));
    assert_eq!(state.current_turn(), Color::Black);
    assert_eq!(state.winner(), None);
    assert!(!state.is_draw());
    assert_eq!(state.last_move(), None);
}

#[test]
fn out_of_bounds_move_is_rejected() {
    let mut state = GameState::new(GameConfig::new(9, Variant::Go));
    let result = state.play(Move::new(Color::Black, Point::new(9, 0)));
    assert!(matches!(result, Err(MoveError::OutOfBounds(_))));
}

#[test]
fn ai_moves_are_always_accepted_by_the_rules() {
    // Go: drive a full opening purely with the selector; every proposed
    // move must pass the real legality checks.
    let mut state = GameState::new(GameConfig::new(9, Variant::Go));
    for _ in 0..40 {
        let mv = goban_engine::pick_move(&state).unwrap();
        assert_eq!(mv.color, state.current_turn());
        state.play(mv).unwrap();
    }

    // Gomoku: play the selector against itself until someone wins.
    let mut state = GameState::new(GameConfig::new(15, Variant::Gomoku));
    while !state.is_terminal() {
        let mv = goban_engine::pick_move(&state).unwrap();
        state.play(mv).unwrap();
    }
}

#[test]
fn ai_reports_no_legal_move_when_exhausted() {
    // On a 1x1 Go board the only point is a suicide.
    let state = GameState::new(GameConfig::new(1, Variant::Go));
    assert_eq!(goban_engine::pick_move(&state), Err(MoveError::NoLegalMove));
}
