//! Heuristic move selection.
//!
//! The selector's only hard contract is legality: a returned move always
//! succeeds when handed to [`GameState::play`]. Go candidates are validated
//! by simulating them through the real rules, so captures, suicide, and ko
//! are all accounted for. Ties between equally scored candidates are broken
//! at random.

use crate::action::{Move, MoveError};
use crate::board::{Cell, Color, Point};
use crate::game::{GameState, Variant};
use rand::Rng;
use tracing::{debug, instrument};

/// Picks one legal move for the side to move.
///
/// # Errors
///
/// Fails with [`MoveError::GameOver`] on a terminal game and
/// [`MoveError::NoLegalMove`] when every candidate is illegal.
#[instrument(skip(state), fields(variant = ?state.config().variant, turn = ?state.current_turn()))]
pub fn pick_move(state: &GameState) -> Result<Move, MoveError> {
    if state.is_terminal() {
        return Err(MoveError::GameOver);
    }
    let mv = match state.config().variant {
        Variant::Go => pick_go_move(state),
        Variant::Gomoku => pick_gomoku_move(state),
    }?;
    debug!(%mv, "AI selected move");
    Ok(mv)
}

fn empty_points(state: &GameState) -> impl Iterator<Item = Point> + '_ {
    let size = state.board().size();
    (0..size)
        .flat_map(move |y| (0..size).map(move |x| Point::new(x, y)))
        .filter(|&p| state.board().get(p) == Ok(Cell::Empty))
}

fn choose<R: Rng>(rng: &mut R, candidates: Vec<Move>) -> Result<Move, MoveError> {
    if candidates.is_empty() {
        return Err(MoveError::NoLegalMove);
    }
    let idx = rng.gen_range(0..candidates.len());
    Ok(candidates[idx])
}

/// Go selection: every empty point is simulated through the real rules and
/// scored on captures, self-atari avoidance, and a 3rd/4th-line bias.
fn pick_go_move(state: &GameState) -> Result<Move, MoveError> {
    let color = state.current_turn();
    let size = state.board().size();
    let mut rng = rand::thread_rng();

    // Opening: take a corner star point on an empty board, as long as the
    // rules accept it (a degenerate board can make even that a suicide).
    if state.board().cells().iter().all(|c| *c == Cell::Empty) {
        let opening = if size > 6 {
            Point::new(3, 3)
        } else {
            Point::new(size / 2, size / 2)
        };
        let mv = Move::new(color, opening);
        if state.clone().play(mv).is_ok() {
            return Ok(mv);
        }
    }

    let mut best_score = i32::MIN;
    let mut best_moves = Vec::new();

    for point in empty_points(state) {
        let mv = Move::new(color, point);
        let mut sim = state.clone();
        let outcome = match sim.play(mv) {
            Ok(outcome) => outcome,
            Err(_) => continue,
        };

        let mut score = 0;
        if outcome.captured > 0 {
            score += 100;
        }

        // Self-atari is nearly always a gift; breathing room is mildly good.
        let liberties = sim.board().liberties_of(&sim.board().group_of(point));
        if liberties == 1 {
            score -= 50;
        } else if liberties >= 3 {
            score += 5;
        }

        // Prefer the 3rd and 4th lines on full-sized boards.
        if size >= 7 {
            if point.x == 2 || point.x == size - 3 || point.y == 2 || point.y == size - 3 {
                score += 2;
            }
            if point.x == 3 || point.x == size - 4 || point.y == 3 || point.y == size - 4 {
                score += 3;
            }
        }

        score += rng.gen_range(0..3);

        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push(mv);
        } else if score == best_score {
            best_moves.push(mv);
        }
    }

    choose(&mut rng, best_moves)
}

/// Gomoku selection: line-pattern scoring for both attack (own color) and
/// defense (blocking the opponent), with a center opening.
fn pick_gomoku_move(state: &GameState) -> Result<Move, MoveError> {
    let color = state.current_turn();
    let opponent = color.opponent();
    let size = state.board().size();
    let mut rng = rand::thread_rng();

    let center = Point::new(size / 2, size / 2);
    if state.board().get(center) == Ok(Cell::Empty) {
        return Ok(Move::new(color, center));
    }

    let mut best_score = -1;
    let mut best_moves = Vec::new();

    for point in empty_points(state) {
        let attack = line_score(state, point, color);
        let defense = line_score(state, point, opponent);
        let score = attack + defense;

        if score > best_score {
            best_score = score;
            best_moves.clear();
            best_moves.push(Move::new(color, point));
        } else if score == best_score {
            best_moves.push(Move::new(color, point));
        }
    }

    choose(&mut rng, best_moves)
}

/// Scores placing a `player` stone at `point`: for each axis direction,
/// counts the run it would join and whether its ends are open.
fn line_score(state: &GameState, point: Point, player: Color) -> i32 {
    const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
    let mut total = 0;

    for (dx, dy) in DIRECTIONS {
        let mut count = 1;
        let mut open_ends = 0;
        for (sx, sy) in [(dx, dy), (-dx, -dy)] {
            let (run, open) = scan_run(state, point, player, sx, sy);
            count += run;
            if open {
                open_ends += 1;
            }
        }

        if count >= 5 {
            total += 100_000;
        } else if count == 4 {
            if open_ends > 0 {
                total += 10_000;
                if open_ends == 2 {
                    total += 10_000;
                }
            }
        } else if count == 3 {
            if open_ends == 2 {
                total += 1_000;
            } else if open_ends == 1 {
                total += 100;
            }
        } else if count == 2 && open_ends == 2 {
            total += 100;
        }
    }
    total
}

/// Walks from `point` (exclusive) along a direction, returning the length of
/// the same-colored run and whether it terminates on an empty cell.
fn scan_run(state: &GameState, point: Point, player: Color, dx: isize, dy: isize) -> (usize, bool) {
    let mut count = 0;
    let mut x = point.x as isize + dx;
    let mut y = point.y as isize + dy;
    loop {
        if x < 0 || y < 0 {
            return (count, false);
        }
        match state.board().get(Point::new(x as usize, y as usize)) {
            Ok(Cell::Stone(c)) if c == player => count += 1,
            Ok(Cell::Empty) => return (count, true),
            _ => return (count, false),
        }
        x += dx;
        y += dy;
    }
}
