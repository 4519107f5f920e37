// Canonical board transition engine.
//
// Everything that advances a game state goes through `advance`: the heuristic
// scorer, the lookahead search, and the match simulator are all consumers of
// this one implementation of growth, starvation, and collision rules.

use std::collections::HashMap;

use crate::config::GameRulesConfig;
use crate::types::{Battlesnake, Board, Direction, GameState};

/// Advances the whole board by one turn.
///
/// Snakes without an entry in `moves` continue along their current heading,
/// which is what the lookahead search relies on when only a subset of moves
/// varies. Death resolution is simultaneous: every snake's fate is judged
/// against every snake's post-move position, never in application order.
/// Dead snakes are dropped from the next board; the active snake (`you`) is
/// additionally returned with its `dead` flag set so callers can observe it.
pub fn advance(
    state: &GameState,
    moves: &HashMap<String, Direction>,
    rules: &GameRulesConfig,
) -> GameState {
    let moved: Vec<Battlesnake> = state
        .board
        .snakes
        .iter()
        .map(|snake| {
            let dir = moves
                .get(&snake.id)
                .copied()
                .unwrap_or_else(|| snake.heading());
            step_snake(snake, dir, &state.board, rules)
        })
        .collect();

    // The active snake may or may not be part of the roster; either way its
    // next position participates in the same simultaneous resolution.
    let mut next_you = match moved.iter().find(|s| s.id == state.you.id) {
        Some(s) => s.clone(),
        None => {
            let dir = moves
                .get(&state.you.id)
                .copied()
                .unwrap_or_else(|| state.you.heading());
            step_snake(&state.you, dir, &state.board, rules)
        }
    };
    next_you.dead = dies(&next_you, &state.board, &moved);

    let survivors: Vec<Battlesnake> = moved
        .iter()
        .filter(|s| !dies(s, &state.board, &moved))
        .cloned()
        .collect();

    let food = state
        .board
        .food
        .iter()
        .filter(|f| !moved.iter().any(|s| s.head == **f))
        .copied()
        .collect();

    GameState {
        game: state.game.clone(),
        turn: state.turn + 1,
        board: Board {
            width: state.board.width,
            height: state.board.height,
            food,
            snakes: survivors,
            hazards: state.board.hazards.clone(),
        },
        you: next_you,
    }
}

/// Applies one move to a single snake: new head, tail handling, and health.
/// Landing on food grows the body by one and resets health; otherwise the
/// tail drops and health drains by one, or by the hazard damage on hazards.
fn step_snake(
    snake: &Battlesnake,
    dir: Direction,
    board: &Board,
    rules: &GameRulesConfig,
) -> Battlesnake {
    let new_head = dir.apply(&snake.head);

    let mut body = Vec::with_capacity(snake.body.len() + 1);
    body.push(new_head);
    body.extend_from_slice(&snake.body);

    let mut health = snake.health;
    if board.food.contains(&new_head) {
        health = rules.health_on_food;
    } else {
        body.pop();
        health -= if board.hazards.contains(&new_head) {
            rules.hazard_damage
        } else {
            rules.health_loss_per_turn
        };
    }

    Battlesnake {
        id: snake.id.clone(),
        name: snake.name.clone(),
        health,
        head: new_head,
        length: body.len() as i32,
        body,
        latency: snake.latency.clone(),
        shout: snake.shout.clone(),
        dead: false,
    }
}

/// Whether a post-move snake dies, judged against every post-move position.
fn dies(snake: &Battlesnake, board: &Board, all_moved: &[Battlesnake]) -> bool {
    if snake.health <= 0 {
        return true;
    }
    if board.out_of_bounds(snake.head) {
        return true;
    }
    // Own body, excluding the new head cell itself
    if snake.body[1..].contains(&snake.head) {
        return true;
    }
    for other in all_moved {
        if other.id == snake.id {
            continue;
        }
        if other.head == snake.head {
            // Head-to-head: the strictly shorter snake dies, equal means both
            if snake.length <= other.length {
                return true;
            }
        } else if other.body.contains(&snake.head) {
            return true;
        }
    }
    false
}
