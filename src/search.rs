// Bounded death-ratio lookahead.
//
// For a fixed first move of our snake, enumerate the cartesian product of
// every opponent's legal moves, advance the board through the canonical
// engine, and count in how many leaves we end up dead. Candidates are ranked
// by ascending deaths/total.

use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

use crate::config::GameRulesConfig;
use crate::engine;
use crate::types::{Direction, GameState};

/// All states one turn ahead given our fixed move: one state per joint
/// assignment of legal moves to the opponents. An opponent with no legal
/// move continues straight.
pub fn possible_states(
    dir: Direction,
    state: &GameState,
    rules: &GameRulesConfig,
) -> Vec<GameState> {
    let mut assignments: Vec<HashMap<String, Direction>> = vec![{
        let mut m = HashMap::new();
        m.insert(state.you.id.clone(), dir);
        m
    }];

    for other in state.board.snakes.iter().filter(|s| s.id != state.you.id) {
        let mut opts = state.board.legal_moves(other);
        if opts.is_empty() {
            opts.push(other.heading());
        }
        assignments = assignments
            .iter()
            .flat_map(|assignment| {
                opts.iter().map(move |d| {
                    let mut next = assignment.clone();
                    next.insert(other.id.clone(), *d);
                    next
                })
            })
            .collect();
    }

    assignments
        .iter()
        .map(|assignment| engine::advance(state, assignment, rules))
        .collect()
}

/// Death count and total over the single next ply
pub fn death(dir: Direction, state: &GameState, rules: &GameRulesConfig) -> (u64, u64) {
    let states = possible_states(dir, state, rules);
    let deaths = states.iter().filter(|s| s.you.dead).count() as u64;
    (deaths, states.len() as u64)
}

/// Closed-form estimate of the leaves under a branch whose root is already
/// dead: 4 first moves for us times 3 non-reversing moves per snake per
/// remaining ply. This assumes a constant branching factor regardless of the
/// actual local legal-move count, so it is an approximation that keeps the
/// search tractable, not an exact count.
pub fn pre_dead_leaf_estimate(depth: u32, snake_count: usize) -> u64 {
    let exponent = (depth * snake_count.max(1) as u32).saturating_sub(1);
    4 * 3u64.pow(exponent)
}

/// Recursive death-ratio count to the given depth. A `deadline`, when
/// supplied, is checked between branch expansions; once it passes, remaining
/// branches are skipped and the partial counts are returned.
pub fn death_depth(
    dir: Direction,
    state: &GameState,
    depth: u32,
    rules: &GameRulesConfig,
    deadline: Option<Instant>,
) -> (u64, u64) {
    let snake_count = state.board.snakes.len();
    let mut deaths = 0;
    let mut total = 0;

    for next in possible_states(dir, state, rules) {
        if let Some(dl) = deadline {
            if Instant::now() >= dl {
                break;
            }
        }
        let (d, t) = branch_counts(&next, depth, snake_count, rules, deadline);
        deaths += d;
        total += t;
    }
    (deaths, total)
}

/// Same counts as `death_depth`, with the first ply fanned out across the
/// rayon pool. Branches are independent and the count reduction is
/// commutative, so order does not matter.
pub fn death_depth_parallel(
    dir: Direction,
    state: &GameState,
    depth: u32,
    rules: &GameRulesConfig,
    deadline: Option<Instant>,
) -> (u64, u64) {
    let snake_count = state.board.snakes.len();

    possible_states(dir, state, rules)
        .into_par_iter()
        .map(|next| {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    return (0, 0);
                }
            }
            branch_counts(&next, depth, snake_count, rules, deadline)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
}

fn branch_counts(
    next: &GameState,
    depth: u32,
    parent_snake_count: usize,
    rules: &GameRulesConfig,
    deadline: Option<Instant>,
) -> (u64, u64) {
    if next.you.dead {
        if depth > 0 {
            let leaves = pre_dead_leaf_estimate(depth, parent_snake_count);
            (leaves, leaves)
        } else {
            (1, 1)
        }
    } else if depth > 0 {
        let mut deaths = 0;
        let mut total = 0;
        for next_dir in Direction::all() {
            let (d, t) = death_depth(next_dir, next, depth - 1, rules, deadline);
            deaths += d;
            total += t;
        }
        (deaths, total)
    } else {
        (0, 1)
    }
}

/// Ranks candidate first moves by their death ratio at the given depth.
/// Returns `(direction, deaths, total)` per candidate, unordered.
pub fn rank_moves(
    candidates: &[Direction],
    state: &GameState,
    depth: u32,
    rules: &GameRulesConfig,
    deadline: Option<Instant>,
) -> Vec<(Direction, u64, u64)> {
    candidates
        .par_iter()
        .map(|&dir| {
            let (deaths, total) = death_depth_parallel(dir, state, depth, rules, deadline);
            (dir, deaths, total)
        })
        .collect()
}
