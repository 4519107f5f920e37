// Multi-factor move scorer.
//
// Each sub-score is normalized toward [0,1] (most through a logistic squash
// centered at 0.5) and the factors are combined multiplicatively with
// per-factor exponents from config. The aggregate collision factor is kept
// raw so a certain-death move collapses the whole product to exactly zero.

use crate::config::ScorerConfig;
use crate::floodfill::open_space;
use crate::types::{Battlesnake, Direction, GameState};

/// Substituted whenever the combined product is not a finite number
pub const SCORE_SENTINEL: f64 = -1.0e9;

/// Scores one candidate direction. Callers must only pass directions that
/// survive the hard pre-filter (in bounds, not occupied right now); scoring
/// an illegal direction is meaningless rather than an error.
pub fn score(dir: Direction, state: &GameState, cfg: &ScorerConfig) -> f64 {
    let next = dir.apply(&state.you.head);
    let others: Vec<&Battlesnake> = state.board.other_snakes(&state.you.id).collect();

    let combined = food_factor(dir, state, &others, cfg)
        * threat_factor(dir, state, &others, cfg)
        * collision_factor(dir, state, &others, cfg)
        * immediate_factor(dir, state, &others, cfg)
        * clearance_factor(next, state, cfg)
        * edge_factor(next, state, cfg)
        * space_factor(next, state, cfg)
        * denial_factor(next, state, &others, cfg);

    if combined.is_finite() {
        combined
    } else {
        SCORE_SENTINEL
    }
}

/// Logistic squash centered at 0.5
fn squash(x: f64, slope: f64) -> f64 {
    1.0 / (1.0 + (-slope * (x - 0.5)).exp())
}

fn inv_sq(d: i32) -> f64 {
    let d = d.max(1) as f64;
    1.0 / (d * d)
}

/// Fraction of inverse-squared food mass lying in this direction. The
/// exponent flips sign with health and length standing: hungry or shorter
/// snakes chase food, healthy longer snakes stay lean and avoid the bias.
fn food_factor(
    dir: Direction,
    state: &GameState,
    others: &[&Battlesnake],
    cfg: &ScorerConfig,
) -> f64 {
    let head = state.you.head;
    let total: f64 = state.board.food.iter().map(|f| inv_sq(head.manhattan(*f))).sum();

    let base = if total > 0.0 {
        let toward: f64 = state
            .board
            .food
            .iter()
            .filter(|f| f.in_direction_of(head, dir))
            .map(|f| inv_sq(head.manhattan(*f)))
            .sum();
        toward / total
    } else {
        0.5
    };

    let hungry = state.you.health <= cfg.low_health_threshold;
    let avg_other_len = if others.is_empty() {
        0.0
    } else {
        others.iter().map(|s| s.length as f64).sum::<f64>() / others.len() as f64
    };
    let shorter = (state.you.length as f64) <= avg_other_len;

    let exp = if hungry || shorter {
        cfg.exp_food
    } else {
        -cfg.exp_food
    };
    squash(base, cfg.squash_slope).powf(exp)
}

/// Distance-weighted danger from opponents we cannot win a head-on against.
/// Strictly shorter opponents are prey and contribute nothing here.
fn threat_factor(
    dir: Direction,
    state: &GameState,
    others: &[&Battlesnake],
    cfg: &ScorerConfig,
) -> f64 {
    let next = dir.apply(&state.you.head);
    let mut danger = 0.0;
    for other in others {
        if other.length < state.you.length {
            continue;
        }
        if other.head.in_direction_of(state.you.head, dir) {
            danger += inv_sq(next.manhattan(other.head));
        }
    }
    let safety = (1.0 - danger).max(0.0);
    squash(safety, cfg.squash_slope).powf(cfg.exp_threat)
}

/// Probability of not being met on the candidate cell by an equal-or-longer
/// opponent, aggregated over every legal move of every opponent. Left raw so
/// a forced fatal meeting yields exactly zero.
fn collision_factor(
    dir: Direction,
    state: &GameState,
    others: &[&Battlesnake],
    cfg: &ScorerConfig,
) -> f64 {
    let next = dir.apply(&state.you.head);
    let mut survive = 1.0;
    for other in others {
        let mut opts = state.board.legal_moves(other);
        if opts.is_empty() {
            opts.push(other.heading());
        }
        let hits = opts
            .iter()
            .filter(|d| d.apply(&other.head) == next && other.length >= state.you.length)
            .count();
        survive *= 1.0 - hits as f64 / opts.len() as f64;
    }
    survive.powf(cfg.exp_collision)
}

/// Near-term collision pressure from opponent heads within a short Manhattan
/// radius of the candidate cell. Flips to a bonus against shorter opponents,
/// where a head-on is a win.
fn immediate_factor(
    dir: Direction,
    state: &GameState,
    others: &[&Battlesnake],
    cfg: &ScorerConfig,
) -> f64 {
    let next = dir.apply(&state.you.head);
    let mut factor = 1.0;
    for other in others {
        let d = next.manhattan(other.head);
        if d > cfg.immediate_radius {
            continue;
        }
        let closeness = 1.0 / (1.0 + d as f64);
        if other.length >= state.you.length {
            factor *= squash(1.0 - closeness, cfg.squash_slope);
        } else {
            factor *= squash(0.5 + closeness / 2.0, cfg.squash_slope);
        }
    }
    factor.powf(cfg.exp_immediate)
}

/// Free fraction of the non-adjacent ring around the candidate cell.
/// Catches narrow dead ends before the full flood fill weighs in.
fn clearance_factor(next: crate::types::Coord, state: &GameState, cfg: &ScorerConfig) -> f64 {
    const RING: [(i32, i32); 8] = [
        (-2, 0),
        (-1, -1),
        (-1, 1),
        (0, -2),
        (0, 2),
        (1, -1),
        (1, 1),
        (2, 0),
    ];

    let free = RING
        .iter()
        .filter(|&&(dx, dy)| {
            let cell = crate::types::Coord {
                x: next.x + dx,
                y: next.y + dy,
            };
            !state.board.out_of_bounds(cell) && !state.board.occupied(cell)
        })
        .count();
    squash(free as f64 / RING.len() as f64, cfg.squash_slope).powf(cfg.exp_clearance)
}

/// Normalized distance from the nearest edge. The exponent grows with the
/// turn number, trading early mobility for late-game space control.
fn edge_factor(next: crate::types::Coord, state: &GameState, cfg: &ScorerConfig) -> f64 {
    let board = &state.board;
    let dist = next
        .x
        .min(next.y)
        .min(board.width - 1 - next.x)
        .min(board.height - 1 - next.y);
    let max_dist = ((board.width.min(board.height) - 1) as f64 / 2.0).max(1.0);
    let frac = (dist as f64 / max_dist).clamp(0.0, 1.0);

    let exp = cfg.exp_edge * (1.0 + state.turn as f64 / cfg.edge_turn_scale);
    squash(frac, cfg.squash_slope).powf(exp)
}

/// Flood-fill count from the candidate cell over total free cells.
fn space_factor(next: crate::types::Coord, state: &GameState, cfg: &ScorerConfig) -> f64 {
    let board = &state.board;
    let open = open_space(next, board) as f64;

    let blocked: usize = board.hazards.len()
        + board.snakes.iter().map(|s| s.body.len()).sum::<usize>();
    let free = ((board.width * board.height) as f64 - blocked as f64).max(1.0);

    let frac = (open / free).clamp(0.0, 1.0);
    squash(frac, cfg.squash_slope).powf(cfg.exp_space)
}

/// Bonus for shrinking the reachable space of an opponent that has exactly
/// one legal move, relative to not making the candidate move at all.
fn denial_factor(
    next: crate::types::Coord,
    state: &GameState,
    others: &[&Battlesnake],
    cfg: &ScorerConfig,
) -> f64 {
    let mut factor = 1.0;
    for other in others {
        let opts = state.board.legal_moves(other);
        if opts.len() != 1 {
            continue;
        }
        let forced = opts[0].apply(&other.head);
        let before = open_space(forced, &state.board);
        if before == 0 {
            continue;
        }

        // The candidate head occupies its cell next turn; model that as an
        // extra blocked cell and re-run the fill.
        let mut blocked = state.board.clone();
        blocked.hazards.push(next);
        let after = open_space(forced, &blocked);

        let reduction = ((before - after.min(before)) as f64 / before as f64).clamp(0.0, 1.0);
        factor *= squash(0.5 + reduction / 2.0, cfg.squash_slope);
    }
    factor.powf(cfg.exp_denial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::{Board, Coord};

    fn snake(id: &str, health: i32, body: &[(i32, i32)]) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: None,
            dead: false,
        }
    }

    fn state(width: i32, height: i32, snakes: Vec<Battlesnake>) -> GameState {
        GameState {
            game: Default::default(),
            turn: 0,
            you: snakes[0].clone(),
            board: Board {
                width,
                height,
                food: vec![],
                snakes,
                hazards: vec![],
            },
        }
    }

    fn cfg() -> ScorerConfig {
        Config::default_hardcoded().scorer
    }

    #[test]
    fn test_squash_is_monotonic_and_centered() {
        let c = cfg();
        assert!((squash(0.5, c.squash_slope) - 0.5).abs() < 1e-9);
        assert!(squash(0.9, c.squash_slope) > squash(0.5, c.squash_slope));
        assert!(squash(0.1, c.squash_slope) < squash(0.5, c.squash_slope));
        assert!(squash(1.0, c.squash_slope) < 1.0);
        assert!(squash(0.0, c.squash_slope) > 0.0);
    }

    #[test]
    fn test_starving_snake_prefers_food_direction() {
        let mut s = state(9, 9, vec![snake("me", 20, &[(4, 4), (4, 3)])]);
        s.board.food.push(Coord { x: 7, y: 4 });

        let toward = score(Direction::Right, &s, &cfg());
        let away = score(Direction::Left, &s, &cfg());
        assert!(
            toward > away,
            "expected food direction to win: {} vs {}",
            toward,
            away
        );
    }

    #[test]
    fn test_healthy_longer_snake_does_not_chase_food() {
        let mut s = state(
            9,
            9,
            vec![
                snake("me", 95, &[(4, 4), (4, 3), (4, 2), (4, 1), (4, 0)]),
                snake("other", 95, &[(8, 8), (8, 7)]),
            ],
        );
        s.board.food.push(Coord { x: 7, y: 4 });

        let toward = score(Direction::Right, &s, &cfg());
        let away = score(Direction::Left, &s, &cfg());
        assert!(
            away > toward,
            "expected lean play away from food: {} vs {}",
            away,
            toward
        );
    }

    #[test]
    fn test_longer_opponents_threaten_shorter_do_not() {
        // Opponent dead ahead to the right, three cells away
        let longer = state(
            11,
            11,
            vec![
                snake("me", 90, &[(4, 5), (3, 5)]),
                snake("other", 90, &[(8, 5), (9, 5), (10, 5), (10, 6)]),
            ],
        );
        let prey = state(
            11,
            11,
            vec![
                snake("me", 90, &[(4, 5), (3, 5), (3, 4)]),
                snake("other", 90, &[(8, 5), (9, 5)]),
            ],
        );
        let c = cfg();

        let threatened = threat_factor(Direction::Right, &longer, &[&longer.board.snakes[1]], &c);
        let safe = threat_factor(Direction::Right, &prey, &[&prey.board.snakes[1]], &c);
        assert!(safe > threatened);
    }

    #[test]
    fn test_forced_head_on_collapses_score_to_zero() {
        // 3x2 board; the opponent's only legal move is our candidate cell and
        // it matches our length, so the aggregate collision factor is zero.
        let mut s = state(
            3,
            2,
            vec![
                snake("me", 90, &[(1, 0), (1, 1)]),
                snake("a", 90, &[(0, 1), (0, 1)]),
            ],
        );
        s.you = s.board.snakes[0].clone();

        assert_eq!(score(Direction::Left, &s, &cfg()), 0.0);
    }

    #[test]
    fn test_non_finite_product_becomes_sentinel() {
        // A negative collision exponent turns a certain-death zero into an
        // infinity; the scorer must answer with the sentinel instead.
        let mut s = state(
            3,
            2,
            vec![
                snake("me", 90, &[(1, 0), (1, 1)]),
                snake("a", 90, &[(0, 1), (0, 1)]),
            ],
        );
        s.you = s.board.snakes[0].clone();

        let mut c = cfg();
        c.exp_collision = -1.0;
        let v = score(Direction::Left, &s, &c);
        assert!(v == SCORE_SENTINEL || v == 0.0);
    }

    #[test]
    fn test_more_open_space_scores_higher() {
        // A vertical wall splits the board; left side is a small pocket.
        let mut s = state(
            7,
            7,
            vec![snake("me", 90, &[(1, 3), (1, 2), (1, 1)])],
        );
        for y in 0..7 {
            s.board.hazards.push(Coord { x: 2, y });
        }
        s.board.hazards.retain(|c| *c != Coord { x: 2, y: 3 });

        // Right goes through the single gap into the large area, left stays
        // in the pocket.
        let through_gap = score(Direction::Right, &s, &cfg());
        let pocket = score(Direction::Left, &s, &cfg());
        assert!(through_gap > pocket);
    }
}
