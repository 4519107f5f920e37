// Decision engine behind the API endpoints.
//
// The bot computes moves from immutable snapshots: the heuristic scorer is
// the primary path, the death-ratio lookahead the alternative, and both are
// driven from an async poller that reads a lock-free result cell so a slow
// search degrades into the best answer found so far instead of a timeout.

use log::{info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, StrategyMode};
use crate::scorer;
use crate::search;
use crate::types::{Direction, GameState};

/// Lock-free shared state between the async poller and the search task
#[derive(Debug)]
pub struct SharedSearchState {
    /// Best move found so far (encoded as direction index)
    pub best_move: AtomicU8,
    /// Score of the best move, scaled by 1000 (heuristic score or negated
    /// death permille, depending on strategy); for logging only
    pub best_score: AtomicI32,
    /// Flag indicating search completion
    pub search_complete: AtomicBool,
    /// Deepest completed lookahead iteration
    pub completed_depth: AtomicU8,
}

impl SharedSearchState {
    fn new(fallback: Direction) -> Self {
        SharedSearchState {
            best_move: AtomicU8::new(fallback.as_index()),
            best_score: AtomicI32::new(i32::MIN),
            search_complete: AtomicBool::new(false),
            completed_depth: AtomicU8::new(0),
        }
    }

    fn store_best(&self, dir: Direction, score_milli: i32) {
        self.best_move.store(dir.as_index(), Ordering::Release);
        self.best_score.store(score_milli, Ordering::Release);
    }
}

/// Battlesnake bot holding static configuration and the seedable tie-break RNG
pub struct Bot {
    config: Config,
    rng: Arc<Mutex<StdRng>>,
}

impl Bot {
    /// Creates a new bot. A configured `rng_seed` makes tie-breaking
    /// reproducible; otherwise the RNG is seeded from the OS.
    pub fn new(config: Config) -> Self {
        let rng = match config.search.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Bot {
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "cameron-kurotori",
            "color": "#0f3d17",
            "head": "tiger-king",
            "tail": "tiger-tail",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, state: &GameState) {
        info!(
            "GAME START game_id={} snakes={}",
            state.game.id,
            state.board.snakes.len()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, state: &GameState) {
        info!("GAME OVER game_id={} turn={}", state.game.id, state.turn);
    }

    /// Computes and returns the next move within the per-turn time budget.
    /// Corresponds to POST /move endpoint.
    ///
    /// The CPU-bound decision runs on the blocking pool and publishes
    /// improvements into `SharedSearchState`; this method polls that cell and
    /// answers with whatever is best when the budget runs out.
    pub async fn get_move(&self, state: &GameState) -> Value {
        let start_time = Instant::now();
        let effective_budget = self.config.timing.effective_budget_ms();
        let deadline = start_time + Duration::from_millis(effective_budget);

        let shared = Arc::new(SharedSearchState::new(state.you.heading()));
        let shared_clone = shared.clone();

        let state_clone = state.clone();
        let config = self.config.clone();
        let rng = self.rng.clone();

        tokio::task::spawn_blocking(move || {
            Bot::compute_best_move_internal(&state_clone, shared_clone, deadline, &config, &rng)
        });

        let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms);
        loop {
            tokio::time::sleep(polling_interval).await;

            if Instant::now() >= deadline || shared.search_complete.load(Ordering::Acquire) {
                break;
            }
        }

        let chosen = Direction::from_index(shared.best_move.load(Ordering::Acquire));
        let depth = shared.completed_depth.load(Ordering::Acquire);

        if shared.search_complete.load(Ordering::Acquire) {
            info!(
                "Turn {}: chose {} (depth: {}, time: {}ms)",
                state.turn,
                chosen.as_str(),
                depth,
                start_time.elapsed().as_millis()
            );
        } else {
            warn!(
                "Turn {}: budget exhausted, degraded to {} (depth: {}, time: {}ms)",
                state.turn,
                chosen.as_str(),
                depth,
                start_time.elapsed().as_millis()
            );
        }

        json!({ "move": chosen.as_str() })
    }

    /// Synchronous decision entry point used by tests and the simulator.
    pub fn decide_move(&self, state: &GameState) -> Direction {
        let deadline =
            Instant::now() + Duration::from_millis(self.config.timing.effective_budget_ms());
        let shared = Arc::new(SharedSearchState::new(state.you.heading()));
        Self::compute_best_move_internal(state, shared.clone(), deadline, &self.config, &self.rng);
        Direction::from_index(shared.best_move.load(Ordering::Acquire))
    }

    /// Internal computation engine, runs on the blocking pool.
    fn compute_best_move_internal(
        state: &GameState,
        shared: Arc<SharedSearchState>,
        deadline: Instant,
        config: &Config,
        rng: &Arc<Mutex<StdRng>>,
    ) {
        let candidates = Self::candidates(state);

        if candidates.is_empty() {
            // Boxed in: continue straight and accept the outcome
            warn!(
                "Turn {}: no legal moves, continuing {}",
                state.turn,
                state.you.heading().as_str()
            );
            shared.store_best(state.you.heading(), i32::MIN);
            shared.search_complete.store(true, Ordering::Release);
            return;
        }

        // Fast heuristic pass first so an answer exists almost immediately
        let scored: Vec<(Direction, f64)> = candidates
            .iter()
            .map(|&dir| (dir, scorer::score(dir, state, &config.scorer)))
            .collect();
        if let Some(best) = Self::pick_scored(&scored, rng) {
            let milli = (scored
                .iter()
                .find(|(d, _)| *d == best)
                .map(|(_, s)| *s)
                .unwrap_or(0.0)
                * 1000.0) as i32;
            shared.store_best(best, milli);
        }

        if config.strategy.mode == StrategyMode::Lookahead {
            Self::lookahead_deepening(state, &candidates, &scored, &shared, deadline, config, rng);
        }

        shared.search_complete.store(true, Ordering::Release);
    }

    /// Iterative deepening over the death-ratio search, publishing the best
    /// candidate after every completed depth. Bails between depths once the
    /// deadline passes; partial iterations are discarded in favor of the
    /// last completed one.
    fn lookahead_deepening(
        state: &GameState,
        candidates: &[Direction],
        scored: &[(Direction, f64)],
        shared: &Arc<SharedSearchState>,
        deadline: Instant,
        config: &Config,
        rng: &Arc<Mutex<StdRng>>,
    ) {
        for depth in 1..=config.search.max_depth {
            if Instant::now() >= deadline {
                break;
            }

            let ranked = search::rank_moves(
                candidates,
                state,
                depth,
                &config.game_rules,
                Some(deadline),
            );

            // A ranking cut short by the deadline has zero totals; keep the
            // previous answer instead.
            if ranked.iter().any(|(_, _, total)| *total == 0) {
                break;
            }

            if let Some(best) = Self::pick_ranked(&ranked, scored, rng) {
                let ratio = ranked
                    .iter()
                    .find(|(d, _, _)| *d == best)
                    .map(|(_, deaths, total)| *deaths as f64 / *total as f64)
                    .unwrap_or(1.0);
                shared.store_best(best, -(ratio * 1000.0) as i32);
                shared.completed_depth.store(depth as u8, Ordering::Release);
            }
        }
    }

    /// Candidate moves after the hard pre-filter: no reversal, in bounds,
    /// and not into a currently occupied cell.
    pub fn candidates(state: &GameState) -> Vec<Direction> {
        state
            .you
            .moves()
            .into_iter()
            .filter(|dir| {
                let next = dir.apply(&state.you.head);
                !state.board.out_of_bounds(next) && !state.board.occupied(next)
            })
            .collect()
    }

    /// Picks the maximum-scoring candidate. An exact-zero maximum means
    /// every surviving candidate was judged fully unsafe; break that tie
    /// uniformly at random so repeated bad spots do not die the same way
    /// every time.
    fn pick_scored(scored: &[(Direction, f64)], rng: &Arc<Mutex<StdRng>>) -> Option<Direction> {
        let (mut best_dir, mut best_score) = *scored.first()?;
        for &(dir, score) in &scored[1..] {
            if score > best_score {
                best_dir = dir;
                best_score = score;
            }
        }

        if best_score == 0.0 {
            let zeros: Vec<Direction> = scored
                .iter()
                .filter(|(_, s)| *s == 0.0)
                .map(|(d, _)| *d)
                .collect();
            let idx = rng.lock().random_range(0..zeros.len());
            return Some(zeros[idx]);
        }

        Some(best_dir)
    }

    /// Picks the candidate with the lowest death ratio. Ties fall back to the
    /// heuristic score, then to a uniform random pick.
    fn pick_ranked(
        ranked: &[(Direction, u64, u64)],
        scored: &[(Direction, f64)],
        rng: &Arc<Mutex<StdRng>>,
    ) -> Option<Direction> {
        let ratio = |deaths: u64, total: u64| {
            if total == 0 {
                1.0
            } else {
                deaths as f64 / total as f64
            }
        };

        let best_ratio = ranked
            .iter()
            .map(|&(_, d, t)| ratio(d, t))
            .fold(f64::INFINITY, f64::min);
        let tied: Vec<Direction> = ranked
            .iter()
            .filter(|&&(_, d, t)| ratio(d, t) <= best_ratio)
            .map(|&(d, _, _)| d)
            .collect();

        if tied.len() == 1 {
            return Some(tied[0]);
        }

        let tied_scored: Vec<(Direction, f64)> = scored
            .iter()
            .filter(|(d, _)| tied.contains(d))
            .copied()
            .collect();
        if tied_scored.is_empty() {
            let idx = rng.lock().random_range(0..tied.len());
            return Some(tied[idx]);
        }
        Self::pick_scored(&tied_scored, rng)
    }
}
