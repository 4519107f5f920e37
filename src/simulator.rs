// Local match simulator.
//
// Drives a full multi-snake game through the canonical transition engine.
// Movers are pluggable per the `Mover` trait; a mover failure is never fatal
// to the match, the snake just continues straight for that turn.

use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;

use crate::bot::Bot;
use crate::config::Config;
use crate::engine;
use crate::types::{Battlesnake, Board, Coord, Direction, Game, GameState};

/// Anything that can produce a move for the snake designated in `state.you`
pub trait Mover {
    fn get_move(&self, state: &GameState) -> Result<Direction, String>;
}

/// Mover backed by the in-process decision engine
pub struct LocalMover {
    bot: Bot,
}

impl LocalMover {
    pub fn new(config: Config) -> Self {
        LocalMover {
            bot: Bot::new(config),
        }
    }
}

impl Mover for LocalMover {
    fn get_move(&self, state: &GameState) -> Result<Direction, String> {
        Ok(self.bot.decide_move(state))
    }
}

/// Everything recorded about one simulated match
#[derive(Debug, Serialize)]
pub struct MatchRecord {
    pub game_id: String,
    pub started_at: DateTime<Utc>,
    pub turns: i32,
    pub winner: Option<String>,
    /// One snapshot per turn, kept in memory for debugging
    pub states: Vec<GameState>,
}

pub struct Simulator<M: Mover> {
    config: Config,
    mover: M,
    rng: StdRng,
}

impl<M: Mover> Simulator<M> {
    pub fn new(config: Config, mover: M) -> Self {
        let rng = match config.simulator.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Simulator { config, mover, rng }
    }

    /// Runs a match until at most the configured number of snakes remains
    /// alive or the turn cap is reached.
    pub fn run(&mut self, snake_count: usize, width: i32, height: i32, max_turns: i32) -> MatchRecord {
        let game_id = format!("sim-{:016x}", self.rng.random::<u64>());
        let started_at = Utc::now();

        let snakes = self.init_snakes(snake_count, width, height);
        let mut state = GameState {
            game: Game {
                id: game_id.clone(),
                ..Default::default()
            },
            turn: 0,
            you: snakes[0].clone(),
            board: Board {
                width,
                height,
                food: vec![],
                snakes,
                hazards: vec![],
            },
        };
        self.replenish_food(&mut state.board);

        let mut states = vec![state.clone()];

        while state.board.snakes.len() > self.config.game_rules.terminal_snake_count
            && (max_turns < 0 || state.turn < max_turns)
        {
            let mut moves: HashMap<String, Direction> = HashMap::new();
            for snake in &state.board.snakes {
                let mut view = state.clone();
                view.you = snake.clone();
                let dir = match self.mover.get_move(&view) {
                    Ok(dir) => dir,
                    Err(e) => {
                        warn!(
                            "mover failed for snake {} on turn {}: {}; continuing straight",
                            snake.id, state.turn, e
                        );
                        snake.heading()
                    }
                };
                moves.insert(snake.id.clone(), dir);
            }

            state = engine::advance(&state, &moves, &self.config.game_rules);
            self.replenish_food(&mut state.board);
            states.push(state.clone());
        }

        let winner = if state.board.snakes.len() == 1 {
            Some(state.board.snakes[0].id.clone())
        } else {
            None
        };

        info!(
            "match {} finished after {} turns, winner: {:?}",
            game_id, state.turn, winner
        );

        MatchRecord {
            game_id,
            started_at,
            turns: state.turn,
            winner,
            states,
        }
    }

    fn init_snakes(&mut self, count: usize, width: i32, height: i32) -> Vec<Battlesnake> {
        let padding = self.config.simulator.snake_padding;
        let mut heads: Vec<Coord> = Vec::new();
        let mut snakes = Vec::with_capacity(count);

        for i in 0..count {
            let head = self.coord_avoiding(width, height, padding, &heads);
            heads.push(head);
            snakes.push(Battlesnake {
                id: format!("snake-{}", i),
                name: format!("snake-{}", i),
                health: self.config.game_rules.health_on_food,
                body: vec![head, head, head],
                head,
                length: 3,
                latency: String::new(),
                shout: None,
                dead: false,
            });
        }
        snakes
    }

    /// Spawns between zero and a few food cells per call according to the
    /// weighted distribution, never beyond the cap, and never close to
    /// snakes or existing food.
    fn replenish_food(&mut self, board: &mut Board) {
        if board.food.len() >= self.config.simulator.food_cap {
            return;
        }

        let weights = &self.config.simulator.food_spawn_weights;
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return;
        }
        let mut roll = self.rng.random_range(0..total);
        let mut spawn_count = 0;
        for (count, weight) in weights.iter().enumerate() {
            if roll < *weight {
                spawn_count = count;
                break;
            }
            roll -= weight;
        }

        let mut avoid: Vec<Coord> = board
            .snakes
            .iter()
            .flat_map(|s| s.body.iter().copied())
            .collect();
        avoid.extend(board.food.iter().copied());

        for _ in 0..spawn_count {
            if board.food.len() >= self.config.simulator.food_cap {
                break;
            }
            let cell = self.coord_avoiding(
                board.width,
                board.height,
                self.config.simulator.food_padding,
                &avoid,
            );
            board.food.push(cell);
            avoid.push(cell);
        }
    }

    /// Picks a random coordinate at least `padding` Manhattan distance away
    /// from everything in `avoid`. Bounded retries keep a crowded board from
    /// looping forever; the last attempt wins if nothing better turns up.
    fn coord_avoiding(&mut self, width: i32, height: i32, padding: i32, avoid: &[Coord]) -> Coord {
        let mut candidate = Coord { x: 0, y: 0 };
        for _ in 0..(width * height).max(1) * 4 {
            candidate = Coord {
                x: self.rng.random_range(0..width),
                y: self.rng.random_range(0..height),
            };
            if avoid.iter().all(|c| c.manhattan(candidate) >= padding) {
                return candidate;
            }
        }
        candidate
    }
}
