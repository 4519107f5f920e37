// Battlesnake API types and the geometry helpers the engine is built on.
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Game {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ruleset: HashMap<String, Value>,
    #[serde(default)]
    pub timeout: u32,
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Component-wise sum: {x1 + x2, y1 + y2}
    pub fn add(&self, other: Coord) -> Coord {
        Coord {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Negates both components: {-x, -y}
    pub fn reverse(&self) -> Coord {
        Coord {
            x: -self.x,
            y: -self.y,
        }
    }

    /// Manhattan distance: |x2 - x1| + |y2 - y1|
    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance: sqrt((x2 - x1)^2 + (y2 - y1)^2)
    pub fn euclidean(&self, other: Coord) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether this coordinate lies in the given direction relative to `source`
    pub fn in_direction_of(&self, source: Coord, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.y > source.y,
            Direction::Down => self.y < source.y,
            Direction::Left => self.x < source.x,
            Direction::Right => self.x > source.x,
        }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// The unit offset this direction moves by
    pub fn offset(&self) -> Coord {
        match self {
            Direction::Up => Coord { x: 0, y: 1 },
            Direction::Down => Coord { x: 0, y: -1 },
            Direction::Left => Coord { x: -1, y: 0 },
            Direction::Right => Coord { x: 1, y: 0 },
        }
    }

    /// Recovers a direction from a unit offset, if it is one
    pub fn from_offset(offset: Coord) -> Option<Direction> {
        match (offset.x, offset.y) {
            (0, 1) => Some(Direction::Up),
            (0, -1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        coord.add(self.offset())
    }

    /// The opposite direction
    pub fn reverse(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Stable index encoding used by the lock-free search state
    pub fn as_index(&self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Inverse of `as_index`; out-of-range values fall back to Up
    pub fn from_index(idx: u8) -> Direction {
        match idx {
            1 => Direction::Down,
            2 => Direction::Left,
            3 => Direction::Right,
            _ => Direction::Up,
        }
    }
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
    /// Internal marker set by the transition engine; never on the wire
    #[serde(default, skip_serializing)]
    pub dead: bool,
}

impl Battlesnake {
    /// The direction this snake last moved, derived from neck to head.
    /// Length-1 snakes (and freshly spawned stacked bodies) default to Right.
    pub fn heading(&self) -> Direction {
        if self.body.len() < 2 {
            return Direction::Right;
        }
        let neck = self.body[1];
        Direction::from_offset(self.head.add(neck.reverse())).unwrap_or(Direction::Right)
    }

    /// The three directions that do not reverse onto the neck
    pub fn moves(&self) -> Vec<Direction> {
        let back = self.heading().reverse();
        Direction::all()
            .iter()
            .filter(|&&dir| dir != back)
            .copied()
            .collect()
    }
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

impl Board {
    /// Checks if a coordinate is outside [0,width) x [0,height)
    pub fn out_of_bounds(&self, coord: Coord) -> bool {
        coord.x < 0 || coord.x >= self.width || coord.y < 0 || coord.y >= self.height
    }

    /// Checks if a coordinate is covered by a hazard or any snake body segment
    pub fn occupied(&self, coord: Coord) -> bool {
        if self.hazards.contains(&coord) {
            return true;
        }
        self.snakes.iter().any(|snake| snake.body.contains(&coord))
    }

    /// Moves a snake could make right now: no reversal onto the neck,
    /// in bounds, and not into an occupied cell. May be empty.
    pub fn legal_moves(&self, snake: &Battlesnake) -> Vec<Direction> {
        snake
            .moves()
            .into_iter()
            .filter(|dir| {
                let next = dir.apply(&snake.head);
                !self.out_of_bounds(next) && !self.occupied(next)
            })
            .collect()
    }

    /// All snakes except the one with the given id
    pub fn other_snakes<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Battlesnake> {
        self.snakes.iter().filter(move |s| s.id != id)
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    #[serde(default)]
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}
