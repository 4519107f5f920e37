// Reachable-space analysis.

use std::collections::HashSet;

use crate::types::{Board, Coord, Direction};

/// Counts the cells reachable from `origin` through 4-directional moves.
///
/// A cell is blocked when out of bounds or occupied by a hazard or snake
/// body. The origin itself is always traversable regardless of occupancy
/// (it stands for a hypothetical next head) and is excluded from the count.
/// Iterative worklist traversal, so deep fills cannot blow the stack.
pub fn open_space(origin: Coord, board: &Board) -> usize {
    let mut visited = HashSet::new();
    visited.insert(origin);

    let mut worklist = vec![origin];
    let mut count = 0;

    while let Some(cell) = worklist.pop() {
        for dir in Direction::all() {
            let next = dir.apply(&cell);
            if visited.contains(&next) || board.out_of_bounds(next) || board.occupied(next) {
                continue;
            }
            visited.insert(next);
            count += 1;
            worklist.push(next);
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Battlesnake;

    fn board(width: i32, height: i32) -> Board {
        Board {
            width,
            height,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        }
    }

    fn snake(body: &[(i32, i32)]) -> Battlesnake {
        let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
        Battlesnake {
            id: "s".to_string(),
            name: "s".to_string(),
            health: 100,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: None,
            dead: false,
        }
    }

    #[test]
    fn test_empty_board_reaches_everything_but_origin() {
        let b = board(5, 5);
        assert_eq!(open_space(Coord { x: 2, y: 2 }, &b), 24);
        assert_eq!(open_space(Coord { x: 0, y: 0 }, &b), 24);
    }

    #[test]
    fn test_never_exceeds_board_area() {
        let b = board(3, 4);
        assert!(open_space(Coord { x: 1, y: 1 }, &b) < 12);
    }

    #[test]
    fn test_fully_enclosed_origin_counts_zero() {
        let mut b = board(5, 5);
        b.hazards = vec![
            Coord { x: 1, y: 0 },
            Coord { x: 0, y: 1 },
        ];
        // Corner cell walled off by hazards on both open sides
        assert_eq!(open_space(Coord { x: 0, y: 0 }, &b), 0);
    }

    #[test]
    fn test_origin_traversable_even_when_occupied() {
        let mut b = board(5, 5);
        b.snakes.push(snake(&[(2, 2), (2, 1), (2, 0)]));
        // Fill starting on the snake's head still expands outward
        assert!(open_space(Coord { x: 2, y: 2 }, &b) > 0);
    }

    #[test]
    fn test_wall_of_bodies_splits_the_board() {
        let mut b = board(5, 5);
        b.snakes.push(snake(&[
            (2, 0),
            (2, 1),
            (2, 2),
            (2, 3),
            (2, 4),
        ]));
        // Left of the wall: two columns of five cells, minus the origin
        assert_eq!(open_space(Coord { x: 0, y: 0 }, &b), 9);
    }
}
