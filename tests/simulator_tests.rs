// Full-match runs through the simulator with the local decision engine.

use copperhead::config::Config;
use copperhead::simulator::{LocalMover, Simulator};

fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default_hardcoded();
    config.simulator.seed = Some(seed);
    config.search.rng_seed = Some(seed);
    config
}

#[test]
fn test_match_terminates_and_records_every_turn() {
    let config = seeded_config(17);
    let mover = LocalMover::new(config.clone());
    let mut sim = Simulator::new(config, mover);

    let record = sim.run(3, 11, 11, 60);

    assert!(record.turns <= 60);
    // One snapshot per turn plus the initial state
    assert_eq!(record.states.len() as i32, record.turns + 1);

    let last = record.states.last().unwrap();
    assert!(last.board.snakes.len() <= 1 || record.turns == 60);
    if let Some(winner) = &record.winner {
        assert_eq!(last.board.snakes[0].id, *winner);
    }
}

#[test]
fn test_same_seed_replays_the_same_match() {
    let run = |seed| {
        let config = seeded_config(seed);
        let mover = LocalMover::new(config.clone());
        let mut sim = Simulator::new(config, mover);
        sim.run(2, 7, 7, 40)
    };

    let first = run(23);
    let second = run(23);

    assert_eq!(first.turns, second.turns);
    assert_eq!(first.winner, second.winner);
    assert_eq!(
        serde_json::to_value(&first.states).unwrap(),
        serde_json::to_value(&second.states).unwrap()
    );
}

#[test]
fn test_two_snake_match_produces_at_most_one_winner() {
    let config = seeded_config(31);
    let mover = LocalMover::new(config.clone());
    let mut sim = Simulator::new(config, mover);

    let record = sim.run(2, 7, 7, 200);
    let last = record.states.last().unwrap();

    if record.turns < 200 {
        assert!(last.board.snakes.len() <= 1);
    }
}
