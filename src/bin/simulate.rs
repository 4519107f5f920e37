// Local match harness: runs a full game between copies of the local engine
// and prints the recorded per-turn states as JSON for inspection.
//
// Usage: simulate [snakes] [width] [height] [max_turns]

use std::env;

use copperhead::config::Config;
use copperhead::simulator::{LocalMover, Simulator};

fn arg_or(args: &[String], idx: usize, default: i64) -> i64 {
    args.get(idx)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let snakes = arg_or(&args, 1, 4) as usize;
    let width = arg_or(&args, 2, 11) as i32;
    let height = arg_or(&args, 3, 11) as i32;
    let max_turns = arg_or(&args, 4, 1000) as i32;

    let config = Config::load_or_default();
    let mover = LocalMover::new(config.clone());
    let mut simulator = Simulator::new(config, mover);

    let record = simulator.run(snakes, width, height, max_turns);

    match serde_json::to_string(&record) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("failed to serialize match record: {}", e),
    }
}
