// Library exports for the copperhead Battlesnake.
// The server binary, the simulate binary, and the integration tests all
// build on these modules.

pub mod bot;
pub mod config;
pub mod engine;
pub mod floodfill;
pub mod handler;
pub mod scorer;
pub mod search;
pub mod simulator;
pub mod types;
