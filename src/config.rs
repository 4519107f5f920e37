// Configuration module for reading Snake.toml
// All tunable constants for the engine, scorer, search, and simulator live here.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub strategy: StrategyConfig,
    pub game_rules: GameRulesConfig,
    pub search: SearchConfig,
    pub scorer: ScorerConfig,
    pub simulator: SimulatorConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms
            .saturating_sub(self.network_overhead_ms)
    }
}

/// Which decision path drives move selection
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Multi-factor heuristic scorer (primary path)
    Heuristic,
    /// Death-ratio lookahead ranking (alternative path)
    Lookahead,
}

/// Strategy selection constants
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    pub mode: StrategyMode,
}

/// Game rules supplied by the environment, not hardcoded in the engine
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
    pub hazard_damage: i32,
    pub terminal_snake_count: usize,
}

/// Lookahead search constants
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub max_depth: u32,
    /// Fixed seed for the tie-break RNG; omit for a per-process random seed
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Heuristic scorer weights and exponents
#[derive(Debug, Deserialize, Clone)]
pub struct ScorerConfig {
    /// Slope of the logistic squash centered at 0.5
    pub squash_slope: f64,
    /// Health at or below which food-seeking becomes urgent
    pub low_health_threshold: i32,
    pub exp_food: f64,
    pub exp_threat: f64,
    pub exp_collision: f64,
    pub exp_immediate: f64,
    /// Manhattan radius for the immediate collision term
    pub immediate_radius: i32,
    pub exp_clearance: f64,
    pub exp_edge: f64,
    /// Turn count over which the edge exponent doubles
    pub edge_turn_scale: f64,
    pub exp_space: f64,
    pub exp_denial: f64,
}

/// Local match simulator constants
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub food_cap: usize,
    pub food_padding: i32,
    pub snake_padding: i32,
    /// Weighted table of how many food cells spawn per turn
    pub food_spawn_weights: Vec<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
                polling_interval_ms: 10,
            },
            strategy: StrategyConfig {
                mode: StrategyMode::Heuristic,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
                hazard_damage: 15,
                terminal_snake_count: 1,
            },
            search: SearchConfig {
                max_depth: 3,
                rng_seed: None,
            },
            scorer: ScorerConfig {
                squash_slope: 8.0,
                low_health_threshold: 40,
                exp_food: 1.0,
                exp_threat: 1.0,
                exp_collision: 1.0,
                exp_immediate: 2.0,
                immediate_radius: 2,
                exp_clearance: 1.0,
                exp_edge: 0.5,
                edge_turn_scale: 150.0,
                exp_space: 1.5,
                exp_denial: 1.0,
            },
            simulator: SimulatorConfig {
                food_cap: 10,
                food_padding: 2,
                snake_padding: 5,
                food_spawn_weights: vec![15, 4, 2, 1],
                seed: None,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Snake.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_budget_calculation() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.effective_budget_ms(), 350);
    }

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.strategy.mode, StrategyMode::Heuristic);
        assert_eq!(config.game_rules.health_on_food, 100);
        assert_eq!(config.search.max_depth, 3);
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_snake_toml_matches_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(
            file_config.timing.response_time_budget_ms,
            hardcoded.timing.response_time_budget_ms
        );
        assert_eq!(
            file_config.timing.network_overhead_ms,
            hardcoded.timing.network_overhead_ms
        );
        assert_eq!(file_config.strategy.mode, hardcoded.strategy.mode);
        assert_eq!(
            file_config.game_rules.hazard_damage,
            hardcoded.game_rules.hazard_damage
        );
        assert_eq!(file_config.search.max_depth, hardcoded.search.max_depth);
        assert_eq!(file_config.scorer.squash_slope, hardcoded.scorer.squash_slope);
        assert_eq!(
            file_config.scorer.immediate_radius,
            hardcoded.scorer.immediate_radius
        );
        assert_eq!(file_config.simulator.food_cap, hardcoded.simulator.food_cap);
        assert_eq!(
            file_config.simulator.food_spawn_weights,
            hardcoded.simulator.food_spawn_weights
        );
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
