//! Configuration types for the lane partition search.

use serde::{Deserialize, Serialize};

use super::LaneId;

/// Top-level search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Units per lane; the pool must hold exactly three lanes' worth.
    #[serde(default = "default_lane_size")]
    pub lane_size: usize,
    /// Genetic algorithm settings.
    #[serde(default)]
    pub ga: GaConfig,
    /// Battle simulation settings.
    #[serde(default)]
    pub battle: BattleConfig,
    /// Fitness shaping settings.
    #[serde(default)]
    pub fitness: FitnessConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lane_size: default_lane_size(),
            ga: GaConfig::default(),
            battle: BattleConfig::default(),
            fitness: FitnessConfig::default(),
            random_seed: None,
        }
    }
}

fn default_lane_size() -> usize {
    20
}

/// Genetic algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Number of candidate partitions per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of generations to evolve.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Crossover probability (0.0-1.0).
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Mutation probability per individual (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Sample size for tournament selection.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Number of best individuals preserved unchanged each generation.
    #[serde(default = "default_elitism")]
    pub elitism: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            tournament_size: default_tournament_size(),
            elitism: default_elitism(),
        }
    }
}

fn default_population_size() -> usize {
    50
}
fn default_generations() -> usize {
    500
}
fn default_crossover_rate() -> f64 {
    0.8
}
fn default_mutation_rate() -> f64 {
    0.2
}
fn default_tournament_size() -> usize {
    3
}
fn default_elitism() -> usize {
    2
}

/// Battle simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Monte Carlo trials per lane matchup estimate.
    #[serde(default = "default_trials_per_matchup")]
    pub trials_per_matchup: usize,
    /// Steepness of the logistic duel-probability curve.
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
    /// Fractional power loss range applied to each duel's winner.
    #[serde(default = "default_degradation_range")]
    pub degradation_range: (f64, f64),
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            trials_per_matchup: default_trials_per_matchup(),
            k_factor: default_k_factor(),
            degradation_range: default_degradation_range(),
        }
    }
}

fn default_trials_per_matchup() -> usize {
    500
}
fn default_k_factor() -> f64 {
    0.017
}
fn default_degradation_range() -> (f64, f64) {
    (0.05, 0.15)
}

/// Fitness shaping parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Win probability a lane must reach against every adversary lane to
    /// count as universal.
    #[serde(default = "default_universal_threshold")]
    pub universal_threshold: f64,
    /// Fitness bonus per universal lane.
    #[serde(default = "default_universal_lane_bonus")]
    pub universal_lane_bonus: f64,
    /// Additional bonus when all three lanes are universal.
    #[serde(default = "default_all_universal_bonus")]
    pub all_universal_bonus: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            universal_threshold: default_universal_threshold(),
            universal_lane_bonus: default_universal_lane_bonus(),
            all_universal_bonus: default_all_universal_bonus(),
        }
    }
}

fn default_universal_threshold() -> f64 {
    0.60
}
fn default_universal_lane_bonus() -> f64 {
    0.5
}
fn default_all_universal_bonus() -> f64 {
    2.0
}

impl SearchConfig {
    /// Validate search parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_size == 0 {
            return Err(ConfigError::InvalidLaneSize);
        }
        self.ga.validate()?;
        self.battle.validate()?;
        self.fitness.validate()
    }
}

impl GaConfig {
    /// Validate genetic algorithm parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulation);
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.elitism >= self.population_size {
            return Err(ConfigError::InvalidElitism);
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(ConfigError::InvalidTournament);
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::InvalidRate {
                name: "crossover_rate",
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidRate {
                name: "mutation_rate",
            });
        }
        Ok(())
    }
}

impl BattleConfig {
    /// Validate battle simulation parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials_per_matchup == 0 {
            return Err(ConfigError::InvalidTrials);
        }
        let (min, max) = self.degradation_range;
        if !(0.0..1.0).contains(&min) || !(0.0..1.0).contains(&max) || min > max {
            return Err(ConfigError::InvalidDegradation);
        }
        Ok(())
    }
}

impl FitnessConfig {
    /// Validate fitness shaping parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.universal_threshold) {
            return Err(ConfigError::InvalidRate {
                name: "universal_threshold",
            });
        }
        if self.universal_lane_bonus < 0.0 || self.all_universal_bonus < 0.0 {
            return Err(ConfigError::NegativeBonus);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unit pool must contain exactly {expected} units ({got} provided)")]
    PoolSize { expected: usize, got: usize },
    #[error("adversary lane '{lane}' must contain exactly {expected} units ({got} provided)")]
    AdversaryLaneSize {
        lane: LaneId,
        expected: usize,
        got: usize,
    },
    #[error("unit powers must be positive")]
    ZeroPower,
    #[error("lane size must be non-zero")]
    InvalidLaneSize,
    #[error("population size must be non-zero")]
    InvalidPopulation,
    #[error("generation count must be non-zero")]
    InvalidGenerations,
    #[error("elitism count must be smaller than the population size")]
    InvalidElitism,
    #[error("tournament size must be between 1 and the population size")]
    InvalidTournament,
    #[error("{name} must be within [0, 1]")]
    InvalidRate { name: &'static str },
    #[error("degradation range must satisfy 0 <= min <= max < 1")]
    InvalidDegradation,
    #[error("trials per matchup must be non-zero")]
    InvalidTrials,
    #[error("universal-lane bonuses must be non-negative")]
    NegativeBonus,
}
