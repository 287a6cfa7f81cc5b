//! Hyperparameters for an evolution run.
//!
//! [`EvolutionConfig`] is an immutable value handed to the engine at
//! construction. It is grouped into sections, each with sensible defaults,
//! and can be read from JSON:
//!
//! ```rust
//! use symbios_dendrite::EvolutionConfig;
//!
//! let config = EvolutionConfig::from_json(r#"{ "layers": [3, 6, 2], "generations": 20 }"#).unwrap();
//! assert_eq!(config.population_size, EvolutionConfig::default().population_size);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::breeding::BreedingPolicy;
use crate::identity::{MAX_LAYER_COUNT, MAX_LAYER_WIDTH};
use crate::topology::LayerSpec;

/// Complete configuration of an evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Nodes per layer, input layer first. At least two entries.
    pub layers: Vec<usize>,
    /// Number of generations to run.
    pub generations: u32,
    /// Members per generation.
    pub population_size: usize,
    /// Size of the top band bred pairwise each generation. Must be below
    /// `population_size`.
    pub survivors: usize,
    /// Seed for the engine's random source. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Worker threads used for evaluation. `None` uses one per core.
    pub threads: Option<usize>,
    /// Connectivity and signal parameters.
    pub network: NetworkConfig,
    /// Crossover and mutation parameters.
    pub breeding: BreedingConfig,
    /// How outputs are scored and ranked.
    pub scoring: ScoringConfig,
    /// Diversity enforcement.
    pub culling: CullingConfig,
}

/// Connectivity and signal propagation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Probability that a new edge is live rather than dead. In `(0, 1]`.
    pub fill_rate: f32,
    /// Lower bound of live edge strengths. Non-negative.
    pub min_strength: f32,
    /// Upper bound of live edge strengths.
    pub max_strength: f32,
    /// An edge fires only when `source_activation * weight` exceeds this.
    /// Non-negative.
    pub min_action_potential: f32,
}

/// Crossover and mutation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreedingConfig {
    /// How a child edge combines its parents' weights.
    pub policy: BreedingPolicy,
    /// Per-edge mutation probability while the population is improving.
    pub base_mutation_rate: f64,
    /// Ceiling for the adaptive mutation probability.
    pub max_mutation_rate: f64,
    /// Added to the mutation probability for every stagnant generation.
    pub mutation_rate_growth: f64,
    /// Offspring bred from random survivor pairs after the pairwise grid.
    pub random_pair_offspring: usize,
}

/// Which error accumulator ranks networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorMetric {
    /// Sum of squared errors.
    #[default]
    SumOfSquares,
    /// Sum of square-rooted errors.
    SumOfRoots,
    /// Confidence-weighted squared error.
    Custom,
}

/// Primary ranking dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RankBy {
    /// Match count first, then error, then confidence.
    #[default]
    Score,
    /// Error first, then match count, then confidence.
    Error,
}

/// Scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Accumulator copied into the ranking error.
    pub error_metric: ErrorMetric,
    /// Active comparator.
    pub rank_by: RankBy,
    /// A trial whose absolute error is below this counts as a match.
    pub resolution: f64,
    /// Value the first output node maps to.
    pub output_min: f64,
    /// Value the last output node maps to.
    pub output_max: f64,
}

/// Diversity enforcement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Stagnation count at which culling first runs.
    pub trigger: u32,
    /// Repeat every this many stagnant generations after the trigger. 0 disables.
    pub interval: u32,
    /// Members closer than this count as close neighbors.
    pub neighbor_distance: f64,
    /// More close neighbors than this gets a member replaced.
    pub max_close_neighbors: usize,
    /// Members closer than this to anyone are replaced outright.
    pub duplicate_distance: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            layers: vec![2, 4, 2],
            generations: 100,
            population_size: 100,
            survivors: 8,
            seed: None,
            threads: None,
            network: NetworkConfig::default(),
            breeding: BreedingConfig::default(),
            scoring: ScoringConfig::default(),
            culling: CullingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            fill_rate: 0.6,
            min_strength: 0.0,
            max_strength: 1.0,
            min_action_potential: 0.01,
        }
    }
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            policy: BreedingPolicy::WeightedPull,
            base_mutation_rate: 0.01,
            max_mutation_rate: 0.25,
            mutation_rate_growth: 0.005,
            random_pair_offspring: 16,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            error_metric: ErrorMetric::SumOfSquares,
            rank_by: RankBy::Score,
            resolution: 0.1,
            output_min: 0.0,
            output_max: 1.0,
        }
    }
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            trigger: 5,
            interval: 10,
            neighbor_distance: 0.05,
            max_close_neighbors: 3,
            duplicate_distance: 1e-6,
        }
    }
}

impl EvolutionConfig {
    /// A small, fast configuration for tests and demos.
    #[must_use]
    pub fn quick(layers: Vec<usize>) -> Self {
        Self {
            layers,
            generations: 10,
            population_size: 20,
            survivors: 4,
            seed: Some(42),
            breeding: BreedingConfig {
                random_pair_offspring: 4,
                ..BreedingConfig::default()
            },
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The validated layer specification.
    ///
    /// # Errors
    ///
    /// Returns the layer-shape error if `layers` is malformed.
    pub fn layer_spec(&self) -> Result<LayerSpec, ConfigError> {
        LayerSpec::new(self.layers.clone())
    }

    /// Check every constraint a run depends on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layer_spec()?;
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.survivors >= self.population_size {
            return Err(ConfigError::TooManySurvivors {
                survivors: self.survivors,
                population: self.population_size,
            });
        }
        self.network.validate()?;

        let b = &self.breeding;
        for rate in [b.base_mutation_rate, b.max_mutation_rate, b.mutation_rate_growth] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidMutationRate(rate));
            }
        }

        let s = &self.scoring;
        if !(s.output_min.is_finite() && s.output_max.is_finite()) || s.output_min > s.output_max
        {
            return Err(ConfigError::InvalidOutputRange {
                min: s.output_min,
                max: s.output_max,
            });
        }
        if !(s.resolution.is_finite() && s.resolution >= 0.0) {
            return Err(ConfigError::InvalidResolution(s.resolution));
        }

        let c = &self.culling;
        for distance in [c.neighbor_distance, c.duplicate_distance] {
            if !(distance.is_finite() && distance >= 0.0) {
                return Err(ConfigError::InvalidCullingDistance(distance));
            }
        }
        Ok(())
    }
}

impl NetworkConfig {
    /// Check connectivity parameters.
    ///
    /// Strengths are non-negative, so activations fed with non-negative
    /// inputs stay in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFillRate`],
    /// [`ConfigError::InvalidStrengthRange`] or
    /// [`ConfigError::InvalidActionPotential`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fill_rate > 0.0 && self.fill_rate <= 1.0) {
            return Err(ConfigError::InvalidFillRate(self.fill_rate));
        }
        if !(self.min_strength.is_finite() && self.max_strength.is_finite())
            || self.min_strength < 0.0
            || self.min_strength > self.max_strength
        {
            return Err(ConfigError::InvalidStrengthRange {
                min: self.min_strength,
                max: self.max_strength,
            });
        }
        if !(self.min_action_potential.is_finite() && self.min_action_potential >= 0.0) {
            return Err(ConfigError::InvalidActionPotential(self.min_action_potential));
        }
        Ok(())
    }
}

/// A configuration that cannot start a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Fewer than two layers were given.
    TooFewLayers(usize),
    /// More layers than node identities can address.
    TooManyLayers(usize),
    /// The layer at this depth has no nodes.
    EmptyLayer(usize),
    /// A layer holds more nodes than node identities can address.
    LayerTooWide {
        /// Depth of the offending layer.
        depth: usize,
        /// Its requested size.
        size: usize,
    },
    /// Generation count is zero.
    NoGenerations,
    /// Population size is zero.
    EmptyPopulation,
    /// The survivor band would cover the whole population.
    TooManySurvivors {
        /// Requested survivor count.
        survivors: usize,
        /// Population size.
        population: usize,
    },
    /// Fill rate outside `(0, 1]`.
    InvalidFillRate(f32),
    /// Strength bounds are negative, inverted or not finite.
    InvalidStrengthRange {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Minimum action potential is negative or not finite.
    InvalidActionPotential(f32),
    /// Match resolution is negative or not finite.
    InvalidResolution(f64),
    /// A culling distance is negative or not finite.
    InvalidCullingDistance(f64),
    /// Output range is inverted or not finite.
    InvalidOutputRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A mutation rate outside `[0, 1]`.
    InvalidMutationRate(f64),
    /// The configuration text could not be (de)serialized.
    Parse(String),
    /// The configuration file could not be read.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::TooFewLayers(n) => {
                write!(f, "layer specification needs at least 2 layers, got {}", n)
            }
            ConfigError::TooManyLayers(n) => write!(
                f,
                "layer specification has {} layers, at most {} are addressable",
                n, MAX_LAYER_COUNT
            ),
            ConfigError::EmptyLayer(depth) => write!(f, "layer {} has no nodes", depth),
            ConfigError::LayerTooWide { depth, size } => write!(
                f,
                "layer {} has {} nodes, at most {} are addressable",
                depth, size, MAX_LAYER_WIDTH
            ),
            ConfigError::NoGenerations => write!(f, "at least one generation must run"),
            ConfigError::EmptyPopulation => write!(f, "population size must be positive"),
            ConfigError::TooManySurvivors {
                survivors,
                population,
            } => write!(
                f,
                "survivors ({}) must be below population size ({})",
                survivors, population
            ),
            ConfigError::InvalidFillRate(rate) => {
                write!(f, "fill rate {} outside (0, 1]", rate)
            }
            ConfigError::InvalidStrengthRange { min, max } => {
                write!(f, "invalid connection strength range [{}, {}]", min, max)
            }
            ConfigError::InvalidActionPotential(value) => {
                write!(f, "minimum action potential {} must be finite and non-negative", value)
            }
            ConfigError::InvalidResolution(value) => {
                write!(f, "match resolution {} must be finite and non-negative", value)
            }
            ConfigError::InvalidCullingDistance(value) => {
                write!(f, "culling distance {} must be finite and non-negative", value)
            }
            ConfigError::InvalidOutputRange { min, max } => {
                write!(f, "invalid output range [{}, {}]", min, max)
            }
            ConfigError::InvalidMutationRate(rate) => {
                write!(f, "mutation rate {} outside [0, 1]", rate)
            }
            ConfigError::Parse(msg) => write!(f, "malformed configuration: {}", msg),
            ConfigError::Io(msg) => write!(f, "cannot read configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
        assert!(EvolutionConfig::quick(vec![3, 1]).validate().is_ok());
    }

    #[test]
    fn test_rejects_short_layer_spec() {
        let config = EvolutionConfig {
            layers: vec![4],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewLayers(1)));
    }

    #[test]
    fn test_rejects_empty_layer() {
        let config = EvolutionConfig {
            layers: vec![2, 0, 1],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyLayer(1)));
    }

    #[test]
    fn test_rejects_population_problems() {
        let empty = EvolutionConfig {
            population_size: 0,
            survivors: 0,
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyPopulation));

        let idle = EvolutionConfig {
            generations: 0,
            ..Default::default()
        };
        assert_eq!(idle.validate(), Err(ConfigError::NoGenerations));

        let crowded = EvolutionConfig {
            population_size: 8,
            survivors: 8,
            ..Default::default()
        };
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::TooManySurvivors { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_network_parameters() {
        let mut config = EvolutionConfig::default();
        config.network.fill_rate = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFillRate(_))));

        let mut config = EvolutionConfig::default();
        config.network.min_strength = 0.9;
        config.network.max_strength = 0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrengthRange { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_strengths_and_potential() {
        let mut config = EvolutionConfig::default();
        config.network.min_strength = -1.0;
        config.network.max_strength = -0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStrengthRange { .. })
        ));

        for potential in [-10.0, f32::NAN, f32::INFINITY] {
            let mut config = EvolutionConfig::default();
            config.network.min_action_potential = potential;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidActionPotential(_))
            ));
        }

        let mut config = EvolutionConfig::default();
        config.network.min_action_potential = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_resolution() {
        for resolution in [f64::NAN, -0.1, f64::INFINITY] {
            let mut config = EvolutionConfig::default();
            config.scoring.resolution = resolution;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidResolution(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_culling_distances() {
        let mut config = EvolutionConfig::default();
        config.culling.neighbor_distance = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidCullingDistance(-1.0)));

        let mut config = EvolutionConfig::default();
        config.culling.duplicate_distance = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCullingDistance(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EvolutionConfig::quick(vec![3, 5, 2]);
        let json = config.to_json().unwrap();
        let restored = EvolutionConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EvolutionConfig::from_json(r#"{ "layers": [4, 2], "scoring": { "rank_by": "Error" } }"#)
                .unwrap();
        assert_eq!(config.layers, vec![4, 2]);
        assert_eq!(config.scoring.rank_by, RankBy::Error);
        assert_eq!(config.scoring.resolution, ScoringConfig::default().resolution);
        assert_eq!(config.network, NetworkConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        let err = EvolutionConfig::from_json("{ layers: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = EvolutionConfig::from_json(r#"{ "layers": [1] }"#).unwrap_err();
        assert_eq!(err, ConfigError::TooFewLayers(1));
    }
}
