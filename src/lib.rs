//! # Symbios Dendrite
//!
//! Fixed-topology, layered feed-forward networks evolved by a generational
//! genetic algorithm.
//!
//! ## Features
//!
//! - **Arena-Graph Model**: nodes and edges live in `SlotMap` arenas owned by
//!   their network, so copying a network is a deep copy of two flat buffers
//! - **Positional Identities**: every node and edge is named by its position
//!   in the layer grid, so networks of the same shape line up edge for edge
//! - **Parallel Scoring**: each generation is scored on a `rayon` pool
//!   against a shared, read-only training set
//! - **Diversity Pressure**: stagnating populations cull near-duplicates and
//!   raise their mutation rate
//! - **Reproducible Runs**: all randomness flows from one seeded `ChaCha8Rng`
//!
//! ## Quick Start
//!
//! ```rust
//! use symbios_dendrite::{run_evolution, EvolutionConfig, TrainingSet};
//!
//! // Which of two inputs is larger? Output 0 maps to 0.0, output 1 to 1.0.
//! let training = TrainingSet::from_pairs(vec![
//!     (0.0, vec![0.9, 0.1]),
//!     (1.0, vec![0.2, 0.8]),
//!     (0.0, vec![0.7, 0.3]),
//!     (1.0, vec![0.1, 0.6]),
//! ])
//! .unwrap();
//!
//! let config = EvolutionConfig::quick(vec![2, 3, 2]);
//! let winner = run_evolution(config, training).unwrap();
//! assert!(winner.score() <= 4);
//! ```
//!
//! ## Driving the engine step by step
//!
//! ```rust
//! use symbios_dendrite::{Evolution, EvolutionConfig, TrainingSet};
//!
//! let training = TrainingSet::from_pairs(vec![(1.0, vec![0.5, 0.5])]).unwrap();
//! let mut evolution = Evolution::new(EvolutionConfig::quick(vec![2, 2]), training).unwrap();
//!
//! evolution.evaluate();
//! evolution.rank();
//! if evolution.should_cull() {
//!     evolution.cull().unwrap();
//! }
//! evolution.breed().unwrap();
//! assert_eq!(evolution.generation(), 1);
//! ```
//!
//! ## Architecture
//!
//! ### Signal propagation
//!
//! Layers fire in depth order. A node delivers `activation * weight` along
//! each outgoing edge whose product clears the minimum action potential. The
//! receiving node adds the signal scaled down by its fan-in and by
//! `fill_rate^depth`, and saturates at 1.0. The output node with the highest
//! activation is the network's consensus.
//!
//! ### Generations
//!
//! Evaluate, rank, optionally cull, breed. The next generation holds the
//! elite, the pairwise offspring of the top survivors, offspring of random
//! survivor pairs and fresh random networks.

pub mod breeding;
pub mod config;
pub mod evaluator;
pub mod evolution;
pub mod gene;
pub mod identity;
pub mod network;
pub mod topology;
pub mod training;

// Re-exports for convenience
pub use breeding::{breed, mutation_rate, BreedingPolicy};
pub use config::{
    BreedingConfig, ConfigError, CullingConfig, ErrorMetric, EvolutionConfig, NetworkConfig,
    RankBy, ScoringConfig,
};
pub use evaluator::OutputMapping;
pub use evolution::{run_evolution, Evolution, EvolutionError, GenerationReport, Phase};
pub use gene::{Edge, EdgeId, Node, NodeId};
pub use identity::{edge_identity, node_identity, split_edge_identity, split_node_identity};
pub use network::{Consensus, Fingerprint, Network, Scorecard, TopologyError};
pub use topology::{Layer, LayerSpec};
pub use training::{TrainingDatum, TrainingError, TrainingSet};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_network_serves_evaluation() {
        let spec = LayerSpec::new(vec![2, 3, 2]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut network = Network::new(&spec, NetworkConfig::default(), &mut rng);

        let training = TrainingSet::from_pairs(vec![(0.0, vec![1.0, 0.0])]).unwrap();
        let card = *network.evaluate(&training, &ScoringConfig::default());
        assert!(card.score <= 1);
        assert!(card.error.is_finite());
    }

    #[test]
    fn test_identity_roundtrip_through_reexports() {
        let src = node_identity(0, 3);
        let dst = node_identity(1, 7);
        assert_eq!(split_edge_identity(edge_identity(src, dst)), (src, dst));
        assert_eq!(split_node_identity(dst), (1, 7));
    }

    #[test]
    fn test_errors_compose() {
        let err: EvolutionError = TrainingError::EmptyTrainingSet.into();
        assert!(err.to_string().contains("training set is empty"));
        let err: EvolutionError = ConfigError::EmptyPopulation.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
