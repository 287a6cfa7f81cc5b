//! Crossover and mutation.
//!
//! A child always has its parents' topology. Its edges are visited in
//! topological order alongside the matching father and mother edges; each
//! child edge is either re-rolled (mutation) or combined from the parents
//! with the active [`BreedingPolicy`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{BreedingConfig, NetworkConfig};
use crate::gene::random_strength;
use crate::network::{Network, TopologyError};

/// Amount weighted pull moves an agreeing weight towards its extreme.
const PULL_STEP: f32 = 0.01;

/// Agreement threshold for weighted pull.
const PULL_PIVOT: f32 = 0.5;

/// How a child edge's weight is derived from its parents' weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BreedingPolicy {
    /// Ignore both parents and draw a fresh strength.
    AlwaysRandom,
    /// Take the father's or the mother's weight with equal probability.
    Human,
    /// Arithmetic mean of both parents.
    Average,
    /// When both parents sit on the same side of 0.5, push past the more
    /// extreme one by a small step; otherwise behave like `Human`.
    #[default]
    WeightedPull,
}

impl BreedingPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::AlwaysRandom,
        Self::Human,
        Self::Average,
        Self::WeightedPull,
    ];

    /// Combine one pair of parent weights.
    pub fn cross<R: Rng>(
        self,
        father: f32,
        mother: f32,
        config: &NetworkConfig,
        rng: &mut R,
    ) -> f32 {
        match self {
            Self::AlwaysRandom => random_strength(config, rng),
            Self::Human => {
                if rng.random_bool(0.5) {
                    father
                } else {
                    mother
                }
            }
            Self::Average => (father + mother) / 2.0,
            Self::WeightedPull => {
                if father >= PULL_PIVOT && mother >= PULL_PIVOT {
                    (father.max(mother) + PULL_STEP).min(1.0)
                } else if father < PULL_PIVOT && mother < PULL_PIVOT {
                    (father.min(mother) - PULL_STEP).max(0.0)
                } else {
                    Self::Human.cross(father, mother, config, rng)
                }
            }
        }
    }
}

/// Per-edge mutation probability after `stagnation` generations without
/// improvement.
#[must_use]
pub fn mutation_rate(config: &BreedingConfig, stagnation: u32) -> f64 {
    f64::from(stagnation)
        .mul_add(config.mutation_rate_growth, config.base_mutation_rate)
        .min(config.max_mutation_rate)
}

/// Breed a child from two same-topology parents.
///
/// Each child edge is re-rolled with probability `mutation_rate`, otherwise
/// combined from the parents with `policy`. The child starts with cleared
/// activations and scores.
///
/// # Errors
///
/// Returns [`TopologyError::Layers`] if the parents were built from
/// different layer specifications.
pub fn breed<R: Rng>(
    father: &Network,
    mother: &Network,
    policy: BreedingPolicy,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<Network, TopologyError> {
    father.check_topology(mother)?;

    let mut child = father.blank_copy();
    let config = child.config;
    for (edge, mate) in child.edges.values_mut().zip(mother.edges.values()) {
        debug_assert_eq!(edge.identity, mate.identity);
        edge.weight = if rng.random::<f64>() < mutation_rate {
            random_strength(&config, rng)
        } else {
            policy.cross(edge.weight, mate.weight, &config, rng)
        };
    }
    Ok(child)
}
