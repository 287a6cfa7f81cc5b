//! The generational evolution engine.
//!
//! [`Evolution`] owns the population, the training set, the random source
//! and a worker pool. Each generation moves through a fixed pipeline:
//!
//! 1. **Evaluating**: every network is scored against the training set in
//!    parallel. The pool call returns only once all members are done.
//! 2. **Ranking**: the population is sorted with the active comparator and
//!    the stagnation counter is updated.
//! 3. **Culling**: only when stagnation hits the trigger. Near-duplicate
//!    members are replaced by offspring of lower-ranked survivors.
//! 4. **Breeding**: a new population is built from the elite, a pairwise
//!    grid over the top survivors, random survivor pairs and fresh networks.
//!
//! The final generation is evaluated and ranked but not bred, so the winner
//! is picked from fully scored networks.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::breeding::{breed, mutation_rate};
use crate::config::{ConfigError, EvolutionConfig, RankBy};
use crate::network::{Fingerprint, Network, Scorecard, TopologyError};
use crate::topology::LayerSpec;
use crate::training::{TrainingError, TrainingSet};

/// Where the engine is in its generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Population built, nothing evaluated yet.
    Initializing,
    /// Scoring the current generation.
    Evaluating,
    /// Sorting the current generation.
    Ranking,
    /// Replacing near-duplicates.
    Culling,
    /// Building the next generation.
    Breeding,
    /// The run is over.
    Terminated,
}

/// Statistics of one generation, handed to the host once per generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Zero-based generation index.
    pub generation: u32,
    /// Wall time since the run started.
    pub elapsed: Duration,
    /// Time spent evaluating this generation.
    pub propagation_time: Duration,
    /// Time spent ranking, culling and breeding this generation.
    pub breeding_time: Duration,
    /// Match count of the best-ranked member.
    pub best_score: u32,
    /// Number of training data each member was scored against.
    pub training_size: usize,
    /// Sum of squared errors of the best-ranked member.
    pub sum_squares: f64,
    /// Sum of rooted errors of the best-ranked member.
    pub sum_roots: f64,
    /// Confidence-weighted error of the best-ranked member.
    pub custom: f64,
    /// Consecutive generations without improvement.
    pub stagnation: u32,
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gen {:4} | {}/{} matched | sq {:.4} rt {:.4} cu {:.4} | stagnant {} | eval {:.2?} breed {:.2?} total {:.2?}",
            self.generation,
            self.best_score,
            self.training_size,
            self.sum_squares,
            self.sum_roots,
            self.custom,
            self.stagnation,
            self.propagation_time,
            self.breeding_time,
            self.elapsed
        )
    }
}

/// Any failure that stops a run.
#[derive(Debug, Clone, PartialEq)]
pub enum EvolutionError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// The training set was rejected.
    Training(TrainingError),
    /// Networks of different shapes met in breeding or culling.
    Topology(TopologyError),
    /// A supplied population has the wrong number of members.
    PopulationSize {
        /// Configured population size.
        expected: usize,
        /// Members supplied.
        found: usize,
    },
    /// The evaluation worker pool could not be started.
    ThreadPool(String),
}

impl std::fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvolutionError::Config(e) => write!(f, "invalid configuration: {}", e),
            EvolutionError::Training(e) => write!(f, "invalid training set: {}", e),
            EvolutionError::Topology(e) => write!(f, "{}", e),
            EvolutionError::PopulationSize { expected, found } => write!(
                f,
                "population must have {} members, got {}",
                expected, found
            ),
            EvolutionError::ThreadPool(msg) => {
                write!(f, "cannot start evaluation workers: {}", msg)
            }
        }
    }
}

impl std::error::Error for EvolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvolutionError::Config(e) => Some(e),
            EvolutionError::Training(e) => Some(e),
            EvolutionError::Topology(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EvolutionError {
    fn from(e: ConfigError) -> Self {
        EvolutionError::Config(e)
    }
}

impl From<TrainingError> for EvolutionError {
    fn from(e: TrainingError) -> Self {
        EvolutionError::Training(e)
    }
}

impl From<TopologyError> for EvolutionError {
    fn from(e: TopologyError) -> Self {
        EvolutionError::Topology(e)
    }
}

/// Evolve networks against `training` and return the highest-scoring member
/// of the final generation.
///
/// Blocks until every generation has run; evaluation is parallel inside.
///
/// # Errors
///
/// Returns [`EvolutionError`] if the configuration is invalid or the worker
/// pool cannot be started.
pub fn run_evolution(
    config: EvolutionConfig,
    training: TrainingSet,
) -> Result<Network, EvolutionError> {
    Evolution::new(config, training)?.run()
}

/// Generational evolution engine.
pub struct Evolution {
    config: EvolutionConfig,
    spec: LayerSpec,
    training: TrainingSet,
    population: Vec<Network>,
    rng: ChaCha8Rng,
    pool: rayon::ThreadPool,
    phase: Phase,
    generation: u32,
    stagnation: u32,
    best_score: Option<u32>,
    best_error: Option<f64>,
}

impl Evolution {
    /// Validate the configuration and build the initial random population.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Config`] for an invalid configuration and
    /// [`EvolutionError::ThreadPool`] if the worker pool cannot be started.
    pub fn new(config: EvolutionConfig, training: TrainingSet) -> Result<Self, EvolutionError> {
        config.validate()?;
        let spec = config.layer_spec()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| EvolutionError::ThreadPool(e.to_string()))?;

        let population = (0..config.population_size)
            .map(|_| Network::new(&spec, config.network, &mut rng))
            .collect();

        info!(
            "evolving {} networks of shape {} ({} edges) against {} training data",
            config.population_size,
            spec,
            spec.edge_count(),
            training.len()
        );

        Ok(Self {
            config,
            spec,
            training,
            population,
            rng,
            pool,
            phase: Phase::Initializing,
            generation: 0,
            stagnation: 0,
            best_score: None,
            best_error: None,
        })
    }

    /// The run's configuration.
    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// The training set every member is scored against.
    #[must_use]
    pub fn training(&self) -> &TrainingSet {
        &self.training
    }

    /// The current generation, in rank order once ranked.
    #[must_use]
    pub fn population(&self) -> &[Network] {
        &self.population
    }

    /// Current pipeline phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the current generation.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Consecutive generations without improvement.
    #[must_use]
    pub fn stagnation(&self) -> u32 {
        self.stagnation
    }

    /// Per-edge mutation probability at the current stagnation.
    #[must_use]
    pub fn mutation_rate(&self) -> f64 {
        mutation_rate(&self.config.breeding, self.stagnation)
    }

    /// Swap in a population, e.g. one with hand-set weights.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::PopulationSize`] for the wrong member count
    /// and [`EvolutionError::Topology`] for members of a different shape.
    pub fn replace_population(&mut self, population: Vec<Network>) -> Result<(), EvolutionError> {
        if population.len() != self.config.population_size {
            return Err(EvolutionError::PopulationSize {
                expected: self.config.population_size,
                found: population.len(),
            });
        }
        if let Some(stranger) = population.iter().find(|n| *n.spec() != self.spec) {
            return Err(TopologyError::Layers {
                left: self.spec.clone(),
                right: stranger.spec().clone(),
            }
            .into());
        }
        self.population = population;
        Ok(())
    }

    /// Score every member against the training set in parallel.
    ///
    /// Returns once all members are scored, with the time it took.
    pub fn evaluate(&mut self) -> Duration {
        self.phase = Phase::Evaluating;
        let start = Instant::now();

        let training = &self.training;
        let scoring = &self.config.scoring;
        let population = &mut self.population;
        self.pool.install(|| {
            population.par_iter_mut().for_each(|network| {
                network.evaluate(training, scoring);
            });
        });

        start.elapsed()
    }

    /// Sort the population best-first and update the stagnation counter.
    ///
    /// Returns whether the best member improved on every earlier generation.
    pub fn rank(&mut self) -> bool {
        self.phase = Phase::Ranking;
        let rank_by = self.config.scoring.rank_by;
        self.population.sort_by(|a, b| a.rank_cmp(b, rank_by));

        let best = *self.population[0].scorecard();
        let improved = match rank_by {
            RankBy::Score => self.best_score.map_or(true, |score| best.score > score),
            RankBy::Error => self.best_error.map_or(true, |error| best.error < error),
        };

        if improved {
            if self.stagnation > 0 {
                debug!(
                    "generation {}: improvement after {} stagnant generations",
                    self.generation, self.stagnation
                );
            }
            self.stagnation = 0;
            self.best_score = Some(best.score);
            self.best_error = Some(best.error);
        } else {
            self.stagnation += 1;
        }
        improved
    }

    /// Whether the current stagnation calls for a culling pass.
    #[must_use]
    pub fn should_cull(&self) -> bool {
        let trigger = self.config.culling.trigger;
        let interval = self.config.culling.interval;
        let s = self.stagnation;
        s > 0 && (s == trigger || (s > trigger && interval > 0 && (s - trigger) % interval == 0))
    }

    /// Replace crowded members of the ranked population.
    ///
    /// Index 0 is never replaced. Any other member is replaced when it has
    /// more than `max_close_neighbors` members within `neighbor_distance`,
    /// lies within `duplicate_distance` of any member, or ties any
    /// unreplaced member's ranking error exactly. Replacements are bred from
    /// two random members ranked below the survivor band.
    ///
    /// Returns the number of members replaced.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Topology`] if members differ in shape.
    pub fn cull(&mut self) -> Result<usize, EvolutionError> {
        self.phase = Phase::Culling;
        let n = self.population.len();
        if n < 2 {
            return Ok(0);
        }

        let culling = self.config.culling;
        let policy = self.config.breeding.policy;
        let rate = self.mutation_rate();
        let band = self.config.survivors.min(n - 1)..n;

        let mut prints: Vec<Fingerprint> =
            self.population.iter().map(Network::fingerprint).collect();
        let mut fresh = vec![false; n];
        let mut replaced = 0;

        for i in 1..n {
            let mut close = 0;
            let mut duplicate = false;
            for j in (0..n).filter(|&j| j != i) {
                let distance = prints[i].distance(&prints[j])?;
                let tied = !fresh[i]
                    && !fresh[j]
                    && self.population[i].scorecard().error == self.population[j].scorecard().error;
                if distance <= culling.duplicate_distance || tied {
                    duplicate = true;
                    break;
                }
                if distance <= culling.neighbor_distance {
                    close += 1;
                }
            }

            if duplicate || close > culling.max_close_neighbors {
                let father = self.rng.random_range(band.clone());
                let mother = self.rng.random_range(band.clone());
                let child = breed(
                    &self.population[father],
                    &self.population[mother],
                    policy,
                    rate,
                    &mut self.rng,
                )?;
                prints[i] = child.fingerprint();
                self.population[i] = child;
                fresh[i] = true;
                replaced += 1;
            }
        }

        debug!(
            "generation {}: culled {} of {} members",
            self.generation, replaced, n
        );
        Ok(replaced)
    }

    /// Replace the ranked population with the next generation.
    ///
    /// The next generation is, in order: the best member unchanged, the
    /// pairwise grid over the top `survivors`, `random_pair_offspring`
    /// children of random survivor pairs, then fresh random networks up to
    /// the population size.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Topology`] if members differ in shape.
    pub fn breed(&mut self) -> Result<(), EvolutionError> {
        self.phase = Phase::Breeding;
        let size = self.config.population_size;
        let survivors = self.config.survivors.min(self.population.len());
        let policy = self.config.breeding.policy;
        let rate = self.mutation_rate();

        let mut next = Vec::with_capacity(size);
        next.push(self.population[0].clone());

        'grid: for father in 0..survivors {
            for mother in 0..survivors {
                if next.len() >= size {
                    break 'grid;
                }
                next.push(breed(
                    &self.population[father],
                    &self.population[mother],
                    policy,
                    rate,
                    &mut self.rng,
                )?);
            }
        }

        let mut random_pairs = self.config.breeding.random_pair_offspring;
        while next.len() < size && random_pairs > 0 && survivors > 0 {
            let father = self.rng.random_range(0..survivors);
            let mother = self.rng.random_range(0..survivors);
            next.push(breed(
                &self.population[father],
                &self.population[mother],
                policy,
                rate,
                &mut self.rng,
            )?);
            random_pairs -= 1;
        }

        while next.len() < size {
            next.push(Network::new(&self.spec, self.config.network, &mut self.rng));
        }

        self.population = next;
        self.generation += 1;
        Ok(())
    }

    /// Highest match count in the population; first member wins ties.
    #[must_use]
    pub fn winner(&self) -> Option<&Network> {
        self.population
            .iter()
            .reduce(|best, network| if network.score() > best.score() { network } else { best })
    }

    /// Run every generation, logging one report per generation.
    ///
    /// # Errors
    ///
    /// As [`run_with`](Self::run_with).
    pub fn run(&mut self) -> Result<Network, EvolutionError> {
        self.run_with(|report| info!("{}", report))
    }

    /// Run every generation, handing each report to `on_generation`.
    ///
    /// Returns a copy of the winner of the final generation.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Topology`] if breeding meets mismatched
    /// members, which only happens after an invalid `replace_population`.
    pub fn run_with<F>(&mut self, mut on_generation: F) -> Result<Network, EvolutionError>
    where
        F: FnMut(&GenerationReport),
    {
        let started = Instant::now();
        let generations = self.config.generations;

        for round in 0..generations {
            let propagation_time = self.evaluate();
            let breeding_start = Instant::now();
            self.rank();
            let best = *self.population[0].scorecard();
            let stagnation = self.stagnation;
            let generation = self.generation;

            if round + 1 < generations {
                if self.should_cull() {
                    self.cull()?;
                }
                self.breed()?;
            }

            let report = self.report(
                generation,
                &best,
                stagnation,
                started.elapsed(),
                propagation_time,
                breeding_start.elapsed(),
            );
            on_generation(&report);
        }

        self.phase = Phase::Terminated;
        let winner = self
            .winner()
            .cloned()
            .ok_or(EvolutionError::Config(ConfigError::EmptyPopulation))?;
        if winner.score() == 0 {
            warn!(
                "no network matched any of the {} training data after {} generations",
                self.training.len(),
                generations
            );
        }
        Ok(winner)
    }

    fn report(
        &self,
        generation: u32,
        best: &Scorecard,
        stagnation: u32,
        elapsed: Duration,
        propagation_time: Duration,
        breeding_time: Duration,
    ) -> GenerationReport {
        GenerationReport {
            generation,
            elapsed,
            propagation_time,
            breeding_time,
            best_score: best.score,
            training_size: self.training.len(),
            sum_squares: best.sum_squares,
            sum_roots: best.sum_roots,
            custom: best.custom,
            stagnation,
        }
    }
}
