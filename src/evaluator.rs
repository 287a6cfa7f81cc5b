//! Scoring a network against a training set.
//!
//! Each datum is run through a full pass (reset, seed inputs, propagate,
//! read consensus). The winning output index is mapped onto the expected
//! value's scale with a fixed linear transform, and the absolute error
//! either counts as a match or feeds the error accumulators.
//!
//! Evaluation touches only the network being scored and the shared,
//! read-only training set, so networks can be evaluated concurrently.

use crate::config::ScoringConfig;
use crate::network::{Network, Scorecard};
use crate::training::{TrainingDatum, TrainingSet};

/// Linear map from an output-node index to a comparable scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputMapping {
    /// Change in output value per output-node index.
    pub slope: f64,
    /// Output value of index 0.
    pub intercept: f64,
}

impl OutputMapping {
    /// Spread `output_nodes` evenly across `[output_min, output_max]`.
    ///
    /// A single output node always maps to `output_min`.
    #[must_use]
    pub fn new(scoring: &ScoringConfig, output_nodes: usize) -> Self {
        let slope = if output_nodes > 1 {
            (scoring.output_max - scoring.output_min) / (output_nodes - 1) as f64
        } else {
            0.0
        };
        Self {
            slope,
            intercept: scoring.output_min,
        }
    }

    /// Scalar value of an output-node index.
    #[inline]
    #[must_use]
    pub fn map(&self, index: usize) -> f64 {
        self.slope.mul_add(index as f64, self.intercept)
    }
}

impl Network {
    /// Run one datum through the network and return the absolute error.
    pub fn trial(&mut self, datum: &TrainingDatum, mapping: &OutputMapping) -> f64 {
        self.reset();
        self.set_inputs(datum.inputs());
        self.propagate();
        let consensus = self.read_consensus();
        (mapping.map(consensus.index) - datum.expected()).abs()
    }

    /// Score the network against every datum, in training order.
    ///
    /// Clears the previous scores first; on return the scorecard holds the
    /// match count, the three error sums, the average confidence and the
    /// ranking error selected by `scoring.error_metric`.
    pub fn evaluate(&mut self, training: &TrainingSet, scoring: &ScoringConfig) -> &Scorecard {
        let mapping = OutputMapping::new(scoring, self.spec.output_size());
        self.clear_score();
        for datum in training {
            let error = self.trial(datum, &mapping);
            let confidence = self.consensus.confidence;
            self.scorecard_mut().record(error, confidence, scoring.resolution);
        }
        self.scorecard_mut()
            .finish(training.len(), scoring.error_metric);
        &self.scorecard
    }
}
