//! Training data.
//!
//! The corpus is produced outside the engine and handed over once, before
//! the first generation. It is never mutated afterwards, so evaluation
//! workers share it by reference.

use serde::{Deserialize, Serialize};

/// One input sequence and the output it should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDatum {
    expected: f64,
    inputs: Vec<f32>,
}

impl TrainingDatum {
    /// Create a datum.
    #[must_use]
    pub fn new(expected: f64, inputs: Vec<f32>) -> Self {
        Self { expected, inputs }
    }

    /// The value a perfect network's mapped consensus would equal.
    #[must_use]
    pub fn expected(&self) -> f64 {
        self.expected
    }

    /// Input activations, first input node first.
    #[must_use]
    pub fn inputs(&self) -> &[f32] {
        &self.inputs
    }
}

/// An ordered, non-empty, immutable sequence of training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrainingDatum>", into = "Vec<TrainingDatum>")]
pub struct TrainingSet {
    data: Vec<TrainingDatum>,
}

impl TrainingSet {
    /// Validate and wrap a corpus.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::EmptyTrainingSet`] for an empty corpus and
    /// [`TrainingError::EmptyInputs`] for a datum without inputs.
    pub fn new(data: Vec<TrainingDatum>) -> Result<Self, TrainingError> {
        if data.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if let Some(index) = data.iter().position(|d| d.inputs.is_empty()) {
            return Err(TrainingError::EmptyInputs { index });
        }
        Ok(Self { data })
    }

    /// Build a corpus from `(expected, inputs)` pairs.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn from_pairs<I>(pairs: I) -> Result<Self, TrainingError>
    where
        I: IntoIterator<Item = (f64, Vec<f32>)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(expected, inputs)| TrainingDatum::new(expected, inputs))
                .collect(),
        )
    }

    /// Number of data. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the set holds no data. A set built through
    /// [`new`](Self::new) never does.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Data in training order.
    pub fn iter(&self) -> std::slice::Iter<'_, TrainingDatum> {
        self.data.iter()
    }
}

impl<'a> IntoIterator for &'a TrainingSet {
    type Item = &'a TrainingDatum;
    type IntoIter = std::slice::Iter<'a, TrainingDatum>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl TryFrom<Vec<TrainingDatum>> for TrainingSet {
    type Error = TrainingError;

    fn try_from(data: Vec<TrainingDatum>) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<TrainingSet> for Vec<TrainingDatum> {
    fn from(set: TrainingSet) -> Self {
        set.data
    }
}

/// A corpus that cannot be evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingError {
    /// No data at all.
    EmptyTrainingSet,
    /// The datum at `index` has no inputs.
    EmptyInputs {
        /// Position of the offending datum.
        index: usize,
    },
}

impl std::fmt::Display for TrainingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingError::EmptyTrainingSet => write!(f, "training set is empty"),
            TrainingError::EmptyInputs { index } => {
                write!(f, "training datum {} has no inputs", index)
            }
        }
    }
}

impl std::error::Error for TrainingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_preserves_order() {
        let set = TrainingSet::from_pairs(vec![(0.0, vec![0.0, 0.0]), (1.0, vec![1.0, 1.0])])
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        let expected: Vec<f64> = set.iter().map(TrainingDatum::expected).collect();
        assert_eq!(expected, vec![0.0, 1.0]);
        assert_eq!(set.iter().nth(1).unwrap().inputs(), &[1.0, 1.0]);
    }

    #[test]
    fn test_rejects_empty_set() {
        assert_eq!(TrainingSet::new(vec![]), Err(TrainingError::EmptyTrainingSet));
    }

    #[test]
    fn test_rejects_empty_inputs() {
        let err = TrainingSet::from_pairs(vec![(0.0, vec![1.0]), (1.0, vec![])]).unwrap_err();
        assert_eq!(err, TrainingError::EmptyInputs { index: 1 });
        assert!(err.to_string().contains("datum 1"));
    }

    #[test]
    fn test_json_validates() {
        let json = r#"[{ "expected": 1.0, "inputs": [0.5, 0.5] }]"#;
        let set: TrainingSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 1);
        assert!(serde_json::from_str::<TrainingSet>("[]").is_err());
    }
}
