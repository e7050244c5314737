//! Post-processing of the model's probability vector

use crate::labels::{ClassKey, ClassLabels};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Round to exactly two decimal places, halves to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Probability in [0, 1] as a percentage rounded to two decimals
pub fn to_percentage(probability: f32) -> f64 {
    round2(f64::from(probability) * 100.0)
}

/// Display label -> percentage, kept in class-key order when serialized
#[derive(Debug, Clone, PartialEq)]
pub struct Probabilities(Vec<(ClassKey, f64)>);

impl Probabilities {
    pub fn iter(&self) -> impl Iterator<Item = (ClassKey, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn get(&self, key: ClassKey) -> Option<f64> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key.display_label(), value)?;
        }
        map.end()
    }
}

/// Outcome of a single classification
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub top_class: ClassKey,
    /// Top-class probability as a percentage, two decimals
    pub confidence: f64,
    pub probabilities: Probabilities,
}

impl Prediction {
    /// Interpret `scores` positionally against `labels`.
    ///
    /// Ties resolve to the earliest index. Returns `None` when the vector
    /// length does not match the label count.
    pub fn from_scores(scores: &[f32], labels: &ClassLabels) -> Option<Self> {
        if scores.len() != labels.len() || scores.is_empty() {
            return None;
        }

        let mut top_idx = 0;
        for (idx, score) in scores.iter().enumerate().skip(1) {
            // strict comparison keeps the first maximum
            if *score > scores[top_idx] {
                top_idx = idx;
            }
        }

        let probabilities = labels
            .iter()
            .zip(scores)
            .map(|(key, score)| (key, to_percentage(*score)))
            .collect();

        Some(Self {
            top_class: labels.get(top_idx)?,
            confidence: to_percentage(scores[top_idx]),
            probabilities: Probabilities(probabilities),
        })
    }
}
