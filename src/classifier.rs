use tracing::warn;

use crate::error::{PreprocessError, Result};

/// A trained model that consumes standardized feature vectors.
pub trait Classifier: Send + Sync {
    /// Predicted class index.
    fn predict(&self, features: &[f64]) -> Result<usize>;

    /// Probability of each class, indexed by class.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: usize,
    /// Probability the classifier assigns to `label`.
    pub probability: f64,
}

impl Prediction {
    pub fn from_classifier<C: Classifier + ?Sized>(classifier: &C, features: &[f64]) -> Result<Self> {
        let label = classifier.predict(features)?;
        let proba = classifier.predict_proba(features)?;

        if let Some(p) = proba.iter().find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0) {
            return Err(PreprocessError::Model(format!("invalid class probability {p}")));
        }

        let probability = *proba.get(label).ok_or_else(|| {
            PreprocessError::Model(format!(
                "predicted label {label} outside {} class probabilities",
                proba.len()
            ))
        })?;

        let best = proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        if best != Some(label) {
            warn!(label, argmax = ?best, "predicted label is not the most probable class");
        }

        Ok(Prediction { label, probability })
    }
}
