//! Feature standardization against reference statistics.
//!
//! Output `i` is `(input[i] - mean(column_i)) / std_dev(column_i)` where
//! `column_i` is the reference column named by `feature_names[i]` and the
//! standard deviation is the population one. Zero-variance columns are
//! rejected instead of producing NaN or infinity.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{PreprocessError, Result};
use crate::reference::ReferenceDataset;
use crate::scalers::StandardScaler;

/// Standard deviations at or below this, relative to `max(|mean|, 1)`,
/// are treated as zero.
pub const DEFAULT_DEGENERATE_TOLERANCE: f64 = 1e-10;

/// Reference statistics for one named feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStats {
    pub name: String,
    scaler: StandardScaler,
}

impl FeatureStats {
    pub fn mean(&self) -> f64 {
        self.scaler.mean()
    }

    pub fn std_dev(&self) -> f64 {
        self.scaler.std_dev()
    }
}

/// Per-feature scalers fitted once from a reference dataset.
///
/// Immutable after fitting; share it behind an `Arc` to standardize many
/// requests against the same reference.
#[derive(Debug, Clone)]
pub struct FeatureStandardizer {
    stats: Vec<FeatureStats>,
}

impl FeatureStandardizer {
    pub fn fit<S>(dataset: &ReferenceDataset, feature_names: &[S]) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        Self::with_tolerance(dataset, feature_names, DEFAULT_DEGENERATE_TOLERANCE)
    }

    pub fn with_tolerance<S>(
        dataset: &ReferenceDataset,
        feature_names: &[S],
        tolerance: f64,
    ) -> Result<Self>
    where
        S: AsRef<str> + Sync,
    {
        let stats = feature_names
            .par_iter()
            .map(|name| {
                let name = name.as_ref();
                let scaler = StandardScaler::fit(name, dataset.column(name)?)?;
                if scaler.is_degenerate(tolerance) {
                    return Err(PreprocessError::DegenerateFeature {
                        name: name.to_string(),
                        std_dev: scaler.std_dev(),
                    });
                }
                debug!(
                    feature = name,
                    mean = scaler.mean(),
                    std_dev = scaler.std_dev(),
                    "fitted feature"
                );
                Ok(FeatureStats {
                    name: name.to_string(),
                    scaler,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FeatureStandardizer { stats })
    }

    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.apply(input, StandardScaler::transform)
    }

    /// Maps standardized values back to raw feature units.
    pub fn inverse_transform(&self, standardized: &[f64]) -> Result<Vec<f64>> {
        self.apply(standardized, StandardScaler::inverse_transform)
    }

    fn apply(&self, values: &[f64], f: fn(&StandardScaler, f64) -> f64) -> Result<Vec<f64>> {
        if values.len() != self.stats.len() {
            return Err(PreprocessError::LengthMismatch {
                names: self.stats.len(),
                values: values.len(),
            });
        }

        self.stats
            .iter()
            .zip(values)
            .map(|(stat, &value)| {
                if !value.is_finite() {
                    return Err(PreprocessError::NonFiniteInput {
                        name: stat.name.clone(),
                        value,
                    });
                }
                Ok(f(&stat.scaler, value))
            })
            .collect()
    }

    pub fn stats(&self) -> &[FeatureStats] {
        &self.stats
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.stats.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// One-shot standardization of `input_features` against `dataset`.
pub fn standardize_features<S>(
    dataset: &ReferenceDataset,
    feature_names: &[S],
    input_features: &[f64],
) -> Result<Vec<f64>>
where
    S: AsRef<str> + Sync,
{
    if feature_names.len() != input_features.len() {
        return Err(PreprocessError::LengthMismatch {
            names: feature_names.len(),
            values: input_features.len(),
        });
    }

    FeatureStandardizer::fit(dataset, feature_names)?.transform(input_features)
}
