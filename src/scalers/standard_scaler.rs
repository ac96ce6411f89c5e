use crate::error::{PreprocessError, Result};

/// Z-score scaler for a single reference column.
///
/// Holds the column mean and its population standard deviation (divisor `n`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    std_dev: f64,
    constant: bool,
}

impl StandardScaler {
    pub fn fit(name: &str, data: &[f64]) -> Result<Self> {
        if data.is_empty() {
            return Err(PreprocessError::EmptyFeature(name.to_string()));
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let var = data.iter().map(|&value| (value - mean).powi(2)).sum::<f64>() / n;
        let std_dev = var.sqrt();
        // the two-pass mean of a constant column is not exact, so compare the cells
        let constant = data.iter().all(|&value| value == data[0]);

        Ok(StandardScaler {
            mean,
            std_dev,
            constant,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// True for constant columns, or when the standard deviation is at or
    /// below `tolerance` relative to the magnitude of the mean (at least 1).
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.constant
            || !self.std_dev.is_finite()
            || self.std_dev <= tolerance * self.mean.abs().max(1.0)
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }

    pub fn inverse_transform(&self, value: f64) -> f64 {
        value * self.std_dev + self.mean
    }
}
