//! TOML configuration. Every section is optional.
//!
//! ```toml
//! [reference]
//! path = "data/heart_failure_clinical_records_dataset.csv"
//!
//! [features]
//! names = ["ejection_fraction", "serum_creatinine", "age"]
//!
//! [standardization]
//! degenerate_tolerance = 1e-10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PreprocessError, Result};
use crate::form::PatientForm;
use crate::standardize::DEFAULT_DEGENERATE_TOLERANCE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub standardization: StandardizationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_feature_names")]
    pub names: Vec<String>,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            names: default_feature_names(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardizationConfig {
    #[serde(default = "default_degenerate_tolerance")]
    pub degenerate_tolerance: f64,
}

impl Default for StandardizationConfig {
    fn default() -> Self {
        Self {
            degenerate_tolerance: default_degenerate_tolerance(),
        }
    }
}

fn default_feature_names() -> Vec<String> {
    PatientForm::FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_degenerate_tolerance() -> f64 {
    DEFAULT_DEGENERATE_TOLERANCE
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.features.names.is_empty() {
            return Err(PreprocessError::Config("features.names is empty".to_string()));
        }
        let tol = self.standardization.degenerate_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(PreprocessError::Config(format!(
                "standardization.degenerate_tolerance must be a non-negative number, got {tol}"
            )));
        }
        Ok(())
    }
}
