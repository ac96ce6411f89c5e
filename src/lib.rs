//! Standardization of clinical feature vectors for heart-failure prediction.
//!
//! Raw measurements are standardized against the mean and population
//! standard deviation of a reference dataset before they reach a classifier.

pub mod classifier;
pub mod config;
pub mod error;
pub mod form;
pub mod pipeline;
pub mod reference;
pub mod scalers;
pub mod standardize;

pub use classifier::{Classifier, Prediction};
pub use config::Config;
pub use error::{PreprocessError, Result};
pub use form::PatientForm;
pub use pipeline::Predictor;
pub use reference::ReferenceDataset;
pub use standardize::{standardize_features, FeatureStandardizer, FeatureStats};
