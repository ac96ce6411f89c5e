use std::sync::Arc;

use tracing::debug;

use crate::classifier::{Classifier, Prediction};
use crate::error::{PreprocessError, Result};
use crate::form::PatientForm;
use crate::standardize::FeatureStandardizer;

/// Standardizes patient forms and hands them to a classifier.
///
/// The standardizer is shared, never copied, between clones.
#[derive(Debug)]
pub struct Predictor<C> {
    standardizer: Arc<FeatureStandardizer>,
    classifier: Arc<C>,
}

impl<C> Clone for Predictor<C> {
    fn clone(&self) -> Self {
        Predictor {
            standardizer: Arc::clone(&self.standardizer),
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<C: Classifier> Predictor<C> {
    /// `standardizer` must be fitted on [`PatientForm::FEATURE_NAMES`], in order.
    pub fn new(standardizer: Arc<FeatureStandardizer>, classifier: C) -> Result<Self> {
        let found = standardizer.feature_names();
        if found != PatientForm::FEATURE_NAMES {
            return Err(PreprocessError::FeatureOrder {
                expected: PatientForm::FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: found.into_iter().map(String::from).collect(),
            });
        }

        Ok(Predictor {
            standardizer,
            classifier: Arc::new(classifier),
        })
    }

    pub fn standardizer(&self) -> &FeatureStandardizer {
        &self.standardizer
    }

    pub fn predict_form(&self, form: &PatientForm) -> Result<Prediction> {
        self.predict_vector(&form.to_feature_vector())
    }

    pub fn predict_vector(&self, raw: &[f64]) -> Result<Prediction> {
        let standardized = self.standardizer.transform(raw)?;
        let prediction = Prediction::from_classifier(self.classifier.as_ref(), &standardized)?;
        debug!(
            label = prediction.label,
            probability = prediction.probability,
            "prediction"
        );
        Ok(prediction)
    }
}
