use std::{collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

/// Clinical measurements submitted for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientForm {
    pub ejection_fraction: i64,
    pub serum_creatinine: f64,
    pub age: f64,
    pub creatinine_phosphokinase: i64,
    pub platelets: f64,
    pub serum_sodium: i64,
    pub sex: i64,
}

impl PatientForm {
    /// Feature order of [`PatientForm::to_feature_vector`].
    pub const FEATURE_NAMES: [&'static str; 7] = [
        "ejection_fraction",
        "serum_creatinine",
        "age",
        "creatinine_phosphokinase",
        "platelets",
        "serum_sodium",
        "sex",
    ];

    /// Parses raw form fields. Every field is required.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self> {
        let form = PatientForm {
            ejection_fraction: parse_field(fields, "ejection_fraction")?,
            serum_creatinine: parse_float(fields, "serum_creatinine")?,
            age: parse_float(fields, "age")?,
            creatinine_phosphokinase: parse_field(fields, "creatinine_phosphokinase")?,
            platelets: parse_float(fields, "platelets")?,
            serum_sodium: parse_field(fields, "serum_sodium")?,
            sex: parse_field(fields, "sex")?,
        };

        if !matches!(form.sex, 0 | 1) {
            return Err(PreprocessError::InvalidField {
                field: "sex".to_string(),
                value: form.sex.to_string(),
            });
        }

        Ok(form)
    }

    pub fn to_feature_vector(&self) -> Vec<f64> {
        vec![
            self.ejection_fraction as f64,
            self.serum_creatinine,
            self.age,
            self.creatinine_phosphokinase as f64,
            self.platelets,
            self.serum_sodium as f64,
            self.sex as f64,
        ]
    }
}

fn parse_field<T: FromStr>(fields: &HashMap<String, String>, name: &str) -> Result<T> {
    let raw = fields
        .get(name)
        .ok_or_else(|| PreprocessError::MissingField(name.to_string()))?;

    raw.trim().parse::<T>().map_err(|_| PreprocessError::InvalidField {
        field: name.to_string(),
        value: raw.clone(),
    })
}

fn parse_float(fields: &HashMap<String, String>, name: &str) -> Result<f64> {
    let value: f64 = parse_field(fields, name)?;
    if !value.is_finite() {
        return Err(PreprocessError::InvalidField {
            field: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}
