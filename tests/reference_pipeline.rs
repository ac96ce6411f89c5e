use std::{collections::HashMap, io::Write, sync::Arc};

use approx::assert_relative_eq;
use heart_failure_preprocess::{
    standardize_features, Classifier, Config, FeatureStandardizer, PatientForm, PreprocessError,
    Predictor, ReferenceDataset, Result,
};
use tempfile::NamedTempFile;

// A slice of the heart failure clinical records layout, including the
// columns the form does not use.
const RECORDS: &str = "\
age,anaemia,creatinine_phosphokinase,diabetes,ejection_fraction,high_blood_pressure,platelets,serum_creatinine,serum_sodium,sex,smoking,time,DEATH_EVENT
75,0,582,0,20,1,265000,1.9,130,1,0,4,1
55,0,7861,0,38,0,263358.03,1.1,136,1,0,6,1
65,0,146,0,20,0,162000,1.3,129,1,1,7,1
50,1,111,0,20,0,210000,1.9,137,1,0,7,1
65,1,160,1,20,0,327000,2.7,116,0,0,8,1
90,1,47,0,40,1,204000,2.1,132,1,1,8,1
75,1,246,0,15,0,127000,1.2,137,1,0,10,1
60,1,315,1,60,0,454000,1.1,131,1,1,10,1
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

struct Logistic {
    weights: Vec<f64>,
}

impl Classifier for Logistic {
    fn predict(&self, features: &[f64]) -> Result<usize> {
        Ok(usize::from(self.predict_proba(features)?[1] >= 0.5))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let z: f64 = self.weights.iter().zip(features).map(|(w, x)| w * x).sum();
        let p = 1.0 / (1.0 + (-z).exp());
        Ok(vec![1.0 - p, p])
    }
}

#[test]
fn standardizes_against_csv_reference() {
    let file = write_temp(RECORDS);
    let dataset = ReferenceDataset::from_path(file.path()).unwrap();
    assert_eq!(dataset.len(), 8);

    let ages = dataset.column("age").unwrap();
    let (mean, std) = mean_std(ages);

    let out = standardize_features(&dataset, &["age"], &[mean + 2.0 * std]).unwrap();
    assert_relative_eq!(out[0], 2.0, epsilon = 1e-9);
}

#[test]
fn unknown_column_returns_no_partial_result() {
    let dataset = ReferenceDataset::from_reader(RECORDS.as_bytes()).unwrap();
    let result = standardize_features(&dataset, &["age", "unknown_feature"], &[60.0, 1.0]);
    assert!(matches!(
        result,
        Err(PreprocessError::UnknownFeature(name)) if name == "unknown_feature"
    ));
}

#[test]
fn constant_reference_column_is_degenerate() {
    // diabetes varies, DEATH_EVENT is constant in this slice
    let dataset = ReferenceDataset::from_reader(RECORDS.as_bytes()).unwrap();
    assert!(standardize_features(&dataset, &["diabetes"], &[1.0]).is_ok());

    let result = standardize_features(&dataset, &["DEATH_EVENT"], &[1.0]);
    assert!(matches!(
        result,
        Err(PreprocessError::DegenerateFeature { name, .. }) if name == "DEATH_EVENT"
    ));
}

#[test]
fn config_drives_feature_selection() {
    let csv = write_temp(RECORDS);
    let toml = write_temp(&format!(
        "[reference]\npath = {:?}\n\n[features]\nnames = [\"serum_sodium\", \"age\"]\n",
        csv.path().display().to_string()
    ));

    let config = Config::load(toml.path()).unwrap();
    let path = config.reference.path.as_ref().unwrap();
    let dataset = ReferenceDataset::from_path(path).unwrap();
    let standardizer = FeatureStandardizer::with_tolerance(
        &dataset,
        &config.features.names,
        config.standardization.degenerate_tolerance,
    )
    .unwrap();

    assert_eq!(standardizer.feature_names(), vec!["serum_sodium", "age"]);
    let (sodium_mean, _) = mean_std(dataset.column("serum_sodium").unwrap());
    let (age_mean, _) = mean_std(dataset.column("age").unwrap());
    let out = standardizer.transform(&[sodium_mean, age_mean]).unwrap();
    assert_relative_eq!(out[0], 0.0, epsilon = 1e-9);
    assert_relative_eq!(out[1], 0.0, epsilon = 1e-9);
}

#[test]
fn form_to_prediction() {
    let dataset = ReferenceDataset::from_reader(RECORDS.as_bytes()).unwrap();
    let standardizer =
        Arc::new(FeatureStandardizer::fit(&dataset, &PatientForm::FEATURE_NAMES).unwrap());

    // only age carries weight
    let model = Logistic {
        weights: vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    };
    let predictor = Predictor::new(Arc::clone(&standardizer), model).unwrap();

    let (age_mean, age_std) = mean_std(dataset.column("age").unwrap());
    let fields: HashMap<String, String> = [
        ("ejection_fraction", "38".to_string()),
        ("serum_creatinine", "1.1".to_string()),
        ("age", (age_mean + age_std).to_string()),
        ("creatinine_phosphokinase", "582".to_string()),
        ("platelets", "265000".to_string()),
        ("serum_sodium", "136".to_string()),
        ("sex", "0".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let form = PatientForm::from_fields(&fields).unwrap();
    let prediction = predictor.predict_form(&form).unwrap();

    assert_eq!(prediction.label, 1);
    assert_relative_eq!(prediction.probability, 1.0 / (1.0 + (-1.0f64).exp()), epsilon = 1e-9);
}

#[test]
fn standardizer_is_shareable_across_threads() {
    let dataset = ReferenceDataset::from_reader(RECORDS.as_bytes()).unwrap();
    let standardizer = Arc::new(FeatureStandardizer::fit(&dataset, &["age", "platelets"]).unwrap());
    let expected = standardizer.transform(&[70.0, 250000.0]).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let standardizer = Arc::clone(&standardizer);
            std::thread::spawn(move || standardizer.transform(&[70.0, 250000.0]).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
