use std::{collections::HashMap, error::Error, path::PathBuf, time::Instant};

use clap::{Parser, Subcommand};
use heart_failure_preprocess::{
    Config, FeatureStandardizer, PatientForm, PreprocessError, ReferenceDataset,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "heart_failure_preprocess")]
#[command(version)]
#[command(about = "Standardize heart-failure features against a reference dataset", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print reference mean and standard deviation per feature
    Stats {
        /// Reference CSV (overrides reference.path)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Comma-separated feature names (overrides features.names)
        #[arg(short, long, value_delimiter = ',')]
        features: Option<Vec<String>>,
    },

    /// Standardize raw values given in feature order
    Standardize {
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(short, long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Comma-separated raw values
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        values: Vec<f64>,
    },

    /// Parse the patient form fields and standardize them
    Form {
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Form field as name=value, repeated for every field
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heart_failure_preprocess=info")),
        )
        .init();

    let now = Instant::now();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Stats { data, features } => {
            let dataset = load_reference(data, &config)?;
            let names = features.unwrap_or_else(|| config.features.names.clone());
            let standardizer = fit(&dataset, &names, &config)?;

            println!("{} reference records", dataset.len());
            println!("{:<28} {:>14} {:>14}", "feature", "mean", "std");
            for stat in standardizer.stats() {
                println!("{:<28} {:>14.4} {:>14.4}", stat.name, stat.mean(), stat.std_dev());
            }
        }

        Commands::Standardize {
            data,
            features,
            values,
        } => {
            let dataset = load_reference(data, &config)?;
            let names = features.unwrap_or_else(|| config.features.names.clone());
            if names.len() != values.len() {
                return Err(PreprocessError::LengthMismatch {
                    names: names.len(),
                    values: values.len(),
                }
                .into());
            }
            let standardized = fit(&dataset, &names, &config)?.transform(&values)?;
            print_vector(&names, &standardized);
        }

        Commands::Form { data, fields } => {
            let fields: HashMap<String, String> = fields.into_iter().collect();
            let form = PatientForm::from_fields(&fields)?;
            let dataset = load_reference(data, &config)?;
            let standardized =
                fit(&dataset, &PatientForm::FEATURE_NAMES, &config)?.transform(&form.to_feature_vector())?;
            print_vector(&PatientForm::FEATURE_NAMES, &standardized);
        }
    }

    let elapsed = now.elapsed();
    info!("Elapsed: {:.2?}", elapsed);
    Ok(())
}

fn load_reference(data: Option<PathBuf>, config: &Config) -> Result<ReferenceDataset, PreprocessError> {
    let path = data
        .or_else(|| config.reference.path.clone())
        .ok_or_else(|| {
            PreprocessError::Config("no reference dataset: pass --data or set reference.path".to_string())
        })?;
    ReferenceDataset::from_path(path)
}

fn fit<S: AsRef<str> + Sync>(
    dataset: &ReferenceDataset,
    names: &[S],
    config: &Config,
) -> Result<FeatureStandardizer, PreprocessError> {
    FeatureStandardizer::with_tolerance(dataset, names, config.standardization.degenerate_tolerance)
}

fn print_vector<S: AsRef<str>>(names: &[S], values: &[f64]) {
    for (name, value) in names.iter().zip(values) {
        println!("{:<28} {:>12.6}", name.as_ref(), value);
    }
}
