use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("feature '{0}' is not numeric in the reference dataset")]
    NonNumericFeature(String),

    #[error("degenerate feature '{name}': standard deviation {std_dev} is at or below the tolerance")]
    DegenerateFeature { name: String, std_dev: f64 },

    #[error("feature '{0}' has no reference values")]
    EmptyFeature(String),

    #[error("length mismatch: {names} feature names but {values} values")]
    LengthMismatch { names: usize, values: usize },

    #[error("non-finite input for feature '{name}': {value}")]
    NonFiniteInput { name: String, value: f64 },

    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("column '{name}' has {found} values, expected {expected}")]
    RaggedColumns {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("missing form field: {0}")]
    MissingField(String),

    #[error("invalid value for form field '{field}': {value:?}")]
    InvalidField { field: String, value: String },

    #[error("standardizer features {found:?} do not match expected {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("model error: {0}")]
    Model(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
