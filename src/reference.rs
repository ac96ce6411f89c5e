use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::error::{PreprocessError, Result};

#[derive(Debug, Clone)]
enum Column {
    Numeric(Vec<f64>),
    Text,
}

/// Historical records used only to derive standardization statistics.
///
/// Columns keep their header order. A column is numeric when every cell
/// parses as a finite `f64`; other columns are remembered by name so lookups
/// can tell "absent" from "not numeric".
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    records: usize,
}

impl ReferenceDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Self::from_reader(File::open(path)?)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            columns = dataset.names.len(),
            "loaded reference dataset"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let names: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut values: Vec<Option<Vec<f64>>> = vec![Some(Vec::new()); names.len()];
        let mut records = 0;

        for record in reader.into_records() {
            let record = record?;
            for (column, field) in values.iter_mut().zip(record.iter()) {
                match field.parse::<f64>() {
                    Ok(v) if v.is_finite() => {
                        if let Some(cells) = column {
                            cells.push(v);
                        }
                    }
                    _ => *column = None,
                }
            }
            records += 1;
        }

        let mut columns = HashMap::with_capacity(names.len());
        for (name, cells) in names.iter().zip(values) {
            let column = match cells {
                Some(cells) => Column::Numeric(cells),
                None => {
                    debug!(column = %name, "column is not numeric");
                    Column::Text
                }
            };
            if columns.insert(name.clone(), column).is_some() {
                return Err(PreprocessError::DuplicateColumn(name.clone()));
            }
        }

        Ok(ReferenceDataset {
            names,
            columns,
            records,
        })
    }

    /// Builds a dataset from in-memory columns. A column holding NaN or
    /// infinity is kept as non-numeric.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut map = HashMap::new();
        let mut records = None;

        for (name, cells) in columns {
            let name = name.into();
            let expected = *records.get_or_insert(cells.len());
            if cells.len() != expected {
                return Err(PreprocessError::RaggedColumns {
                    name,
                    expected,
                    found: cells.len(),
                });
            }
            if map.contains_key(&name) {
                return Err(PreprocessError::DuplicateColumn(name));
            }
            let column = if cells.iter().all(|v| v.is_finite()) {
                Column::Numeric(cells)
            } else {
                Column::Text
            };
            map.insert(name.clone(), column);
            names.push(name);
        }

        Ok(ReferenceDataset {
            names,
            columns: map,
            records: records.unwrap_or(0),
        })
    }

    pub fn column(&self, name: &str) -> Result<&[f64]> {
        match self.columns.get(name) {
            Some(Column::Numeric(cells)) => Ok(cells),
            Some(Column::Text) => Err(PreprocessError::NonNumericFeature(name.to_string())),
            None => Err(PreprocessError::UnknownFeature(name.to_string())),
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|name| matches!(self.columns.get(name.as_str()), Some(Column::Numeric(_))))
            .map(String::as_str)
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}
