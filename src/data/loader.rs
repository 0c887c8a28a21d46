//! Data Loader Module
//! Reads and writes the JSON fixture files, and loads external CSV tables with Polars.

use crate::data::records::{Allocation, Dataset, Person, RevenueRow, TableRow, UtilizationRow};
use indexmap::IndexMap;
use polars::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const PEOPLE_FILE: &str = "users.json";
pub const ALLOCATIONS_FILE: &str = "people_allocation.json";
pub const REVENUE_FILE: &str = "revenue_details.json";
pub const UTILIZATION_FILE: &str = "utilization_data.json";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No data loaded")]
    NoData,
}

/// Loads fixture files and external tables.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(file_path.to_path_buf());

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(path = %file_path.display(), rows = df.height(), "Loaded CSV table");
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Convert the loaded DataFrame into table rows, preserving row and column order.
    ///
    /// Numeric columns become JSON numbers, boolean columns JSON booleans, everything else
    /// text; nulls and NaN become `null`.
    pub fn to_table_rows(&self) -> Result<Vec<TableRow>, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        let mut rows: Vec<IndexMap<String, Value>> = vec![IndexMap::new(); df.height()];

        for column in df.get_columns() {
            let name = column.name().to_string();

            if is_numeric(column.dtype()) {
                let value_f64 = column.cast(&DataType::Float64)?;
                let value_ca = value_f64.f64()?;
                for (row, value) in rows.iter_mut().zip(value_ca.into_iter()) {
                    let cell = value
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null);
                    row.insert(name.clone(), cell);
                }
            } else if column.dtype() == &DataType::Boolean {
                let value_ca = column.bool()?;
                for (row, value) in rows.iter_mut().zip(value_ca.into_iter()) {
                    let cell = value.map(Value::Bool).unwrap_or(Value::Null);
                    row.insert(name.clone(), cell);
                }
            } else {
                let value_str = column.cast(&DataType::String)?;
                let value_ca = value_str.str()?;
                for (row, value) in rows.iter_mut().zip(value_ca.into_iter()) {
                    let cell = value
                        .map(|s| Value::String(s.to_string()))
                        .unwrap_or(Value::Null);
                    row.insert(name.clone(), cell);
                }
            }
        }

        Ok(rows.into_iter().map(TableRow::new).collect())
    }

    /// Load a JSON array of flat objects as table rows.
    pub fn load_table_json(path: &Path) -> Result<Vec<TableRow>, LoaderError> {
        read_json(path)
    }

    /// Load every fixture file from `dir`.
    pub fn load_dataset(dir: &Path) -> Result<Dataset, LoaderError> {
        let dataset = Dataset {
            people: read_json::<Vec<Person>>(&dir.join(PEOPLE_FILE))?,
            allocations: read_json::<Vec<Allocation>>(&dir.join(ALLOCATIONS_FILE))?,
            revenue: read_json::<Vec<RevenueRow>>(&dir.join(REVENUE_FILE))?,
            utilization: read_json::<Vec<UtilizationRow>>(&dir.join(UTILIZATION_FILE))?,
        };

        info!(
            dir = %dir.display(),
            people = dataset.people.len(),
            allocations = dataset.allocations.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Write every fixture file into `dir`, creating it if needed.
    pub fn save_dataset(dataset: &Dataset, dir: &Path, pretty: bool) -> Result<(), LoaderError> {
        fs::create_dir_all(dir).map_err(|source| LoaderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        write_json(&dir.join(PEOPLE_FILE), &dataset.people, pretty)?;
        write_json(&dir.join(ALLOCATIONS_FILE), &dataset.allocations, pretty)?;
        write_json(&dir.join(REVENUE_FILE), &dataset.revenue, pretty)?;
        write_json(&dir.join(UTILIZATION_FILE), &dataset.utilization, pretty)?;

        info!(dir = %dir.display(), "Saved dataset");
        Ok(())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoaderError> {
    debug!(path = %path.display(), "Reading JSON");
    let raw = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoaderError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), LoaderError> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|source| LoaderError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, raw).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
