use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tip_core::{Country, CountryTable};
use tracing::debug;

/// Country table shipped with the application.
const BUNDLED_COUNTRIES: &str = include_str!("../data/countries.csv");

/// Errors that can occur when loading country data.
#[derive(Debug, Error)]
pub enum CountryLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("row {row}: country name is empty")]
    EmptyName { row: usize },

    #[error("row {row}: time zone for '{name}' is empty")]
    EmptyTimeZone { row: usize, name: String },

    #[error("row {row}: tip percentage {value} for '{name}' is outside 0..=100")]
    InvalidTipPercentage {
        row: usize,
        name: String,
        value: Decimal,
    },

    #[error("row {row}: duplicate country '{name}'")]
    DuplicateCountry { row: usize, name: String },
}

impl From<csv::Error> for CountryLoaderError {
    fn from(err: csv::Error) -> Self {
        CountryLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a countries CSV file.
///
/// - `name`: display name, unique within the file
/// - `tip_percentage`: customary tip as a percentage (e.g. `12.5`)
/// - `time_zone`: IANA zone id used for auto-selection (e.g. `Europe/Paris`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CountryRecord {
    pub name: String,
    pub tip_percentage: Decimal,
    pub time_zone: String,
}

/// Loader for country tables from CSV files.
pub struct CountryLoader;

impl CountryLoader {
    /// Parse country records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice. Surrounding whitespace in cells is trimmed.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CountryRecord>, CountryLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CountryRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validate records and build a [`CountryTable`], preserving file order.
    ///
    /// Row numbers in errors are 1-based, counting the first data row as 1.
    pub fn load(records: Vec<CountryRecord>) -> Result<CountryTable, CountryLoaderError> {
        let mut seen = HashSet::new();
        let mut countries = Vec::with_capacity(records.len());

        for (idx, record) in records.into_iter().enumerate() {
            let row = idx + 1;

            if record.name.is_empty() {
                return Err(CountryLoaderError::EmptyName { row });
            }
            if record.time_zone.is_empty() {
                return Err(CountryLoaderError::EmptyTimeZone {
                    row,
                    name: record.name,
                });
            }
            if record.tip_percentage < Decimal::ZERO
                || record.tip_percentage > Decimal::ONE_HUNDRED
            {
                return Err(CountryLoaderError::InvalidTipPercentage {
                    row,
                    name: record.name,
                    value: record.tip_percentage,
                });
            }
            if !seen.insert(record.name.clone()) {
                return Err(CountryLoaderError::DuplicateCountry {
                    row,
                    name: record.name,
                });
            }

            countries.push(Country {
                name: record.name,
                tip_percentage: record.tip_percentage,
                time_zone: record.time_zone,
            });
        }

        debug!(count = countries.len(), "country table loaded");
        Ok(CountryTable::new(countries))
    }

    /// Parse and validate in one step.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<CountryTable, CountryLoaderError> {
        Self::load(Self::parse(reader)?)
    }

    /// Read a countries CSV from disk.
    pub fn load_from_path(path: &Path) -> Result<CountryTable, CountryLoaderError> {
        let file = std::fs::File::open(path).map_err(|e| CountryLoaderError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::load_from_reader(file)
    }

    /// The bundled country table.
    pub fn bundled() -> Result<CountryTable, CountryLoaderError> {
        Self::load_from_reader(BUNDLED_COUNTRIES.as_bytes())
    }
}
