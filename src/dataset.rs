//! Dataset loading and the process-wide, read-only dataset.
//!
//! The input is a header-driven CSV with the columns `Country`, `Years`,
//! `Anomaly` and (optionally) `Temperature`. Rows without a usable anomaly are
//! dropped at load time; so are rows that cannot be attributed to a country
//! and year.
//!
//! ```no_run
//! # use cdx_rs::dataset;
//! let data = dataset::install(dataset::load_csv("data/ddbb_surface_temperature_countries.csv")?);
//! assert!(dataset::get().is_some());
//! println!("{} countries", data.countries().len());
//! # Ok::<(), cdx_rs::ExplorerError>(())
//! ```
use crate::error::ExplorerError;
use crate::models::{Observation, YearRange};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Where the dashboard looks for its data when no path is given.
pub const DEFAULT_DATA_PATH: &str = "data/ddbb_surface_temperature_countries.csv";

static DATASET: OnceLock<Dataset> = OnceLock::new();

/// Raw CSV row. Every field is optional so one bad cell never aborts the load.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Country", default)]
    country: Option<String>,
    #[serde(rename = "Years", default, deserialize_with = "csv::invalid_option")]
    years: Option<i32>,
    #[serde(rename = "Anomaly", default, deserialize_with = "csv::invalid_option")]
    anomaly: Option<f64>,
    #[serde(rename = "Temperature", default, deserialize_with = "csv::invalid_option")]
    temperature: Option<f64>,
}

impl RawRow {
    fn into_observation(self) -> Option<Observation> {
        let country = self.country.filter(|c| !c.is_empty())?;
        let anomaly = self.anomaly.filter(|a| a.is_finite())?;
        Some(Observation {
            country,
            year: self.years?,
            anomaly,
            temperature: self.temperature.filter(|t| t.is_finite()),
        })
    }
}

/// Immutable in-memory collection of observations.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
    dropped: usize,
    source: Option<PathBuf>,
}

impl Dataset {
    /// Wrap already-parsed observations (mainly for tests and embedding).
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            dropped: 0,
            source: None,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of input rows discarded while loading.
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }

    /// File the dataset was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Sorted, de-duplicated country names.
    pub fn countries(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.observations.iter().map(|o| o.country.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn contains_country(&self, country: &str) -> bool {
        self.observations.iter().any(|o| o.country == country)
    }

    /// Observed year span across all countries; `None` for an empty dataset.
    pub fn year_span(&self) -> Option<YearRange> {
        let min = self.observations.iter().map(|o| o.year).min()?;
        let max = self.observations.iter().map(|o| o.year).max()?;
        Some(YearRange::new(min, max))
    }
}

/// Load the dataset from a CSV file.
///
/// ### Errors
/// - `DataUnavailable` if the file cannot be opened
/// - `Csv` if the header itself cannot be read
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, ExplorerError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ExplorerError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut dataset = from_reader(file)?;
    dataset.source = Some(path.to_path_buf());
    Ok(dataset)
}

/// Parse the dataset from any reader (same rules as [`load_csv`]).
pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, ExplorerError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    // Fail early on an unreadable header rather than silently loading nothing.
    rdr.headers()?;

    let mut observations = Vec::new();
    let mut dropped = 0usize;
    for result in rdr.deserialize::<RawRow>() {
        match result.map(RawRow::into_observation) {
            Ok(Some(obs)) => observations.push(obs),
            Ok(None) => dropped += 1,
            Err(e) => {
                log::warn!("skipping malformed row: {e}");
                dropped += 1;
            }
        }
    }
    log::info!(
        "loaded {} observations, dropped {} rows without a usable anomaly",
        observations.len(),
        dropped
    );

    Ok(Dataset {
        observations,
        dropped,
        source: None,
    })
}

/// Install the process-wide dataset and return a `'static` handle to it.
///
/// The first installed dataset wins; later calls keep it and return it.
pub fn install(dataset: Dataset) -> &'static Dataset {
    let mut fresh = false;
    let installed = DATASET.get_or_init(|| {
        fresh = true;
        dataset
    });
    if !fresh {
        log::warn!("dataset already installed; keeping the existing one");
    }
    installed
}

/// Read-only accessor for the installed dataset.
pub fn get() -> Option<&'static Dataset> {
    DATASET.get()
}
