use crate::models::YearRange;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop (part of) a dashboard pass.
///
/// `DataUnavailable` is fatal: nothing can be rendered without the dataset.
/// `EmptySelection` and `NoComparisonTargets` only suppress the sections that
/// depend on them.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("data file not found or unreadable: {}. Please ensure it exists.", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no data available for {country} in the selected year range ({range})")]
    EmptySelection { country: String, range: YearRange },

    #[error("please select at least one country to compare")]
    NoComparisonTargets,

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExplorerError {
    /// True for conditions that only hide part of the page.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExplorerError::EmptySelection { .. } | ExplorerError::NoComparisonTargets
        )
    }
}
