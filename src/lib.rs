//! cdx_rs
//!
//! A small Rust library for exploring country temperature anomalies
//! (Berkeley Earth style `Country, Years, Anomaly, Temperature` tables).
//! Pairs with the `cdx` CLI and the `cdx-gui` desktop dashboard.
//!
//! ### Features
//! - Load the dataset once and share it read-only for the process lifetime
//! - Annual and decade averages per country
//! - Centred moving average and least-squares trend line
//! - Multi-country comparison statistics
//! - Auto-generated narrative with Paris 1.5°C progress
//! - CSV/JSON exports and SVG/PNG charts
//!
//! ### Example
//! ```no_run
//! use cdx_rs::{dashboard, dataset, YearRange};
//!
//! let data = dataset::install(dataset::load_csv(dataset::DEFAULT_DATA_PATH)?);
//! let mut selection = dashboard::Selection::defaults_for(data).expect("non-empty dataset");
//! selection.years = YearRange::new(1950, 2020);
//! let view = dashboard::compute(data, &selection)?;
//! println!("{}", view.story.render());
//! cdx_rs::storage::save_annual_csv(&view.annual, "annual.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod models;
pub mod narrative;
pub mod stats;
pub mod storage;
pub mod trend;
pub mod viz;

pub use dataset::Dataset;
pub use error::ExplorerError;
pub use models::{AnnualRecord, ComparisonRow, CountrySeries, DecadeRecord, Observation, YearRange};
