//! One explicit recomputation pass: `compute(dataset, selection) -> view`.
//!
//! Front ends hold a [`Selection`], call [`compute`] whenever it changes and
//! render the resulting [`DashboardView`]. Nothing is cached here; the call is
//! side-effect free so callers may memoise on the selection if they like.
use crate::aggregate::{annual_series, decade_series, filter_range};
use crate::dataset::Dataset;
use crate::error::ExplorerError;
use crate::models::{AnnualRecord, ComparisonRow, CountrySeries, DecadeRecord, YearRange};
use crate::narrative::{KeyMetrics, Story};
use crate::stats::{comparison_series, summarize};
use crate::trend::{LinearFit, TrendPoint, linear_fit, linear_trend, moving_average_of};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_MA_WINDOW: usize = 5;
pub const MAX_MA_WINDOW: usize = 20;
pub const DEFAULT_MA_WINDOW: usize = 10;
pub const DEFAULT_START_YEAR: i32 = 1900;

const DEFAULT_COUNTRY: &str = "South Korea";
const DEFAULT_COMPARE: [&str; 5] = ["South Korea", "Japan", "United Kingdom", "Germany", "Australia"];

/// Everything the user can change on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub country: String,
    pub years: YearRange,
    pub show_trend: bool,
    pub show_moving_avg: bool,
    pub ma_window: usize,
    pub compare: Vec<String>,
}

impl Selection {
    /// Initial page state for a dataset; `None` if the dataset is empty.
    pub fn defaults_for(dataset: &Dataset) -> Option<Self> {
        let countries = dataset.countries();
        let span = dataset.year_span()?;
        let country = if countries.iter().any(|c| c == DEFAULT_COUNTRY) {
            DEFAULT_COUNTRY.to_string()
        } else {
            countries.first()?.clone()
        };

        let mut compare: Vec<String> = DEFAULT_COMPARE
            .iter()
            .filter(|c| countries.iter().any(|k| k == *c))
            .map(|c| c.to_string())
            .collect();
        if compare.is_empty() {
            compare = countries.iter().take(3).cloned().collect();
        }

        Some(
            Self {
                country,
                years: YearRange::new(DEFAULT_START_YEAR, span.end),
                show_trend: true,
                show_moving_avg: true,
                ma_window: DEFAULT_MA_WINDOW,
                compare,
            }
            .normalized(span),
        )
    }

    /// Enforce the widget constraints: ordered range inside `span` (a range
    /// disjoint from `span` is kept as is and computes to an empty selection),
    /// window in `[5, 20]`, comparison countries unique.
    pub fn normalized(mut self, span: YearRange) -> Self {
        self.years = self.years.clamp_to(span);
        self.ma_window = self.ma_window.clamp(MIN_MA_WINDOW, MAX_MA_WINDOW);
        let mut seen = HashSet::new();
        self.compare.retain(|c| seen.insert(c.clone()));
        self
    }
}

/// Comparison tab contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub series: Vec<CountrySeries>,
    pub rows: Vec<ComparisonRow>,
}

/// Everything one render pass needs.
#[derive(Debug)]
pub struct DashboardView {
    pub selection: Selection,
    /// Annual series of the selected country within the year range.
    pub annual: Vec<AnnualRecord>,
    /// Aligned with `annual`; present when the moving average is enabled.
    pub moving_average: Option<Vec<Option<f64>>>,
    /// Fitted line aligned with `annual`; present when the trend is enabled.
    pub trend: Option<Vec<TrendPoint>>,
    pub fit: Option<LinearFit>,
    pub decades: Vec<DecadeRecord>,
    pub metrics: KeyMetrics,
    pub story: Story,
    pub comparison: Result<Comparison, ExplorerError>,
}

/// Compute the comparison section on its own.
///
/// ### Errors
/// `NoComparisonTargets` when no country is selected.
pub fn compute_comparison(
    dataset: &Dataset,
    countries: &[String],
    range: YearRange,
) -> Result<Comparison, ExplorerError> {
    if countries.is_empty() {
        return Err(ExplorerError::NoComparisonTargets);
    }
    let series = comparison_series(dataset.observations(), countries, range);
    let rows = series
        .iter()
        .filter_map(|s| summarize(&s.country, &s.records))
        .collect();
    Ok(Comparison { series, rows })
}

/// Run every aggregator for `selection`.
///
/// ### Errors
/// `EmptySelection` when the selected country has no annual data in the year
/// range. A missing comparison selection does not fail the pass; it is
/// reported inside [`DashboardView::comparison`].
pub fn compute(dataset: &Dataset, selection: &Selection) -> Result<DashboardView, ExplorerError> {
    let range = selection.years;
    log::debug!(
        "recomputing view for {} {} (window {})",
        selection.country,
        range,
        selection.ma_window
    );

    let annual = filter_range(
        &annual_series(dataset.observations(), &selection.country),
        range,
    );
    let story = Story::build(&selection.country, range, &annual)?;

    let moving_average = selection
        .show_moving_avg
        .then(|| moving_average_of(&annual, selection.ma_window));
    let (trend, fit) = if selection.show_trend {
        (Some(linear_trend(&annual)), linear_fit(&annual))
    } else {
        (None, None)
    };

    // A leading partial decade (starting before the range) is not shown.
    let decades = decade_series(&annual)
        .into_iter()
        .filter(|d| d.decade >= range.start)
        .collect();

    Ok(DashboardView {
        selection: selection.clone(),
        metrics: story.metrics,
        annual,
        moving_average,
        trend,
        fit,
        decades,
        story,
        comparison: compute_comparison(dataset, &selection.compare, range),
    })
}
