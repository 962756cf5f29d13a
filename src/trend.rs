//! Smoothing and trend lines over an annual series.
//!
//! Both operations are pure and recomputed in full on every call.
use crate::models::AnnualRecord;
use serde::{Deserialize, Serialize};

/// Centred rolling mean over `window` consecutive points.
///
/// Position `i` averages `values[i - window/2 ..= i + (window-1)/2]`. Positions
/// where that span leaves the slice are `None`, never zero. A zero window or
/// one longer than the input yields all `None`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if window == 0 || window > n {
        return vec![None; n];
    }
    let before = window / 2;
    let after = window - 1 - before;

    (0..n)
        .map(|i| {
            if i < before || i + after >= n {
                return None;
            }
            let span = &values[i - before..=i + after];
            Some(span.iter().sum::<f64>() / window as f64)
        })
        .collect()
}

/// [`moving_average`] over the anomalies of an annual series.
pub fn moving_average_of(records: &[AnnualRecord], window: usize) -> Vec<Option<f64>> {
    let values: Vec<f64> = records.iter().map(|r| r.anomaly).collect();
    moving_average(&values, window)
}

/// Least-squares line `anomaly = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * year as f64 + self.intercept
    }

    /// Slope expressed in °C per decade.
    pub fn per_decade(&self) -> f64 {
        self.slope * 10.0
    }
}

/// One point of the fitted trend line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub anomaly: f64,
}

/// Ordinary least-squares fit of anomaly against year.
///
/// `None` for empty input. If every point has the same year the slope is zero
/// and the line passes through the mean anomaly.
pub fn linear_fit(records: &[AnnualRecord]) -> Option<LinearFit> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    // Centre on the mean year to keep the sums well-conditioned.
    let mean_x = records.iter().map(|r| r.year as f64).sum::<f64>() / n;
    let mean_y = records.iter().map(|r| r.anomaly).sum::<f64>() / n;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for r in records {
        let dx = r.year as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (r.anomaly - mean_y);
    }

    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// The fitted anomaly for every input year, in input order.
pub fn linear_trend(records: &[AnnualRecord]) -> Vec<TrendPoint> {
    match linear_fit(records) {
        Some(fit) => records
            .iter()
            .map(|r| TrendPoint {
                year: r.year,
                anomaly: fit.predict(r.year),
            })
            .collect(),
        None => Vec::new(),
    }
}
