//! Key metrics and the auto-generated climate story.
//!
//! Everything here is derived from the annual series already filtered to the
//! active year range. The story text follows a fixed template; only the
//! interpolated values change.
use crate::error::ExplorerError;
use crate::models::{AnnualRecord, YearRange};
use crate::stats::{coldest, hottest, mean_anomaly};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Paris Agreement warming limit used as the progress benchmark, in °C.
pub const PARIS_TARGET_C: f64 = 1.5;

/// The four headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub latest: AnnualRecord,
    pub hottest: AnnualRecord,
    pub coldest: AnnualRecord,
    pub mean: f64,
}

impl KeyMetrics {
    /// `None` for an empty series.
    pub fn from_annual(records: &[AnnualRecord]) -> Option<Self> {
        let latest = *records.iter().max_by_key(|r| r.year)?;
        Some(Self {
            latest,
            hottest: *hottest(records)?,
            coldest: *coldest(records)?,
            mean: mean_anomaly(records)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Warming,
    Cooling,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Warming => "warming",
            TrendDirection::Cooling => "cooling",
        }
    }
}

/// Early-vs-recent comparison around the midpoint of the selected range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSplit {
    pub midpoint: i32,
    /// Mean anomaly of years `< midpoint`.
    pub early: Option<f64>,
    /// Mean anomaly of years `>= midpoint`.
    pub recent: Option<f64>,
}

impl PeriodSplit {
    pub fn new(range: YearRange, records: &[AnnualRecord]) -> Self {
        let midpoint = range.midpoint();
        let (early, recent): (Vec<AnnualRecord>, Vec<AnnualRecord>) =
            records.iter().copied().partition(|r| r.year < midpoint);
        Self {
            midpoint,
            early: mean_anomaly(&early),
            recent: mean_anomaly(&recent),
        }
    }

    /// `recent - early`, when both halves have data.
    pub fn change(&self) -> Option<f64> {
        Some(self.recent? - self.early?)
    }

    /// Warming only for a strictly positive change.
    pub fn direction(&self) -> Option<TrendDirection> {
        self.change().map(|c| {
            if c > 0.0 {
                TrendDirection::Warming
            } else {
                TrendDirection::Cooling
            }
        })
    }
}

/// Latest anomaly measured against [`PARIS_TARGET_C`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParisProgress {
    pub latest_anomaly: f64,
    /// Percentage of the target reached (may exceed 100 or be negative).
    pub percent: f64,
    pub exceeded: bool,
}

impl ParisProgress {
    pub fn new(latest_anomaly: f64) -> Self {
        Self {
            latest_anomaly,
            percent: latest_anomaly / PARIS_TARGET_C * 100.0,
            exceeded: latest_anomaly >= PARIS_TARGET_C,
        }
    }

    /// Headroom left until the target; negative once exceeded.
    pub fn remaining(&self) -> f64 {
        PARIS_TARGET_C - self.latest_anomaly
    }

    /// Progress-bar fill in `[0, 1]`.
    pub fn bar_fraction(&self) -> f32 {
        (self.percent / 100.0).clamp(0.0, 1.0) as f32
    }

    pub fn message(&self) -> String {
        if self.exceeded {
            format!(
                "Current anomaly ({:.2}°C) has exceeded the Paris Agreement {PARIS_TARGET_C}°C target!",
                self.latest_anomaly
            )
        } else {
            format!(
                "Remaining budget: {:.2}°C until {PARIS_TARGET_C}°C threshold",
                self.remaining()
            )
        }
    }
}

/// Derived facts for the story section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub country: String,
    pub range: YearRange,
    pub metrics: KeyMetrics,
    pub split: PeriodSplit,
    pub paris: ParisProgress,
}

impl Story {
    /// Derive the story facts.
    ///
    /// ### Errors
    /// `EmptySelection` when `records` is empty; callers show a "no data"
    /// message instead of the story.
    pub fn build(
        country: &str,
        range: YearRange,
        records: &[AnnualRecord],
    ) -> Result<Self, ExplorerError> {
        let metrics =
            KeyMetrics::from_annual(records).ok_or_else(|| ExplorerError::EmptySelection {
                country: country.to_string(),
                range,
            })?;
        Ok(Self {
            country: country.to_string(),
            range,
            metrics,
            split: PeriodSplit::new(range, records),
            paris: ParisProgress::new(metrics.latest.anomaly),
        })
    }

    /// Render the fixed-template story text.
    pub fn render(&self) -> String {
        let m = &self.metrics;
        let r = self.range;
        let mid = self.split.midpoint;
        let fmt_opt = |v: Option<f64>| match v {
            Some(x) => format!("{x:.2}°C"),
            None => "n/a".to_string(),
        };

        let mut s = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(s, "Climate Summary: {}", self.country);
        let _ = writeln!(s);
        let _ = writeln!(s, "Key Findings ({r}):");
        let _ = writeln!(
            s,
            "- In {}, the temperature anomaly was {:.2}°C",
            m.latest.year, m.latest.anomaly
        );
        let _ = writeln!(
            s,
            "- The hottest year was {} with an anomaly of {:.2}°C",
            m.hottest.year, m.hottest.anomaly
        );
        let _ = writeln!(
            s,
            "- The coldest year was {} with an anomaly of {:.2}°C",
            m.coldest.year, m.coldest.anomaly
        );
        let _ = writeln!(s, "- The average anomaly for this period is {:.2}°C", m.mean);
        let _ = writeln!(s);
        let _ = writeln!(s, "Trend Analysis:");
        let _ = writeln!(
            s,
            "Comparing the first half ({}-{}) to the second half ({}-{}):",
            r.start,
            mid - 1,
            mid,
            r.end
        );
        let _ = writeln!(s, "- Early period average: {}", fmt_opt(self.split.early));
        let _ = writeln!(s, "- Recent period average: {}", fmt_opt(self.split.recent));
        match (self.split.change(), self.split.direction()) {
            (Some(c), Some(d)) => {
                let _ = writeln!(s, "- Change: {c:+.2}°C ({})", d.label());
            }
            _ => {
                let _ = writeln!(s, "- Change: n/a (one half of the range has no data)");
            }
        }
        let _ = writeln!(s);
        let _ = writeln!(s, "Paris Agreement Status:");
        let _ = writeln!(s, "{:.1}% of {PARIS_TARGET_C}°C target", self.paris.percent);
        let _ = writeln!(s, "{}", self.paris.message());
        s
    }
}
