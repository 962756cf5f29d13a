use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw input row: one station-aggregated reading for a country and year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub country: String,
    pub year: i32,
    pub anomaly: f64,
    pub temperature: Option<f64>,
}

/// Mean of all observations of one country in one year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnnualRecord {
    pub year: i32,
    pub anomaly: f64,
    pub temperature: Option<f64>,
}

/// Mean anomaly of the annual records falling in `[decade, decade + 9]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DecadeRecord {
    pub decade: i32,
    pub anomaly: f64,
}

/// Summary statistics of one country over a year range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonRow {
    pub country: String,
    pub avg_anomaly: f64,
    pub max_anomaly: f64,
    pub min_anomaly: f64,
    pub hottest_year: i32,
    pub point_count: usize,
}

/// In-range annual series of one country, as drawn on the comparison chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    pub records: Vec<AnnualRecord>,
}

/// Inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Build a range, swapping the bounds if given in reverse.
    pub fn new(a: i32, b: i32) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// True when the two ranges share at least one year.
    pub fn overlaps(&self, other: YearRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Clamp both bounds into `span`.
    ///
    /// A range entirely outside `span` is returned unchanged so that it stays
    /// empty instead of collapsing onto an edge year.
    pub fn clamp_to(&self, span: YearRange) -> Self {
        if !self.overlaps(span) {
            return *self;
        }
        Self::new(
            self.start.clamp(span.start, span.end),
            self.end.clamp(span.start, span.end),
        )
    }

    /// Split point used by the narrative: years below it are "early".
    pub fn midpoint(&self) -> i32 {
        // Widened so extreme years cannot overflow; the result lies in the range.
        ((self.start as i64 + self.end as i64).div_euclid(2)) as i32
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for YearRange {
    type Err = String;

    /// Accepts `YYYY` or `YYYY:YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || format!("invalid year range '{s}', expected YYYY or YYYY:YYYY");
        match s.split_once(':') {
            Some((a, b)) => {
                let start = a.trim().parse::<i32>().map_err(|_| bad())?;
                let end = b.trim().parse::<i32>().map_err(|_| bad())?;
                Ok(YearRange::new(start, end))
            }
            None => {
                let y = s.trim().parse::<i32>().map_err(|_| bad())?;
                Ok(YearRange::new(y, y))
            }
        }
    }
}

/// Split a user list on commas or semicolons, dropping blanks.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}
