use crate::aggregate::{annual_series, filter_range};
use crate::models::{AnnualRecord, ComparisonRow, CountrySeries, Observation, YearRange};
use std::collections::HashSet;

/// Requested countries in order, duplicates removed.
fn unique_countries(countries: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    countries
        .iter()
        .map(String::as_str)
        .filter(|c| seen.insert(*c))
        .collect()
}

/// Year holding the highest anomaly; the earliest such year on ties.
pub fn hottest(records: &[AnnualRecord]) -> Option<&AnnualRecord> {
    records.iter().fold(None, |best: Option<&AnnualRecord>, r| match best {
        Some(b) if r.anomaly > b.anomaly || (r.anomaly == b.anomaly && r.year < b.year) => Some(r),
        Some(b) => Some(b),
        None => Some(r),
    })
}

/// Year holding the lowest anomaly; the earliest such year on ties.
pub fn coldest(records: &[AnnualRecord]) -> Option<&AnnualRecord> {
    records.iter().fold(None, |best: Option<&AnnualRecord>, r| match best {
        Some(b) if r.anomaly < b.anomaly || (r.anomaly == b.anomaly && r.year < b.year) => Some(r),
        Some(b) => Some(b),
        None => Some(r),
    })
}

/// Arithmetic mean of the anomalies; `None` for an empty slice.
pub fn mean_anomaly(records: &[AnnualRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    Some(records.iter().map(|r| r.anomaly).sum::<f64>() / records.len() as f64)
}

/// Summary row for one country's in-range annual series.
pub fn summarize(country: &str, records: &[AnnualRecord]) -> Option<ComparisonRow> {
    let hot = hottest(records)?;
    let min = coldest(records)?.anomaly;
    Some(ComparisonRow {
        country: country.to_string(),
        avg_anomaly: mean_anomaly(records)?,
        max_anomaly: hot.anomaly,
        min_anomaly: min,
        hottest_year: hot.year,
        point_count: records.len(),
    })
}

/// In-range annual series for each requested country.
///
/// Countries without a single in-range year are left out; the others keep
/// the request order.
pub fn comparison_series(
    observations: &[Observation],
    countries: &[String],
    range: YearRange,
) -> Vec<CountrySeries> {
    unique_countries(countries)
        .into_iter()
        .filter_map(|country| {
            let records = filter_range(&annual_series(observations, country), range);
            if records.is_empty() {
                log::debug!("{country}: no annual data in {range}, omitted from comparison");
                return None;
            }
            Some(CountrySeries {
                country: country.to_string(),
                records,
            })
        })
        .collect()
}

/// One [`ComparisonRow`] per requested country with data in `range`.
///
/// Statistics are taken over the annual (not raw) series.
pub fn compare_countries(
    observations: &[Observation],
    countries: &[String],
    range: YearRange,
) -> Vec<ComparisonRow> {
    comparison_series(observations, countries, range)
        .iter()
        .filter_map(|s| summarize(&s.country, &s.records))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, anomaly: f64) -> AnnualRecord {
        AnnualRecord { year, anomaly, temperature: None }
    }

    #[test]
    fn ties_resolve_to_earliest_year() {
        let recs = [rec(2003, 0.5), rec(2001, 0.5), rec(2002, -0.1), rec(2000, -0.1)];
        assert_eq!(hottest(&recs).unwrap().year, 2001);
        assert_eq!(coldest(&recs).unwrap().year, 2000);
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert!(summarize("X", &[]).is_none());
        assert!(mean_anomaly(&[]).is_none());
    }
}
