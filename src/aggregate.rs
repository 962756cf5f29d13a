//! Annual and decade aggregation.
use crate::models::{AnnualRecord, DecadeRecord, Observation, YearRange};
use std::collections::BTreeMap;

#[derive(Default)]
struct Accum {
    anomaly_sum: f64,
    anomaly_n: usize,
    temperature_sum: f64,
    temperature_n: usize,
}

/// Group one country's observations by year and average them.
///
/// Output is sorted by year, one record per year. An unknown country yields
/// an empty vector. Absent temperatures are skipped in the temperature mean.
pub fn annual_series(observations: &[Observation], country: &str) -> Vec<AnnualRecord> {
    let mut groups: BTreeMap<i32, Accum> = BTreeMap::new();
    for o in observations.iter().filter(|o| o.country == country) {
        let acc = groups.entry(o.year).or_default();
        acc.anomaly_sum += o.anomaly;
        acc.anomaly_n += 1;
        if let Some(t) = o.temperature {
            acc.temperature_sum += t;
            acc.temperature_n += 1;
        }
    }

    groups
        .into_iter()
        .map(|(year, acc)| AnnualRecord {
            year,
            anomaly: acc.anomaly_sum / acc.anomaly_n as f64,
            temperature: (acc.temperature_n > 0)
                .then(|| acc.temperature_sum / acc.temperature_n as f64),
        })
        .collect()
}

/// Keep the records with `range.start <= year <= range.end`.
pub fn filter_range(records: &[AnnualRecord], range: YearRange) -> Vec<AnnualRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.year))
        .copied()
        .collect()
}

/// Start year of the decade containing `year`.
///
/// Uses floor division, so negative years bucket downwards: `-5 -> -10`.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Average annual anomalies per decade, sorted by decade.
pub fn decade_series(records: &[AnnualRecord]) -> Vec<DecadeRecord> {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for r in records {
        let slot = groups.entry(decade_of(r.year)).or_insert((0.0, 0));
        slot.0 += r.anomaly;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|(decade, (sum, n))| DecadeRecord {
            decade,
            anomaly: sum / n as f64,
        })
        .collect()
}
