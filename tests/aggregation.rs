use cdx_rs::aggregate::{annual_series, decade_series, filter_range};
use cdx_rs::dataset;
use cdx_rs::trend::{linear_fit, linear_trend, moving_average_of};
use cdx_rs::{Dataset, YearRange};
use std::path::PathBuf;

fn load() -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_countries.csv");
    dataset::load_csv(path).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn annual_series_averages_duplicate_years() {
    let data = load();
    let annual = annual_series(data.observations(), "Testland");
    assert_eq!(annual.len(), 20);
    assert!(annual.windows(2).all(|w| w[0].year < w[1].year));

    let y1905 = annual.iter().find(|r| r.year == 1905).unwrap();
    assert!(close(y1905.anomaly, 0.5));
    assert!(close(y1905.temperature.unwrap(), 14.5));
}

#[test]
fn annual_temperature_absent_when_no_readings() {
    let data = load();
    let annual = annual_series(data.observations(), "Japan");
    assert!(annual.iter().filter(|r| r.year < 1905).all(|r| r.temperature.is_none()));
    assert!(annual.iter().filter(|r| r.year >= 1905).all(|r| r.temperature.is_some()));
}

#[test]
fn unknown_country_gives_empty_series() {
    let data = load();
    assert!(annual_series(data.observations(), "Atlantis").is_empty());
}

#[test]
fn range_filter_and_decades() {
    let data = load();
    let annual = annual_series(data.observations(), "Testland");

    let part = filter_range(&annual, YearRange::new(1905, 1912));
    assert_eq!(part.first().map(|r| r.year), Some(1905));
    assert_eq!(part.last().map(|r| r.year), Some(1912));
    assert_eq!(part.len(), 8);

    let decades = decade_series(&annual);
    assert_eq!(decades.len(), 2);
    assert_eq!(decades[0].decade, 1900);
    assert!(close(decades[0].anomaly, 0.45));
    assert_eq!(decades[1].decade, 1910);
    assert!(close(decades[1].anomaly, 1.45));
}

#[test]
fn moving_average_leaves_edges_empty() {
    let data = load();
    let annual = annual_series(data.observations(), "Testland");

    let ma5 = moving_average_of(&annual, 5);
    assert_eq!(ma5.len(), annual.len());
    assert_eq!(ma5.iter().flatten().count(), 16);
    assert!(ma5[..2].iter().all(Option::is_none));
    assert!(close(ma5[2].unwrap(), 0.2));
    assert!(ma5[18..].iter().all(Option::is_none));

    let ma10 = moving_average_of(&annual, 10);
    assert_eq!(ma10.iter().flatten().count(), 11);
    assert!(ma10[4].is_none());
    assert!(close(ma10[5].unwrap(), 0.45));
    assert!(ma10[15].is_some());
    assert!(ma10[16].is_none());

    let too_wide = moving_average_of(&annual[..3], 5);
    assert!(too_wide.iter().all(Option::is_none));
}

#[test]
fn trend_recovers_linear_series() {
    let data = load();
    let annual = annual_series(data.observations(), "Testland");
    let fit = linear_fit(&annual).unwrap();
    assert!((fit.slope - 0.1).abs() < 1e-9);
    assert!((fit.per_decade() - 1.0).abs() < 1e-9);

    let line = linear_trend(&annual);
    assert_eq!(line.len(), annual.len());
    assert!(close(line[0].anomaly, 0.0));
    assert!(close(line[19].anomaly, 1.9));
    assert!(linear_trend(&[]).is_empty());
}

#[test]
fn three_year_scenario() {
    let data = Dataset::from_observations(
        [(2000, 0.1), (2001, 0.3), (2002, 0.2)]
            .into_iter()
            .map(|(year, anomaly)| cdx_rs::Observation {
                country: "Testland".into(),
                year,
                anomaly,
                temperature: None,
            })
            .collect(),
    );
    let annual = annual_series(data.observations(), "Testland");
    let pairs: Vec<(i32, f64)> = annual.iter().map(|r| (r.year, r.anomaly)).collect();
    assert_eq!(pairs, vec![(2000, 0.1), (2001, 0.3), (2002, 0.2)]);

    let decades = decade_series(&annual);
    assert_eq!(decades.len(), 1);
    assert_eq!(decades[0].decade, 2000);
    assert!(close(decades[0].anomaly, 0.2));

    assert_eq!(cdx_rs::stats::hottest(&annual).map(|r| r.year), Some(2001));
    assert_eq!(cdx_rs::stats::coldest(&annual).map(|r| r.year), Some(2000));
}
