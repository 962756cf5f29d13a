use cdx_rs::dataset;
use cdx_rs::stats::{compare_countries, comparison_series};
use cdx_rs::{Dataset, YearRange};
use std::path::PathBuf;

fn load() -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_countries.csv");
    dataset::load_csv(path).unwrap()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn countries_without_data_in_range_are_omitted() {
    let data = load();
    let rows = compare_countries(
        data.observations(),
        &names(&["Coldland", "Japan", "Atlantis"]),
        YearRange::new(1900, 1909),
    );
    assert_eq!(rows.len(), 1);
    let japan = &rows[0];
    assert_eq!(japan.country, "Japan");
    assert_eq!(japan.point_count, 10);
    assert_eq!(japan.hottest_year, 1909);
    assert!((japan.max_anomaly - 0.15).abs() < 1e-9);
    assert!((japan.min_anomaly + 0.30).abs() < 1e-9);
    assert!((japan.avg_anomaly + 0.075).abs() < 1e-9);
}

#[test]
fn request_order_kept_and_duplicates_collapsed() {
    let data = load();
    let series = comparison_series(
        data.observations(),
        &names(&["Testland", "Coldland", "Testland"]),
        YearRange::new(1900, 1919),
    );
    let order: Vec<&str> = series.iter().map(|s| s.country.as_str()).collect();
    assert_eq!(order, vec!["Testland", "Coldland"]);
}

#[test]
fn flat_series_reports_earliest_hottest_year() {
    let data = load();
    let rows = compare_countries(
        data.observations(),
        &names(&["Coldland"]),
        YearRange::new(1900, 1919),
    );
    assert_eq!(rows[0].hottest_year, 1910);
    assert_eq!(rows[0].max_anomaly, rows[0].min_anomaly);
    assert!(rows[0].min_anomaly <= rows[0].avg_anomaly && rows[0].avg_anomaly <= rows[0].max_anomaly);
}
