use cdx_rs::ExplorerError;
use cdx_rs::YearRange;
use cdx_rs::dataset;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_countries.csv")
}

#[test]
fn loads_fixture_and_drops_unusable_rows() {
    let data = dataset::load_csv(fixture()).unwrap();
    // Testland 21 (1905 twice), Japan 20, Coldland 5
    assert_eq!(data.len(), 46);
    // blank anomaly, blank country, non-numeric year
    assert_eq!(data.dropped_rows(), 3);
    assert_eq!(data.countries(), vec!["Coldland", "Japan", "Testland"]);
    assert_eq!(data.year_span(), Some(YearRange::new(1900, 1919)));
    assert!(data.contains_country("Japan"));
    assert!(!data.contains_country("Atlantis"));
    assert_eq!(data.source(), Some(fixture().as_path()));
}

#[test]
fn blank_temperature_is_kept_as_missing() {
    let data = dataset::load_csv(fixture()).unwrap();
    let japan_1900 = data
        .observations()
        .iter()
        .find(|o| o.country == "Japan" && o.year == 1900)
        .unwrap();
    assert_eq!(japan_1900.temperature, None);
    assert!((japan_1900.anomaly + 0.30).abs() < 1e-9);
}

#[test]
fn missing_file_is_data_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = dataset::load_csv(&path).unwrap_err();
    match &err {
        ExplorerError::DataUnavailable { path: p, .. } => assert_eq!(p, &path),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_recoverable());
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn installed_dataset_is_shared_and_first_install_wins() {
    let first = dataset::install(dataset::load_csv(fixture()).unwrap());
    let second = dataset::install(dataset::Dataset::default());
    assert!(std::ptr::eq(first, second));
    assert_eq!(second.len(), 46);
    assert!(std::ptr::eq(dataset::get().unwrap(), first));
}
