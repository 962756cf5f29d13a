use cdx_rs::dashboard::{self, Selection};
use cdx_rs::dataset;
use cdx_rs::models::{AnnualRecord, CountrySeries};
use cdx_rs::viz::{self, ChartKind, TimeSeriesLayers};
use cdx_rs::{Dataset, YearRange};
use std::fs;
use std::path::{Path, PathBuf};

fn load() -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_countries.csv");
    dataset::load_csv(path).unwrap()
}

fn assert_svg(path: &Path) {
    let meta = fs::metadata(path).expect("file created");
    assert!(meta.len() > 0, "svg has content");
    let txt = fs::read_to_string(path).unwrap();
    assert!(txt.contains("<svg"));
}

#[test]
fn every_view_chart_renders_to_svg() {
    let data = load();
    let mut sel = Selection::defaults_for(&data).unwrap();
    sel.country = "Testland".into();
    let view = dashboard::compute(&data, &sel).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let kinds = [
        ChartKind::TimeSeries,
        ChartKind::WarmingStripes,
        ChartKind::Decades,
        ChartKind::Comparison,
    ];
    for (i, kind) in kinds.into_iter().enumerate() {
        let path = dir.path().join(format!("chart{i}.svg"));
        viz::plot_view(&view, kind, &path, 800, 480).unwrap();
        assert_svg(&path);
    }
}

#[test]
fn every_view_chart_renders_to_png() {
    let data = load();
    let mut sel = Selection::defaults_for(&data).unwrap();
    sel.country = "Testland".into();
    let view = dashboard::compute(&data, &sel).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let kinds = [
        ChartKind::TimeSeries,
        ChartKind::WarmingStripes,
        ChartKind::Decades,
        ChartKind::Comparison,
    ];
    for (i, kind) in kinds.into_iter().enumerate() {
        let path = dir.path().join(format!("chart{i}.png"));
        viz::plot_view(&view, kind, &path, 640, 400).unwrap();
        let bytes = fs::read(&path).expect("file created");
        assert!(bytes.starts_with(b"\x89PNG"), "png signature");
    }
}

#[test]
fn time_series_renders_without_overlays() {
    let annual: Vec<AnnualRecord> = (1990..2000)
        .map(|y| AnnualRecord {
            year: y,
            anomaly: (y - 1990) as f64 * 0.1,
            temperature: None,
        })
        .collect();
    let layers = TimeSeriesLayers {
        country: "Testland",
        range: YearRange::new(1990, 1999),
        annual: &annual,
        moving_average: None,
        trend: None,
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.svg");
    viz::plot_time_series(&layers, &path, 640, 400).unwrap();
    assert_svg(&path);
}

#[test]
fn comparison_without_selection_is_error() {
    let data = load();
    let mut sel = Selection::defaults_for(&data).unwrap();
    sel.country = "Testland".into();
    sel.compare.clear();
    let view = dashboard::compute(&data, &sel).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmp.svg");
    assert!(viz::plot_view(&view, ChartKind::Comparison, &path, 800, 480).is_err());
}

#[test]
fn empty_inputs_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    let range = YearRange::new(2000, 2010);
    assert!(viz::plot_warming_stripes("X", range, &[], &path, 800, 480).is_err());
    assert!(viz::plot_decades("X", &[], &path, 800, 480).is_err());
    let series = vec![CountrySeries {
        country: "X".into(),
        records: vec![],
    }];
    assert!(viz::plot_comparison(&series, range, &path, 800, 480).is_err());
}
