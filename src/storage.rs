use crate::error::ExplorerError;
use crate::models::{AnnualRecord, ComparisonRow, DecadeRecord};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Which of the two per-country downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Annual,
    Decade,
}

/// Download file name for a country, e.g. `South_Korea_annual_anomaly.csv`.
pub fn export_file_name(country: &str, kind: ExportKind) -> String {
    let stem = country.replace(' ', "_");
    match kind {
        ExportKind::Annual => format!("{stem}_annual_anomaly.csv"),
        ExportKind::Decade => format!("{stem}_decade_anomaly.csv"),
    }
}

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn inert(cell: &str) -> String {
    if cell.starts_with(['=', '+', '-', '@']) {
        format!("'{cell}")
    } else {
        cell.to_string()
    }
}

/// Write the annual series as CSV (`Year,Anomaly,Temperature`).
pub fn write_annual_csv<W: Write>(records: &[AnnualRecord], out: W) -> Result<(), ExplorerError> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(["Year", "Anomaly", "Temperature"])?;
    for r in records {
        wtr.serialize((r.year, r.anomaly, r.temperature))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the annual series to `path`.
pub fn save_annual_csv<P: AsRef<Path>>(records: &[AnnualRecord], path: P) -> Result<(), ExplorerError> {
    write_annual_csv(records, File::create(path)?)
}

/// Write the decade series as CSV (`Decade,Avg Anomaly`).
pub fn write_decade_csv<W: Write>(records: &[DecadeRecord], out: W) -> Result<(), ExplorerError> {
    let mut wtr = WriterBuilder::new().from_writer(out);
    wtr.write_record(["Decade", "Avg Anomaly"])?;
    for r in records {
        wtr.serialize((r.decade, r.anomaly))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the decade series to `path`.
pub fn save_decade_csv<P: AsRef<Path>>(records: &[DecadeRecord], path: P) -> Result<(), ExplorerError> {
    write_decade_csv(records, File::create(path)?)
}

/// Save comparison statistics as CSV with header.
pub fn save_comparison_csv<P: AsRef<Path>>(rows: &[ComparisonRow], path: P) -> Result<(), ExplorerError> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record([
        "Country",
        "Avg Anomaly",
        "Max Anomaly",
        "Min Anomaly",
        "Hottest Year",
        "Data Points",
    ])?;
    for r in rows {
        wtr.serialize((
            inert(&r.country),
            r.avg_anomaly,
            r.max_anomaly,
            r.min_anomaly,
            r.hottest_year,
            r.point_count,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any rows as a pretty JSON array.
pub fn save_json<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> Result<(), ExplorerError> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[derive(Deserialize)]
struct AnnualRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Anomaly")]
    anomaly: f64,
    #[serde(rename = "Temperature", default)]
    temperature: Option<f64>,
}

/// Read back a file written by [`save_annual_csv`].
pub fn load_annual_csv<P: AsRef<Path>>(path: P) -> Result<Vec<AnnualRecord>, ExplorerError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for row in rdr.deserialize::<AnnualRow>() {
        let row = row?;
        out.push(AnnualRecord {
            year: row.year,
            anomaly: row.anomaly,
            temperature: row.temperature,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_all_formats() {
        let dir = tempdir().unwrap();
        let rows = vec![ComparisonRow {
            country: "Japan".into(),
            avg_anomaly: 0.4,
            max_anomaly: 1.2,
            min_anomaly: -0.6,
            hottest_year: 2019,
            point_count: 120,
        }];
        let csvp = dir.path().join("cmp.csv");
        let jsonp = dir.path().join("cmp.json");
        save_comparison_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        assert!(std::fs::read_to_string(&csvp).unwrap().starts_with("Country,Avg Anomaly,"));
        assert!(jsonp.exists());
    }

    #[test]
    fn file_names_replace_spaces() {
        assert_eq!(
            export_file_name("South Korea", ExportKind::Annual),
            "South_Korea_annual_anomaly.csv"
        );
        assert_eq!(
            export_file_name("United Kingdom (Europe)", ExportKind::Decade),
            "United_Kingdom_(Europe)_decade_anomaly.csv"
        );
    }

    #[test]
    fn missing_temperature_is_blank() {
        let mut buf = Vec::new();
        let recs = [AnnualRecord { year: 1900, anomaly: -0.25, temperature: None }];
        write_annual_csv(&recs, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Year,Anomaly,Temperature\n1900,-0.25,\n");
    }
}
