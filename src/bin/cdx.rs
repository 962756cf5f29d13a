use anyhow::{Context, Result};
use cdx_rs::dashboard::{self, DEFAULT_MA_WINDOW, Selection};
use cdx_rs::dataset::{self, DEFAULT_DATA_PATH, Dataset};
use cdx_rs::models::{ComparisonRow, YearRange, parse_list};
use cdx_rs::storage::{self, ExportKind};
use cdx_rs::viz::{self, ChartKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use cdx_rs::ExplorerError;
use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{Locale, ToFormattedString};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "cdx",
    version,
    about = "Explore, chart & narrate country temperature anomalies"
)]
struct Cli {
    /// Dataset CSV with the columns Country, Years, Anomaly, Temperature.
    #[arg(long, global = true, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the countries in the dataset with their observation counts.
    Countries,
    /// Key metrics, decade averages and the climate story for one country.
    Show(ShowArgs),
    /// Compare summary statistics across countries.
    Compare(CompareArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Country name as it appears in the dataset (e.g., "South Korea").
    #[arg(short, long)]
    country: String,
    /// Year range (YYYY:YYYY) or a single year. Defaults to 1900 through the last year.
    #[arg(short, long)]
    years: Option<YearRange>,
    /// Moving-average window in years (5 to 20).
    #[arg(short, long, default_value_t = DEFAULT_MA_WINDOW)]
    window: usize,
    /// Leave out the linear trend line.
    #[arg(long, default_value_t = false)]
    no_trend: bool,
    /// Leave out the moving average.
    #[arg(long, default_value_t = false)]
    no_moving_avg: bool,
    /// Also compare against these countries (comma or semicolon separated).
    #[arg(long)]
    compare: Option<String>,
    /// Print the computed view as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Write the annual and decade CSV downloads into this directory.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Time-series chart (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Warming-stripes chart (.svg or .png).
    #[arg(long)]
    stripes: Option<PathBuf>,
    /// Decade bar chart (.svg or .png).
    #[arg(long)]
    decade_plot: Option<PathBuf>,
    /// Width of the charts.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
    /// Height of the charts.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Countries separated by comma or semicolon (e.g., "Japan,Germany").
    #[arg(short, long)]
    countries: String,
    /// Year range (YYYY:YYYY) or a single year. Defaults to 1900 through the last year.
    #[arg(short, long)]
    years: Option<YearRange>,
    /// Save the statistics table (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Comparison chart (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,
}

fn fmt_c(v: f64) -> String {
    format!("{:.2}°C", v)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let data = dataset::install(dataset::load_csv(&cli.data)?);
    match cli.cmd {
        Command::Countries => cmd_countries(data),
        Command::Show(args) => cmd_show(data, args),
        Command::Compare(args) => cmd_compare(data, args),
    }
}

/// Page defaults adjusted by the command-line overrides.
fn base_selection(data: &Dataset, years: Option<YearRange>) -> Result<(Selection, YearRange)> {
    let span = data
        .year_span()
        .ok_or_else(|| anyhow::anyhow!("dataset contains no usable observations"))?;
    let mut sel = Selection::defaults_for(data)
        .ok_or_else(|| anyhow::anyhow!("dataset contains no usable observations"))?;
    if let Some(y) = years {
        sel.years = y;
    }
    Ok((sel, span))
}

fn cmd_countries(data: &Dataset) -> Result<()> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for o in data.observations() {
        *counts.entry(o.country.as_str()).or_default() += 1;
    }
    for (country, n) in &counts {
        println!("{country}\t{}", n.to_formatted_string(&Locale::en));
    }
    let span = data
        .year_span()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    eprintln!(
        "{} countries | {} observations | {}",
        counts.len(),
        data.len().to_formatted_string(&Locale::en),
        span
    );
    Ok(())
}

fn cmd_show(data: &Dataset, args: ShowArgs) -> Result<()> {
    let (mut sel, span) = base_selection(data, args.years)?;
    sel.country = args.country;
    sel.ma_window = args.window;
    sel.show_trend = !args.no_trend;
    sel.show_moving_avg = !args.no_moving_avg;
    sel.compare = args.compare.as_deref().map(parse_list).unwrap_or_default();
    let sel = sel.normalized(span);

    let view = match dashboard::compute(data, &sel) {
        Ok(v) => v,
        Err(e @ ExplorerError::EmptySelection { .. }) => {
            eprintln!("warning: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        let comparison = view.comparison.as_ref().ok().map(|c| &c.rows);
        let out = serde_json::json!({
            "selection": view.selection,
            "metrics": view.metrics,
            "annual": view.annual,
            "moving_average": view.moving_average,
            "trend": view.trend,
            "fit": view.fit,
            "decades": view.decades,
            "story": view.story,
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let m = &view.metrics;
        println!("Climate Data: {} ({})", sel.country, sel.years);
        println!(
            "Latest ({}): {}  | Period Average: {}  | Hottest ({}): {}  | Coldest ({}): {}",
            m.latest.year,
            fmt_c(m.latest.anomaly),
            fmt_c(m.mean),
            m.hottest.year,
            fmt_c(m.hottest.anomaly),
            m.coldest.year,
            fmt_c(m.coldest.anomaly),
        );
        if let Some(fit) = view.fit {
            println!("Linear trend: {:+.3}°C per decade", fit.per_decade());
        }
        println!();
        println!("Decade\tAvg Anomaly (°C)");
        for d in &view.decades {
            println!("{}\t{:.3}", d.decade, d.anomaly);
        }
        println!();
        print!("{}", view.story.render());
        if let Ok(cmp) = &view.comparison {
            println!();
            print_comparison(&cmp.rows);
        }
    }

    if let Some(dir) = args.export_dir.as_ref() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let annual_path = dir.join(storage::export_file_name(&sel.country, ExportKind::Annual));
        let decade_path = dir.join(storage::export_file_name(&sel.country, ExportKind::Decade));
        storage::save_annual_csv(&view.annual, &annual_path)?;
        storage::save_decade_csv(&view.decades, &decade_path)?;
        eprintln!(
            "Saved {} and {}",
            annual_path.display(),
            decade_path.display()
        );
    }

    let charts: [(Option<&PathBuf>, ChartKind); 3] = [
        (args.plot.as_ref(), ChartKind::TimeSeries),
        (args.stripes.as_ref(), ChartKind::WarmingStripes),
        (args.decade_plot.as_ref(), ChartKind::Decades),
    ];
    for (path, kind) in charts {
        if let Some(path) = path {
            viz::plot_view(&view, kind, path, args.width, args.height)?;
            eprintln!("Wrote plot to {}", path.display());
        }
    }
    Ok(())
}

fn print_comparison(rows: &[ComparisonRow]) {
    println!("Country\tAvg Anomaly\tMax Anomaly\tMin Anomaly\tHottest Year\tData Points");
    for r in rows {
        println!(
            "{}\t{:.3}\t{:.3}\t{:.3}\t{}\t{}",
            r.country, r.avg_anomaly, r.max_anomaly, r.min_anomaly, r.hottest_year, r.point_count
        );
    }
}

fn cmd_compare(data: &Dataset, args: CompareArgs) -> Result<()> {
    let (mut sel, span) = base_selection(data, args.years)?;
    sel.compare = parse_list(&args.countries);
    let sel = sel.normalized(span);

    let cmp = match dashboard::compute_comparison(data, &sel.compare, sel.years) {
        Ok(c) => c,
        Err(e @ ExplorerError::NoComparisonTargets) => {
            eprintln!("warning: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    print_comparison(&cmp.rows);

    if let Some(path) = args.out.as_ref() {
        save_rows(&cmp.rows, path, args.format.as_ref())?;
        eprintln!("Saved {} rows to {}", cmp.rows.len(), path.display());
    }
    if let Some(plot_path) = args.plot.as_ref() {
        viz::plot_comparison(&cmp.series, sel.years, plot_path, args.width, args.height)?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }
    Ok(())
}

fn save_rows(rows: &[ComparisonRow], path: &Path, format: Option<&OutFormat>) -> Result<()> {
    let fmt = match format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_comparison_csv(rows, path)?,
        "json" => storage::save_json(rows, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    Ok(())
}
