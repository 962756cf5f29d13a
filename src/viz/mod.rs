//! Visualization utilities: render dashboard charts to **SVG** or **PNG**.
//!
//! - Time series: annual points, centred moving average, dashed trend line,
//!   zero baseline and the Paris 1.5°C reference
//! - Warming stripes on a diverging blue/red scale
//! - Decade bars colored by sign
//! - Multi-country comparison lines (Microsoft Office palette)
//!
//! The backend is picked from the file extension: `.svg` writes SVG, anything
//! else goes through the bitmap backend.

pub mod types;
pub mod util;

pub use types::{ChartKind, DEFAULT_HEIGHT, DEFAULT_WIDTH, Rgb8, TimeSeriesLayers};

use crate::dashboard::DashboardView;
use crate::models::{AnnualRecord, CountrySeries, DecadeRecord, YearRange};
use crate::narrative::PARIS_TARGET_C;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;

use types::{
    BASELINE_COLOR, COOL_BAR_COLOR, MOVING_AVG_COLOR, PARIS_COLOR, POINT_COLOR, TREND_COLOR,
    WARM_BAR_COLOR,
};
use util::{contiguous_runs, dash_spans, office_color, stripe_rgb, to_plotters, value_bounds};

const MARGIN: u32 = 16;

/// Bundled sans-serif face for the `ab_glyph` text path, which does not see OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            log::warn!("bundled chart font could not be registered");
        }
    });
}

/// Open the backend matching the extension of `$path` and run `$draw` on its root area.
macro_rules! render_to {
    ($path:expr, $size:expr, $draw:expr) => {{
        ensure_fonts_registered();
        let out_path: &Path = $path.as_ref();
        let path_string = out_path.to_string_lossy().into_owned();
        if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
            let root = SVGBackend::new(path_string.as_str(), $size).into_drawing_area();
            $draw(root)
        } else {
            let root = BitMapBackend::new(path_string.as_str(), $size).into_drawing_area();
            $draw(root)
        }
    }};
}

/// Render one chart of a computed view.
///
/// ### Errors
/// - `Comparison` when the view carries no comparison (none selected)
/// - anything the backend reports while drawing or writing the file
pub fn plot_view<P: AsRef<Path>>(
    view: &DashboardView,
    kind: ChartKind,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let sel = &view.selection;
    match kind {
        ChartKind::TimeSeries => plot_time_series(
            &TimeSeriesLayers {
                country: &sel.country,
                range: sel.years,
                annual: &view.annual,
                moving_average: view.moving_average.as_deref(),
                trend: view.trend.as_deref(),
            },
            out_path,
            width,
            height,
        ),
        ChartKind::WarmingStripes => {
            plot_warming_stripes(&sel.country, sel.years, &view.annual, out_path, width, height)
        }
        ChartKind::Decades => plot_decades(&sel.country, &view.decades, out_path, width, height),
        ChartKind::Comparison => match &view.comparison {
            Ok(cmp) => plot_comparison(&cmp.series, sel.years, out_path, width, height),
            Err(e) => Err(anyhow!("comparison chart unavailable: {e}")),
        },
    }
}

/// Annual anomaly chart with its optional overlays.
pub fn plot_time_series<P: AsRef<Path>>(
    layers: &TimeSeriesLayers<'_>,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if layers.annual.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    render_to!(out_path, (width, height), |root| draw_time_series(root, layers))
}

fn draw_time_series<DB>(root: DrawingArea<DB, Shift>, layers: &TimeSeriesLayers<'_>) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let ma = layers.moving_average.unwrap_or(&[]);
    let trend = layers.trend.unwrap_or(&[]);
    let values = layers
        .annual
        .iter()
        .map(|r| r.anomaly)
        .chain(ma.iter().flatten().copied())
        .chain(trend.iter().map(|t| t.anomaly));
    let (y_min, y_max) =
        value_bounds(values, &[0.0, PARIS_TARGET_C]).ok_or_else(|| anyhow!("no numeric values to plot"))?;

    let (x_min, x_max) = x_domain(layers.range);

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(
            format!("Temperature Anomaly Over Time: {}", layers.country),
            (FontFamily::SansSerif, 22),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| format!("{:.2}", v);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Temperature Anomaly (°C)")
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    // Reference lines first so the data sits on top of them.
    let gray = to_plotters(BASELINE_COLOR);
    let baseline = ShapeStyle {
        color: gray.to_rgba(),
        filled: false,
        stroke_width: 1,
    };
    let dash = ((x_max - x_min) / 80.0).max(0.25);
    chart
        .draw_series(
            dash_spans(x_min, x_max, dash, dash * 0.6)
                .into_iter()
                .map(|(a, b)| PathElement::new(vec![(a, 0.0), (b, 0.0)], baseline)),
        )
        .map_err(|e| anyhow!("{:?}", e))?
        .label("Zero baseline")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], gray));

    let paris = to_plotters(PARIS_COLOR);
    chart
        .draw_series(LineSeries::new(
            vec![(x_min, PARIS_TARGET_C), (x_max, PARIS_TARGET_C)],
            paris.stroke_width(2),
        ))
        .map_err(|e| anyhow!("{:?}", e))?
        .label(format!("Paris Agreement {PARIS_TARGET_C}°C target"))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], paris.stroke_width(2)));

    let point = to_plotters(POINT_COLOR).mix(0.6);
    chart
        .draw_series(
            layers
                .annual
                .iter()
                .map(|r| Circle::new((r.year as f64, r.anomaly), 3, point.filled())),
        )
        .map_err(|e| anyhow!("{:?}", e))?
        .label("Annual anomaly")
        .legend(move |(x, y)| Circle::new((x + 10, y), 4, point.filled()));

    if let Some(ma) = layers.moving_average {
        let red = to_plotters(MOVING_AVG_COLOR);
        let xs: Vec<f64> = layers.annual.iter().map(|r| r.year as f64).collect();
        let mut labelled = false;
        for run in contiguous_runs(&xs, ma) {
            let elem = chart
                .draw_series(LineSeries::new(run, red.stroke_width(3)))
                .map_err(|e| anyhow!("{:?}", e))?;
            if !labelled {
                elem.label("Moving average")
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], red.stroke_width(3)));
                labelled = true;
            }
        }
    }

    if let (Some(first), Some(last)) = (trend.first(), trend.last()) {
        let green = to_plotters(TREND_COLOR);
        let (x0, y0) = (first.year as f64, first.anomaly);
        let (x1, y1) = (last.year as f64, last.anomaly);
        let slope = if x1 > x0 { (y1 - y0) / (x1 - x0) } else { 0.0 };
        let at = move |x: f64| y0 + slope * (x - x0);
        chart
            .draw_series(
                dash_spans(x0, x1, dash * 1.5, dash)
                    .into_iter()
                    .map(|(a, b)| PathElement::new(vec![(a, at(a)), (b, at(b))], green.stroke_width(2))),
            )
            .map_err(|e| anyhow!("{:?}", e))?
            .label("Linear trend")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], green.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// One stripe per year of `records`, colored by anomaly.
pub fn plot_warming_stripes<P: AsRef<Path>>(
    country: &str,
    range: YearRange,
    records: &[AnnualRecord],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if records.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    render_to!(out_path, (width, height), |root| draw_stripes(
        root, country, range, records
    ))
}

fn draw_stripes<DB>(
    root: DrawingArea<DB, Shift>,
    country: &str,
    range: YearRange,
    records: &[AnnualRecord],
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let x_min = range.start as f64;
    let x_max = (range.end + 1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(
            format!("Warming Stripes: {country} ({range})"),
            (FontFamily::SansSerif, 22),
        )
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_min..x_max, 0.0..1.0)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_y_axis()
        .x_labels(((range.end - range.start) / 10 + 1).clamp(2, 30) as usize)
        .x_label_formatter(&x_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .draw_series(records.iter().map(|r| {
            let c = to_plotters(stripe_rgb(r.anomaly));
            let x = r.year as f64;
            Rectangle::new([(x, 0.0), (x + 1.0, 1.0)], c.filled())
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Decade averages as bars: red above zero, blue otherwise.
pub fn plot_decades<P: AsRef<Path>>(
    country: &str,
    decades: &[DecadeRecord],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if decades.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    render_to!(out_path, (width, height), |root| draw_decades(root, country, decades))
}

fn draw_decades<DB>(root: DrawingArea<DB, Shift>, country: &str, decades: &[DecadeRecord]) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let (y_min, y_max) = value_bounds(decades.iter().map(|d| d.anomaly), &[0.0])
        .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let first = decades.first().map(|d| d.decade).unwrap_or_default();
    let last = decades.last().map(|d| d.decade).unwrap_or_default();
    let (x_min, x_max) = (first as f64, (last + 10) as f64);

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(
            format!("Temperature by Decade: {country}"),
            (FontFamily::SansSerif, 22),
        )
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| format!("{}s", x.round() as i32);
    let y_label_fmt = |v: &f64| format!("{:.2}", v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Decade")
        .y_desc("Average Anomaly (°C)")
        .x_labels(decades.len().clamp(2, 30))
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .draw_series(decades.iter().map(|d| {
            let color = if d.anomaly > 0.0 {
                WARM_BAR_COLOR
            } else {
                COOL_BAR_COLOR
            };
            let x0 = d.decade as f64 + 1.0;
            Rectangle::new([(x0, 0.0), (x0 + 8.0, d.anomaly)], to_plotters(color).filled())
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// One line per country over the shared year range.
pub fn plot_comparison<P: AsRef<Path>>(
    series: &[CountrySeries],
    range: YearRange,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if series.iter().all(|s| s.records.is_empty()) {
        return Err(anyhow!("no data to plot"));
    }
    render_to!(out_path, (width, height), |root| draw_comparison(root, series, range))
}

fn draw_comparison<DB>(root: DrawingArea<DB, Shift>, series: &[CountrySeries], range: YearRange) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let (y_min, y_max) = value_bounds(
        series.iter().flat_map(|s| s.records.iter().map(|r| r.anomaly)),
        &[],
    )
    .ok_or_else(|| anyhow!("no numeric values to plot"))?;
    let (x_min, x_max) = x_domain(range);

    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption("Country Comparison", (FontFamily::SansSerif, 22))
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_label_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_label_fmt = |v: &f64| format!("{:.2}", v);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Temperature Anomaly (°C)")
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (idx, s) in series.iter().enumerate() {
        let color = office_color(idx);
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };
        let points: Vec<(f64, f64)> = s.records.iter().map(|r| (r.year as f64, r.anomaly)).collect();
        chart
            .draw_series(LineSeries::new(points, style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(s.country.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// X axis over the selected years; a single year is widened so the axis is not empty.
fn x_domain(range: YearRange) -> (f64, f64) {
    if range.start == range.end {
        ((range.start - 1) as f64, (range.end + 1) as f64)
    } else {
        (range.start as f64, range.end as f64)
    }
}
