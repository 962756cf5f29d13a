/*!
 * Desktop dashboard for cdx-rs - country temperature anomaly explorer
 *
 * Sidebar controls drive one recomputation pass per change; the central panel
 * shows key metrics, four chart tabs, the climate story, Paris Agreement
 * progress and CSV downloads.
 */

use cdx_rs::dashboard::{self, DashboardView, MAX_MA_WINDOW, MIN_MA_WINDOW, Selection};
use cdx_rs::dataset::{self, DEFAULT_DATA_PATH, Dataset};
use cdx_rs::models::YearRange;
use cdx_rs::narrative::{KeyMetrics, PARIS_TARGET_C, TrendDirection};
use cdx_rs::storage::{self, ExportKind};
use cdx_rs::viz::types::{
    BASELINE_COLOR, COOL_BAR_COLOR, MOVING_AVG_COLOR, PARIS_COLOR, POINT_COLOR, Rgb8, TREND_COLOR,
    WARM_BAR_COLOR,
};
use cdx_rs::viz::util::{office_rgb, stripe_rgb};
use cdx_rs::ExplorerError;
use clap::Parser;
use eframe::egui::{self, Color32, RichText};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points};
use std::path::PathBuf;

const CITATION: &str = "Data: country surface temperature anomalies (Years, Anomaly, Temperature) \
    as distributed in ddbb_surface_temperature_countries.csv.";

#[derive(Parser, Debug)]
#[command(name = "cdx-gui", version, about = "Climate Data Explorer dashboard")]
struct GuiArgs {
    /// Dataset CSV with the columns Country, Years, Anomaly, Temperature.
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let args = GuiArgs::parse();

    let loaded = dataset::load_csv(&args.data).map(dataset::install);
    if let Err(e) = &loaded {
        log::error!("{e}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Climate Data Explorer - cdx-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Data Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(loaded)))),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tab {
    TimeSeries,
    Stripes,
    Decades,
    Comparison,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::TimeSeries, Tab::Stripes, Tab::Decades, Tab::Comparison];

    fn title(self) -> &'static str {
        match self {
            Tab::TimeSeries => "📈 Time Series",
            Tab::Stripes => "🌡 Warming Stripes",
            Tab::Decades => "📊 Decade Analysis",
            Tab::Comparison => "🌍 Country Comparison",
        }
    }
}

/// Dataset-dependent page state. Absent when loading failed.
struct Page {
    data: &'static Dataset,
    countries: Vec<String>,
    span: YearRange,
    selection: Selection,
    /// Last computed pass and the selection it was computed for.
    cached: Option<(Selection, Result<DashboardView, ExplorerError>)>,
}

struct ExplorerApp {
    page: Result<Page, String>,
    tab: Tab,
    status_message: String,
    error_message: String,
}

fn color(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

impl ExplorerApp {
    fn new(loaded: Result<&'static Dataset, ExplorerError>) -> Self {
        let page = loaded.map_err(|e| e.to_string()).and_then(|data| {
            let span = data
                .year_span()
                .ok_or_else(|| "The dataset contains no usable observations.".to_string())?;
            let selection = Selection::defaults_for(data)
                .ok_or_else(|| "The dataset contains no usable observations.".to_string())?;
            Ok(Page {
                data,
                countries: data.countries(),
                span,
                selection,
                cached: None,
            })
        });
        Self {
            page,
            tab: Tab::TimeSeries,
            status_message: String::new(),
            error_message: String::new(),
        }
    }
}

impl Page {
    /// Recompute only when the selection changed since the last pass.
    fn refresh(&mut self) {
        self.selection = self.selection.clone().normalized(self.span);
        let stale = match &self.cached {
            Some((sel, _)) => *sel != self.selection,
            None => true,
        };
        if stale {
            let view = dashboard::compute(self.data, &self.selection);
            self.cached = Some((self.selection.clone(), view));
        }
    }

    fn sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("🌡 Climate Explorer");
        ui.add_space(8.0);

        ui.label(RichText::new("Country").strong());
        let sel = &mut self.selection;
        egui::ComboBox::from_id_salt("country")
            .selected_text(sel.country.as_str())
            .width(220.0)
            .show_ui(ui, |ui| {
                for c in &self.countries {
                    ui.selectable_value(&mut sel.country, c.clone(), c.as_str());
                }
            });
        ui.add_space(8.0);

        ui.label(RichText::new("Year range").strong());
        ui.horizontal(|ui| {
            let end = sel.years.end;
            ui.add(egui::DragValue::new(&mut sel.years.start).range(self.span.start..=end));
            ui.label("to");
            let start = sel.years.start;
            ui.add(egui::DragValue::new(&mut sel.years.end).range(start..=self.span.end));
        });
        ui.add_space(8.0);

        ui.label(RichText::new("Display options").strong());
        ui.checkbox(&mut sel.show_trend, "Show Trend Line");
        ui.checkbox(&mut sel.show_moving_avg, "Show Moving Average");
        if sel.show_moving_avg {
            ui.add(
                egui::Slider::new(&mut sel.ma_window, MIN_MA_WINDOW..=MAX_MA_WINDOW)
                    .text("window (years)"),
            );
        }

        ui.add_space(12.0);
        ui.separator();
        ui.collapsing("About", |ui| {
            ui.label(
                "Temperature anomalies are departures from a long-term reference \
                 average. Positive values are warmer than the reference, negative \
                 values cooler.",
            );
            ui.label(format!(
                "The Paris Agreement aims to limit warming to {PARIS_TARGET_C}°C \
                 above pre-industrial levels."
            ));
            ui.label(format!(
                "{} countries, {} observations.",
                self.countries.len(),
                self.data.len()
            ));
        });
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let page = match &mut self.page {
            Ok(page) => page,
            Err(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("🌍 Climate Data Explorer");
                    ui.add_space(10.0);
                    ui.colored_label(Color32::RED, message.as_str());
                });
                return;
            }
        };

        egui::SidePanel::left("controls")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| page.sidebar(ui));
            });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.label(RichText::new(CITATION).small().weak());
        });

        page.refresh();

        let tab = &mut self.tab;
        let status_message = &mut self.status_message;
        let error_message = &mut self.error_message;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("🌍 Climate Data Explorer");
                ui.label("Exploring global temperature anomalies by country");
                ui.add_space(10.0);

                let Some((sel, result)) = &page.cached else {
                    return;
                };
                let view = match result {
                    Ok(view) => view,
                    Err(e) => {
                        ui.colored_label(Color32::from_rgb(230, 126, 34), e.to_string());
                        return;
                    }
                };

                metrics_row(ui, view);
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    for t in Tab::ALL {
                        ui.selectable_value(tab, t, t.title());
                    }
                });
                ui.separator();
                match *tab {
                    Tab::TimeSeries => time_series_tab(ui, view),
                    Tab::Stripes => stripes_tab(ui, view),
                    Tab::Decades => decades_tab(ui, view),
                    Tab::Comparison => comparison_tab(ui, view, &page.countries, &mut page.selection),
                }

                ui.add_space(12.0);
                ui.separator();
                story_section(ui, view);

                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("📥 Download Data").size(16.0).strong());
                ui.horizontal(|ui| {
                    if ui.button("Download Annual Data (CSV)").clicked() {
                        let name = storage::export_file_name(&sel.country, ExportKind::Annual);
                        let res = save_dialog(&name)
                            .map(|p| storage::save_annual_csv(&view.annual, &p).map(|_| p));
                        report(res, status_message, error_message);
                    }
                    if ui.button("Download Decade Data (CSV)").clicked() {
                        let name = storage::export_file_name(&sel.country, ExportKind::Decade);
                        let res = save_dialog(&name)
                            .map(|p| storage::save_decade_csv(&view.decades, &p).map(|_| p));
                        report(res, status_message, error_message);
                    }
                });
                if !status_message.is_empty() {
                    ui.colored_label(Color32::DARK_GREEN, status_message.as_str());
                }
                if !error_message.is_empty() {
                    ui.colored_label(Color32::RED, error_message.as_str());
                }
            });
        });
    }
}

fn save_dialog(file_name: &str) -> Option<PathBuf> {
    let start = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    rfd::FileDialog::new()
        .set_directory(start)
        .set_file_name(file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
}

/// `None` means the dialog was cancelled.
fn report(
    res: Option<Result<PathBuf, ExplorerError>>,
    status_message: &mut String,
    error_message: &mut String,
) {
    match res {
        None => {}
        Some(Ok(path)) => {
            *status_message = format!("Saved {}", path.display());
            error_message.clear();
        }
        Some(Err(e)) => {
            *error_message = format!("Failed to save CSV: {e}");
            status_message.clear();
        }
    }
}

fn metric(ui: &mut egui::Ui, label: String, value: f64, delta: Option<f64>) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(format!("{value:.2}°C")).size(22.0).strong());
        if let Some(d) = delta {
            let c = if d > 0.0 {
                color(WARM_BAR_COLOR)
            } else {
                color(COOL_BAR_COLOR)
            };
            ui.colored_label(c, delta_label(d));
        }
    });
}

/// The latest card's delta is the latest anomaly itself (departure from the baseline).
fn latest_delta(m: &KeyMetrics) -> f64 {
    m.latest.anomaly
}

fn delta_label(d: f64) -> String {
    format!("{d:+.2}°C")
}

fn metrics_row(ui: &mut egui::Ui, view: &DashboardView) {
    let m = &view.metrics;
    ui.columns(4, |cols| {
        metric(
            &mut cols[0],
            format!("Latest ({})", m.latest.year),
            m.latest.anomaly,
            Some(latest_delta(m)),
        );
        metric(&mut cols[1], "Period Average".to_string(), m.mean, None);
        metric(
            &mut cols[2],
            format!("Hottest ({})", m.hottest.year),
            m.hottest.anomaly,
            None,
        );
        metric(
            &mut cols[3],
            format!("Coldest ({})", m.coldest.year),
            m.coldest.anomaly,
            None,
        );
    });
}

fn time_series_tab(ui: &mut egui::Ui, view: &DashboardView) {
    let sel = &view.selection;
    ui.label(
        RichText::new(format!("Temperature Anomaly: {} ({})", sel.country, sel.years)).strong(),
    );
    Plot::new("time_series")
        .height(380.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Temperature Anomaly (°C)")
        .show(ui, |plot_ui| {
            let pts: PlotPoints = view
                .annual
                .iter()
                .map(|r| [r.year as f64, r.anomaly])
                .collect();
            plot_ui.points(
                Points::new(pts)
                    .radius(3.0)
                    .color(color(POINT_COLOR).gamma_multiply(0.6))
                    .name("Annual Anomaly"),
            );

            if let Some(ma) = &view.moving_average {
                let pts: PlotPoints = view
                    .annual
                    .iter()
                    .zip(ma)
                    .filter_map(|(r, v)| v.map(|v| [r.year as f64, v]))
                    .collect();
                plot_ui.line(
                    Line::new(pts)
                        .color(color(MOVING_AVG_COLOR))
                        .width(3.0)
                        .name(format!("{}-Year Moving Avg", sel.ma_window)),
                );
            }

            if let Some(trend) = &view.trend {
                let pts: PlotPoints = trend.iter().map(|t| [t.year as f64, t.anomaly]).collect();
                plot_ui.line(
                    Line::new(pts)
                        .color(color(TREND_COLOR))
                        .width(2.0)
                        .style(LineStyle::dashed_loose())
                        .name("Linear Trend"),
                );
            }

            plot_ui.hline(
                HLine::new(0.0)
                    .color(color(BASELINE_COLOR))
                    .style(LineStyle::dashed_dense()),
            );
            plot_ui.hline(
                HLine::new(PARIS_TARGET_C)
                    .color(color(PARIS_COLOR))
                    .style(LineStyle::dotted_dense())
                    .name(format!("Paris Agreement ({PARIS_TARGET_C}°C)")),
            );
        });
    if let Some(fit) = view.fit {
        ui.label(format!("Linear trend: {:+.3}°C per decade", fit.per_decade()));
    }
}

fn stripes_tab(ui: &mut egui::Ui, view: &DashboardView) {
    ui.label(RichText::new(format!("Warming Stripes: {}", view.selection.country)).strong());
    ui.label("Each stripe is one year, colored by its anomaly: blue is cooler, red is warmer.");
    let sel = view.selection.years;
    let years = (sel.end - sel.start + 1).max(1) as f32;
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 240.0), egui::Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    let step = rect.width() / years;
    for r in &view.annual {
        let x0 = rect.left() + (r.year - sel.start) as f32 * step;
        let stripe = egui::Rect::from_min_max(
            egui::pos2(x0, rect.top()),
            egui::pos2(x0 + step, rect.bottom()),
        );
        painter.rect_filled(stripe, 0.0, color(stripe_rgb(r.anomaly)));
    }
    ui.horizontal(|ui| {
        ui.label(sel.start.to_string());
        ui.add_space((width - 80.0).max(0.0));
        ui.label(sel.end.to_string());
    });
}

fn decades_tab(ui: &mut egui::Ui, view: &DashboardView) {
    ui.label(RichText::new(format!("Average Anomaly by Decade: {}", view.selection.country)).strong());
    Plot::new("decades")
        .height(320.0)
        .x_axis_label("Decade")
        .y_axis_label("Average Anomaly (°C)")
        .show(ui, |plot_ui| {
            let bars = view
                .decades
                .iter()
                .map(|d| {
                    let fill = if d.anomaly > 0.0 {
                        WARM_BAR_COLOR
                    } else {
                        COOL_BAR_COLOR
                    };
                    Bar::new(d.decade as f64 + 5.0, d.anomaly)
                        .width(8.0)
                        .fill(color(fill))
                        .name(format!("{}s", d.decade))
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name("Decade average"));
            plot_ui.hline(HLine::new(0.0).color(Color32::BLACK).width(1.0));
        });

    egui::Grid::new("decade_table")
        .striped(true)
        .min_col_width(80.0)
        .show(ui, |ui| {
            ui.label(RichText::new("Decade").strong());
            ui.label(RichText::new("Avg Anomaly (°C)").strong());
            ui.end_row();
            for d in &view.decades {
                ui.label(d.decade.to_string());
                ui.label(format!("{:.3}", d.anomaly));
                ui.end_row();
            }
        });
}

fn comparison_tab(
    ui: &mut egui::Ui,
    view: &DashboardView,
    countries: &[String],
    selection: &mut Selection,
) {
    ui.label(RichText::new("Compare Temperature Anomalies").strong());
    ui.collapsing(format!("Select countries ({} selected)", selection.compare.len()), |ui| {
        egui::ScrollArea::vertical()
            .max_height(200.0)
            .show(ui, |ui| {
                for c in countries {
                    let mut on = selection.compare.contains(c);
                    if ui.checkbox(&mut on, c.as_str()).changed() {
                        if on {
                            selection.compare.push(c.clone());
                        } else {
                            selection.compare.retain(|k| k != c);
                        }
                        ui.ctx().request_repaint();
                    }
                }
            });
    });

    let cmp = match &view.comparison {
        Ok(cmp) => cmp,
        Err(e) => {
            ui.colored_label(Color32::from_rgb(230, 126, 34), e.to_string());
            return;
        }
    };

    Plot::new("comparison")
        .height(360.0)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Temperature Anomaly (°C)")
        .show(ui, |plot_ui| {
            for (i, s) in cmp.series.iter().enumerate() {
                let pts: PlotPoints = s
                    .records
                    .iter()
                    .map(|r| [r.year as f64, r.anomaly])
                    .collect();
                plot_ui.line(
                    Line::new(pts)
                        .color(color(office_rgb(i)))
                        .width(2.0)
                        .name(&s.country),
                );
            }
            plot_ui.hline(
                HLine::new(0.0)
                    .color(color(BASELINE_COLOR))
                    .style(LineStyle::dashed_dense()),
            );
        });

    egui::Grid::new("comparison_stats")
        .striped(true)
        .min_col_width(70.0)
        .show(ui, |ui| {
            for h in [
                "Country",
                "Avg Anomaly",
                "Max Anomaly",
                "Min Anomaly",
                "Hottest Year",
                "Data Points",
            ] {
                ui.label(RichText::new(h).strong());
            }
            ui.end_row();
            for r in &cmp.rows {
                ui.label(r.country.as_str());
                ui.label(format!("{:.3}", r.avg_anomaly));
                ui.label(format!("{:.3}", r.max_anomaly));
                ui.label(format!("{:.3}", r.min_anomaly));
                ui.label(r.hottest_year.to_string());
                ui.label(r.point_count.to_string());
                ui.end_row();
            }
        });
}

fn story_section(ui: &mut egui::Ui, view: &DashboardView) {
    let story = &view.story;
    ui.label(RichText::new("📖 Climate Story").size(16.0).strong());
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(story.render());
        });

    if let Some(d) = story.split.direction() {
        let c = match d {
            TrendDirection::Warming => color(WARM_BAR_COLOR),
            TrendDirection::Cooling => color(COOL_BAR_COLOR),
        };
        ui.colored_label(c, d.label());
    }

    ui.add_space(8.0);
    ui.label(RichText::new("Paris Agreement Progress").strong());
    let p = &story.paris;
    ui.add(
        egui::ProgressBar::new(p.bar_fraction())
            .text(format!("{:.1}% of {PARIS_TARGET_C}°C target", p.percent)),
    );
    let c = if p.exceeded {
        Color32::RED
    } else {
        Color32::from_rgb(40, 167, 69)
    };
    ui.colored_label(c, p.message());
}
