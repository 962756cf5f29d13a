//! Public types and constants for the visualization module.

use crate::models::{AnnualRecord, YearRange};
use crate::trend::TrendPoint;

/// Charts this module can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Annual points with moving average, trend, zero baseline and Paris line.
    TimeSeries,
    /// One colored stripe per year.
    WarmingStripes,
    /// Bars of decade averages.
    Decades,
    /// One line per comparison country.
    Comparison,
}

/// Plain 8-bit RGB, shared by the file renderers and the desktop dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const POINT_COLOR: Rgb8 = Rgb8::new(70, 130, 180); // steelblue
pub const MOVING_AVG_COLOR: Rgb8 = Rgb8::new(231, 76, 60); // #e74c3c
pub const TREND_COLOR: Rgb8 = Rgb8::new(46, 204, 113); // #2ecc71
pub const BASELINE_COLOR: Rgb8 = Rgb8::new(128, 128, 128);
pub const PARIS_COLOR: Rgb8 = Rgb8::new(255, 0, 0);
pub const WARM_BAR_COLOR: Rgb8 = Rgb8::new(231, 76, 60); // #e74c3c
pub const COOL_BAR_COLOR: Rgb8 = Rgb8::new(52, 152, 219); // #3498db

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Layers of the time-series chart. Optional layers are skipped when `None`.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesLayers<'a> {
    pub country: &'a str,
    pub range: YearRange,
    pub annual: &'a [AnnualRecord],
    /// Aligned with `annual`.
    pub moving_average: Option<&'a [Option<f64>]>,
    pub trend: Option<&'a [TrendPoint]>,
}
