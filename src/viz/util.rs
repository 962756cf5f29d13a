//! Utility functions for visualization: palettes, color scales, bounds, dashes.

use super::types::Rgb8;
use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [Rgb8; 10] = [
    Rgb8::new(68, 114, 196),  // blue      (#4472C4)
    Rgb8::new(237, 125, 49),  // orange    (#ED7D31)
    Rgb8::new(165, 165, 165), // gray      (#A5A5A5)
    Rgb8::new(255, 192, 0),   // gold      (#FFC000)
    Rgb8::new(91, 155, 213),  // light blue(#5B9BD5)
    Rgb8::new(112, 173, 71),  // green     (#70AD47)
    Rgb8::new(38, 68, 120),   // dark blue (#264478)
    Rgb8::new(158, 72, 14),   // dark org. (#9E480E)
    Rgb8::new(99, 99, 99),    // dark gray (#636363)
    Rgb8::new(153, 115, 0),   // brownish  (#997300)
];

/// ColorBrewer RdBu (11 classes), ordered cold to warm.
const BLUE_TO_RED: [Rgb8; 11] = [
    Rgb8::new(5, 48, 97),
    Rgb8::new(33, 102, 172),
    Rgb8::new(67, 147, 195),
    Rgb8::new(146, 197, 222),
    Rgb8::new(209, 229, 240),
    Rgb8::new(247, 247, 247),
    Rgb8::new(253, 219, 199),
    Rgb8::new(244, 165, 130),
    Rgb8::new(214, 96, 77),
    Rgb8::new(178, 24, 43),
    Rgb8::new(103, 0, 31),
];

/// Anomaly domain mapped onto the stripe scale; values outside are clamped.
pub const STRIPE_DOMAIN: (f64, f64) = (-2.0, 2.0);

/// Get a color from the Office palette.
#[inline]
pub fn office_rgb(idx: usize) -> Rgb8 {
    OFFICE10[idx % OFFICE10.len()]
}

#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    to_plotters(office_rgb(idx)).to_rgba()
}

#[inline]
pub fn to_plotters(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Warming-stripe color for an anomaly: blue below zero, red above.
pub fn stripe_rgb(anomaly: f64) -> Rgb8 {
    let (lo, hi) = STRIPE_DOMAIN;
    let t = if anomaly.is_finite() {
        ((anomaly - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let pos = t * (BLUE_TO_RED.len() - 1) as f64;
    let i = (pos.floor() as usize).min(BLUE_TO_RED.len() - 2);
    let f = pos - i as f64;
    let (a, b) = (BLUE_TO_RED[i], BLUE_TO_RED[i + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    Rgb8::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

/// Padded `(min, max)` over `values` plus any `anchors` that must stay visible.
///
/// Returns `None` when there is nothing finite to bound. A flat range is
/// widened by one unit each side.
pub fn value_bounds<I>(values: I, anchors: &[f64]) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut any = false;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        any = true;
        min = min.min(v);
        max = max.max(v);
    }
    if !any {
        return None;
    }
    for a in anchors {
        min = min.min(*a);
        max = max.max(*a);
    }
    if (max - min).abs() < f64::EPSILON {
        return Some((min - 1.0, max + 1.0));
    }
    let pad = (max - min) * 0.05;
    Some((min - pad, max + pad))
}

/// X-intervals `(from, to)` of a dash pattern laid over `[x0, x1]`.
pub fn dash_spans(x0: f64, x1: f64, dash: f64, gap: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::new();
    if dash.is_nan() || dash <= 0.0 || gap < 0.0 || x1 <= x0 {
        return out;
    }
    let mut x = x0;
    while x < x1 {
        out.push((x, (x + dash).min(x1)));
        x += dash + gap;
    }
    out
}

/// Split an aligned optional series into runs of consecutive present values.
pub fn contiguous_runs(xs: &[f64], ys: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut cur: Vec<(f64, f64)> = Vec::new();
    for (x, y) in xs.iter().zip(ys) {
        match y {
            Some(v) => cur.push((*x, *v)),
            None if !cur.is_empty() => runs.push(std::mem::take(&mut cur)),
            None => {}
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripe_scale_endpoints() {
        assert_eq!(stripe_rgb(-2.0), BLUE_TO_RED[0]);
        assert_eq!(stripe_rgb(-5.0), BLUE_TO_RED[0]);
        assert_eq!(stripe_rgb(0.0), BLUE_TO_RED[5]);
        assert_eq!(stripe_rgb(2.0), BLUE_TO_RED[10]);
        let warm = stripe_rgb(1.0);
        assert!(warm.r > warm.b);
        let cool = stripe_rgb(-1.0);
        assert!(cool.b > cool.r);
    }

    #[test]
    fn bounds_include_anchors_and_widen_flat() {
        let (lo, hi) = value_bounds([0.2, 0.4], &[0.0, 1.5]).unwrap();
        assert!(lo < 0.0 && hi > 1.5);
        assert_eq!(value_bounds([3.0], &[]), Some((2.0, 4.0)));
        assert_eq!(value_bounds(Vec::<f64>::new(), &[0.0]), None);
    }

    #[test]
    fn dashes_cover_range() {
        let spans = dash_spans(0.0, 10.0, 2.0, 1.0);
        assert_eq!(spans.first(), Some(&(0.0, 2.0)));
        assert_eq!(spans.last(), Some(&(9.0, 10.0)));
        assert_eq!(spans.len(), 4);
        assert!(dash_spans(5.0, 5.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn runs_split_on_gaps() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [None, Some(1.0), Some(2.0), None, Some(3.0)];
        let runs = contiguous_runs(&xs, &ys);
        assert_eq!(runs, vec![vec![(2.0, 1.0), (3.0, 2.0)], vec![(5.0, 3.0)]]);
    }
}
