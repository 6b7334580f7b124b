//! SVG chart rendering for the report.
//!
//! Charts are written directly as SVG markup and embedded inline in the
//! HTML document, which keeps the report a single self-contained file.
//! Three mark types cover the report's needs: histogram bars, scatter
//! points, and time-series polylines (with gaps where the filtered channel
//! is missing).

use std::fmt::Write as _;

use crate::report::html::escape;

const WIDTH: f64 = 460.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 34.0;
const MARGIN_BOTTOM: f64 = 46.0;

const AXIS_COLOR: &str = "#555555";
const GRID_COLOR: &str = "#dddddd";
const BAR_COLOR: &str = "#4878a8";
const POINT_COLOR: &str = "#4878a8";
const RAW_LINE_COLOR: &str = "#8a9bb0";
const SMOOTH_LINE_COLOR: &str = "#c46a21";

/// Axis extents plus the data-to-pixel mapping
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    x_step: f64,
    y_step: f64,
}

impl Frame {
    fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Frame {
        let (x_min, x_max, x_step) = nice_bounds(x_min, x_max);
        let (y_min, y_max, y_step) = nice_bounds(y_min, y_max);
        Frame {
            x_min,
            x_max,
            y_min,
            y_max,
            x_step,
            y_step,
        }
    }

    fn sx(&self, x: f64) -> f64 {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (x - self.x_min) / (self.x_max - self.x_min) * plot_w
    }

    fn sy(&self, y: f64) -> f64 {
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (y - self.y_min) / (self.y_max - self.y_min) * plot_h
    }
}

/// Expand a data range to round bounds with a round tick step
///
/// Degenerate ranges (single value, all-equal data) are widened so the
/// frame never divides by zero.
fn nice_bounds(min: f64, max: f64) -> (f64, f64, f64) {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = max - min;
    let span = if span <= 0.0 || !span.is_finite() {
        if min == 0.0 {
            2.0
        } else {
            min.abs() * 0.2
        }
    } else {
        span
    };
    let (min, max) = if max - min <= 0.0 {
        (min - span / 2.0, max + span / 2.0)
    } else {
        (min, max)
    };

    let raw_step = (max - min) / 5.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let step = magnitude
        * if normalized <= 1.0 {
            1.0
        } else if normalized <= 2.0 {
            2.0
        } else if normalized <= 5.0 {
            5.0
        } else {
            10.0
        };

    let lo = (min / step).floor() * step;
    let hi = (max / step).ceil() * step;
    (lo, hi, step)
}

/// Tick positions for one axis
fn ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut v = min;
    // Half-step epsilon absorbs float drift at the top tick.
    while v <= max + step / 2.0 {
        out.push(v);
        v += step;
    }
    out
}

/// Format a tick value with just enough decimals for the step size
fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor() as i32).clamp(0, 3) as usize
    };
    format!("{:.*}", decimals, value)
}

fn svg_open(out: &mut String, title: &str) {
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" \
         role=\"img\" class=\"chart\">\n"
    );
    let _ = write!(
        out,
        "  <text x=\"{:.1}\" y=\"18\" text-anchor=\"middle\" font-size=\"13\" \
         font-weight=\"bold\" fill=\"#333\">{}</text>\n",
        WIDTH / 2.0,
        escape(title)
    );
}

fn svg_empty(title: &str) -> String {
    let mut out = String::new();
    svg_open(&mut out, title);
    let _ = write!(
        out,
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"12\" \
         fill=\"#888\">no data</text>\n</svg>\n",
        WIDTH / 2.0,
        HEIGHT / 2.0
    );
    out
}

/// Draw the axes, grid lines, tick labels, and axis titles for a frame
fn svg_axes(out: &mut String, frame: &Frame, x_label: &str, y_label: &str) {
    let x0 = MARGIN_LEFT;
    let x1 = WIDTH - MARGIN_RIGHT;
    let y0 = HEIGHT - MARGIN_BOTTOM;
    let y1 = MARGIN_TOP;

    for tx in ticks(frame.x_min, frame.x_max, frame.x_step) {
        let px = frame.sx(tx);
        let _ = write!(
            out,
            "  <line x1=\"{px:.1}\" y1=\"{y0:.1}\" x2=\"{px:.1}\" y2=\"{y1:.1}\" \
             stroke=\"{GRID_COLOR}\" stroke-width=\"0.5\"/>\n"
        );
        let _ = write!(
            out,
            "  <text x=\"{px:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"10\" \
             fill=\"#555\">{}</text>\n",
            y0 + 14.0,
            tick_label(tx, frame.x_step)
        );
    }
    for ty in ticks(frame.y_min, frame.y_max, frame.y_step) {
        let py = frame.sy(ty);
        let _ = write!(
            out,
            "  <line x1=\"{x0:.1}\" y1=\"{py:.1}\" x2=\"{x1:.1}\" y2=\"{py:.1}\" \
             stroke=\"{GRID_COLOR}\" stroke-width=\"0.5\"/>\n"
        );
        let _ = write!(
            out,
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" \
             fill=\"#555\">{}</text>\n",
            x0 - 6.0,
            py + 3.5,
            tick_label(ty, frame.y_step)
        );
    }

    let _ = write!(
        out,
        "  <line x1=\"{x0:.1}\" y1=\"{y0:.1}\" x2=\"{x1:.1}\" y2=\"{y0:.1}\" \
         stroke=\"{AXIS_COLOR}\" stroke-width=\"1\"/>\n"
    );
    let _ = write!(
        out,
        "  <line x1=\"{x0:.1}\" y1=\"{y0:.1}\" x2=\"{x0:.1}\" y2=\"{y1:.1}\" \
         stroke=\"{AXIS_COLOR}\" stroke-width=\"1\"/>\n"
    );

    let _ = write!(
        out,
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" \
         fill=\"#333\">{}</text>\n",
        (x0 + x1) / 2.0,
        HEIGHT - 10.0,
        escape(x_label)
    );
    let _ = write!(
        out,
        "  <text x=\"14\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#333\" \
         transform=\"rotate(-90 14 {:.1})\">{}</text>\n",
        (y0 + y1) / 2.0,
        (y0 + y1) / 2.0,
        escape(y_label)
    );
}

/// Render a histogram of one column
pub fn histogram(values: &[f64], bins: usize, title: &str, x_label: &str) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return svg_empty(title);
    }

    let lo = finite.iter().copied().fold(f64::MAX, f64::min);
    let hi = finite.iter().copied().fold(f64::MIN, f64::max);
    // All-equal data still gets one visible bar.
    let hi = if hi > lo { hi } else { lo + 1.0 };

    let bin_width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - lo) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1);

    let frame = Frame::new(lo, hi, 0.0, max_count as f64);
    let mut out = String::new();
    svg_open(&mut out, title);
    svg_axes(&mut out, &frame, x_label, "runs");

    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bx0 = frame.sx(lo + i as f64 * bin_width);
        let bx1 = frame.sx(lo + (i + 1) as f64 * bin_width);
        let by = frame.sy(count as f64);
        let base = frame.sy(0.0);
        let _ = write!(
            out,
            "  <rect x=\"{:.1}\" y=\"{by:.1}\" width=\"{:.1}\" height=\"{:.1}\" \
             fill=\"{BAR_COLOR}\" fill-opacity=\"0.85\" stroke=\"#ffffff\" stroke-width=\"0.5\"/>\n",
            bx0,
            (bx1 - bx0).max(0.5),
            (base - by).max(0.0)
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Render a scatter plot of paired columns
///
/// Pairs with a non-finite member are dropped.
pub fn scatter(points: &[(f64, f64)], title: &str, x_label: &str, y_label: &str) -> String {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if finite.is_empty() {
        return svg_empty(title);
    }

    let x_lo = finite.iter().map(|p| p.0).fold(f64::MAX, f64::min);
    let x_hi = finite.iter().map(|p| p.0).fold(f64::MIN, f64::max);
    let y_lo = finite.iter().map(|p| p.1).fold(f64::MAX, f64::min);
    let y_hi = finite.iter().map(|p| p.1).fold(f64::MIN, f64::max);

    let frame = Frame::new(x_lo, x_hi, y_lo, y_hi);
    let mut out = String::new();
    svg_open(&mut out, title);
    svg_axes(&mut out, &frame, x_label, y_label);

    for (x, y) in &finite {
        let _ = write!(
            out,
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3.5\" fill=\"{POINT_COLOR}\" \
             fill-opacity=\"0.7\"/>\n",
            frame.sx(*x),
            frame.sy(*y)
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Render a line plot of a raw channel
pub fn line(xs: &[f64], ys: &[f64], title: &str, x_label: &str, y_label: &str) -> String {
    let wrapped: Vec<Option<f64>> = ys.iter().copied().map(Some).collect();
    line_with_gaps(xs, &wrapped, RAW_LINE_COLOR, title, x_label, y_label)
}

/// Render a line plot of a channel with missing values
///
/// The polyline breaks at every `None`, so boundary-trimmed filtered
/// channels render with visible gaps at the sequence ends.
pub fn line_optional(
    xs: &[f64],
    ys: &[Option<f64>],
    title: &str,
    x_label: &str,
    y_label: &str,
) -> String {
    line_with_gaps(xs, ys, SMOOTH_LINE_COLOR, title, x_label, y_label)
}

fn line_with_gaps(
    xs: &[f64],
    ys: &[Option<f64>],
    color: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
) -> String {
    let n = xs.len().min(ys.len());
    let valid: Vec<(f64, f64)> = xs[..n]
        .iter()
        .zip(&ys[..n])
        .filter_map(|(&x, y)| y.filter(|v| v.is_finite() && x.is_finite()).map(|v| (x, v)))
        .collect();
    if valid.is_empty() {
        return svg_empty(title);
    }

    let x_lo = valid.iter().map(|p| p.0).fold(f64::MAX, f64::min);
    let x_hi = valid.iter().map(|p| p.0).fold(f64::MIN, f64::max);
    let y_lo = valid.iter().map(|p| p.1).fold(f64::MAX, f64::min);
    let y_hi = valid.iter().map(|p| p.1).fold(f64::MIN, f64::max);

    let frame = Frame::new(x_lo, x_hi, y_lo, y_hi);
    let mut out = String::new();
    svg_open(&mut out, title);
    svg_axes(&mut out, &frame, x_label, y_label);

    let mut segment: Vec<String> = Vec::new();
    let mut flush = |segment: &mut Vec<String>, out: &mut String| {
        if segment.len() > 1 {
            let _ = write!(
                out,
                "  <polyline points=\"{}\" fill=\"none\" stroke=\"{color}\" \
                 stroke-width=\"1.5\"/>\n",
                segment.join(" ")
            );
        } else if segment.len() == 1 {
            // Lone point between gaps: draw it so it is not silently lost.
            let _ = write!(
                out,
                "  <circle cx=\"{}\" r=\"1.5\" fill=\"{color}\"/>\n",
                segment[0].replace(',', "\" cy=\"")
            );
        }
        segment.clear();
    };

    for (&x, y) in xs[..n].iter().zip(&ys[..n]) {
        match y {
            Some(v) if v.is_finite() && x.is_finite() => {
                segment.push(format!("{:.1},{:.1}", frame.sx(x), frame.sy(*v)));
            }
            _ => flush(&mut segment, &mut out),
        }
    }
    flush(&mut segment, &mut out);

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_bounds_cover_the_data() {
        let (lo, hi, step) = nice_bounds(12.3, 87.1);
        assert!(lo <= 12.3 && hi >= 87.1);
        assert!(step > 0.0);
        assert!(ticks(lo, hi, step).len() >= 3);
    }

    #[test]
    fn nice_bounds_widen_degenerate_ranges() {
        let (lo, hi, _) = nice_bounds(5.0, 5.0);
        assert!(lo < 5.0 && hi > 5.0);
        let (lo, hi, _) = nice_bounds(0.0, 0.0);
        assert!(lo < hi);
    }

    #[test]
    fn histogram_draws_one_rect_per_occupied_bin() {
        let values = [1.0, 1.1, 1.2, 9.8, 9.9];
        let svg = histogram(&values, 4, "Ice temperature", "°C");
        // Two occupied bins: the low cluster and the high cluster.
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Ice temperature"));
    }

    #[test]
    fn histogram_without_data_says_so() {
        let svg = histogram(&[f64::NAN], 10, "Ice temperature", "°C");
        assert!(svg.contains("no data"));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn scatter_draws_one_circle_per_finite_pair() {
        let points = [(1.0, 2.0), (3.0, 4.0), (f64::NAN, 1.0)];
        let svg = scatter(&points, "Flow vs resistance", "ml/min", "mmHg·min/ml");
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn line_breaks_at_missing_values() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [
            Some(1.0),
            Some(1.1),
            None,
            Some(1.3),
            Some(1.2),
            Some(1.4),
        ];
        let svg = line_optional(&xs, &ys, "Smoothed flow", "min", "ml/min");
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn raw_line_is_one_polyline() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [10.0, 11.0, 12.0];
        let svg = line(&xs, &ys, "Raw flow", "min", "ml/min");
        assert_eq!(svg.matches("<polyline").count(), 1);
    }

    #[test]
    fn chart_titles_are_escaped() {
        let svg = histogram(&[1.0, 2.0], 2, "a<b>&c", "x");
        assert!(svg.contains("a&lt;b&gt;&amp;c"));
    }
}
