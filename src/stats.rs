//! # Descriptive Statistics
//!
//! Location and spread point estimates for the report: mean, median, and
//! quartiles with linear interpolation between order statistics (the
//! convention of the analysis stack the report's numbers are compared
//! against). Non-finite values are ignored everywhere. Nothing inferential
//! lives here.

use std::fmt;

/// Mean over the finite values, `None` when there are none
pub fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Median over the finite values, `None` when there are none
pub fn median(values: &[f64]) -> Option<f64> {
    quartiles(values).map(|q| q.median)
}

/// First quartile, median, and third quartile of a column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
}

impl Quartiles {
    /// Interquartile range (Q3 - Q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Quartiles over the finite values, `None` when there are none
///
/// Quantiles interpolate linearly between order statistics, so
/// `[10, 20, 30, 40, 50]` yields Q1 20, median 30, Q3 40.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);

    Some(Quartiles {
        q1: interpolated_quantile(&finite, 0.25),
        median: interpolated_quantile(&finite, 0.5),
        q3: interpolated_quantile(&finite, 0.75),
    })
}

/// Quantile of a sorted, non-empty slice by linear interpolation
fn interpolated_quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if frac == 0.0 || lo + 1 >= n {
        sorted[lo]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

/// Median-and-IQR digest of one numeric column
#[derive(Debug, Clone, Copy)]
pub struct ColumnSummary {
    /// Number of finite values the digest was computed from
    pub count: usize,
    /// Quartiles of the column
    pub quartiles: Quartiles,
}

/// Compute the median/IQR digest of a column, `None` when it has no finite
/// values
pub fn summarize_column(values: &[f64]) -> Option<ColumnSummary> {
    let count = values.iter().filter(|v| v.is_finite()).count();
    quartiles(values).map(|quartiles| ColumnSummary { count, quartiles })
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "median {:.1} (IQR {:.1}-{:.1}, n={})",
            self.quartiles.median, self.quartiles.q1, self.quartiles.q3, self.count
        )
    }
}

/// Convert a minutes column to hours
pub fn minutes_to_hours(minutes: &[f64]) -> Vec<f64> {
    minutes.iter().map(|m| m / 60.0).collect()
}
