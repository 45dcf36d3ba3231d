//! True Range.
//!
//! TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|)
//! Undefined candidate terms are left out of the max rather than counted as
//! zero, so TR[0] (no previous close) is high[0]-low[0].
//! Lookback: 0.

use crate::domain::Bar;
use crate::indicator::{columns, DerivedColumns, Indicator};

#[derive(Debug, Clone)]
pub struct TrueRange {
    name: String,
}

impl TrueRange {
    pub fn new() -> Self {
        Self {
            name: columns::TRUE_RANGE.to_string(),
        }
    }
}

impl Default for TrueRange {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for TrueRange {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> DerivedColumns {
        let mut out = DerivedColumns::new();
        out.insert_float(columns::TRUE_RANGE, true_range(bars));
        out
    }
}

/// Compute the True Range series from bars.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut prev_close = f64::NAN;
    bars.iter()
        .map(|bar| {
            let tr = max_defined(&[
                bar.high - bar.low,
                (bar.high - prev_close).abs(),
                (bar.low - prev_close).abs(),
            ]);
            prev_close = bar.close;
            tr
        })
        .collect()
}

/// Largest non-NaN term, or NaN when every term is undefined.
fn max_defined(terms: &[f64]) -> f64 {
    terms
        .iter()
        .copied()
        .filter(|t| !t.is_nan())
        .fold(f64::NAN, |acc, t| if acc.is_nan() || t > acc { t } else { acc })
}
