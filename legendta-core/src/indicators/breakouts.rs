//! Support/Resistance breakouts and retests.
//!
//! Pivot levels come from a centred `2*length+1` window (pl = rolling low
//! minimum, ph = rolling high maximum), so a pivot at bar t is only confirmed
//! at bar t+length. Every breakout and retest flag therefore reads the pivot
//! and its reference levels `length` bars back, which keeps the flags causal.
//!
//! The level columns (`support_level`, `resistance_level`) are the first
//! difference of the unshifted pivots and do look `length` bars ahead; treat
//! them as confirmed only `length` bars after the bar they are reported on.

use tracing::debug;

use super::window::{centered_max, centered_min, lagged};
use crate::domain::{highs, lows, Bar};
use crate::indicator::{columns, DerivedColumns, Indicator};

pub const DEFAULT_LENGTH: usize = 20;

#[derive(Debug, Clone)]
pub struct Breakouts {
    length: usize,
    name: String,
}

impl Breakouts {
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "breakout length must be >= 1");
        Self {
            length,
            name: format!("breakouts_{length}"),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for Breakouts {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

/// Support reference: the higher of `low[t-length-1]` and `low[t-length+1]`.
pub fn support_reference(low: &[f64], length: usize) -> Vec<f64> {
    (0..low.len())
        .map(|i| {
            let far = lagged(low, i, length + 1);
            let near = lagged(low, i, length - 1);
            if far > near {
                far
            } else {
                near
            }
        })
        .collect()
}

/// Resistance reference: both branches select `high[t-length-1]`, so the
/// nearer bar never participates. Unlike `support_reference`, this is not a
/// max of the two candidates.
#[allow(clippy::if_same_then_else)]
pub fn resistance_reference(high: &[f64], length: usize) -> Vec<f64> {
    (0..high.len())
        .map(|i| {
            let far = lagged(high, i, length + 1);
            let near = lagged(high, i, length - 1);
            if far > near {
                far
            } else {
                far
            }
        })
        .collect()
}

/// First difference of `pivot`, with undefined positions carrying the last
/// defined difference forward.
fn level_changes(pivot: &[f64]) -> Vec<f64> {
    let mut last = f64::NAN;
    (0..pivot.len())
        .map(|i| {
            let change = pivot[i] - lagged(pivot, i, 1);
            if !change.is_nan() {
                last = change;
            }
            last
        })
        .collect()
}

impl Indicator for Breakouts {
    fn name(&self) -> &str {
        &self.name
    }

    /// Flags need the reference level `length` bars back, which itself lags
    /// `length + 1` bars.
    fn lookback(&self) -> usize {
        2 * self.length + 1
    }

    fn compute(&self, bars: &[Bar]) -> DerivedColumns {
        let n = bars.len();
        let len = self.length;
        debug!(indicator = %self.name, bars = n, "computing S/R breakouts");

        let high = highs(bars);
        let low = lows(bars);

        let pl = centered_min(&low, len);
        let ph = centered_max(&high, len);
        let s_yloc = support_reference(&low, len);
        let r_yloc = resistance_reference(&high, len);

        let mut support_breakout = vec![false; n];
        let mut resistance_breakout = vec![false; n];
        let mut support_retest = vec![false; n];
        let mut potential_support_retest = vec![false; n];
        let mut resistance_retest = vec![false; n];
        let mut potential_resistance_retest = vec![false; n];

        for (i, bar) in bars.iter().enumerate() {
            let (h, l, c) = (bar.high, bar.low, bar.close);
            let sy = lagged(&s_yloc, i, len);
            let ry = lagged(&r_yloc, i, len);
            let pl_ref = lagged(&pl, i, len);
            let ph_ref = lagged(&ph, i, len);

            support_breakout[i] = c < sy;
            resistance_breakout[i] = c > ry;

            let s1 = h >= sy && c <= pl_ref;
            let s2 = h >= sy && c >= pl_ref && c <= sy;
            let s3 = h >= pl_ref && h <= sy;
            let s4 = h >= pl_ref && h <= sy && c < pl_ref;
            support_retest[i] = s1 || s2 || s3 || s4;
            potential_support_retest[i] = s1 || s2 || s3;

            let r1 = l <= ry && c >= ph_ref;
            let r2 = l <= ry && c <= ph_ref && c >= ry;
            let r3 = l <= ph_ref && l >= ry;
            let r4 = l <= ph_ref && l >= ry && c > ph_ref;
            resistance_retest[i] = r1 || r2 || r3 || r4;
            potential_resistance_retest[i] = r1 || r2 || r3;
        }

        let mut out = DerivedColumns::new();
        out.insert_float(columns::SUPPORT_LEVEL, level_changes(&pl));
        out.insert_float(columns::RESISTANCE_LEVEL, level_changes(&ph));
        out.insert_flag(columns::SUPPORT_BREAKOUT, support_breakout);
        out.insert_flag(columns::RESISTANCE_BREAKOUT, resistance_breakout);
        out.insert_flag(columns::SUPPORT_RETEST, support_retest);
        out.insert_flag(columns::POTENTIAL_SUPPORT_RETEST, potential_support_retest);
        out.insert_flag(columns::RESISTANCE_RETEST, resistance_retest);
        out.insert_flag(columns::POTENTIAL_RESISTANCE_RETEST, potential_resistance_retest);
        out
    }
}

/// Breakouts with an explicit pivot half-width.
pub fn breakouts(bars: &[Bar], length: usize) -> DerivedColumns {
    Breakouts::new(length).compute(bars)
}
