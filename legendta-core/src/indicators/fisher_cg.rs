//! Fisher Stochastic Center of Gravity.
//!
//! hl2 = (high + low) / 2
//! CG = -sum((j+1) * hl2[t-j]) / sum(hl2[t-j]) + (length+1)/2, j in 0..length
//! Value1 = CG normalised into its rolling `length` range (0 when the range is flat)
//! Value2 = (4*V1[t] + 3*V1[t-1] + 2*V1[t-2] + V1[t-3]) / 10
//! Value3 = 0.5 * ln((1 + 1.98*(V2-0.5)) / (1 - 1.98*(V2-0.5)))
//! fisher_cg = Value3, fisher_sig = Value3[t-1].
//! Lookback: 2*(length-1) + 3.
//!
//! CG sums are recomputed per bar in lag order, O(N * length), so values at a
//! bar never depend on how much history preceded it.

use tracing::debug;

use super::window::{lagged, rolling_max, rolling_min};
use crate::domain::Bar;
use crate::indicator::{columns, DerivedColumns, Indicator};

pub const DEFAULT_LENGTH: usize = 20;
pub const DEFAULT_MIN_PERIOD: usize = 10;

#[derive(Debug, Clone)]
pub struct FisherCg {
    length: usize,
    name: String,
}

impl FisherCg {
    /// `length` is raised to `min_period` when shorter.
    pub fn new(length: usize, min_period: usize) -> Self {
        let length = length.max(min_period);
        assert!(length >= 1, "Fisher CG length must be >= 1");
        Self {
            length,
            name: format!("fisher_cg_{length}"),
        }
    }

    /// Effective window length after the `min_period` floor.
    pub fn length(&self) -> usize {
        self.length
    }

    fn center_of_gravity(&self, hl2: &[f64]) -> Vec<f64> {
        let offset = (self.length as f64 + 1.0) / 2.0;
        (0..hl2.len())
            .map(|i| {
                if i + 1 < self.length {
                    return f64::NAN;
                }
                let mut num = 0.0;
                let mut denom = 0.0;
                for j in 0..self.length {
                    let v = hl2[i - j];
                    num += (j + 1) as f64 * v;
                    denom += v;
                }
                -num / denom + offset
            })
            .collect()
    }
}

impl Default for FisherCg {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH, DEFAULT_MIN_PERIOD)
    }
}

impl Indicator for FisherCg {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        2 * (self.length - 1) + 3
    }

    fn compute(&self, bars: &[Bar]) -> DerivedColumns {
        debug!(indicator = %self.name, bars = bars.len(), "computing Fisher CG");

        let hl2: Vec<f64> = bars.iter().map(Bar::hl2).collect();
        let cg = self.center_of_gravity(&hl2);
        let max_cg = rolling_max(&cg, self.length);
        let min_cg = rolling_min(&cg, self.length);

        let value1: Vec<f64> = (0..cg.len())
            .map(|i| {
                let (hi, lo) = (max_cg[i], min_cg[i]);
                // NaN != NaN, so an undefined window stays undefined here.
                if hi != lo {
                    (cg[i] - lo) / (hi - lo)
                } else {
                    0.0
                }
            })
            .collect();

        let value3: Vec<f64> = (0..value1.len())
            .map(|i| {
                let value2 = (4.0 * value1[i]
                    + 3.0 * lagged(&value1, i, 1)
                    + 2.0 * lagged(&value1, i, 2)
                    + lagged(&value1, i, 3))
                    / 10.0;
                fisher_transform(value2)
            })
            .collect();

        let signal: Vec<f64> = (0..value3.len()).map(|i| lagged(&value3, i, 1)).collect();

        let mut out = DerivedColumns::new();
        out.insert_float(columns::HL2, hl2);
        out.insert_float(columns::FISHER_CG, value3);
        out.insert_float(columns::FISHER_SIG, signal);
        out
    }
}

/// Log-ratio compression of a [0, 1] value. A non-positive numerator or
/// denominator has no real logarithm and yields NaN.
fn fisher_transform(value2: f64) -> f64 {
    let x = 1.98 * (value2 - 0.5);
    let num = 1.0 + x;
    let denom = 1.0 - x;
    if num <= 0.0 || denom <= 0.0 {
        return f64::NAN;
    }
    0.5 * (num / denom).ln()
}

/// Fisher CG with explicit parameters; emits `hl2`, `fisher_cg`, `fisher_sig`.
pub fn fisher_cg(bars: &[Bar], length: usize, min_period: usize) -> DerivedColumns {
    FisherCg::new(length, min_period).compute(bars)
}
