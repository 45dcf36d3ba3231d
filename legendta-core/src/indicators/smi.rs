//! Stochastic Momentum Index (SMI), William Blau.
//!
//! ll/hh = rolling k_length low/high extremes.
//! diff = hh - ll, rdiff = close - (hh + ll) / 2.
//! Both are double-smoothed with a span-d_length exponential mean, then
//! smi = avgrel / (avgdiff / 2) * 100, or exactly 0 where avgdiff == 0.
//! Lookback: k_length - 1.

use tracing::debug;

use super::smoothing::ewm_mean;
use super::window::{rolling_max, rolling_min};
use crate::domain::{highs, lows, Bar};
use crate::indicator::{columns, DerivedColumns, Indicator};

pub const DEFAULT_K_LENGTH: usize = 9;
pub const DEFAULT_D_LENGTH: usize = 3;

#[derive(Debug, Clone)]
pub struct SmiMomentum {
    k_length: usize,
    d_length: usize,
    name: String,
}

impl SmiMomentum {
    pub fn new(k_length: usize, d_length: usize) -> Self {
        assert!(k_length >= 1, "SMI k_length must be >= 1");
        assert!(d_length >= 1, "SMI d_length must be >= 1");
        Self {
            k_length,
            d_length,
            name: format!("smi_{k_length}_{d_length}"),
        }
    }

    pub fn k_length(&self) -> usize {
        self.k_length
    }

    pub fn d_length(&self) -> usize {
        self.d_length
    }

    /// The `smi` series alone.
    pub fn series(&self, bars: &[Bar]) -> Vec<f64> {
        let ll = rolling_min(&lows(bars), self.k_length);
        let hh = rolling_max(&highs(bars), self.k_length);

        let diff: Vec<f64> = hh.iter().zip(&ll).map(|(h, l)| h - l).collect();
        let rdiff: Vec<f64> = bars
            .iter()
            .zip(hh.iter().zip(&ll))
            .map(|(bar, (h, l))| bar.close - (h + l) / 2.0)
            .collect();

        let avgrel = ewm_mean(&ewm_mean(&rdiff, self.d_length), self.d_length);
        let avgdiff = ewm_mean(&ewm_mean(&diff, self.d_length), self.d_length);

        avgrel
            .iter()
            .zip(&avgdiff)
            .map(|(&rel, &d)| if d != 0.0 { rel / (d / 2.0) * 100.0 } else { 0.0 })
            .collect()
    }
}

impl Default for SmiMomentum {
    fn default() -> Self {
        Self::new(DEFAULT_K_LENGTH, DEFAULT_D_LENGTH)
    }
}

impl Indicator for SmiMomentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.k_length.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> DerivedColumns {
        debug!(indicator = %self.name, bars = bars.len(), "computing SMI");
        let mut out = DerivedColumns::new();
        out.insert_float(columns::SMI, self.series(bars));
        out
    }
}

/// SMI with explicit lengths; emits the `smi` column.
pub fn smi_momentum(bars: &[Bar], k_length: usize, d_length: usize) -> DerivedColumns {
    SmiMomentum::new(k_length, d_length).compute(bars)
}
