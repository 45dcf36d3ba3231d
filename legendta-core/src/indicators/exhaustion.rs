//! Leledc Exhaustion Bars.
//!
//! Four directional counters accumulate over the whole series: every close
//! above `close[t-core_length]` bumps the buy counters, every close below it
//! bumps the sell counters. A counter past its qualifier fires an exhaustion
//! event on a bar that reverses against the run and makes a new extreme of the
//! preceding window; firing resets only that counter.
//!
//! leledc_major: 1 after buyer exhaustion, -1 after seller exhaustion, carried
//! forward once set, NaN before the first major event.
//! leledc_minor: -1 buyers exhausted, 1 sellers exhausted, 0 otherwise.

use tracing::{debug, trace};

use super::window::{rolling_max, rolling_min, shift};
use crate::domain::{highs, lows, Bar};
use crate::indicator::{columns, DerivedColumns, Indicator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustionParams {
    pub maj_qual: u32,
    pub maj_len: usize,
    pub min_qual: u32,
    pub min_len: usize,
    pub core_length: usize,
}

impl Default for ExhaustionParams {
    fn default() -> Self {
        Self {
            maj_qual: 6,
            maj_len: 12,
            min_qual: 6,
            min_len: 12,
            core_length: 4,
        }
    }
}

/// Everything the transition function needs to know about one bar.
///
/// The prior-window extremes cover `[t-len, t)` and are NaN when that window
/// would start before the first bar.
#[derive(Debug, Clone, Copy)]
pub struct BarContext {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// `close[t - core_length]`.
    pub reference_close: f64,
    pub prior_high_major: f64,
    pub prior_low_major: f64,
    pub prior_high_minor: f64,
    pub prior_low_minor: f64,
}

/// Outputs of one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExhaustionOutput {
    pub major: f64,
    pub minor: f64,
}

/// Running counters of the exhaustion state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExhaustionState {
    pub bindex_maj: u32,
    pub sindex_maj: u32,
    pub bindex_min: u32,
    pub sindex_min: u32,
    /// 0 until the first major event, then the direction of the latest one.
    pub trend_maj: i8,
}

impl ExhaustionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the machine by one bar.
    pub fn step(&mut self, bar: &BarContext, params: &ExhaustionParams) -> ExhaustionOutput {
        if bar.close > bar.reference_close {
            self.bindex_maj += 1;
            self.bindex_min += 1;
        } else if bar.close < bar.reference_close {
            self.sindex_maj += 1;
            self.sindex_min += 1;
        }

        let bearish = bar.close < bar.open;
        let bullish = bar.close > bar.open;

        let mut updated = false;
        if self.bindex_maj > params.maj_qual && bearish && bar.high >= bar.prior_high_major {
            self.bindex_maj = 0;
            self.trend_maj = 1;
            updated = true;
        } else if self.sindex_maj > params.maj_qual && bullish && bar.low <= bar.prior_low_major {
            self.sindex_maj = 0;
            self.trend_maj = -1;
            updated = true;
        }

        let major = if updated || self.trend_maj != 0 {
            f64::from(self.trend_maj)
        } else {
            f64::NAN
        };

        let minor = if self.bindex_min > params.min_qual
            && bearish
            && bar.high >= bar.prior_high_minor
        {
            self.bindex_min = 0;
            -1.0
        } else if self.sindex_min > params.min_qual && bullish && bar.low <= bar.prior_low_minor {
            self.sindex_min = 0;
            1.0
        } else {
            0.0
        };

        ExhaustionOutput { major, minor }
    }
}

#[derive(Debug, Clone)]
pub struct ExhaustionBars {
    params: ExhaustionParams,
    name: String,
}

impl ExhaustionBars {
    pub fn new(params: ExhaustionParams) -> Self {
        assert!(params.maj_len >= 1, "exhaustion maj_len must be >= 1");
        assert!(params.min_len >= 1, "exhaustion min_len must be >= 1");
        Self {
            params,
            name: format!(
                "leledc_{}_{}_{}_{}_{}",
                params.maj_qual, params.maj_len, params.min_qual, params.min_len, params.core_length
            ),
        }
    }

    pub fn params(&self) -> &ExhaustionParams {
        &self.params
    }
}

impl Default for ExhaustionBars {
    fn default() -> Self {
        Self::new(ExhaustionParams::default())
    }
}

impl Indicator for ExhaustionBars {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.params.core_length.max(1)
    }

    fn compute(&self, bars: &[Bar]) -> DerivedColumns {
        let n = bars.len();
        let p = &self.params;
        debug!(indicator = %self.name, bars = n, "computing exhaustion bars");

        // Windows over [t-len, t): trailing extreme ending at t-1.
        let high = highs(bars);
        let low = lows(bars);
        let prior_high_major = shift(&rolling_max(&high, p.maj_len), 1);
        let prior_low_major = shift(&rolling_min(&low, p.maj_len), 1);
        let prior_high_minor = shift(&rolling_max(&high, p.min_len), 1);
        let prior_low_minor = shift(&rolling_min(&low, p.min_len), 1);

        let mut major = vec![f64::NAN; n];
        let mut minor = vec![0.0; n];
        let mut state = ExhaustionState::new();

        for i in self.lookback()..n {
            let bar = &bars[i];
            let ctx = BarContext {
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                reference_close: bars[i - p.core_length].close,
                prior_high_major: prior_high_major[i],
                prior_low_major: prior_low_major[i],
                prior_high_minor: prior_high_minor[i],
                prior_low_minor: prior_low_minor[i],
            };
            let out = state.step(&ctx, p);
            if out.minor != 0.0 {
                trace!(bar = i, minor = out.minor, "minor exhaustion");
            }
            major[i] = out.major;
            minor[i] = out.minor;
        }

        let mut out = DerivedColumns::new();
        out.insert_float(columns::LELEDC_MAJOR, major);
        out.insert_float(columns::LELEDC_MINOR, minor);
        out
    }
}

/// Exhaustion bars with explicit parameters; emits `leledc_major`, `leledc_minor`.
pub fn exhaustion_bars(bars: &[Bar], params: ExhaustionParams) -> DerivedColumns {
    ExhaustionBars::new(params).compute(bars)
}
