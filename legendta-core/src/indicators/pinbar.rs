//! Pinbar reversals confirmed by SMI momentum.
//!
//! Sell: lower high, close in the lower third of the true range, SMI falling
//! for two bars from above 40. Buy: higher low, close in the upper third of the
//! true range, SMI rising for two bars from below -40.
//! Any undefined input evaluates false.

use tracing::debug;

use super::smi::SmiMomentum;
use super::true_range::true_range;
use super::window::lagged;
use crate::domain::Bar;
use crate::indicator::{columns, DerivedColumns, Indicator, IndicatorError};

const SMI_OVERBOUGHT: f64 = 40.0;
const SMI_OVERSOLD: f64 = -40.0;

#[derive(Debug, Clone)]
pub struct Pinbar {
    smi: SmiMomentum,
    name: String,
}

impl Pinbar {
    /// Pinbar detector whose confirming SMI uses the given lengths.
    pub fn new(smi: SmiMomentum) -> Self {
        let name = format!("pinbar_{}_{}", smi.k_length(), smi.d_length());
        Self { smi, name }
    }

    /// Evaluate pinbars against a caller-supplied SMI series.
    pub fn with_smi(&self, bars: &[Bar], smi: &[f64]) -> Result<DerivedColumns, IndicatorError> {
        if smi.len() != bars.len() {
            return Err(IndicatorError::LengthMismatch {
                column: columns::SMI.to_string(),
                expected: bars.len(),
                actual: smi.len(),
            });
        }
        Ok(detect(bars, smi))
    }
}

impl Default for Pinbar {
    fn default() -> Self {
        Self::new(SmiMomentum::default())
    }
}

impl Indicator for Pinbar {
    fn name(&self) -> &str {
        &self.name
    }

    /// Two SMI lags past the SMI warmup.
    fn lookback(&self) -> usize {
        self.smi.lookback() + 2
    }

    /// Computes SMI internally and emits it alongside the pinbar flags.
    fn compute(&self, bars: &[Bar]) -> DerivedColumns {
        debug!(indicator = %self.name, bars = bars.len(), "computing pinbars");
        let smi = self.smi.series(bars);
        let mut out = detect(bars, &smi);
        out.insert_float(columns::SMI, smi);
        out
    }
}

fn detect(bars: &[Bar], smi: &[f64]) -> DerivedColumns {
    let n = bars.len();
    let tr = true_range(bars);

    let mut sell = vec![false; n];
    let mut buy = vec![false; n];

    for i in 1..n {
        let (bar, prev) = (&bars[i], &bars[i - 1]);
        let smi_now = smi[i];
        let smi_1 = smi[i - 1];
        let smi_2 = lagged(smi, i, 2);
        let body_band = tr[i] * 2.0 / 3.0;

        sell[i] = bar.high < prev.high
            && bar.close < bar.high - body_band
            && smi_now < smi_1
            && smi_1 > SMI_OVERBOUGHT
            && smi_1 < smi_2;

        buy[i] = bar.low > prev.low
            && bar.close > bar.low + body_band
            && smi_1 < SMI_OVERSOLD
            && smi_now > smi_1
            && smi_1 > smi_2;
    }

    let mut out = DerivedColumns::new();
    out.insert_flag(columns::PINBAR_SELL, sell);
    out.insert_flag(columns::PINBAR_BUY, buy);
    out
}

/// Pinbars against `smi` when given, otherwise against a default SMI that is
/// also emitted as the `smi` column.
pub fn pinbar(bars: &[Bar], smi: Option<&[f64]>) -> Result<DerivedColumns, IndicatorError> {
    let detector = Pinbar::default();
    match smi {
        Some(smi) => detector.with_smi(bars, smi),
        None => Ok(detector.compute(bars)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    fn sell_setup() -> Vec<Bar> {
        make_ohlc_bars(&[
            (100.0, 110.0, 99.0, 108.0),
            (108.0, 112.0, 105.0, 110.0),
            // lower high, close 100.5 < 109 - (2/3)*TR where TR = max(10, 1, 11) = 11
            (109.0, 109.0, 99.0, 100.5),
        ])
    }

    #[test]
    fn sell_fires_when_smi_falls_from_overbought() {
        let bars = sell_setup();
        let out = pinbar(&bars, Some(&[60.0, 50.0, 45.0])).unwrap();
        assert_eq!(out.flag("pinbar_sell").unwrap(), &[false, false, true]);
        assert!(out.flag("pinbar_buy").unwrap().iter().all(|&f| !f));
        // Supplied SMI is not echoed back.
        assert!(out.float("smi").is_none());
    }

    #[test]
    fn sell_needs_prior_smi_above_threshold() {
        let bars = sell_setup();
        let out = pinbar(&bars, Some(&[60.0, 40.0, 30.0])).unwrap();
        assert!(!out.flag("pinbar_sell").unwrap()[2]);
    }

    #[test]
    fn buy_fires_when_smi_rises_from_oversold() {
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 90.0, 92.0),
            (92.0, 95.0, 91.0, 93.0),
            // higher low, close 101 > 92 + (2/3)*TR where TR = max(10, 9, 1) = 10
            (93.0, 102.0, 92.0, 101.0),
        ]);
        let out = pinbar(&bars, Some(&[-70.0, -60.0, -55.0])).unwrap();
        assert_eq!(out.flag("pinbar_buy").unwrap(), &[false, false, true]);
    }

    #[test]
    fn undefined_smi_lag_is_false() {
        let bars = sell_setup();
        let out = pinbar(&bars, Some(&[f64::NAN, 50.0, 45.0])).unwrap();
        assert!(!out.flag("pinbar_sell").unwrap()[2]);
    }

    #[test]
    fn misaligned_smi_is_rejected() {
        let bars = sell_setup();
        let err = pinbar(&bars, Some(&[1.0, 2.0])).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::LengthMismatch {
                column: "smi".into(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn internal_smi_is_emitted() {
        let bars = sell_setup();
        let out = pinbar(&bars, None).unwrap();
        let smi = out.float("smi").unwrap();
        assert_eq!(smi.len(), 3);
        assert!(smi.iter().all(|v| v.is_nan()));
        assert_eq!(Pinbar::default().lookback(), 10);
    }
}
