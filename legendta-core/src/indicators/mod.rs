//! Concrete indicator implementations.
//!
//! All six indicators implement the `Indicator` trait from `crate::indicator`
//! and are pure batch computations over a bar slice. The shared kernels live
//! in `window` (rolling extremes, shifts) and `smoothing` (exponential mean).
//!
//! Each indicator also has a free-function form taking explicit parameters,
//! for callers that do not need a trait object.

pub mod breakouts;
pub mod exhaustion;
pub mod fisher_cg;
pub mod pinbar;
pub mod smi;
pub mod smoothing;
pub mod true_range;
pub mod window;

pub use breakouts::{breakouts, Breakouts};
pub use exhaustion::{
    exhaustion_bars, BarContext, ExhaustionBars, ExhaustionOutput, ExhaustionParams,
    ExhaustionState,
};
pub use fisher_cg::{fisher_cg, FisherCg};
pub use pinbar::{pinbar, Pinbar};
pub use smi::{smi_momentum, SmiMomentum};
pub use true_range::{true_range, TrueRange};

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(open, high, low, close)
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    data.iter()
        .map(|&(open, high, low, close)| crate::domain::Bar::new(open, high, low, close))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Assert two series match position by position, treating NaN as equal to NaN.
#[cfg(test)]
pub fn assert_series_eq(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "series length mismatch");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if a.is_nan() || e.is_nan() {
            assert!(
                a.is_nan() && e.is_nan(),
                "NaN mismatch at {i}: actual={a}, expected={e}"
            );
        } else {
            assert!(
                (a - e).abs() < DEFAULT_EPSILON,
                "mismatch at {i}: actual={a}, expected={e}"
            );
        }
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
