//! Concrete behavioural scenarios across the indicator set.
//!
//! Each test pins down one observable property on a hand-built series:
//! flat markets, one-way trends, short histories and repeat runs.

use legendta_core::domain::Bar;
use legendta_core::indicator::Indicator;
use legendta_core::indicators::breakouts::{resistance_reference, support_reference};
use legendta_core::indicators::*;

fn flat_bars(n: usize) -> Vec<Bar> {
    vec![Bar::new(100.0, 101.0, 99.0, 100.0); n]
}

/// Rising closes; every bar opens at the previous close so each candle is bullish.
fn rising_bars(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            let open = if i == 0 { close } else { close - 1.0 };
            Bar::new(open, close + 0.5, open - 0.5, close)
        })
        .collect()
}

// ── Exhaustion ───────────────────────────────────────────────────────

#[test]
fn monotonic_rise_never_exhausts_buyers() {
    let bars = rising_bars(50);
    let params = ExhaustionParams {
        maj_qual: 6,
        maj_len: 12,
        min_qual: 6,
        min_len: 12,
        core_length: 4,
    };
    let out = exhaustion_bars(&bars, params);

    let major = out.float("leledc_major").unwrap();
    let minor = out.float("leledc_minor").unwrap();
    assert_eq!(major.len(), 50);
    assert!(major.iter().all(|v| v.is_nan()), "no major event expected");
    assert!(minor.iter().all(|&v| v == 0.0), "no minor event expected");
}

#[test]
fn monotonic_rise_only_counts_buyers() {
    let bars = rising_bars(50);
    let params = ExhaustionParams::default();
    let mut state = ExhaustionState::new();
    for i in params.core_length..bars.len() {
        let bar = &bars[i];
        state.step(
            &BarContext {
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                reference_close: bars[i - params.core_length].close,
                prior_high_major: f64::NAN,
                prior_low_major: f64::NAN,
                prior_high_minor: f64::NAN,
                prior_low_minor: f64::NAN,
            },
            &params,
        );
    }
    assert_eq!(state.bindex_maj, 46);
    assert_eq!(state.sindex_maj, 0);
    assert_eq!(state.sindex_min, 0);
    assert_eq!(state.trend_maj, 0);
}

#[test]
fn major_trend_is_sticky_after_first_event() {
    // Rally, a bearish spike to a new high, then a long quiet tail.
    let mut bars: Vec<Bar> = (0..20)
        .map(|i| {
            let c = 100.0 + i as f64;
            Bar::new(c - 0.5, c + 0.5, c - 1.0, c)
        })
        .collect();
    bars.push(Bar::new(121.0, 130.0, 118.0, 119.5));
    bars.extend(std::iter::repeat(Bar::new(119.5, 120.0, 119.0, 119.5)).take(30));

    let out = ExhaustionBars::default().compute(&bars);
    let major = out.float("leledc_major").unwrap();
    assert_eq!(major[20], 1.0);
    assert!(major[20..].iter().all(|&v| v == 1.0));
}

// ── Flat market ──────────────────────────────────────────────────────

#[test]
fn identical_ohlc_bars_have_zero_true_range() {
    let bars: Vec<Bar> = vec![Bar::new(100.0, 100.0, 100.0, 100.0); 30];
    let tr = true_range(&bars);
    assert!(tr.iter().all(|&v| v == 0.0));
}

#[test]
fn flat_series_smi_is_zero_after_warmup() {
    let bars = flat_bars(40);
    let smi = SmiMomentum::default().series(&bars);
    // hh - ll is a constant 2.0 here and close sits exactly mid-range.
    assert!(smi[..8].iter().all(|v| v.is_nan()));
    assert!(smi[8..].iter().all(|&v| v == 0.0));

    let degenerate: Vec<Bar> = vec![Bar::new(50.0, 50.0, 50.0, 50.0); 40];
    let smi = SmiMomentum::default().series(&degenerate);
    // avgdiff == 0 takes the explicit zero branch.
    assert!(smi[8..].iter().all(|&v| v == 0.0));
}

#[test]
fn flat_series_has_no_pinbars() {
    for bars in [flat_bars(40), vec![Bar::new(7.0, 7.0, 7.0, 7.0); 40]] {
        let out = pinbar(&bars, None).unwrap();
        assert!(out.flag("pinbar_buy").unwrap().iter().all(|&f| !f));
        assert!(out.flag("pinbar_sell").unwrap().iter().all(|&f| !f));
    }
}

#[test]
fn flat_series_fisher_is_finite_after_warmup() {
    let bars = flat_bars(60);
    let indicator = FisherCg::default();
    let out = indicator.compute(&bars);
    let fisher = out.float("fisher_cg").unwrap();
    let lookback = indicator.lookback();
    assert!(fisher[..lookback].iter().all(|v| v.is_nan()));
    // Flat CG range gives Value1 = 0, so Value3 = 0.5 * ln(0.01 / 1.99).
    let expected = 0.5 * (0.01_f64 / 1.99).ln();
    for &v in &fisher[lookback..] {
        assert!((v - expected).abs() < 1e-12, "got {v}");
    }
}

// ── Short histories ──────────────────────────────────────────────────

#[test]
fn short_series_yield_undefined_prefixes_without_panicking() {
    let bars = rising_bars(5);
    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(TrueRange::new()),
        Box::new(SmiMomentum::default()),
        Box::new(FisherCg::default()),
        Box::new(ExhaustionBars::default()),
        Box::new(Breakouts::default()),
        Box::new(Pinbar::default()),
    ];
    for indicator in &indicators {
        let out = indicator.compute(&bars);
        for (name, column) in out.iter() {
            assert_eq!(column.len(), 5, "{}/{name}", indicator.name());
        }
    }

    let smi = smi_momentum(&bars, 9, 3);
    assert!(smi.float("smi").unwrap().iter().all(|v| v.is_nan()));

    let fisher = fisher_cg(&bars, 20, 10);
    assert!(fisher.float("fisher_cg").unwrap().iter().all(|v| v.is_nan()));
    assert!(fisher.float("fisher_sig").unwrap().iter().all(|v| v.is_nan()));

    let sr = breakouts(&bars, 20);
    assert!(sr.flag("support_breakout").unwrap().iter().all(|&f| !f));
    assert!(sr.float("support_level").unwrap().iter().all(|v| v.is_nan()));
}

#[test]
fn empty_series_yields_empty_columns() {
    let bars: Vec<Bar> = Vec::new();
    for out in [
        TrueRange::new().compute(&bars),
        SmiMomentum::default().compute(&bars),
        FisherCg::default().compute(&bars),
        ExhaustionBars::default().compute(&bars),
        Breakouts::default().compute(&bars),
        Pinbar::default().compute(&bars),
    ] {
        assert!(!out.is_empty());
        assert!(out.iter().all(|(_, column)| column.is_empty()));
    }
}

// ── Determinism ──────────────────────────────────────────────────────

#[test]
fn smi_is_bit_identical_across_runs() {
    let bars: Vec<Bar> = (0..120)
        .map(|i| {
            let c = 100.0 + (i as f64 * 0.37).sin() * 8.0 + i as f64 * 0.05;
            Bar::new(c - 0.3, c + 1.1, c - 1.4, c)
        })
        .collect();
    let first = smi_momentum(&bars, 9, 3);
    let second = smi_momentum(&bars, 9, 3);
    let a = first.float("smi").unwrap();
    let b = second.float("smi").unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

// ── Reference level asymmetry ────────────────────────────────────────

#[test]
fn support_reference_prefers_the_nearer_bar_when_higher() {
    // length 3: far = low[t-4], near = low[t-2]
    let low = [1.0, 2.0, 8.0, 4.0, 5.0, 6.0];
    let s = support_reference(&low, 3);
    // t=4: far = low[0] = 1, near = low[2] = 8
    assert_eq!(s[4], 8.0);
    // t=5: far = low[1] = 2, near = low[3] = 4
    assert_eq!(s[5], 4.0);
}

#[test]
fn resistance_reference_always_uses_the_farther_bar() {
    // length 3: far = high[t-4], near = high[t-2]
    let high = [10.0, 2.0, 8.0, 4.0, 5.0, 6.0];
    let r = resistance_reference(&high, 3);
    // far higher: t=4 far = 10, near = 8
    assert_eq!(r[4], 10.0);
    // near higher: t=5 far = 2, near = 4, still far
    assert_eq!(r[5], 2.0);
    assert!(r[3].is_nan());
}
