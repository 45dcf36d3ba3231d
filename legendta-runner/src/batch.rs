//! Applying a suite to one series, to a frame, or to a universe of series.
//!
//! A single series is always computed in bar order. Independent series share
//! nothing, so a universe can be fanned out across rayon's pool; parallel and
//! sequential runs produce bit-identical columns.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::{Context, Result};
use legendta_core::domain::Bar;
use legendta_core::frame::{append_columns, bars_from_frame};
use legendta_core::indicator::DerivedColumns;
use polars::prelude::DataFrame;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::suite::Suite;

/// Compute every indicator of the suite over `bars`.
///
/// Columns come back in suite order. When two indicators emit the same
/// column name the later one wins.
pub fn annotate_series(bars: &[Bar], suite: &Suite) -> DerivedColumns {
    let mut out = DerivedColumns::new();
    for indicator in suite.indicators() {
        let columns = indicator.compute(bars);
        debug_assert!(
            columns.iter().all(|(_, c)| c.len() == bars.len()),
            "indicator '{}' produced a misaligned column",
            indicator.name()
        );
        out.extend(columns);
    }
    if bars.len() < suite.warmup() {
        debug!(
            bars = bars.len(),
            warmup = suite.warmup(),
            "series shorter than suite warmup"
        );
    }
    out
}

/// Annotate every series of a universe.
pub fn annotate_universe(
    bars_by_symbol: &HashMap<String, Vec<Bar>>,
    suite: &Suite,
    parallel: bool,
) -> HashMap<String, DerivedColumns> {
    let start = Instant::now();

    let result: HashMap<String, DerivedColumns> = if parallel {
        bars_by_symbol
            .par_iter()
            .map(|(symbol, bars)| (symbol.clone(), annotate_symbol(symbol, bars, suite)))
            .collect()
    } else {
        bars_by_symbol
            .iter()
            .map(|(symbol, bars)| (symbol.clone(), annotate_symbol(symbol, bars, suite)))
            .collect()
    };

    info!(
        symbols = result.len(),
        indicators = suite.len(),
        parallel,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "annotated universe"
    );
    result
}

fn annotate_symbol(symbol: &str, bars: &[Bar], suite: &Suite) -> DerivedColumns {
    let (void, inconsistent) = count_malformed(bars);
    if void > 0 {
        warn!(symbol, void, "series contains bars with undefined prices");
    }
    if inconsistent > 0 {
        warn!(
            symbol,
            inconsistent, "series contains bars whose open/close fall outside high/low"
        );
    }
    debug!(symbol, bars = bars.len(), "annotating series");
    annotate_series(bars, suite)
}

/// Counts of void bars and of defined bars failing the OHLC range check.
fn count_malformed(bars: &[Bar]) -> (usize, usize) {
    bars.iter().fold((0, 0), |(void, inconsistent), bar| {
        if bar.is_void() {
            (void + 1, inconsistent)
        } else if !bar.is_sane() {
            (void, inconsistent + 1)
        } else {
            (void, inconsistent)
        }
    })
}

/// Read OHLC from `df`, run the suite and append every derived column.
pub fn annotate_frame(df: &mut DataFrame, suite: &Suite) -> Result<()> {
    let bars = bars_from_frame(df).context("reading OHLC columns")?;
    let columns = annotate_series(&bars, suite);
    append_columns(df, &columns).context("appending derived columns")?;
    info!(
        rows = df.height(),
        columns = columns.len(),
        "annotated frame"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::SuiteConfig;
    use legendta_core::indicators::{Breakouts, SmiMomentum, TrueRange};
    use polars::prelude::*;

    fn bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.2).sin() * 5.0;
                Bar::new(c - 0.2, c + 1.0, c - 1.0, c)
            })
            .collect()
    }

    #[test]
    fn series_columns_follow_suite_order() {
        let suite = Suite::new(vec![
            Box::new(TrueRange::new()),
            Box::new(SmiMomentum::default()),
        ]);
        let out = annotate_series(&bars(30), &suite);
        let names: Vec<&str> = out.names().collect();
        assert_eq!(names, ["true_range", "smi"]);
    }

    #[test]
    fn duplicate_column_keeps_the_last_writer() {
        let suite = Suite::new(vec![
            Box::new(SmiMomentum::new(5, 2)),
            Box::new(SmiMomentum::new(9, 3)),
        ]);
        let data = bars(40);
        let out = annotate_series(&data, &suite);
        assert_eq!(out.len(), 1);
        let expected = SmiMomentum::new(9, 3).series(&data);
        let actual = out.float("smi").unwrap();
        for (a, e) in actual.iter().zip(&expected) {
            assert_eq!(a.to_bits(), e.to_bits());
        }
    }

    #[test]
    fn malformed_bars_are_counted_by_kind() {
        let mut data = bars(6);
        data[1].close = f64::NAN;
        data[3].high = data[3].low - 1.0;
        data[4].open = data[4].high + 0.5;
        assert_eq!(count_malformed(&data), (1, 2));
        assert_eq!(count_malformed(&bars(6)), (0, 0));
    }

    #[test]
    fn universe_keeps_every_symbol() {
        let suite = Suite::new(vec![Box::new(Breakouts::new(3))]);
        let mut universe = HashMap::new();
        universe.insert("AAA".to_string(), bars(50));
        universe.insert("BBB".to_string(), bars(7));
        universe.insert("CCC".to_string(), Vec::new());

        let out = annotate_universe(&universe, &suite, true);
        assert_eq!(out.len(), 3);
        assert_eq!(out["BBB"].flag("support_breakout").unwrap().len(), 7);
        assert!(out["CCC"].float("support_level").unwrap().is_empty());
    }

    #[test]
    fn frame_gets_every_default_column() {
        let data = bars(60);
        let mut df = df!(
            "open" => data.iter().map(|b| b.open).collect::<Vec<_>>(),
            "high" => data.iter().map(|b| b.high).collect::<Vec<_>>(),
            "low" => data.iter().map(|b| b.low).collect::<Vec<_>>(),
            "close" => data.iter().map(|b| b.close).collect::<Vec<_>>(),
        )
        .unwrap();
        let suite = SuiteConfig::all_defaults().build().unwrap();

        annotate_frame(&mut df, &suite).unwrap();

        for name in [
            "true_range",
            "smi",
            "hl2",
            "fisher_cg",
            "fisher_sig",
            "leledc_major",
            "leledc_minor",
            "support_level",
            "resistance_level",
            "support_breakout",
            "resistance_breakout",
            "support_retest",
            "potential_support_retest",
            "resistance_retest",
            "potential_resistance_retest",
            "pinbar_buy",
            "pinbar_sell",
        ] {
            assert!(df.column(name).is_ok(), "missing column {name}");
        }
        assert_eq!(df.width(), 4 + 17);
    }

    #[test]
    fn frame_without_prices_fails_before_computing() {
        let mut df = df!("close" => [1.0, 2.0, 3.0]).unwrap();
        let suite = SuiteConfig::all_defaults().build().unwrap();
        let err = annotate_frame(&mut df, &suite).unwrap_err();
        assert!(format!("{err:#}").contains("open"));
        assert_eq!(df.width(), 1);
    }
}
