//! Indicator trait and the derived-column container it produces.
//!
//! Indicators are pure functions: bar history in, named aligned columns out.
//! Each call recomputes everything from the bar slice it is given; nothing is
//! cached or carried between calls.

use crate::domain::Bar;

/// Output column names.
pub mod columns {
    pub const TRUE_RANGE: &str = "true_range";
    pub const SMI: &str = "smi";
    pub const HL2: &str = "hl2";
    pub const FISHER_CG: &str = "fisher_cg";
    pub const FISHER_SIG: &str = "fisher_sig";
    pub const LELEDC_MAJOR: &str = "leledc_major";
    pub const LELEDC_MINOR: &str = "leledc_minor";
    pub const PINBAR_BUY: &str = "pinbar_buy";
    pub const PINBAR_SELL: &str = "pinbar_sell";
    pub const SUPPORT_LEVEL: &str = "support_level";
    pub const RESISTANCE_LEVEL: &str = "resistance_level";
    pub const SUPPORT_BREAKOUT: &str = "support_breakout";
    pub const RESISTANCE_BREAKOUT: &str = "resistance_breakout";
    pub const SUPPORT_RETEST: &str = "support_retest";
    pub const POTENTIAL_SUPPORT_RETEST: &str = "potential_support_retest";
    pub const RESISTANCE_RETEST: &str = "resistance_retest";
    pub const POTENTIAL_RESISTANCE_RETEST: &str = "potential_resistance_retest";
}

/// Errors raised when caller-supplied inputs cannot be aligned with the bars.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IndicatorError {
    #[error("column '{column}' has {actual} values but the series has {expected} bars")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Trait for indicators.
///
/// Indicators take a full bar series and produce one or more named columns,
/// each the same length as the series. Float positions without enough
/// history hold `f64::NAN`; flag columns are plain `false` there.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bars after t. The one sanctioned exception
/// is the pivot confirmation of `Breakouts`, whose level columns look exactly
/// `length` bars ahead.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "fisher_cg_20", "smi_9_3").
    fn name(&self) -> &str;

    /// Number of leading bars whose primary output is undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> DerivedColumns;
}

/// One derived column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Real-valued column; `NaN` marks an undefined position.
    Float(Vec<f64>),
    /// Boolean event column.
    Flag(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(v) => v.len(),
            ColumnData::Flag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named, insertion-ordered derived columns.
///
/// Inserting a name that already exists replaces the old column in place, so
/// recomputing an indicator into the same container is idempotent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedColumns {
    columns: Vec<(String, ColumnData)>,
}

impl DerivedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column, replacing any existing column of the same name.
    pub fn insert(&mut self, name: impl Into<String>, data: ColumnData) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = data,
            None => self.columns.push((name, data)),
        }
    }

    pub fn insert_float(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.insert(name, ColumnData::Float(values));
    }

    pub fn insert_flag(&mut self, name: impl Into<String>, values: Vec<bool>) {
        self.insert(name, ColumnData::Flag(values));
    }

    pub fn get(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data)
    }

    /// Get a float column by name.
    pub fn float(&self, name: &str) -> Option<&[f64]> {
        match self.get(name)? {
            ColumnData::Float(v) => Some(v.as_slice()),
            ColumnData::Flag(_) => None,
        }
    }

    /// Get a flag column by name.
    pub fn flag(&self, name: &str) -> Option<&[bool]> {
        match self.get(name)? {
            ColumnData::Flag(v) => Some(v.as_slice()),
            ColumnData::Float(_) => None,
        }
    }

    /// Get a float value at a specific bar index.
    pub fn value(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.float(name).and_then(|v| v.get(bar_index).copied())
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnData)> {
        self.columns.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Merge another set of columns into this one; `other` wins on name clashes.
    pub fn extend(&mut self, other: DerivedColumns) {
        for (name, data) in other.columns {
            self.insert(name, data);
        }
    }

    /// Number of columns stored.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
