//! Column-oriented input and output through polars `DataFrame`s.
//!
//! Input frames must carry numeric `open`, `high`, `low`, `close` columns;
//! any other columns are left untouched. Derived columns are appended as
//! Float64 (NaN = undefined) or Boolean. Re-running an indicator replaces its
//! own columns, never the price columns.

use polars::prelude::*;
use tracing::debug;

use crate::domain::Bar;
use crate::indicator::{ColumnData, DerivedColumns, Indicator};

/// Required input columns.
pub const PRICE_COLUMNS: [&str; 4] = ["open", "high", "low", "close"];

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Column {column} must be numeric, got {actual:?}")]
    TypeMismatch { column: String, actual: DataType },

    #[error("Derived column '{0}' would overwrite an input price column")]
    ReservedColumn(String),

    #[error("Derived column '{column}' has {actual} rows but the frame has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn price_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, FrameError> {
    let column = df
        .column(name)
        .map_err(|_| FrameError::MissingColumn(name.to_string()))?;
    if !is_numeric(column.dtype()) {
        return Err(FrameError::TypeMismatch {
            column: name.to_string(),
            actual: column.dtype().clone(),
        });
    }
    let values = column.cast(&DataType::Float64)?;
    let values = values.f64()?.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    Ok(values)
}

/// Read the bar series out of a frame. Nulls become NaN.
///
/// Every required column is checked before any values are read, so a
/// malformed frame is reported up front.
pub fn bars_from_frame(df: &DataFrame) -> Result<Vec<Bar>, FrameError> {
    let names = df.get_column_names();
    if let Some(missing) = PRICE_COLUMNS
        .iter()
        .find(|required| !names.iter().any(|n| n.as_str() == **required))
    {
        return Err(FrameError::MissingColumn(missing.to_string()));
    }

    let open = price_column(df, "open")?;
    let high = price_column(df, "high")?;
    let low = price_column(df, "low")?;
    let close = price_column(df, "close")?;

    Ok((0..df.height())
        .map(|i| Bar::new(open[i], high[i], low[i], close[i]))
        .collect())
}

/// Append derived columns to the frame.
///
/// All columns are checked before the frame is touched; on error the frame
/// is unchanged.
pub fn append_columns(df: &mut DataFrame, columns: &DerivedColumns) -> Result<(), FrameError> {
    let height = df.height();
    for (name, data) in columns.iter() {
        if PRICE_COLUMNS.contains(&name) {
            return Err(FrameError::ReservedColumn(name.to_string()));
        }
        if data.len() != height {
            return Err(FrameError::LengthMismatch {
                column: name.to_string(),
                expected: height,
                actual: data.len(),
            });
        }
    }

    for (name, data) in columns.iter() {
        let column = match data {
            ColumnData::Float(values) => Column::new(name.into(), values.as_slice()),
            ColumnData::Flag(values) => Column::new(name.into(), values.as_slice()),
        };
        df.with_column(column)?;
    }
    Ok(())
}

/// Read bars from the frame, run the indicator, append its columns.
pub fn annotate(df: &mut DataFrame, indicator: &dyn Indicator) -> Result<(), FrameError> {
    let bars = bars_from_frame(df)?;
    let derived = indicator.compute(&bars);
    debug!(
        indicator = indicator.name(),
        rows = bars.len(),
        columns = derived.len(),
        "annotating frame"
    );
    append_columns(df, &derived)
}
