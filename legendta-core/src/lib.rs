//! legendta core: OHLC domain types and the indicator computation engine.
//!
//! This crate contains:
//! - Domain types (bars)
//! - The `Indicator` trait and `DerivedColumns` container
//! - Rolling-window and exponential-smoothing kernels
//! - Fisher CG, Leledc exhaustion bars, S/R breakouts and retests, SMI,
//!   pinbars and true range
//! - Linear growth/decay schedule helpers
//! - Serializable indicator configuration
//! - A polars DataFrame adapter for column-oriented callers

pub mod config;
pub mod domain;
pub mod frame;
pub mod indicator;
pub mod indicators;
pub mod schedule;

pub use config::{ConfigError, IndicatorConfig};
pub use domain::Bar;
pub use frame::{annotate, append_columns, bars_from_frame, FrameError};
pub use indicator::{columns, ColumnData, DerivedColumns, Indicator, IndicatorError};
pub use schedule::{linear_decay, linear_growth, ScheduleError};
