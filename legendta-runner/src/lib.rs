//! legendta runner: indicator suites and batch annotation.
//!
//! This crate builds on `legendta-core` to provide:
//! - TOML-configured indicator suites with validation
//! - Annotation of a single bar series or a polars DataFrame
//! - Parallel annotation of many independent series (rayon)

pub mod batch;
pub mod suite;

pub use batch::{annotate_frame, annotate_series, annotate_universe};
pub use suite::{Suite, SuiteConfig, SuiteError};
