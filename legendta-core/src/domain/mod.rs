//! Domain types for legendta

pub mod bar;

pub use bar::{highs, lows, Bar};
