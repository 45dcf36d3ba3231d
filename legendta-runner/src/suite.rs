//! Indicator suites loaded from TOML.
//!
//! ```toml
//! [[indicators]]
//! type = "smi_momentum"
//! k_length = 14
//!
//! [[indicators]]
//! type = "breakouts"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use legendta_core::indicator::Indicator;
use legendta_core::{ConfigError, IndicatorConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("failed to read suite file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse suite TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("indicator #{index}: {source}")]
    Config {
        index: usize,
        #[source]
        source: ConfigError,
    },
    #[error("suite has no indicators")]
    Empty,
}

/// Serializable list of indicator configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

impl SuiteConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, SuiteError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SuiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Every indicator at its default parameters.
    pub fn all_defaults() -> Self {
        Self {
            indicators: vec![
                IndicatorConfig::TrueRange,
                IndicatorConfig::SmiMomentum {
                    k_length: 9,
                    d_length: 3,
                },
                IndicatorConfig::FisherCg {
                    length: 20,
                    min_period: 10,
                },
                IndicatorConfig::ExhaustionBars {
                    maj_qual: 6,
                    maj_len: 12,
                    min_qual: 6,
                    min_len: 12,
                    core_length: 4,
                },
                IndicatorConfig::Breakouts { length: 20 },
                IndicatorConfig::Pinbar {
                    k_length: 9,
                    d_length: 3,
                },
            ],
        }
    }

    /// Validate every entry and construct the indicators.
    pub fn build(&self) -> Result<Suite, SuiteError> {
        if self.indicators.is_empty() {
            return Err(SuiteError::Empty);
        }
        let indicators = self
            .indicators
            .iter()
            .enumerate()
            .map(|(index, config)| {
                config
                    .build()
                    .map_err(|source| SuiteError::Config { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let suite = Suite { indicators };
        debug!(
            indicators = suite.len(),
            warmup = suite.warmup(),
            "built indicator suite"
        );
        Ok(suite)
    }
}

/// A built, ready-to-run set of indicators.
pub struct Suite {
    indicators: Vec<Box<dyn Indicator>>,
}

impl Suite {
    pub fn new(indicators: Vec<Box<dyn Indicator>>) -> Self {
        Self { indicators }
    }

    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Largest lookback across the suite: bars before this index carry at
    /// least one undefined column.
    pub fn warmup(&self) -> usize {
        self.indicators
            .iter()
            .map(|i| i.lookback())
            .max()
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.indicators.iter().map(|i| i.name()))
            .finish()
    }
}
