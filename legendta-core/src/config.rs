//! Serializable indicator configuration.
//!
//! Each variant names one indicator and its parameters. Every parameter may
//! be omitted in the serialized form, in which case the indicator's default
//! applies. `build()` validates before constructing, so a bad config surfaces
//! as a `ConfigError` rather than a panic in a constructor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicator::Indicator;
use crate::indicators::{
    breakouts, fisher_cg, smi, Breakouts, ExhaustionBars, ExhaustionParams, FisherCg, Pinbar,
    SmiMomentum, TrueRange,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid parameter '{param}' for {indicator}: {reason}")]
    InvalidParam {
        indicator: &'static str,
        param: &'static str,
        reason: String,
    },
}

/// Indicator configuration (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorConfig {
    TrueRange,

    SmiMomentum {
        #[serde(default = "default_k_length")]
        k_length: usize,
        #[serde(default = "default_d_length")]
        d_length: usize,
    },

    FisherCg {
        #[serde(default = "default_fisher_length")]
        length: usize,
        #[serde(default = "default_min_period")]
        min_period: usize,
    },

    ExhaustionBars {
        #[serde(default = "default_qual")]
        maj_qual: u32,
        #[serde(default = "default_exhaustion_len")]
        maj_len: usize,
        #[serde(default = "default_qual")]
        min_qual: u32,
        #[serde(default = "default_exhaustion_len")]
        min_len: usize,
        #[serde(default = "default_core_length")]
        core_length: usize,
    },

    Breakouts {
        #[serde(default = "default_breakout_length")]
        length: usize,
    },

    /// Pinbars confirmed by an internally computed SMI.
    Pinbar {
        #[serde(default = "default_k_length")]
        k_length: usize,
        #[serde(default = "default_d_length")]
        d_length: usize,
    },
}

fn default_k_length() -> usize {
    smi::DEFAULT_K_LENGTH
}

fn default_d_length() -> usize {
    smi::DEFAULT_D_LENGTH
}

fn default_fisher_length() -> usize {
    fisher_cg::DEFAULT_LENGTH
}

fn default_min_period() -> usize {
    fisher_cg::DEFAULT_MIN_PERIOD
}

fn default_qual() -> u32 {
    ExhaustionParams::default().maj_qual
}

fn default_exhaustion_len() -> usize {
    ExhaustionParams::default().maj_len
}

fn default_core_length() -> usize {
    ExhaustionParams::default().core_length
}

fn default_breakout_length() -> usize {
    breakouts::DEFAULT_LENGTH
}

impl IndicatorConfig {
    /// The serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            IndicatorConfig::TrueRange => "true_range",
            IndicatorConfig::SmiMomentum { .. } => "smi_momentum",
            IndicatorConfig::FisherCg { .. } => "fisher_cg",
            IndicatorConfig::ExhaustionBars { .. } => "exhaustion_bars",
            IndicatorConfig::Breakouts { .. } => "breakouts",
            IndicatorConfig::Pinbar { .. } => "pinbar",
        }
    }

    /// Reject parameter values the indicators cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let indicator = self.kind();
        let positive = |param: &'static str, value: usize| {
            if value == 0 {
                Err(ConfigError::InvalidParam {
                    indicator,
                    param,
                    reason: "must be >= 1".into(),
                })
            } else {
                Ok(())
            }
        };

        match *self {
            IndicatorConfig::TrueRange => Ok(()),
            IndicatorConfig::SmiMomentum { k_length, d_length }
            | IndicatorConfig::Pinbar { k_length, d_length } => {
                positive("k_length", k_length)?;
                positive("d_length", d_length)
            }
            IndicatorConfig::FisherCg { length, min_period } => {
                positive("length", length.max(min_period))
            }
            IndicatorConfig::ExhaustionBars {
                maj_len, min_len, ..
            } => {
                positive("maj_len", maj_len)?;
                positive("min_len", min_len)
            }
            IndicatorConfig::Breakouts { length } => positive("length", length),
        }
    }

    /// Validate and construct the configured indicator.
    pub fn build(&self) -> Result<Box<dyn Indicator>, ConfigError> {
        self.validate()?;
        let indicator: Box<dyn Indicator> = match *self {
            IndicatorConfig::TrueRange => Box::new(TrueRange::new()),
            IndicatorConfig::SmiMomentum { k_length, d_length } => {
                Box::new(SmiMomentum::new(k_length, d_length))
            }
            IndicatorConfig::FisherCg { length, min_period } => {
                Box::new(FisherCg::new(length, min_period))
            }
            IndicatorConfig::ExhaustionBars {
                maj_qual,
                maj_len,
                min_qual,
                min_len,
                core_length,
            } => Box::new(ExhaustionBars::new(ExhaustionParams {
                maj_qual,
                maj_len,
                min_qual,
                min_len,
                core_length,
            })),
            IndicatorConfig::Breakouts { length } => Box::new(Breakouts::new(length)),
            IndicatorConfig::Pinbar { k_length, d_length } => {
                Box::new(Pinbar::new(SmiMomentum::new(k_length, d_length)))
            }
        };
        Ok(indicator)
    }
}
