//! Configuration for the evaluation engine.
//!
//! `EvalConfig` centralizes the algorithm thresholds so no magic constants
//! are scattered through the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Grayscale intensity at or below which a pixel counts as foreground.
    pub binarize_threshold: u8,
    /// A column joins an existing cluster when it differs from a seen
    /// representative in strictly fewer than this many bit positions.
    #[serde(alias = "cluster_threshold")]
    pub cluster_merge_threshold: u32,
    /// An opcode span is tolerated (does not break a match) when both of its
    /// ranges cover fewer than this many symbols.
    pub span_tolerance: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            binarize_threshold: 128,
            cluster_merge_threshold: 5,
            span_tolerance: 5,
        }
    }
}

impl EvalConfig {
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder {
            inner: EvalConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_zero(self.cluster_merge_threshold, "cluster_merge_threshold")?;
        ensure_non_zero(self.span_tolerance, "span_tolerance")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveThreshold { field: &'static str, value: u64 },
}

fn ensure_non_zero(value: u32, field: &'static str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveThreshold {
            field,
            value: value as u64,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct EvalConfigBuilder {
    inner: EvalConfig,
}

impl Default for EvalConfigBuilder {
    fn default() -> Self {
        EvalConfig::builder()
    }
}

impl EvalConfigBuilder {
    pub fn new() -> Self {
        EvalConfig::builder()
    }

    pub fn binarize_threshold(mut self, value: u8) -> Self {
        self.inner.binarize_threshold = value;
        self
    }

    pub fn cluster_merge_threshold(mut self, value: u32) -> Self {
        self.inner.cluster_merge_threshold = value;
        self
    }

    pub fn span_tolerance(mut self, value: u32) -> Self {
        self.inner.span_tolerance = value;
        self
    }

    pub fn build(self) -> Result<EvalConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
