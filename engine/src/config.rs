//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use fradium_types::EngineParams;

use crate::logging::LogFormat;
use crate::EngineError;

/// Configuration for a process running the trust engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to render Prometheus metrics when the process exits.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Number of per-key lock entries kept before idle ones are pruned.
    #[serde(default = "default_lock_cleanup_threshold")]
    pub lock_cleanup_threshold: usize,

    /// Consensus, stake and classifier parameters.
    #[serde(default)]
    pub params: EngineParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_lock_cleanup_threshold() -> usize {
    1024
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, EngineError> {
        self.log_format.parse()
    }

    /// Check every field that has constraints beyond its type.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.log_format()?;
        if self.lock_cleanup_threshold == 0 {
            return Err(EngineError::Config(
                "lock_cleanup_threshold must be positive".into(),
            ));
        }
        self.params
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
            lock_cleanup_threshold: default_lock_cleanup_threshold(),
            params: EngineParams::default(),
        }
    }
}
