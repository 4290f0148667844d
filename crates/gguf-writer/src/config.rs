//! Writer configuration loaded from TOML with `GGUF_WRITER_*` environment
//! overrides.
//!
//! # Example
//!
//! ```toml
//! alignment = 64
//! flush_each_phase = true
//! buffer_capacity = 8388608
//! ```

use gguf_format::GGUF_DEFAULT_ALIGNMENT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default capacity of the buffered file sink created by `GgufWriter::open`.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024 * 1024;

/// Tunables for a [`GgufWriter`](crate::GgufWriter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Tensor payload alignment in bytes.
    /// Override: `GGUF_WRITER_ALIGNMENT`
    pub alignment: u32,

    /// Flush the sink after the header, metadata and descriptor phases.
    /// Override: `GGUF_WRITER_FLUSH_EACH_PHASE`
    pub flush_each_phase: bool,

    /// Capacity of the `BufWriter` used when opening a file path.
    /// Override: `GGUF_WRITER_BUFFER_CAPACITY`
    pub buffer_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            alignment: GGUF_DEFAULT_ALIGNMENT,
            flush_each_phase: true,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Errors that can occur when loading or validating a [`WriterConfig`].
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to render TOML: {0}")]
    Render(#[from] toml::ser::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid environment override {key}={value}: {reason}")]
    EnvOverride { key: String, value: String, reason: String },
}

impl WriterConfig {
    /// Render the default configuration as TOML.
    pub fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields, then apply environment variable overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut cfg: WriterConfig = toml::from_str(toml_str)?;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load only from environment variables, starting from defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alignment == 0 {
            return Err(ConfigError::Validation("alignment must be > 0".into()));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::Validation("buffer_capacity must be > 0".into()));
        }
        Ok(())
    }

    /// Apply `GGUF_WRITER_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("GGUF_WRITER_ALIGNMENT") {
            self.alignment = val.parse::<u32>().map_err(|e| ConfigError::EnvOverride {
                key: "GGUF_WRITER_ALIGNMENT".into(),
                value: val.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Ok(val) = std::env::var("GGUF_WRITER_FLUSH_EACH_PHASE") {
            self.flush_each_phase = matches!(val.as_str(), "1" | "true" | "yes");
        }

        if let Ok(val) = std::env::var("GGUF_WRITER_BUFFER_CAPACITY") {
            self.buffer_capacity = val.parse::<usize>().map_err(|e| ConfigError::EnvOverride {
                key: "GGUF_WRITER_BUFFER_CAPACITY".into(),
                value: val.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}
