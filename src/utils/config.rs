// src/utils/config.rs
//! Engine configuration
//!
//! Sources, later overriding earlier:
//! 1. `aspect-engine.yaml` in the current directory (if present)
//! 2. An explicit file passed to [`EngineConfig::load`]
//! 3. Environment variables prefixed with `ASPECT__` (e.g. `ASPECT__LOGGING__LEVEL=debug`)

use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aspect-engine";

/// Environment variable prefix for overrides
pub const CONFIG_ENV_PREFIX: &str = "ASPECT";

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Structural member names excluded from wrapping
    pub reserved: ReservedNames,

    /// Logging setup for binaries embedding the engine
    pub logging: LoggingConfig,
}

/// Structural names skipped by the member filter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedNames {
    /// Always excluded from the instance-level namespace
    pub instance: Vec<String>,

    /// Excluded from the type-level namespace unless explicitly requested
    pub type_level: Vec<String>,
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self {
            instance: vec!["constructor".to_string()],
            type_level: vec![
                "length".to_string(),
                "name".to_string(),
                "prototype".to_string(),
            ],
        }
    }
}

impl ReservedNames {
    pub fn is_reserved_instance(&self, name: &str) -> bool {
        self.instance.iter().any(|n| n == name)
    }

    pub fn is_reserved_type_level(&self, name: &str) -> bool {
        self.type_level.iter().any(|n| n == name)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `ASPECT_LOG` is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl EngineConfig {
    /// Load configuration from files and environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::with_name(config_path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("reserved.instance")
                    .with_list_parse_key("reserved.type_level")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
