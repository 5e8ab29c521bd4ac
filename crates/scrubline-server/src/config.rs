//! Server configuration
//!
//! Loaded from a YAML or TOML file, then overridden by `SCRUBLINE_*`
//! environment variables.

use scrubline_sanitizer::{RedactionMode, SanitizationConfig, Severity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrublineConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub sanitization: SanitizationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Requests with more text than this are refused
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_false")]
    pub enabled: bool,

    #[serde(default = "default_audit_path")]
    pub path: String,

    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none", default = "default_max_records")]
    pub max_records: Option<usize>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_false(),
            path: default_audit_path(),
            flush_interval_secs: default_flush_interval_secs(),
            max_records: default_max_records(),
        }
    }
}

impl AuditConfig {
    /// Audit file path with `~` expanded
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).to_string())
    }
}

impl ScrublineConfig {
    /// Load from a YAML or TOML file, chosen by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        // Server settings
        if let Ok(val) = std::env::var("SCRUBLINE_HOST") {
            self.server.host = val;
        }

        if let Ok(val) = std::env::var("SCRUBLINE_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("Warning: Invalid SCRUBLINE_PORT '{}', ignoring", val),
            }
        }

        if let Ok(val) = std::env::var("SCRUBLINE_MAX_INPUT_BYTES") {
            match val.parse::<usize>() {
                Ok(limit) => self.server.max_input_bytes = limit,
                Err(_) => eprintln!(
                    "Warning: Invalid SCRUBLINE_MAX_INPUT_BYTES '{}', ignoring",
                    val
                ),
            }
        }

        // Sanitization settings
        if let Ok(val) = std::env::var("SCRUBLINE_REDACTION_MODE") {
            match val.parse::<RedactionMode>() {
                Ok(mode) => self.sanitization.redaction_mode = mode,
                Err(e) => eprintln!("Warning: Invalid SCRUBLINE_REDACTION_MODE: {}", e),
            }
        }

        if let Ok(val) = std::env::var("SCRUBLINE_MASK_CHAR") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.sanitization.mask_char = c,
                _ => eprintln!(
                    "Warning: SCRUBLINE_MASK_CHAR must be a single character, got '{}'",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("SCRUBLINE_MIN_SEVERITY") {
            match val.parse::<Severity>() {
                Ok(severity) => self.sanitization.min_severity = severity,
                Err(e) => eprintln!("Warning: Invalid SCRUBLINE_MIN_SEVERITY: {}", e),
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("SCRUBLINE_LOG_LEVEL") {
            self.logging.level = val;
        }

        // Audit settings
        if let Ok(val) = std::env::var("SCRUBLINE_AUDIT_PATH") {
            self.audit.path = val;
            self.audit.enabled = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_input_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_input_bytes must be greater than zero".to_string(),
            ));
        }

        if self.sanitization.mask_char.is_control() {
            return Err(ConfigError::Invalid(
                "sanitization.mask_char must be a printable character".to_string(),
            ));
        }

        if self.audit.enabled {
            if self.audit.path.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "audit.path is required when audit is enabled".to_string(),
                ));
            }
            if self.audit.flush_interval_secs == 0 {
                return Err(ConfigError::Invalid(
                    "audit.flush_interval_secs must be greater than zero".to_string(),
                ));
            }
            if self.audit.max_records == Some(0) {
                return Err(ConfigError::Invalid(
                    "audit.max_records must be greater than zero".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_max_input_bytes() -> usize {
    1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_audit_path() -> String {
    "~/.scrubline/audit.json".to_string()
}

fn default_flush_interval_secs() -> u64 {
    60
}

fn default_max_records() -> Option<usize> {
    Some(10_000)
}

fn default_false() -> bool {
    false
}
