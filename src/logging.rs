//! Logging System
//!
//! Structured logging via the `tracing` crate: configurable level, text or
//! JSON output, stderr or file destination. The `SVNVIEW_LOG` environment
//! variable overrides the configured filter.

use crate::error::ViewError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Resolve the log file path with precedence: CLI, `SVNVIEW_LOG_FILE` env,
/// config file, platform state directory default.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, ViewError> {
    if let Some(p) = cli_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    if let Ok(env_path) = std::env::var("SVNVIEW_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(p) = config_file {
        if !p.as_os_str().is_empty() {
            return Ok(p);
        }
    }
    default_log_file_path()
}

fn default_log_file_path() -> Result<PathBuf, ViewError> {
    let project_dirs = directories::ProjectDirs::from("", "svnview", "svnview").ok_or_else(|| {
        ViewError::Config("Could not determine platform state directory for log file".to_string())
    })?;
    let state_dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_dir())
        .to_path_buf();
    Ok(state_dir.join("svnview.log"))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is `file`; None means use runtime default
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, stderr only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Initialize the logging system.
///
/// Filter precedence: `SVNVIEW_LOG` environment variable, then the
/// configured level. Initialization failure (for instance a second call) is
/// reported, never panicked on.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ViewError> {
    let cfg = config.cloned().unwrap_or_default();
    if !cfg.enabled {
        return Ok(());
    }

    let directives = std::env::var("SVNVIEW_LOG")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| cfg.level.clone());
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| ViewError::Config(format!("Invalid log filter `{}`: {}", directives, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoUtc::rfc_3339());

    let file_writer = if cfg.output == "file" {
        let path = resolve_log_file_path(None, cfg.file.clone())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ViewError::Config(format!("Failed to create log directory: {}", e))
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ViewError::Config(format!("Failed to open log file: {}", e)))?;
        Some(std::sync::Mutex::new(file))
    } else {
        None
    };

    let json = cfg.format == "json";
    let result = match (json, file_writer) {
        (true, Some(writer)) => builder.json().with_ansi(false).with_writer(writer).try_init(),
        (true, None) => builder
            .json()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .try_init(),
        (false, Some(writer)) => builder.with_ansi(false).with_writer(writer).try_init(),
        (false, None) => builder
            .with_ansi(cfg.color)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    result.map_err(|e| ViewError::Config(format!("Failed to initialize logging: {}", e)))
}
