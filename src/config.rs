//! Configuration loading: defaults, then an optional TOML file, then
//! `SVNVIEW_*` environment overrides.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ViewError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Name of the version-control metadata directory skipped during local
    /// enumeration.
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: String,

    /// Client binary invoked by the subprocess gateway.
    #[serde(default = "default_svn_command")]
    pub svn_command: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_metadata_dir() -> String {
    ".svn".to_string()
}

fn default_svn_command() -> String {
    "svn".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            svn_command: default_svn_command(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ViewConfig {
    /// Load configuration, lowest precedence first: built-in defaults, the
    /// given TOML file (if any), `SVNVIEW_*` environment variables
    /// (`SVNVIEW_LOGGING__LEVEL=debug` style for nested keys).
    pub fn load(file: Option<&Path>) -> Result<Self, ViewError> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("SVNVIEW")
                .prefix_separator("_")
                .separator("__"),
        );
        let raw = builder
            .build()
            .map_err(|e| ViewError::Config(e.to_string()))?;
        raw.try_deserialize()
            .map_err(|e| ViewError::Config(e.to_string()))
    }
}
