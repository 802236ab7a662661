//! Loader configuration file schema.
//!
//! ```yaml
//! test_suites: suites/
//! output: ndjson
//! parameters:
//!   date: "2024-01-01"
//!   table: orders
//! ```
//!
//! Every field is optional. Command-line flags take precedence over values
//! read here.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::expand::ParameterMap;
use crate::serialization::OutputFormat;

/// Environment variable naming a config file to use when none is given.
pub const CONFIG_ENV_VAR: &str = "SUITELOAD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings for a load run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SuiteloadConfig {
    /// Suite file or directory to load
    #[serde(default)]
    pub test_suites: Option<PathBuf>,

    /// Parameters substituted into `${name}` placeholders
    #[serde(default)]
    pub parameters: ParameterMap,

    /// Output format for printed suites
    #[serde(default)]
    pub output: OutputFormat,
}

impl SuiteloadConfig {
    /// Load configuration from a YAML file.
    ///
    /// A relative `test_suites` path is resolved against the config file's
    /// directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(suites), Some(base)) = (config.test_suites.as_ref(), path.parent()) {
            if suites.is_relative() {
                config.test_suites = Some(base.join(suites));
            }
        }

        Ok(config)
    }

    /// Load the file named by [`CONFIG_ENV_VAR`], or defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                tracing::info!("Using config file from {}", CONFIG_ENV_VAR);
                Self::from_file(PathBuf::from(path))
            }
            None => Ok(Self::default()),
        }
    }

    /// Overlay parameters given on the command line; they replace file values.
    pub fn merge_parameters(&mut self, overrides: ParameterMap) {
        self.parameters.extend(overrides);
    }
}
