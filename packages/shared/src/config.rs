//! Configuration file handling.
//!
//! The server keeps its listen address in a small TOML file next to the
//! working directory. The effective address is written back after startup so
//! the next run picks it up without flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kaiwa_server_config.toml";

/// Listen address used when neither a flag nor the config file provides one.
pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:8080";

/// Config file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Contents of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address to listen to in format of 'host:port'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_address: Option<String>,
}

impl Config {
    /// Read the config file at `path`.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write this config to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective listen address.
    ///
    /// A command line override wins over the file, the file wins over
    /// [`DEFAULT_LISTEN_ADDRESS`]. Blank values count as absent.
    pub fn resolve_listen_address(&self, override_address: Option<&str>) -> String {
        override_address
            .or(self.listen_address.as_deref())
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .unwrap_or(DEFAULT_LISTEN_ADDRESS)
            .to_string()
    }
}
