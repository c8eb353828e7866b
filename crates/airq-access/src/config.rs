//! Registry configuration.

use std::env;
use std::path::PathBuf;

use crate::error::{RegistryError, Result};

/// Environment variable overriding the store path.
pub const PATH_ENV: &str = "AIRQ_PERMISSIONS_PATH";

/// Environment variable overriding pretty-printing of the store.
pub const PRETTY_ENV: &str = "AIRQ_PERMISSIONS_PRETTY";

/// Default store location, relative to the working directory.
pub const DEFAULT_STORAGE_PATH: &str = "data/permissions.json";

/// Configuration for the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Where the JSON store lives.
    pub storage_path: PathBuf,
    /// Whether the store is pretty-printed.
    pub pretty: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            pretty: true,
        }
    }
}

impl RegistryConfig {
    /// Configuration for a store at `path`, other settings default.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: path.into(),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_path = lookup(PATH_ENV)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);

        let pretty = match lookup(PRETTY_ENV) {
            Some(value) => parse_bool(PRETTY_ENV, &value)?,
            None => defaults.pretty,
        };

        Ok(Self {
            storage_path,
            pretty,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RegistryError::Config(format!(
            "invalid {name} value '{value}': expected true or false"
        ))),
    }
}
