//! Application configuration management.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "FILESTORE";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Storage backend configuration.
    pub storage: StorageSettings,
}

/// Storage backend selection, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageSettings {
    /// Local filesystem under a web server's public folder.
    Local {
        /// Storage root; must contain a `public` folder.
        root: PathBuf,
        /// Origin the public folder is served from.
        origin_url: String,
    },
    /// Azure File Share.
    AzureFileShare {
        /// Storage account name.
        account: String,
        /// Share name.
        share: String,
        /// Pre-issued shared access signature query string.
        shared_access_signature: String,
        /// Endpoint override, e.g. an emulator.
        #[serde(default)]
        endpoint: Option<String>,
        /// Upload range size override in bytes.
        #[serde(default)]
        max_range_size: Option<u64>,
    },
    /// Azure Blob Storage.
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Pre-issued shared access signature query string.
        shared_access_signature: String,
        /// Endpoint override, e.g. an emulator.
        #[serde(default)]
        endpoint: Option<String>,
    },
}

impl StorageSettings {
    /// Short backend name, as used in logs.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::AzureFileShare { .. } => "azure_file_share",
            Self::AzureBlob { .. } => "azure_blob",
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest precedence first: `config/default`,
    /// `config/{RUN_MODE}` and `FILESTORE__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(environment())
            .build()?;

        config.try_deserialize()
    }

    /// Loads configuration from one explicit file, with environment
    /// overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the configuration is
    /// invalid.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?;

        config.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
