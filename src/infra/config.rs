//! Configuration management infrastructure.
//!
//! This module provides configuration file support, allowing users to save
//! signing profiles (author and distributor certificate bundles) instead of
//! passing every path on the command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::error::{SigningError, SigningResult};

/// Application configuration with all signing preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfiguration {
    /// Path to the author PKCS#12 bundle
    pub author_p12: Option<PathBuf>,

    /// Environment variable holding the author bundle password
    pub author_password_env: String,

    /// Path to the distributor PKCS#12 bundle
    pub distributor_p12: Option<PathBuf>,

    /// Environment variable holding the distributor bundle password
    pub distributor_password_env: String,

    /// Whether to overwrite the input package when no output path is given
    pub overwrite_input: bool,

    /// Whether to show verbose output
    pub verbose: bool,
}

impl Default for SigningConfiguration {
    fn default() -> Self {
        Self {
            author_p12: None,
            author_password_env: "TIZEN_AUTHOR_PASSWORD".to_string(),
            distributor_p12: None,
            distributor_password_env: "TIZEN_DISTRIBUTOR_PASSWORD".to_string(),
            overwrite_input: false,
            verbose: false,
        }
    }
}

/// Configuration manager for handling config files
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with default path
    pub fn new() -> SigningResult<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Create a configuration manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> SigningResult<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("tizen-signer").join("config.toml"))
        } else {
            Ok(PathBuf::from("tizen-signer-config.toml"))
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default(&self) -> SigningResult<SigningConfiguration> {
        if self.config_path.exists() {
            self.load()
        } else {
            log::info!(
                "Configuration file not found, creating default: {}",
                self.config_path.display()
            );
            let default_config = SigningConfiguration::default();
            self.save(&default_config)?;
            Ok(default_config)
        }
    }

    /// Load configuration from file
    pub fn load(&self) -> SigningResult<SigningConfiguration> {
        log::info!("Loading configuration from: {}", self.config_path.display());

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            SigningError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        let config: SigningConfiguration = toml::from_str(&content).map_err(|e| {
            SigningError::ConfigurationError(format!("Failed to parse config file: {e}"))
        })?;

        self.validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &SigningConfiguration) -> SigningResult<()> {
        log::info!("Saving configuration to: {}", self.config_path.display());

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SigningError::ConfigurationError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| {
            SigningError::ConfigurationError(format!("Failed to serialize config: {e}"))
        })?;

        fs::write(&self.config_path, content).map_err(|e| {
            SigningError::ConfigurationError(format!(
                "Failed to write config file {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Validate configuration values
    fn validate_config(&self, config: &SigningConfiguration) -> SigningResult<()> {
        for (label, path) in [
            ("author_p12", &config.author_p12),
            ("distributor_p12", &config.distributor_p12),
        ] {
            if let Some(path) = path {
                if path.as_os_str().is_empty() {
                    return Err(SigningError::ConfigurationError(format!(
                        "{label} must not be an empty path"
                    )));
                }
            }
        }

        for (label, env_name) in [
            ("author_password_env", &config.author_password_env),
            ("distributor_password_env", &config.distributor_password_env),
        ] {
            if env_name.is_empty() {
                return Err(SigningError::ConfigurationError(format!(
                    "{label} must name an environment variable"
                )));
            }
        }

        Ok(())
    }

    /// Get the configuration file path
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}
