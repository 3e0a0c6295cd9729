// src/config/loader.rs
//! Configuration loader: TOML files layered with environment overrides

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};

use crate::config::{constants::export, SimulationConfig};
use crate::error::{ImdError, ImdResult};

/// Loads a [`SimulationConfig`] from zero or more TOML files plus
/// `IMD_SIM__`-prefixed environment variables, then validates it
///
/// Later files override earlier ones; the environment overrides all files.
/// Nested keys use `__`, e.g. `IMD_SIM__SESSION__TOTAL_DURATION_S=30`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader with no files and environment overrides enabled
    pub fn new() -> Self {
        Self {
            config_paths: Vec::new(),
            env_prefix: Some(export::ENV_PREFIX.to_string()),
        }
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            ..Self::new()
        }
    }

    /// Append a file; it overrides the ones added before it
    pub fn add_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_paths.push(path.into());
        self
    }

    /// Ignore the process environment
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Files in load order
    pub fn paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate
    pub fn load(&self) -> ImdResult<SimulationConfig> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and merge all sources without validating, so callers can apply
    /// further overrides first
    pub fn load_unvalidated(&self) -> ImdResult<SimulationConfig> {
        let mut builder = Config::builder();

        for path in &self.config_paths {
            if !path.exists() {
                return Err(ImdError::ConfigLoad(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator(export::ENV_SEPARATOR)
                    .separator(export::ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let config: SimulationConfig = builder.build()?.try_deserialize()?;

        tracing::debug!(files = self.config_paths.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> ImdResult<SimulationConfig> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| ImdError::ConfigLoad(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render a configuration as TOML
    pub fn to_toml_string(config: &SimulationConfig) -> ImdResult<String> {
        toml::to_string_pretty(config).map_err(|e| ImdError::Serialization(e.to_string()))
    }

    /// Validate a configuration file without keeping the result
    pub fn validate_config_file<P: AsRef<Path>>(path: P) -> ImdResult<()> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content).map(|_| ())
    }
}
