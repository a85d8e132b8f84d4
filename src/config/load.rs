//! Configuration loading from files.
//!
//! This module handles reading and parsing configuration files.

use std::path::{Path, PathBuf};

use config::{File, FileFormat};

use super::{ConfigError, RootConfig};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "mdsite.yaml";

impl RootConfig {
    /// Resolve the config file path from the command line argument,
    /// defaulting to `mdsite.yaml` in the current directory.
    pub fn path_from_arg(config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        if config_file.is_relative() {
            Ok(std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file))
        } else {
            Ok(config_file.to_path_buf())
        }
    }

    /// Load the config from the command line argument.
    ///
    /// An explicitly named file must exist. The default file is optional:
    /// without it every setting takes its default value.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let path = Self::path_from_arg(config_file)?;
        let config = Self::load_from_file(&path, config_file.is_some())?;
        Ok((config, path))
    }

    /// Load the config from a file path
    pub(crate) fn load_from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Yaml).required(required))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
