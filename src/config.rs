use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::convert::ConvertOptions;
use crate::heading::HeadingPolicy;

const MAX_HEADING_BASE_LEVEL: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ConvertConfig {
    /// Outline depth the converted text is embedded under; a Jira `h1.`
    /// renders with one more asterisk than this.
    #[serde(default = "default_heading_base_level")]
    pub heading_base_level: usize,
    #[serde(default)]
    pub heading_policy: HeadingPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            heading_base_level: default_heading_base_level(),
            heading_policy: HeadingPolicy::default(),
        }
    }
}

impl ConvertConfig {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            heading_policy: self.heading_policy,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Default)]
pub struct AppConfigOverrides {
    pub heading_base_level: Option<usize>,
    pub heading_policy: Option<HeadingPolicy>,
    pub logging_debug: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found at {path}")]
    MissingConfigFile { path: PathBuf },
    #[error("failed to resolve config path: HOME is not set and XDG_CONFIG_HOME is unset")]
    MissingHomeDirectory,
    #[error("failed to read config file at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse TOML config at {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load() -> Result<AppConfig, ConfigError> {
    let path = resolve_config_path()?;
    load_from(&path)
}

/// Like [`load`], but a missing file (or missing home directory) yields the
/// defaults. The converter needs no configuration to run.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let loaded = match path {
        Some(path) => load_from(path),
        None => load(),
    };
    match loaded {
        Err(ConfigError::MissingConfigFile { .. }) | Err(ConfigError::MissingHomeDirectory)
            if path.is_none() =>
        {
            Ok(AppConfig::default())
        }
        other => other,
    }
}

pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let path = path.to_path_buf();
    let raw = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingConfigFile { path: path.clone() }
        } else {
            ConfigError::ReadFailed {
                path: path.clone(),
                source,
            }
        }
    })?;

    let cfg = toml::from_str::<AppConfig>(&raw).map_err(|source| ConfigError::ParseFailed {
        path: path.clone(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME");
    let home = std::env::var_os("HOME");
    resolve_config_path_from_env(xdg_config_home, home)
}

fn resolve_config_path_from_env(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = xdg_config_home.filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir).join("jira-org").join("config.toml"));
    }

    let home = home
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("jira-org")
        .join("config.toml"))
}

impl AppConfig {
    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) -> Result<(), ConfigError> {
        if let Some(value) = overrides.heading_base_level {
            self.convert.heading_base_level = value;
        }
        if let Some(value) = overrides.heading_policy {
            self.convert.heading_policy = value;
        }
        if let Some(value) = overrides.logging_debug {
            self.logging.debug = value;
        }

        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.convert.heading_base_level > MAX_HEADING_BASE_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "convert.heading_base_level must be <= {MAX_HEADING_BASE_LEVEL}"
            )));
        }

        Ok(())
    }
}

const fn default_heading_base_level() -> usize {
    2
}
