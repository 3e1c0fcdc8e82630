//! Configuration management
//!
//! Settings come from `coroc.toml` (the path given with `--config`, or the
//! current directory), then `COROC_*` environment variables, then command
//! line flags, each layer overriding the one before.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "coroc.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value `{value}` for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output files are named `<stem>.<suffix>.coro`.
    pub suffix: String,
    /// Appended to a coroutine's name to form its generated sibling.
    pub fn_suffix: String,
    /// Comment written at the top of every generated file.
    pub header: String,
    /// Upper bound on ticks for `coroc drive`.
    pub max_ticks: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suffix: "gen".to_string(),
            fn_suffix: "_gen".to_string(),
            header: "// Code generated by coroc; DO NOT EDIT.".to_string(),
            max_ticks: 10_000,
        }
    }
}

impl Config {
    /// Load the file layer and the environment layer.
    ///
    /// An explicit `path` must exist; without one, `coroc.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("failed to serialize config: {}", e)))
    }

    /// Override fields from `COROC_SUFFIX`, `COROC_FN_SUFFIX` and
    /// `COROC_MAX_TICKS`, read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(suffix) = lookup("COROC_SUFFIX") {
            self.suffix = suffix;
        }
        if let Some(fn_suffix) = lookup("COROC_FN_SUFFIX") {
            self.fn_suffix = fn_suffix;
        }
        if let Some(value) = lookup("COROC_MAX_TICKS") {
            self.max_ticks = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "COROC_MAX_TICKS",
                value,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let name_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
        if self.suffix.is_empty() || !self.suffix.chars().all(name_char) {
            return Err(ConfigError::Invalid(format!(
                "suffix `{}` must be non-empty and use only letters, digits, `_` or `-`",
                self.suffix
            )));
        }
        let ident_char = |c: char| c.is_ascii_alphanumeric() || c == '_';
        if self.fn_suffix.is_empty() || !self.fn_suffix.chars().all(ident_char) {
            return Err(ConfigError::Invalid(format!(
                "fn_suffix `{}` must be non-empty and use only letters, digits or `_`",
                self.fn_suffix
            )));
        }
        if self.header.lines().any(|l| !l.trim_start().starts_with("//")) {
            return Err(ConfigError::Invalid(
                "header must consist of `//` comment lines".to_string(),
            ));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid("max_ticks must be at least 1".to_string()));
        }
        Ok(())
    }
}
