//! Configuration
//!
//! Resolution order, later wins:
//!
//! 1. built-in defaults
//! 2. a YAML file (explicit path, or `$HOME/.expctl.yaml` when present)
//! 3. environment variables (`EXPCTL_NAMESPACE`, `LOG_LEVEL`)
//! 4. explicit overrides (command-line flags)
//!
//! Environment variables are passed in rather than read from the process so
//! resolution stays testable.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// File name looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".expctl.yaml";

/// Environment variable overriding the namespace.
pub const ENV_NAMESPACE: &str = "EXPCTL_NAMESPACE";

/// Environment variable setting the log filter.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    namespace: String,
    log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            log_level: None,
        }
    }
}

impl Config {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Get the namespace used to select experiments by name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Get the log filter directive; `None` disables logging.
    #[must_use]
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}

/// Builder for `Config`.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    file: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    env: HashMap<String, String>,
    namespace: Option<String>,
}

impl ConfigBuilder {
    /// Use this configuration file; it must exist.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Look for [`CONFIG_FILE_NAME`] in this directory when no explicit file
    /// is given. A missing file is not an error.
    #[must_use]
    pub fn home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Supply environment variables.
    #[must_use]
    pub fn env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Override the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Resolve the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a configuration file cannot be loaded.
    pub fn build(self) -> Result<Config> {
        let home_file = self
            .home_dir
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file());

        let mut config = match self.file.or(home_file) {
            Some(path) => {
                debug!(path = %path.display(), "using config file");
                Config::from_yaml_file(&path)?
            }
            None => Config::default(),
        };

        if let Some(namespace) = self.env.get(ENV_NAMESPACE).filter(|v| !v.is_empty()) {
            config.namespace.clone_from(namespace);
        }
        if let Some(level) = self.env.get(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            config.log_level = Some(level.clone());
        }
        if let Some(namespace) = self.namespace {
            config.namespace = namespace;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::builder().build().expect("defaults");
        assert_eq!(config.namespace(), DEFAULT_NAMESPACE);
        assert!(config.log_level().is_none());
    }

    #[test]
    fn test_precedence() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "namespace: from-file\nlogLevel: info\n",
        )
        .expect("write config");

        let from_file = Config::builder().home_dir(dir.path()).build().expect("file");
        assert_eq!(from_file.namespace(), "from-file");
        assert_eq!(from_file.log_level(), Some("info"));

        let from_env = Config::builder()
            .home_dir(dir.path())
            .env([(ENV_NAMESPACE, "from-env"), (ENV_LOG_LEVEL, "debug")])
            .build()
            .expect("env");
        assert_eq!(from_env.namespace(), "from-env");
        assert_eq!(from_env.log_level(), Some("debug"));

        let from_flag = Config::builder()
            .home_dir(dir.path())
            .env([(ENV_NAMESPACE, "from-env")])
            .namespace(Some("from-flag".to_string()))
            .build()
            .expect("flag");
        assert_eq!(from_flag.namespace(), "from-flag");
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::builder()
            .file("/nonexistent/expctl/config.yaml")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_home_file_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::builder().home_dir(dir.path()).build().expect("defaults");
        assert_eq!(config, Config::default());
    }
}
