//! File-based config discovery for CLI use
//!
//! Layering (later wins): built-in defaults, the config file, then
//! `SOLID_`-prefixed environment variables (`SOLID_SETTINGS__BUNDLER=esbuild`).

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde_json::Value;

use crate::defaults::{CONFIG_FILE, PACKAGE_JSON_FIELD};
use crate::error::{ConfigError, Result};
use crate::manifest::SolidConfig;

/// Searches a project root for Solid configuration and loads it.
///
/// # Example
///
/// ```no_run
/// use solid_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load().unwrap();
/// for name in config.apps.keys() {
///     println!("{name}");
/// }
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `solid.toml`
    /// 2. `package.json` with a non-null `solid` field
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        let parsed = fs::read_to_string(&pkg_path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())?;
        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(field) if !field.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load config from the discovered file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<SolidConfig> {
        let path = self
            .find()
            .ok_or_else(|| ConfigError::NotFound(self.root.clone()))?;
        self.load_from(&path)
    }

    /// Load config from a specific file path.
    pub fn load_from(&self, path: &Path) -> Result<SolidConfig> {
        let base = Figment::new().merge(Serialized::defaults(SolidConfig::default()));

        let figment = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            base.merge(Serialized::defaults(Self::package_json_field(path)?))
        } else if path.exists() {
            base.merge(Toml::file(path))
        } else {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        };

        let config: SolidConfig = figment
            .merge(Env::prefixed("SOLID_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            path = %path.display(),
            apps = config.apps.len(),
            "loaded solid configuration"
        );
        Ok(config)
    }

    fn package_json_field(path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("invalid JSON: {e}"),
        })?;

        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(field) if !field.is_null() => Ok(field.clone()),
            _ => Err(ConfigError::Parse {
                path: path.to_path_buf(),
                message: format!("missing \"{PACKAGE_JSON_FIELD}\" field"),
            }),
        }
    }
}
