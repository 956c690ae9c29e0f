//! Process-wide app registry.

use indexmap::IndexMap;
use thiserror::Error;

use crate::app::AppConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("app '{0}' is already registered")]
    Duplicate(String),

    #[error("app '{0}' is not registered")]
    NotRegistered(String),

    #[error("app name must not be empty")]
    EmptyName,
}

/// Named app configurations, in registration order.
///
/// Filled during startup, then handed to [`crate::Solid`] and only read.
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: IndexMap<String, AppConfig>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        config: AppConfig,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.apps.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::trace!(app = %name, plugins = config.plugins.len(), "Registered app");
        self.apps.insert(name, config);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&AppConfig, RegistryError> {
        self.apps
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppConfig)> {
        self.apps.iter().map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
