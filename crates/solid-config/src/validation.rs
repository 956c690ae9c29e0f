//! Structural validation that needs no filesystem access.

use std::collections::HashSet;

use crate::error::{ConfigError, Result};
use crate::manifest::{AppManifest, SolidConfig};

/// Validate every app in the configuration.
///
/// Checks app names, input patterns and plugin lists. Stops at the first
/// offending app.
pub fn validate(config: &SolidConfig) -> Result<()> {
    if config.settings.bundler.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "settings.bundler must name a program".to_string(),
        ));
    }

    for (name, app) in &config.apps {
        validate_app(name, app)?;
    }
    Ok(())
}

fn validate_app(name: &str, app: &AppManifest) -> Result<()> {
    let invalid = |reason: &str| ConfigError::InvalidApp {
        app: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("app name cannot be empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(invalid("app name cannot contain path separators"));
    }

    if let Some(input) = &app.input {
        if input.is_empty() {
            return Err(invalid("input must list at least one pattern"));
        }
        if input.iter().any(|pattern| pattern.trim().is_empty()) {
            return Err(invalid("input patterns cannot be empty"));
        }
    }

    if app.pass_envs.iter().any(|var| var.is_empty() || var.contains('=')) {
        return Err(invalid("pass_envs entries must be variable names"));
    }

    let mut seen = HashSet::new();
    for spec in &app.plugins {
        if spec.name.trim().is_empty() {
            return Err(invalid("plugin name cannot be empty"));
        }
        if spec.label.as_deref().is_some_and(|label| label.trim().is_empty()) {
            return Err(invalid("plugin label cannot be empty"));
        }
        // Repeated plugins need distinct labels.
        let plugin = spec.id();
        if !seen.insert(plugin) {
            return Err(ConfigError::DuplicatePlugin {
                app: name.to_string(),
                plugin: plugin.to_string(),
            });
        }
    }

    Ok(())
}
