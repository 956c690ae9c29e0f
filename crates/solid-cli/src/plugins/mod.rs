//! Built-in plugins.
//!
//! The manifest references plugins by name; [`create_plugin`] turns each
//! [`PluginSpec`] into a live instance with its options checked up front, so
//! a typo fails at startup rather than halfway through a build.
//!
//! | name          | hook            | does                                      |
//! |---------------|-----------------|-------------------------------------------|
//! | `copy`        | after           | copies files into the output directory   |
//! | `exec`        | before or after | runs a command with the app environment  |
//! | `node-server` | both (dev only) | restarts a Node process after each build |
//! | `clean`       | before (prod)   | empties the output directory             |
//!
//! An entry with a `label` is known by that label instead of its plugin name,
//! which lets one app run the same plugin twice.

mod clean;
mod copy;
mod exec;
mod node_server;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use solid_config::{AppManifest, PluginSpec, SolidConfig};
use solid_engine::{AppConfig, AppRegistry, BuildContext, Plugin, PluginResult};

use crate::error::{CliError, Result};

pub use clean::CleanPlugin;
pub use copy::{CopyOptions, CopyPlugin};
pub use exec::{ExecOptions, ExecPlugin, When};
pub use node_server::{NodeServerOptions, NodeServerPlugin};

/// Names [`create_plugin`] understands.
pub const BUILTIN: &[&str] = &["copy", "exec", "node-server", "clean"];

/// Instantiate the plugin `spec` names for `app`.
pub fn create_plugin(app: &str, spec: &PluginSpec) -> Result<Arc<dyn Plugin>> {
    let plugin: Arc<dyn Plugin> = match spec.name.as_str() {
        "copy" => Arc::new(CopyPlugin::new(options(app, spec)?)),
        "exec" => Arc::new(ExecPlugin::new(options(app, spec)?)),
        "node-server" => Arc::new(NodeServerPlugin::new(options(app, spec)?)),
        "clean" => {
            if !spec.options.is_empty() {
                return Err(CliError::PluginOptions {
                    app: app.to_string(),
                    plugin: spec.name.clone(),
                    message: "takes no options".to_string(),
                });
            }
            Arc::new(CleanPlugin)
        }
        other => {
            return Err(CliError::UnknownPlugin {
                app: app.to_string(),
                name: other.to_string(),
            });
        }
    };

    Ok(match &spec.label {
        Some(label) => Arc::new(Labeled {
            label: label.clone(),
            inner: plugin,
        }),
        None => plugin,
    })
}

/// A built-in plugin under its manifest label.
struct Labeled {
    label: String,
    inner: Arc<dyn Plugin>,
}

#[async_trait]
impl Plugin for Labeled {
    fn name(&self) -> &str {
        &self.label
    }

    async fn before_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        self.inner.before_build(ctx).await
    }

    async fn after_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        self.inner.after_build(ctx).await
    }
}

/// Instantiate every plugin of one app, in manifest order.
pub fn build_plugins(app: &str, manifest: &AppManifest) -> Result<Vec<Arc<dyn Plugin>>> {
    manifest
        .plugins
        .iter()
        .map(|spec| create_plugin(app, spec))
        .collect()
}

/// Register every app of `config` with its plugins.
pub fn registry_from_config(config: &SolidConfig) -> Result<AppRegistry> {
    let mut registry = AppRegistry::new();
    for (name, manifest) in &config.apps {
        let plugins = build_plugins(name, manifest)?;
        registry.register(name.clone(), AppConfig::from_manifest(manifest, plugins))?;
    }
    tracing::debug!(apps = registry.len(), "Registered apps");
    Ok(registry)
}

fn options<T: DeserializeOwned>(app: &str, spec: &PluginSpec) -> Result<T> {
    spec.options_as().map_err(|e| CliError::PluginOptions {
        app: app.to_string(),
        plugin: spec.name.clone(),
        message: e.to_string(),
    })
}
