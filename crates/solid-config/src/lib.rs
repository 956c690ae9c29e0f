//! Configuration model for Solid.
//!
//! A project declares its buildable applications in `solid.toml` (or under a
//! `solid` field in `package.json`). This crate owns the on-disk model, its
//! defaults, discovery and structural validation. Turning a manifest into a
//! runnable app, with live plugin instances, happens in `solid-engine` and
//! `solid-cli`.

pub mod defaults;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod settings;
pub mod validation;

// Re-export main types
pub use discovery::ConfigDiscovery;
pub use error::{ConfigError, Result};
pub use manifest::{AppManifest, AppType, PluginSpec, SolidConfig};
pub use settings::Settings;
pub use validation::validate;
