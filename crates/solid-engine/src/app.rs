//! Application configuration and the per-run resolved view of it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use solid_config::{AppManifest, AppType, defaults};

use crate::plugin::Plugin;

/// Build configuration for one named application.
///
/// Every field except `plugins` and `pass_envs` is optional; unset values are
/// filled from app-scoped defaults when a run resolves the app into
/// [`ExtendedOptions`].
#[derive(Clone, Default)]
pub struct AppConfig {
    pub input: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub public_url: Option<String>,
    pub app_type: Option<AppType>,
    pub pass_envs: Vec<String>,
    pub plugins: Vec<Arc<dyn Plugin>>,
    pub hard_watch: Option<bool>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a manifest entry and the plugin instances created for it.
    pub fn from_manifest(manifest: &AppManifest, plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            input: manifest.input.clone(),
            output: manifest.output.clone(),
            root: manifest.root.clone(),
            public_url: manifest.public_url.clone(),
            app_type: manifest.app_type,
            pass_envs: manifest.pass_envs.clone(),
            plugins,
            hard_watch: manifest.hard_watch,
        }
    }

    /// Add an input glob. The first call replaces the default pattern.
    pub fn input(mut self, pattern: impl Into<String>) -> Self {
        self.input.get_or_insert_with(Vec::new).push(pattern.into());
        self
    }

    pub fn output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = Some(dir.into());
        self
    }

    pub fn root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root = Some(dir.into());
        self
    }

    pub fn public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    pub fn app_type(mut self, app_type: AppType) -> Self {
        self.app_type = Some(app_type);
        self
    }

    pub fn pass_env(mut self, var: impl Into<String>) -> Self {
        self.pass_envs.push(var.into());
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn hard_watch(mut self, enabled: bool) -> Self {
        self.hard_watch = Some(enabled);
        self
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("AppConfig")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("root", &self.root)
            .field("public_url", &self.public_url)
            .field("app_type", &self.app_type)
            .field("pass_envs", &self.pass_envs)
            .field("plugins", &plugins)
            .field("hard_watch", &self.hard_watch)
            .finish()
    }
}

/// Whether a run produces a production build or a development watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Production,
    Development,
}

impl BuildMode {
    pub fn is_production(self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Production => f.write_str("production"),
            BuildMode::Development => f.write_str("development"),
        }
    }
}

/// App configuration merged over defaults, scoped to a single run.
///
/// Handed to every plugin call of the run and dropped when the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedOptions {
    pub name: String,
    pub mode: BuildMode,
    pub project_root: PathBuf,
    pub input: Vec<String>,
    pub output: PathBuf,
    pub root: PathBuf,
    pub public_url: String,
    pub app_type: AppType,
    pub pass_envs: Vec<String>,
    pub hard_watch: bool,
}

impl ExtendedOptions {
    pub fn resolve(
        name: &str,
        config: &AppConfig,
        mode: BuildMode,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.to_string(),
            mode,
            project_root: project_root.into(),
            input: config
                .input
                .clone()
                .filter(|patterns| !patterns.is_empty())
                .unwrap_or_else(|| defaults::default_input(name)),
            output: config
                .output
                .clone()
                .unwrap_or_else(|| defaults::default_output(name)),
            root: config.root.clone().unwrap_or_else(defaults::default_root),
            public_url: config
                .public_url
                .clone()
                .unwrap_or_else(|| defaults::default_public_url(name)),
            app_type: config.app_type.unwrap_or_else(defaults::default_app_type),
            pass_envs: config.pass_envs.clone(),
            hard_watch: config.hard_watch.unwrap_or_else(defaults::default_hard_watch),
        }
    }

    /// Output directory resolved against the project root.
    pub fn output_dir(&self) -> PathBuf {
        resolve(&self.project_root, &self.output)
    }

    /// Source root resolved against the project root.
    pub fn source_root(&self) -> PathBuf {
        resolve(&self.project_root, &self.root)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
