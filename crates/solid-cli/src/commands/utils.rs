//! Shared utilities for command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use solid_config::{ConfigDiscovery, SolidConfig};
use solid_engine::{AppRegistry, RunRequest, Solid};

use crate::bundler::CommandBundlerFactory;
use crate::cli::{ProjectArgs, RunArgs};
use crate::error::{CliError, Result};
use crate::plugins;

/// A loaded and validated project.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: SolidConfig,
}

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Get the current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().map_err(CliError::Io)
}

/// Load and validate the configuration the project arguments point at.
pub fn load_project(args: &ProjectArgs) -> Result<Project> {
    let cwd = get_cwd()?;
    let root = match &args.cwd {
        Some(dir) => resolve_path(dir, &cwd),
        None => cwd.clone(),
    };
    if !root.exists() {
        return Err(CliError::FileNotFound(root));
    }
    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "--cwd is not a directory: {}",
            root.display()
        )));
    }

    let discovery = ConfigDiscovery::new(&root);
    let config = match &args.config {
        Some(file) => {
            let path = resolve_path(file, &cwd);
            if !path.exists() {
                return Err(CliError::FileNotFound(path));
            }
            discovery.load_from(&path)?
        }
        None => discovery.load()?,
    };
    solid_config::validate(&config)?;

    Ok(Project { root, config })
}

/// Build the app registry, instantiating every plugin.
pub fn registry(project: &Project) -> Result<AppRegistry> {
    plugins::registry_from_config(&project.config)
}

/// Orchestrator for the project, driving the configured bundler program.
pub fn orchestrator(project: &Project) -> Result<Solid> {
    let settings = &project.config.settings;
    let factory = Arc::new(CommandBundlerFactory::new(settings.clone()));
    Ok(Solid::new(registry(project)?, factory)
        .with_project_root(&project.root)
        .with_settle_delay(Duration::from_millis(settings.settle_ms)))
}

pub fn request(args: &RunArgs) -> RunRequest {
    let mut request = RunRequest::new(&args.app);
    if let Some(env) = &args.env {
        request = request.env(env);
    }
    for plugin in &args.disable {
        request = request.disable(plugin);
    }
    request
}
