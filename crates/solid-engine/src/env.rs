//! Environment resolution for a run.
//!
//! Variables come from a dotenv file in the project root (`.env`, or
//! `.env.<name>` when an environment is named) and are then overlaid with
//! the host values of the app's `pass_envs`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

pub type EnvMap = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("environment file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to parse environment file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("environment loader failed: {0}")]
    Loader(String),
}

/// Source of dotenv files and host variables.
pub trait EnvLoader: Send + Sync {
    /// Parse the file at `path`. `Ok(None)` when the file does not exist.
    fn load(&self, path: &Path) -> Result<Option<EnvMap>, EnvError>;

    fn host_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Reads dotenv files from disk without touching the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvLoader;

impl EnvLoader for DotenvLoader {
    fn load(&self, path: &Path) -> Result<Option<EnvMap>, EnvError> {
        if !path.is_file() {
            return Ok(None);
        }

        let parse_err = |source| EnvError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let mut vars = EnvMap::new();
        for item in dotenvy::from_path_iter(path).map_err(parse_err)? {
            let (key, value) = item.map_err(parse_err)?;
            vars.insert(key, value);
        }
        Ok(Some(vars))
    }
}

/// The environment a run asked for, if any. A blank name selects the
/// default environment.
fn named_env(env_name: Option<&str>) -> Option<&str> {
    env_name.map(str::trim).filter(|name| !name.is_empty())
}

/// `.env` for the default environment, `.env.<name>` otherwise.
pub fn env_file_name(env_name: Option<&str>) -> String {
    match named_env(env_name) {
        Some(name) => format!(".env.{name}"),
        None => ".env".to_string(),
    }
}

/// Load the run's environment.
///
/// A named environment must have its file; the default `.env` is optional.
/// Host values of `pass_envs` win over file values, and variables the host
/// does not define are left alone.
pub async fn resolve_env(
    loader: Arc<dyn EnvLoader>,
    project_root: &Path,
    env_name: Option<&str>,
    pass_envs: &[String],
) -> Result<EnvMap, EnvError> {
    let path = project_root.join(env_file_name(env_name));
    let required = named_env(env_name).is_some();

    let file_vars = {
        let loader = loader.clone();
        let path = path.clone();
        tokio::task::spawn_blocking(move || loader.load(&path))
            .await
            .map_err(|e| EnvError::Loader(e.to_string()))??
    };

    let mut vars = match file_vars {
        Some(vars) => {
            tracing::debug!(path = %path.display(), count = vars.len(), "Loaded environment file");
            vars
        }
        None if required => return Err(EnvError::Missing { path }),
        None => {
            tracing::debug!(path = %path.display(), "No default environment file");
            EnvMap::new()
        }
    };

    for key in pass_envs {
        if let Some(value) = loader.host_var(key) {
            vars.insert(key.clone(), value);
        }
    }

    Ok(vars)
}
