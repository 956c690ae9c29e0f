use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use solid_engine::{BuildContext, Plugin, PluginError, PluginResult};

/// Options of the `copy` plugin.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyOptions {
    /// File or directory, relative to the project root
    pub from: PathBuf,
    /// Destination relative to the app's output directory
    #[serde(default)]
    pub to: Option<PathBuf>,
}

/// Copies static files into the output tree after each successful build.
#[derive(Debug)]
pub struct CopyPlugin {
    options: CopyOptions,
}

impl CopyPlugin {
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Plugin for CopyPlugin {
    fn name(&self) -> &str {
        "copy"
    }

    async fn after_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        if !ctx.succeeded() {
            return Ok(());
        }

        let source = ctx.options.project_root.join(&self.options.from);
        if !source.exists() {
            return Err(PluginError::recoverable(format!(
                "copy: {} does not exist",
                source.display()
            )));
        }

        let mut target = ctx.options.output_dir();
        match &self.options.to {
            Some(to) => target.push(to),
            None => {
                if source.is_file() {
                    if let Some(name) = source.file_name() {
                        target.push(name);
                    }
                }
            }
        }

        tracing::debug!(from = %source.display(), to = %target.display(), "Copying");
        let copied = tokio::task::spawn_blocking(move || copy_path(&source, &target))
            .await
            .map_err(|e| PluginError::unrecoverable(anyhow::anyhow!("copy task failed: {e}")))??;
        tracing::debug!(files = copied, "Copied");
        Ok(())
    }
}

/// Copy a file, or a directory's contents, to `to`. Returns the number of
/// files written.
fn copy_path(from: &Path, to: &Path) -> io::Result<usize> {
    if from.is_file() {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from, to)?;
        return Ok(1);
    }

    fs::create_dir_all(to)?;
    let mut count = 0;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        count += copy_path(&entry.path(), &to.join(entry.file_name()))?;
    }
    Ok(count)
}
