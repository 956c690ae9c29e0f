use async_trait::async_trait;
use solid_engine::{BuildContext, Plugin, PluginError, PluginResult};

/// Empties the output directory before a production build.
///
/// Refuses to touch a directory outside the project root.
#[derive(Debug, Default)]
pub struct CleanPlugin;

#[async_trait]
impl Plugin for CleanPlugin {
    fn name(&self) -> &str {
        "clean"
    }

    async fn before_build(&self, ctx: &BuildContext<'_>) -> PluginResult {
        if !ctx.mode.is_production() {
            return Ok(());
        }

        let out_dir = ctx.options.output_dir();
        let root = &ctx.options.project_root;
        if out_dir == *root || !out_dir.starts_with(root) {
            return Err(PluginError::exit(
                format!(
                    "clean: refusing to empty {} outside the project",
                    out_dir.display()
                ),
                solid_engine::exit::codes::CONFIGURATION,
            ));
        }

        if tokio::fs::try_exists(&out_dir).await? {
            tokio::fs::remove_dir_all(&out_dir).await?;
        }
        tokio::fs::create_dir_all(&out_dir).await?;
        tracing::debug!(dir = %out_dir.display(), "Cleaned output directory");
        Ok(())
    }
}
