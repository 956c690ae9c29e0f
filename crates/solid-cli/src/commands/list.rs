//! List command implementation.

use solid_engine::{AppConfig, BuildMode, ExtendedOptions};

use crate::cli::ListArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui::{self, AppRow};

/// Execute the list command.
///
/// Prints one row per app with its type, resolved output directory and
/// plugin chain. Plugins are not instantiated.
pub async fn execute(args: ListArgs) -> Result<()> {
    let project = utils::load_project(&args.project)?;

    if project.config.apps.is_empty() {
        ui::warning("No apps declared");
        return Ok(());
    }

    let rows: Vec<AppRow> = project
        .config
        .apps
        .iter()
        .map(|(name, manifest)| {
            let config = AppConfig::from_manifest(manifest, Vec::new());
            let resolved =
                ExtendedOptions::resolve(name, &config, BuildMode::Production, &project.root);
            AppRow {
                name: name.clone(),
                app_type: resolved.app_type.to_string(),
                output: resolved.output.display().to_string(),
                plugins: manifest.plugin_names().map(str::to_string).collect(),
            }
        })
        .collect();

    ui::print_app_table(&rows);
    Ok(())
}
