//! Check command implementation.

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Loads and validates the configuration, then instantiates every plugin so
/// bad plugin names and options surface without building anything. With
/// `--example`, prints a sample configuration to stdout instead.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.example {
        print!("{}", solid_config::SolidConfig::example().to_toml_string()?);
        return Ok(());
    }

    ui::info("Checking configuration...");
    let project = utils::load_project(&args.project)?;
    let registry = utils::registry(&project)?;

    for (name, app) in registry.iter() {
        let plugins: Vec<&str> = app.plugins.iter().map(|p| p.name()).collect();
        tracing::debug!(app = name, plugins = ?plugins, "App is valid");
    }

    ui::success(&format!(
        "Configuration is valid ({} app{})",
        registry.len(),
        if registry.len() == 1 { "" } else { "s" }
    ));
    Ok(())
}
