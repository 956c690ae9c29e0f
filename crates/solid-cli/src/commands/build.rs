//! Build command implementation.

use std::path::Path;

use solid_engine::BuildReport;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui::{self, Spinner};

/// Execute the build command.
///
/// Fatal orchestrator conditions (unknown app, missing env file, crashed
/// plugin) end the process with their exit code before this returns. A
/// failed bundler pass comes back as an error.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let project = utils::load_project(&args.run.project)?;
    let solid = utils::orchestrator(&project)?;
    let request = utils::request(&args.run);
    let app = request.app.clone();

    let spinner = Spinner::new(&format!("Building {app}..."));
    match solid.build(request).await {
        Ok(report) => {
            spinner.finish(&format!(
                "Built {} in {}",
                report.app,
                ui::format_duration(report.event.duration)
            ));
            print_report(&report, solid.project_root());
            Ok(())
        }
        Err(err) => {
            spinner.fail(&format!("Build of {app} failed"));
            Err(err.into())
        }
    }
}

fn print_report(report: &BuildReport, root: &Path) {
    let entries: Vec<(String, u64)> = report
        .event
        .outputs
        .iter()
        .map(|path| {
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            let name = path.strip_prefix(root).unwrap_or(path);
            (name.display().to_string(), size)
        })
        .collect();
    ui::print_build_summary(&report.app, &entries, report.event.duration);

    let recovered: Vec<&str> = report
        .before
        .recovered
        .iter()
        .chain(&report.after.recovered)
        .map(String::as_str)
        .collect();
    if !recovered.is_empty() {
        ui::warning(&format!("Finished with warnings from {}", recovered.join(", ")));
    }
    if !report.before.skipped.is_empty() {
        ui::info(&format!("Skipped {}", report.before.skipped.join(", ")));
    }
}
