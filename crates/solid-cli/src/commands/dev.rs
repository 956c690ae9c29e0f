//! Dev command implementation.

use crate::cli::DevArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the dev command.
///
/// Returns once the first pass is done and the session is watching, then
/// keeps running until Ctrl+C stops the session or it ends on its own.
pub async fn execute(args: DevArgs) -> Result<()> {
    let project = utils::load_project(&args.run.project)?;
    let solid = utils::orchestrator(&project)?;
    let request = utils::request(&args.run);

    let session = solid.dev(request).await?;
    ui::success(&format!("Watching {} (Ctrl+C to stop)", session.app()));

    let app = session.app().to_string();
    let stop = session.stop_handle();
    let wait = session.wait();
    tokio::pin!(wait);

    tokio::select! {
        result = &mut wait => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            ui::info(&format!("Stopping {app}..."));
            stop.stop();
            wait.await?;
        }
    }

    ui::success(&format!("Stopped watching {app}"));
    Ok(())
}
