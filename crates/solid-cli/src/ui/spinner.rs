use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{Stream, Style};
use std::time::Duration;

use super::paint;

/// Spinner for tasks without known duration.
///
/// Hidden when stderr is not an interactive terminal, so plugin and bundler
/// output is not interleaved with redraws in CI logs.
///
/// ```no_run
/// use solid_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Building site...");
/// spinner.finish("Built site");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if super::interactive() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!("{} {}", paint("✓", Style::new().green().bold(), Stream::Stderr), message);
    }

    pub fn fail(&self, message: &str) {
        self.pb.finish_and_clear();
        eprintln!(
            "{} {}",
            paint("✗", Style::new().red().bold(), Stream::Stderr),
            paint(message, Style::new().red(), Stream::Stderr)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let spinner = Spinner::new("Loading...");
        spinner.finish("Done");
    }

    #[test]
    fn test_spinner_fail() {
        let spinner = Spinner::new("Processing");
        spinner.fail("Failed");
    }
}
