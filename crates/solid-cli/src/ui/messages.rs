//! Status message functions for terminal output.

use owo_colors::{Stream, Style};

use super::paint;

/// Print a success message to stderr.
///
/// ```no_run
/// solid_cli::ui::success("Build completed");
/// ```
pub fn success(message: &str) {
    eprintln!("{} {}", paint("✓", Style::new().green().bold(), Stream::Stderr), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", paint("ℹ", Style::new().blue().bold(), Stream::Stderr), message);
}

pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        paint("⚠", Style::new().yellow().bold(), Stream::Stderr),
        paint(message, Style::new().yellow(), Stream::Stderr)
    );
}
