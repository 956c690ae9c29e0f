//! Formatting utilities for sizes, durations and tables.

use console::Term;
use owo_colors::{OwoColorize, Stream, Style};
use std::time::Duration;

use super::paint;

/// Format a byte count with the most fitting unit.
///
/// ```
/// use solid_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{bytes} B")
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration as `ms`, seconds, or `Xm Ys`.
///
/// ```
/// use std::time::Duration;
/// use solid_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

fn rule_width() -> usize {
    (Term::stderr().size().1 as usize).clamp(20, 80)
}

/// Print the files a build wrote, with sizes, to stderr.
pub fn print_build_summary(app: &str, entries: &[(String, u64)], duration: Duration) {
    if entries.is_empty() {
        return;
    }
    let width = rule_width();

    let title = format!("Build Summary: {app}");
    eprintln!("\n{}", paint(&title, Style::new().bold().underline(), Stream::Stderr));
    eprintln!("{}", "─".repeat(width));
    for (name, size) in entries {
        eprintln!(
            "  {} {} {}",
            paint("▸", Style::new().blue(), Stream::Stderr),
            paint(name, Style::new().bright_white().bold(), Stream::Stderr),
            paint(&format_size(*size), Style::new().dimmed(), Stream::Stderr)
        );
    }
    eprintln!("{}", "─".repeat(width));

    let total: u64 = entries.iter().map(|(_, size)| size).sum();
    eprintln!(
        "  {} {} in {}",
        paint("Total:", Style::new().bold(), Stream::Stderr),
        paint(&format_size(total), Style::new().green(), Stream::Stderr),
        paint(&format_duration(duration), Style::new().green(), Stream::Stderr)
    );
}

/// One row of `solid list`.
pub struct AppRow {
    pub name: String,
    pub app_type: String,
    pub output: String,
    pub plugins: Vec<String>,
}

/// Print the app table to stdout.
pub fn print_app_table(rows: &[AppRow]) {
    let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let output_width = rows.iter().map(|r| r.output.len()).max().unwrap_or(0);

    for row in rows {
        let plugins = if row.plugins.is_empty() {
            "-".to_string()
        } else {
            row.plugins.join(", ")
        };
        println!(
            "{:<name_width$}  {:<4}  {:<output_width$}  {}",
            row.name.if_supports_color(Stream::Stdout, |name| name.bold()),
            row.app_type,
            row.output,
            paint(&plugins, Style::new().dimmed(), Stream::Stdout),
        );
    }
}
