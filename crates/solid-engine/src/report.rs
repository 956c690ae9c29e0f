//! Error-stream output for conditions the user must see even with logging
//! turned off.
//!
//! Styling is dropped when stderr cannot show it, and whenever the embedding
//! binary turned colors off through `owo_colors::set_override`.

use owo_colors::{OwoColorize, Stream, Style};

use crate::error::EngineError;

fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stderr, |text| text.style(style))
        .to_string()
}

fn failure_line(tag: Option<&str>, message: &str) -> String {
    let mark = paint("✗", Style::new().red().bold());
    match tag {
        Some(tag) => format!(
            "{mark} {} {}",
            paint(&format!("[{tag}]"), Style::new().dimmed()),
            paint(message, Style::new().red())
        ),
        None => format!("{mark} {}", paint(message, Style::new().red())),
    }
}

pub(crate) fn fatal(err: &EngineError) {
    eprintln!("{}", failure_line(None, &err.to_string()));
}

pub(crate) fn plugin_warning(plugin: &str, message: &str) {
    eprintln!(
        "{} {} {}",
        paint("⚠", Style::new().yellow().bold()),
        paint(&format!("[{plugin}]"), Style::new().dimmed()),
        paint(message, Style::new().yellow())
    );
}

pub(crate) fn build_failed(app: &str, message: &str) {
    eprintln!("{}", failure_line(Some(app), message));
}
