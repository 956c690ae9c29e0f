//! Terminal output helpers.
//!
//! Status lines go to stderr so stdout stays free for `solid list` and
//! `solid check --example`.

mod format;
mod messages;
mod spinner;

pub use format::{AppRow, format_duration, format_size, print_app_table, print_build_summary};
pub use messages::{info, success, warning};
pub use spinner::Spinner;

use owo_colors::{OwoColorize, Stream, Style};

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Check if color output should be enabled.
///
/// Respects `NO_COLOR` and `FORCE_COLOR`, then falls back to terminal
/// detection on stderr.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

/// Initialize color support. Call early in `main`.
///
/// `--no-color` wins over `FORCE_COLOR`. The choice applies to indicatif
/// templates through `console` and to every styled status line.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    console::set_colors_enabled_stderr(enabled);
    owo_colors::set_override(enabled);
}

/// Style `text` for `stream`, or leave it plain when colors are off.
pub(crate) fn paint(text: &str, style: Style, stream: Stream) -> String {
    text.if_supports_color(stream, |text| text.style(style))
        .to_string()
}

/// Spinners are pointless when nobody watches the terminal.
pub fn interactive() -> bool {
    !is_ci() && console::user_attended_stderr()
}
