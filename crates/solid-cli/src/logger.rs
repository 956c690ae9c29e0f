//! Logging setup for the Solid CLI.
//!
//! Engine and CLI events go through `tracing`; this module installs the
//! subscriber. Verbosity comes from the global flags, falling back to
//! `RUST_LOG`.
//!
//! # Example
//!
//! ```rust,no_run
//! use solid_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "solid=debug,solid_cli=debug,solid_engine=debug,solid_config=debug";
const QUIET_FILTER: &str = "solid=error,solid_cli=error,solid_engine=error,solid_config=error";
const DEFAULT_FILTER: &str = "solid=info,solid_cli=info,solid_engine=info,solid_config=warn";

/// Pick the filter for the given flags.
///
/// The level is determined in this order:
/// 1. `--verbose`: debug for the solid crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for the solid crates
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the subscriber with a custom filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Whether log output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
