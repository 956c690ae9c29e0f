//! Solid CLI - build orchestration for named applications.
//!
//! Loads the project's app manifest, turns each entry into a registered app
//! with its plugin chain, and drives production builds or watch sessions
//! through the `solid-engine` orchestrator.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `build`, `dev`, `list` and `check`
//! - [`plugins`] - built-in plugins constructed by name from the manifest
//! - [`bundler`] - the command-line bundler driver and its file watcher
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - tracing setup
//! - [`ui`] - terminal output helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use solid_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod bundler;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod plugins;
pub mod ui;

pub use error::{CliError, Result};
