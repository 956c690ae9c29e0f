//! Bundler implementation used by the CLI.
//!
//! [`CommandBundler`] shells out to the configured bundler program and
//! implements watch mode on top of [`FileWatcher`].

pub mod command;
pub mod watcher;

pub use command::{CommandBundler, CommandBundlerFactory};
pub use watcher::{FileChange, FileWatcher, IgnoreRules};
