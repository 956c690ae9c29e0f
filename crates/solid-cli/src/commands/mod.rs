//! Command implementations for the Solid CLI.
//!
//! - [`build`] - production build of one app
//! - [`dev`] - watch session until Ctrl+C
//! - [`list`] - declared apps and their resolved output
//! - [`check`] - configuration validation
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod build;
pub mod check;
pub mod dev;
pub mod list;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use dev::execute as dev_execute;
pub use list::execute as list_execute;
