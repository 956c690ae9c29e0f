//! Solid build orchestrator.
//!
//! Drives build and watch sessions for named applications through an
//! underlying bundler, running each app's plugin middleware around every
//! build pass.
//!
//! # Architecture
//!
//! - [`registry`] - name → [`AppConfig`] mapping, filled during startup
//! - [`plugin`] - the [`Plugin`] contract and its typed failure values
//! - [`dispatch`] - ordered, serialized execution of one lifecycle event
//! - [`bundler`] - the traits an underlying bundler implements
//! - [`env`] - `.env` resolution and host variable pass-through
//! - [`orchestrator`] - [`Solid`], the `build` / `dev` entrypoints
//!
//! # Example
//!
//! ```rust,no_run
//! use solid_engine::{AppConfig, AppRegistry, RunRequest, Solid};
//! # use solid_engine::bundler::BundlerFactory;
//! # async fn run(factory: std::sync::Arc<dyn BundlerFactory>) -> solid_engine::Result<()> {
//! let mut registry = AppRegistry::new();
//! registry.register("site", AppConfig::new().input("src/site/index.html"))?;
//!
//! let solid = Solid::new(registry, factory);
//! solid.build(RunRequest::new("site")).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod bundler;
pub mod dispatch;
pub mod env;
pub mod error;
pub mod exit;
pub mod orchestrator;
pub mod plugin;
pub mod registry;
mod report;
pub mod state;

pub use app::{AppConfig, BuildMode, ExtendedOptions};
pub use bundler::{BuildEvent, BuildOutcome, BundleError, BundlerOptions};
pub use dispatch::{DispatchReport, Dispatcher};
pub use env::{DotenvLoader, EnvLoader, EnvMap};
pub use error::{EngineError, Result};
pub use exit::{ExitHandler, ProcessExit};
pub use orchestrator::{BuildReport, DevSession, RunRequest, Solid, StopHandle};
pub use plugin::{BuildContext, Lifecycle, Plugin, PluginError, PluginResult};
pub use registry::{AppRegistry, RegistryError};
pub use state::RunState;

// Configuration types used in the public API
pub use solid_config::AppType;
