//! Project-wide settings shared by every app.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    default_bundler, default_debounce_ms, default_settle_ms, default_watch_ignore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Bundler program invoked for every build pass
    #[serde(default = "default_bundler")]
    pub bundler: String,

    /// Extra arguments appended to every bundler invocation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundler_args: Vec<String>,

    /// Pause between tearing down a watcher and subscribing a new one
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Window in which repeated change events for one file are coalesced
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Patterns the watcher ignores (directory prefixes or `*.ext`)
    #[serde(default = "default_watch_ignore")]
    pub watch_ignore: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bundler: default_bundler(),
            bundler_args: Vec::new(),
            settle_ms: default_settle_ms(),
            debounce_ms: default_debounce_ms(),
            watch_ignore: default_watch_ignore(),
        }
    }
}
