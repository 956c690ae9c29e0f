//! Debounced file system watcher for watch-mode builds.
//!
//! Watches an app's source root recursively and forwards relevant changes,
//! skipping ignored patterns, hidden files and the app's own output.

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// What a watcher filters out.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    /// Directory prefixes (`node_modules`) or extension globs (`*.log`)
    pub patterns: Vec<String>,
    /// Absolute directories whose contents never trigger a rebuild
    pub excluded_dirs: Vec<PathBuf>,
}

impl IgnoreRules {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns,
            excluded_dirs: Vec::new(),
        }
    }

    pub fn exclude_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded_dirs.push(dir.into());
        self
    }

    fn should_ignore(&self, path: &Path, root: &Path) -> bool {
        if !path.starts_with(root) {
            return true;
        }
        if self.excluded_dirs.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }

        let Ok(rel_path) = path.strip_prefix(root) else {
            return true;
        };
        let path_str = rel_path.to_string_lossy();

        for pattern in &self.patterns {
            if let Some(ext) = pattern.strip_prefix('*') {
                if path_str.ends_with(ext) {
                    return true;
                }
            } else if contains_segments(rel_path, pattern) {
                return true;
            }
        }

        rel_path.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }
}

/// Whether `pattern`'s path components appear as a run of whole components
/// in `path`, so `dist` matches `dist/a.js` and `web/dist` but not
/// `distance.ts`.
fn contains_segments(path: &Path, pattern: &str) -> bool {
    let wanted: Vec<Component<'_>> = Path::new(pattern).components().collect();
    if wanted.is_empty() {
        return false;
    }
    let parts: Vec<Component<'_>> = path.components().collect();
    parts.windows(wanted.len()).any(|window| window == wanted.as_slice())
}

/// Live watcher. Watching stops when this value is dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `root`. Repeated events for the same file within
    /// `debounce` are coalesced.
    pub fn new(
        root: PathBuf,
        rules: IgnoreRules,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let watch_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(error = %err, "File watcher error");
                    return;
                }
            };

            for path in &event.paths {
                if rules.should_ignore(path, &watch_root) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    EventKind::Create(_) => FileChange::Created(path.clone()),
                    EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // Receiver gone means the subscription was torn down.
                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "Watching for changes");

        Ok((Self { _watcher: watcher }, rx))
    }
}
