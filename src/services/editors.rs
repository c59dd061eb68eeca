//! Open editor enumeration
//!
//! Hosts that can list their open files implement [`EditorEnumerator`]
//! directly. For hosts that can only switch tabs, [`NavigatingEnumerator`]
//! walks the tabs once until it is back at the starting file, then keeps
//! the list current from open/close notifications.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::host::{EditorEnumerator, EditorNavigator};

/// Upper bound on tab switches for hosts that never cycle back
const MAX_NAVIGATION_STEPS: usize = 256;

/// Fixed list of open files
#[derive(Debug, Clone, Default)]
pub struct StaticEnumerator {
    paths: Vec<PathBuf>,
}

impl StaticEnumerator {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl EditorEnumerator for StaticEnumerator {
    async fn list_open_paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// Open file list maintained from editor open/close events.
///
/// Events are ignored until the list has been filled by a first scan.
#[derive(Debug, Clone, Default)]
pub struct OpenEditorTracker {
    paths: Arc<Mutex<Option<Vec<PathBuf>>>>,
}

impl OpenEditorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_filled(&self) -> bool {
        self.lock().is_some()
    }

    pub fn snapshot(&self) -> Option<Vec<PathBuf>> {
        self.lock().clone()
    }

    pub fn fill(&self, paths: Vec<PathBuf>) {
        *self.lock() = Some(paths);
    }

    /// A document was opened; only files that exist on disk are tracked
    pub fn on_open(&self, path: &Path) {
        if let Some(paths) = self.lock().as_mut() {
            if !paths.iter().any(|p| p == path) && path.exists() {
                paths.push(path.to_path_buf());
            }
        }
    }

    pub fn on_close(&self, path: &Path) {
        if let Some(paths) = self.lock().as_mut() {
            paths.retain(|p| p != path);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Vec<PathBuf>>> {
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum ScanState {
    Scanning(Vec<PathBuf>),
    Done(Vec<PathBuf>),
}

/// Enumerates open editors by cycling through the host's tabs
pub struct NavigatingEnumerator<N> {
    navigator: N,
    tracker: OpenEditorTracker,
}

impl<N: EditorNavigator> NavigatingEnumerator<N> {
    pub fn new(navigator: N, tracker: OpenEditorTracker) -> Self {
        Self { navigator, tracker }
    }

    pub fn tracker(&self) -> &OpenEditorTracker {
        &self.tracker
    }

    async fn scan(&self) -> Vec<PathBuf> {
        let Some(start) = self.navigator.active_path() else {
            return Vec::new();
        };

        let mut steps = 0;
        let mut state = ScanState::Scanning(vec![start.clone()]);
        loop {
            state = match state {
                ScanState::Scanning(mut seen) => {
                    self.navigator.next_editor().await;
                    steps += 1;
                    match self.navigator.active_path() {
                        Some(path) if path == start => ScanState::Done(seen),
                        _ if steps >= MAX_NAVIGATION_STEPS => {
                            tracing::warn!(
                                "Stopped scanning open editors after {} steps",
                                MAX_NAVIGATION_STEPS
                            );
                            ScanState::Done(seen)
                        }
                        Some(path) => {
                            if !seen.contains(&path) {
                                seen.push(path);
                            }
                            ScanState::Scanning(seen)
                        }
                        // not a text editor
                        None => ScanState::Scanning(seen),
                    }
                }
                ScanState::Done(seen) => return seen,
            };
        }
    }
}

#[async_trait]
impl<N: EditorNavigator> EditorEnumerator for NavigatingEnumerator<N> {
    async fn list_open_paths(&self) -> Vec<PathBuf> {
        if let Some(paths) = self.tracker.snapshot() {
            return paths;
        }
        let paths = self.scan().await;
        tracing::debug!("Found {} open editors", paths.len());
        self.tracker.fill(paths.clone());
        paths
    }
}
