//! Temp file lifecycle
//!
//! Content that does not exist as a plain file (buffers, clipboard text,
//! git blobs) is written to uniquely named files in the temp directory.
//! Every such file is tracked twice: by the [`TempFileScope`] of the
//! command that created it, which hands its list to the diff process for
//! cleanup on exit, and by the process-lifetime [`TempFileRegistry`], which
//! deletes whatever is left when the extension shuts down.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::ResolvedPath;

const RANDOM_NAME_LEN: usize = 10;
const MAX_NAME_ATTEMPTS: usize = 8;

/// Process-lifetime set of temp files not yet deleted
#[derive(Debug, Clone)]
pub struct TempFileRegistry {
    dir: PathBuf,
    pending: Arc<Mutex<Vec<PathBuf>>>,
}

impl TempFileRegistry {
    /// Registry writing into the system temp directory
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Registry writing into a specific directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Start a fresh per-command scope
    pub fn begin_operation(&self) -> TempFileScope {
        TempFileScope {
            registry: self.clone(),
            files: Vec::new(),
        }
    }

    /// Temp files created and not yet purged
    pub fn pending(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().iter().any(|p| p == path)
    }

    /// Delete the given files.
    ///
    /// Failures are logged and never retried. Each path leaves the registry
    /// whether or not its deletion succeeded.
    pub async fn purge(&self, paths: &[PathBuf]) {
        for path in paths {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::debug!("Deleted tmp file: {}", path.display()),
                Err(e) => tracing::warn!("Unable to delete tmp file {}: {}", path.display(), e),
            }
            self.lock().retain(|p| p != path);
        }
    }

    /// Delete every file still pending if `enabled`, returning how many
    /// deletions were attempted
    pub async fn purge_all_at_shutdown(&self, enabled: bool) -> usize {
        if !enabled {
            return 0;
        }
        let leftovers = self.pending();
        if !leftovers.is_empty() {
            tracing::info!("Removing {} leftover tmp files", leftovers.len());
        }
        self.purge(&leftovers).await;
        leftovers.len()
    }

    fn track(&self, path: PathBuf) {
        self.lock().push(path);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TempFileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Temp files created by a single command invocation
#[derive(Debug)]
pub struct TempFileScope {
    registry: TempFileRegistry,
    files: Vec<PathBuf>,
}

impl TempFileScope {
    /// Write `content` to a new file named `<prefix><random>` and track it.
    ///
    /// Write failures are returned as is.
    pub async fn materialize(&mut self, content: &[u8], prefix: &str) -> Result<ResolvedPath> {
        let mut attempt = 0;
        let (path, mut file) = loop {
            attempt += 1;
            let path = self
                .registry
                .dir
                .join(format!("{}{}", prefix, random_name()));
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    continue
                }
                Err(e) => return Err(e.into()),
            }
        };

        self.registry.track(path.clone());
        self.files.push(path.clone());

        file.write_all(content).await?;
        file.flush().await?;

        tracing::debug!("Wrote tmp file: {}", path.display());
        Ok(ResolvedPath::temporary(path))
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Hand the tracked files to whoever deletes them later
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }

    /// Delete this scope's files now
    pub async fn purge(self) {
        self.registry.purge(&self.files).await;
    }
}

/// Ten lowercase base-36 characters
fn random_name() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_NAME_LEN)
        .filter_map(|_| std::char::from_digit(rng.gen_range(0..36), 36))
        .collect()
}
