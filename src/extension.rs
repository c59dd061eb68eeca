//! Extension lifecycle
//!
//! [`Extension`] is created when the host activates the extension and owns
//! everything that outlives a single command: settings, host capabilities,
//! the process-lifetime temp file registry and the file remembered for
//! "compare with selected".

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;

use crate::commands::{self, CommandOutcome, DiffCommand};
use crate::config::DiffConfig;
use crate::error::{DiffError, Result};
use crate::host::{EditorEnumerator, EditorHost};
use crate::models::{ContentSource, ResolvedPath};
use crate::services::git::{BlobFetcher, GitCli};
use crate::services::invoker::DiffInvoker;
use crate::services::resolver;
use crate::services::temp_files::{TempFileRegistry, TempFileScope};

const ERROR_PREFIX: &str = "JetBrains Diff Error: ";
const INFO_PREFIX: &str = "JetBrains Diff: ";

/// Activated extension state
pub struct Extension {
    config: DiffConfig,
    host: Arc<dyn EditorHost>,
    enumerator: Arc<dyn EditorEnumerator>,
    fetcher: Arc<dyn BlobFetcher>,
    registry: TempFileRegistry,
    selected: Mutex<Option<PathBuf>>,
}

impl Extension {
    /// Activate with git access through the `git` executable and temp files
    /// in the system temp directory
    pub fn activate(
        config: DiffConfig,
        host: Arc<dyn EditorHost>,
        enumerator: Arc<dyn EditorEnumerator>,
    ) -> Self {
        tracing::debug!("Activating with diff tool {}", config.tool_command());
        Self {
            config,
            host,
            enumerator,
            fetcher: Arc::new(GitCli),
            registry: TempFileRegistry::new(),
            selected: Mutex::new(None),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn BlobFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_registry(mut self, registry: TempFileRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn EditorHost {
        self.host.as_ref()
    }

    pub fn enumerator(&self) -> &dyn EditorEnumerator {
        self.enumerator.as_ref()
    }

    pub fn registry(&self) -> &TempFileRegistry {
        &self.registry
    }

    /// File remembered by the last select command
    pub fn selected(&self) -> Option<PathBuf> {
        self.selected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_selected(&self, path: PathBuf) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = Some(path);
    }

    pub(crate) fn invoker(&self) -> DiffInvoker {
        DiffInvoker::new(self.config.tool_command(), self.registry.clone())
    }

    pub(crate) async fn resolve(
        &self,
        source: &ContentSource,
        scope: &mut TempFileScope,
    ) -> Result<ResolvedPath> {
        resolver::resolve(source, scope, self.fetcher.as_ref()).await
    }

    /// Run a command and report its outcome to the user.
    ///
    /// When a diff tool was launched, returns the handle of the task that
    /// waits for it, reports launch failures and purges the command's temp
    /// files.
    pub async fn execute(&self, command: DiffCommand) -> Option<JoinHandle<()>> {
        let id = command.id();
        tracing::debug!("Executing {}", id);

        match commands::run(self, command).await {
            Ok(CommandOutcome::Launched(process)) => {
                tracing::debug!("{} launched: {}", id, process.command_line());
                let host = Arc::clone(&self.host);
                Some(tokio::spawn(async move {
                    if let Err(e) = process.wait().await {
                        host.show_error(&error_message(&e));
                    }
                }))
            }
            Ok(CommandOutcome::Info(message)) => {
                self.host.show_info(&format!("{}{}", INFO_PREFIX, message));
                None
            }
            Ok(CommandOutcome::Selected(_)) | Ok(CommandOutcome::Cancelled) => None,
            Err(e) => {
                tracing::warn!("{} failed: {}", id, e);
                self.host.show_error(&error_message(&e));
                None
            }
        }
    }

    /// Shut down, deleting leftover temp files if configured to.
    ///
    /// Returns the number of deletions attempted.
    pub async fn deactivate(&self) -> usize {
        self.registry
            .purge_all_at_shutdown(self.config.clean_up_temp_files_on_code_close)
            .await
    }
}

fn error_message(error: &DiffError) -> String {
    format!("{}{}", ERROR_PREFIX, error)
}
