//! External diff tool launch
//!
//! Builds `<tool> <diff|merge> <path>...` and runs it through the shell. The
//! launched process is watched by a background task that deletes the
//! command's temp files once the launcher process exits, whatever its exit
//! status and whether or not it left the IDE running.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

use crate::error::{DiffError, Result};
use crate::models::DiffRequest;
use crate::services::temp_files::TempFileRegistry;
use crate::utils::{create_shell_command, SHELL_COMMAND_NOT_FOUND};

/// `cmd.exe` exit status for an unknown program
const WINDOWS_COMMAND_NOT_FOUND: i32 = 9009;

/// How long a failed launch may take to close its stderr
const STDERR_GRACE: Duration = Duration::from_secs(1);

/// A running diff tool
#[derive(Debug)]
pub struct DiffProcess {
    command_line: String,
    handle: JoinHandle<Result<()>>,
}

impl DiffProcess {
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Wait for the tool process to exit and its temp files to be purged
    pub async fn wait(self) -> Result<()> {
        self.handle
            .await
            .map_err(|e| DiffError::Custom(format!("Diff process monitor failed: {}", e)))?
    }
}

/// Launches the configured JetBrains diff tool
#[derive(Debug, Clone)]
pub struct DiffInvoker {
    tool: String,
    registry: TempFileRegistry,
}

impl DiffInvoker {
    /// `tool` is the already quoted tool command line
    pub fn new(tool: impl Into<String>, registry: TempFileRegistry) -> Self {
        Self {
            tool: tool.into(),
            registry,
        }
    }

    /// Full shell command line for a validated request
    pub fn command_line(&self, request: &DiffRequest) -> String {
        let mut line = format!("{} {}", self.tool, request.mode().keyword());
        for path in request.paths() {
            line.push(' ');
            line.push_str(&quote_path(path));
        }
        line
    }

    /// Validate `paths` and launch the tool on them.
    ///
    /// `cleanup` lists the temp files to purge when the tool exits. Nothing
    /// is launched, and nothing is purged, when validation fails.
    pub async fn invoke<P: AsRef<Path>>(
        &self,
        paths: &[P],
        cleanup: Vec<PathBuf>,
    ) -> Result<DiffProcess> {
        let request = DiffRequest::validate(paths).await?;
        let command_line = self.command_line(&request);

        tracing::info!("Run: {}", command_line);

        let mut child = create_shell_command(&command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => DiffError::ToolNotFound,
                _ => DiffError::Io(e),
            })?;

        let stderr = child.stderr.take();
        let stderr_reader = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut stderr) = stderr {
                if let Err(e) = stderr.read_to_end(&mut buf).await {
                    tracing::debug!("Failed to read diff tool stderr: {}", e);
                }
            }
            String::from_utf8_lossy(&buf).trim().to_string()
        });

        let registry = self.registry.clone();
        let tool = self.tool.clone();
        let handle = tokio::spawn(async move {
            let status = child.wait().await;
            if !cleanup.is_empty() {
                registry.purge(&cleanup).await;
            }
            let status = status?;
            if status.success() {
                stderr_reader.abort();
                return Ok(());
            }

            // Children left behind by the launcher may keep stderr open
            let stderr = match tokio::time::timeout(STDERR_GRACE, stderr_reader).await {
                Ok(Ok(text)) => text,
                _ => String::new(),
            };
            check_exit(status, &stderr, &tool)
        });

        Ok(DiffProcess {
            command_line,
            handle,
        })
    }
}

fn check_exit(status: ExitStatus, stderr: &str, tool: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    let bare_tool = tool.trim_matches(|c| c == '"' || c == '\'');
    let not_found = matches!(
        status.code(),
        Some(SHELL_COMMAND_NOT_FOUND) | Some(WINDOWS_COMMAND_NOT_FOUND)
    ) || stderr.contains(&format!("{}: not found", bare_tool));

    if not_found {
        tracing::warn!("Diff tool not found: {}", tool);
        Err(DiffError::ToolNotFound)
    } else {
        tracing::warn!("Diff tool exited with {}: {}", status, stderr);
        Err(DiffError::ToolFailed {
            stderr: stderr.to_string(),
        })
    }
}

/// Quote a path for the shell when it holds anything beyond plain
/// filename characters
fn quote_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let plain = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_alphanumeric() || "_-./:@%+,=\\".contains(c));
    if plain {
        return raw.into_owned();
    }

    if cfg!(windows) {
        format!("\"{}\"", raw)
    } else {
        format!("'{}'", raw.replace('\'', "'\\''"))
    }
}
