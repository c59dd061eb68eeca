//! Editor command handlers
//!
//! Each handler gathers its content sources from the host, resolves them to
//! files and hands them to the diff invoker. Handlers return a
//! [`CommandOutcome`]; turning it into notifications is the job of
//! [`Extension::execute`](crate::Extension::execute).

pub mod clipboard;
pub mod file_list;
pub mod open_editors;
pub mod saved;
pub mod scm;
pub mod visible;

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extension::Extension;
use crate::host::EditorDocument;
use crate::models::{ContentSource, ScmChange, SnapshotKind};
use crate::services::invoker::DiffProcess;
use crate::services::temp_files::TempFileScope;

/// The commands the extension registers with its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffCommand {
    /// Compare all visible editors
    Visible,
    /// Compare the active editor with another open editor picked from a list
    CurrentToOtherOpen,
    /// Compare the active editor with a file chosen in a dialog
    CurrentToOther,
    /// Compare the clipboard with the active editor or its selection
    WithClipboard,
    /// Compare unsaved changes with the file on disk
    SavedVersion,
    /// Compare the files selected in the explorer
    FromFileListMultiple(Vec<PathBuf>),
    /// Remember a file for a later "compare with selected"
    FromFileListSelect(Option<PathBuf>),
    /// Compare a file with the remembered one
    FromFileList(Option<PathBuf>),
    /// Compare a source control change entry with its git revisions
    Scm(Option<ScmChange>),
}

impl DiffCommand {
    /// Command identifier as registered with the host
    pub fn id(&self) -> &'static str {
        match self {
            DiffCommand::Visible => "jetbrains-diff.diffVisible",
            DiffCommand::CurrentToOtherOpen => "jetbrains-diff.diffCurrentToOtherOpen",
            DiffCommand::CurrentToOther => "jetbrains-diff.diffCurrentToOther",
            DiffCommand::WithClipboard => "jetbrains-diff.diffWithClipboard",
            DiffCommand::SavedVersion => "jetbrains-diff.diffSavedVersion",
            DiffCommand::FromFileListMultiple(_) => "jetbrains-diff.diffFromFileListMultiple",
            DiffCommand::FromFileListSelect(_) => "jetbrains-diff.diffFromFileListSelect",
            DiffCommand::FromFileList(_) => "jetbrains-diff.diffFromFileList",
            DiffCommand::Scm(_) => "jetbrains-diff.diffScm",
        }
    }
}

/// How a command finished
#[derive(Debug)]
pub enum CommandOutcome {
    /// The diff tool is running
    Launched(DiffProcess),
    /// Nothing to launch; the message is shown to the user
    Info(String),
    /// A file was remembered for a later comparison
    Selected(PathBuf),
    /// The user dismissed a prompt
    Cancelled,
}

/// Run one command to completion of its launch step
pub async fn run(ext: &Extension, command: DiffCommand) -> Result<CommandOutcome> {
    match command {
        DiffCommand::Visible => visible::diff_visible(ext).await,
        DiffCommand::CurrentToOtherOpen => open_editors::diff_current_to_other_open(ext).await,
        DiffCommand::CurrentToOther => open_editors::diff_current_to_other(ext).await,
        DiffCommand::WithClipboard => clipboard::diff_with_clipboard(ext).await,
        DiffCommand::SavedVersion => saved::diff_saved_version(ext).await,
        DiffCommand::FromFileListMultiple(files) => {
            file_list::diff_from_file_list_multiple(ext, files).await
        }
        DiffCommand::FromFileListSelect(file) => file_list::diff_from_file_list_select(ext, file),
        DiffCommand::FromFileList(file) => file_list::diff_from_file_list(ext, file).await,
        DiffCommand::Scm(change) => scm::diff_scm(ext, change).await,
    }
}

/// Saved documents are compared as their file; untitled ones by content
fn document_source(document: &EditorDocument) -> ContentSource {
    match &document.file_name {
        Some(path) => ContentSource::file(path),
        None => ContentSource::BufferSnapshot {
            owner_path: None,
            text: document.text.clone(),
            kind: SnapshotKind::Whole,
        },
    }
}

async fn launch<P: AsRef<Path>>(
    ext: &Extension,
    paths: &[P],
    scope: TempFileScope,
) -> Result<CommandOutcome> {
    let process = ext.invoker().invoke(paths, scope.into_files()).await?;
    Ok(CommandOutcome::Launched(process))
}
