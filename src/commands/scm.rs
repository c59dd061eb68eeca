//! Source control change list command

use std::path::{Path, PathBuf};

use super::{launch, CommandOutcome};
use crate::error::{DiffError, Result};
use crate::extension::Extension;
use crate::models::{
    ContentSource, MergeConflictBundle, MergeStage, RevisionSpecifier, ScmChange, ScmChangeKind,
};
use crate::services::temp_files::TempFileScope;

/// Diff a changed file against the git revision its status refers to.
///
/// Merge conflicts open a four-pane merge window. Any failed git fetch
/// aborts the command before the tool is launched.
pub async fn diff_scm(ext: &Extension, change: Option<ScmChange>) -> Result<CommandOutcome> {
    let change = change.ok_or(DiffError::NoScmEntry)?;
    let file = change.resource;
    let mut scope = ext.registry().begin_operation();

    match change.kind {
        ScmChangeKind::Modified => {
            let staged = fetch(ext, &file, RevisionSpecifier::WorkingIndex, &mut scope).await?;
            launch(ext, &[staged, file], scope).await
        }
        ScmChangeKind::IndexModified => {
            let staged = fetch(ext, &file, RevisionSpecifier::WorkingIndex, &mut scope).await?;
            let head = fetch(ext, &file, RevisionSpecifier::Head, &mut scope).await?;
            launch(ext, &[head, staged], scope).await
        }
        ScmChangeKind::BothModified => {
            let bundle = conflict_bundle(ext, &file, &mut scope).await?;
            launch(ext, &bundle.into_paths(), scope).await
        }
        ScmChangeKind::Untracked => Ok(CommandOutcome::Info(
            "No diff possible for untracked files!".to_string(),
        )),
        ScmChangeKind::IndexAdded => Ok(CommandOutcome::Info(
            "No diff possible for files not yet committed!".to_string(),
        )),
        ScmChangeKind::Other(code) => Err(DiffError::UnsupportedScmType(code)),
    }
}

/// Current and incoming stages, then the base stage unless the working
/// file is configured to serve as base
async fn conflict_bundle(
    ext: &Extension,
    file: &Path,
    scope: &mut TempFileScope,
) -> Result<MergeConflictBundle> {
    let local = fetch(ext, file, RevisionSpecifier::MergeStage(MergeStage::Current), scope).await?;
    let remote = fetch(ext, file, RevisionSpecifier::MergeStage(MergeStage::Incoming), scope).await?;
    let base = if ext.config().resolve_against_merged {
        file.to_path_buf()
    } else {
        fetch(ext, file, RevisionSpecifier::MergeStage(MergeStage::Base), scope).await?
    };

    Ok(MergeConflictBundle {
        local,
        remote,
        base,
        merged: file.to_path_buf(),
    })
}

async fn fetch(
    ext: &Extension,
    file: &Path,
    revision: RevisionSpecifier,
    scope: &mut TempFileScope,
) -> Result<PathBuf> {
    let resolved = ext.resolve(&ContentSource::git(file, revision), scope).await?;
    Ok(resolved.path)
}
