//! Compare unsaved changes with the file on disk

use super::{launch, CommandOutcome};
use crate::error::{DiffError, Result};
use crate::extension::Extension;
use crate::models::{ContentSource, SnapshotKind};
use crate::services::equality::are_files_equal;

const NO_DIFFERENCE: &str = "No difference to saved version of the file.";

/// Diff the active editor's buffer with its saved file
pub async fn diff_saved_version(ext: &Extension) -> Result<CommandOutcome> {
    let document = ext.host().active_editor().ok_or(DiffError::NoActiveEditor)?;
    let saved = document.file_name.clone().ok_or(DiffError::NoSavedVersion)?;

    if !document.is_dirty {
        return Ok(CommandOutcome::Info(NO_DIFFERENCE.to_string()));
    }

    let mut scope = ext.registry().begin_operation();
    let source = ContentSource::BufferSnapshot {
        owner_path: Some(saved.clone()),
        text: document.text,
        kind: SnapshotKind::Changed,
    };
    let current = ext.resolve(&source, &mut scope).await?.path;

    if are_files_equal(&current, &saved).await? {
        scope.purge().await;
        return Ok(CommandOutcome::Info(NO_DIFFERENCE.to_string()));
    }

    launch(ext, &[current, saved], scope).await
}
