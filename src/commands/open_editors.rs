//! Compare the active editor with another file

use super::{document_source, launch, CommandOutcome};
use crate::error::{DiffError, Result};
use crate::extension::Extension;

const PICK_PLACEHOLDER: &str = "Filename to diff";

/// Offer the other open editors in a pick list and diff the active editor
/// with the chosen one
pub async fn diff_current_to_other_open(ext: &Extension) -> Result<CommandOutcome> {
    let document = ext.host().active_editor().ok_or(DiffError::NoActiveEditor)?;
    let mut scope = ext.registry().begin_operation();
    let current = ext.resolve(&document_source(&document), &mut scope).await?.path;

    let candidates: Vec<_> = ext
        .enumerator()
        .list_open_paths()
        .await
        .into_iter()
        .filter(|path| *path != current)
        .collect();

    if candidates.is_empty() {
        return Ok(CommandOutcome::Info(
            "No other open editor to compare with.".to_string(),
        ));
    }

    let Some(picked) = ext.host().show_quick_pick(candidates, PICK_PLACEHOLDER).await else {
        return Ok(CommandOutcome::Cancelled);
    };

    if !tokio::fs::try_exists(&picked).await.unwrap_or(false) {
        tracing::debug!("Picked editor {} is not on disk", picked.display());
        return Ok(CommandOutcome::Cancelled);
    }

    launch(ext, &[current, picked], scope).await
}

/// Diff the active editor with a file chosen in an open dialog
pub async fn diff_current_to_other(ext: &Extension) -> Result<CommandOutcome> {
    let document = ext.host().active_editor().ok_or(DiffError::NoActiveEditor)?;
    let mut scope = ext.registry().begin_operation();
    let current = ext.resolve(&document_source(&document), &mut scope).await?.path;

    match ext.host().show_open_dialog().await {
        Some(other) => launch(ext, &[current, other], scope).await,
        None => Ok(CommandOutcome::Cancelled),
    }
}
