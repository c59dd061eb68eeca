//! Explorer file list commands

use std::path::PathBuf;

use super::{document_source, launch, CommandOutcome};
use crate::error::{DiffError, Result};
use crate::extension::Extension;

/// Diff or merge the files selected in the explorer
pub async fn diff_from_file_list_multiple(
    ext: &Extension,
    files: Vec<PathBuf>,
) -> Result<CommandOutcome> {
    if files.is_empty() {
        return Ok(CommandOutcome::Info(
            "Command can only be used from file list.".to_string(),
        ));
    }

    tracing::info!("Compare multiple files: {:?}", files);
    launch(ext, &files, ext.registry().begin_operation()).await
}

/// Remember `file`, or the active editor's file, for a later comparison
pub fn diff_from_file_list_select(
    ext: &Extension,
    file: Option<PathBuf>,
) -> Result<CommandOutcome> {
    let selected = match file {
        Some(path) => path,
        None => {
            let document = ext.host().active_editor().ok_or(DiffError::NoActiveEditor)?;
            document.file_name.ok_or(DiffError::UntitledSelection)?
        }
    };

    ext.set_selected(selected.clone());
    ext.host().set_selection_context(true);
    tracing::info!("Select for jetbrains compare: {}", selected.display());

    Ok(CommandOutcome::Selected(selected))
}

/// Diff `file`, or the active editor, with the remembered file
pub async fn diff_from_file_list(ext: &Extension, file: Option<PathBuf>) -> Result<CommandOutcome> {
    let selected = ext.selected().ok_or(DiffError::NothingSelected)?;
    let mut scope = ext.registry().begin_operation();

    let path = match file {
        Some(path) => path,
        None => {
            let document = ext.host().active_editor().ok_or(DiffError::NoActiveEditor)?;
            ext.resolve(&document_source(&document), &mut scope)
                .await?
                .path
        }
    };

    launch(ext, &[selected, path], scope).await
}
