//! Compare every visible editor

use std::path::PathBuf;

use super::{document_source, launch, CommandOutcome};
use crate::error::{DiffError, Result};
use crate::extension::Extension;

/// Diff (two editors) or merge (three or four) the visible editors, most
/// recently modified file first
pub async fn diff_visible(ext: &Extension) -> Result<CommandOutcome> {
    let mut scope = ext.registry().begin_operation();

    let mut files = Vec::new();
    for document in ext.host().visible_editors() {
        let resolved = ext.resolve(&document_source(&document), &mut scope).await?;
        files.push(resolved.path);
    }

    if files.len() < 2 {
        return Err(DiffError::NotEnoughVisible(if files.is_empty() {
            "No files are"
        } else {
            "Only one file is"
        }));
    }

    let mut stamped = Vec::with_capacity(files.len());
    for path in files {
        let modified = tokio::fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .ok();
        stamped.push((modified, path));
    }
    stamped.sort_by(|a, b| b.0.cmp(&a.0));
    let files: Vec<PathBuf> = stamped.into_iter().map(|(_, path)| path).collect();

    launch(ext, &files, scope).await
}
