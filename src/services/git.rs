//! Git revision content retrieval
//!
//! Reads a file as recorded in the index, at HEAD, or in one of the
//! conflict stages with a single `git show` run from the file's directory.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{DiffError, Result};
use crate::models::RevisionSpecifier;
use crate::utils::create_command;

/// Source of git blob content
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    /// Raw bytes of `path` at `revision`
    async fn fetch_blob(&self, path: &Path, revision: RevisionSpecifier) -> Result<Vec<u8>>;
}

/// Fetches blobs by running the `git` executable
#[derive(Debug, Clone, Default)]
pub struct GitCli;

/// Object name for `git show`, relative to the file's own directory
pub fn show_object_name(path: &Path, revision: RevisionSpecifier) -> Result<String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| DiffError::Git(format!("{} is not a file path", path.display())))?;
    Ok(format!(
        "{}./{}",
        revision.object_prefix(),
        file_name.to_string_lossy()
    ))
}

#[async_trait]
impl BlobFetcher for GitCli {
    async fn fetch_blob(&self, path: &Path, revision: RevisionSpecifier) -> Result<Vec<u8>> {
        let object = show_object_name(path, revision)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        tracing::debug!("Running git show {} in {}", object, dir.display());

        let output = create_command("git")
            .current_dir(dir)
            .arg("show")
            .arg(&object)
            .output()
            .await
            .map_err(|e| DiffError::Git(format!("Failed to run git show: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DiffError::Git(if stderr.is_empty() {
                format!("git show {} failed with {}", object, output.status)
            } else {
                stderr
            }));
        }

        if output.stdout.is_empty() && revision.is_merge_stage() {
            return Err(DiffError::Git(format!(
                "No content for {} version of {}",
                revision.role(),
                path.display()
            )));
        }

        Ok(output.stdout)
    }
}
