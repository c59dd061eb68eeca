//! Diff request model types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The JetBrains merge window takes at most four panes; extra paths are
/// dropped
pub const MAX_DIFF_PATHS: usize = 4;

/// Operation keyword passed to the diff tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffMode {
    Diff,
    Merge,
}

impl DiffMode {
    pub fn for_count(count: usize) -> Self {
        if count == 2 {
            DiffMode::Diff
        } else {
            DiffMode::Merge
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DiffMode::Diff => "diff",
            DiffMode::Merge => "merge",
        }
    }
}

/// A validated list of two to four existing paths of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRequest {
    paths: Vec<PathBuf>,
}

impl DiffRequest {
    /// Validate candidate paths against the filesystem.
    ///
    /// Missing paths are skipped, the rest is capped at [`MAX_DIFF_PATHS`],
    /// and the request is rejected if fewer than two distinct paths remain
    /// or if files and directories are mixed. Repeated paths are kept, so a
    /// merge may use the merged file as its base.
    pub async fn validate<P: AsRef<Path>>(candidates: &[P]) -> Result<Self, ValidationError> {
        let mut paths = Vec::new();
        let mut has_file = false;
        let mut has_dir = false;

        for candidate in candidates {
            if paths.len() == MAX_DIFF_PATHS {
                break;
            }
            let candidate = candidate.as_ref();
            let Ok(metadata) = tokio::fs::metadata(candidate).await else {
                continue;
            };
            has_file |= metadata.is_file();
            has_dir |= metadata.is_dir();
            paths.push(candidate.to_path_buf());
        }

        let distinct = paths
            .iter()
            .enumerate()
            .filter(|(i, p)| !paths[..*i].contains(*p))
            .count();
        if distinct < 2 {
            return Err(ValidationError::TooFewFiles);
        }
        if has_file && has_dir {
            return Err(ValidationError::MixedFilesAndDirectories);
        }

        Ok(Self { paths })
    }

    pub fn mode(&self) -> DiffMode {
        DiffMode::for_count(self.paths.len())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// The four panes of a conflict resolution window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflictBundle {
    pub local: PathBuf,
    pub remote: PathBuf,
    pub base: PathBuf,
    pub merged: PathBuf,
}

impl MergeConflictBundle {
    /// Paths in the order the merge window expects them
    pub fn into_paths(self) -> Vec<PathBuf> {
        vec![self.local, self.remote, self.base, self.merged]
    }
}
