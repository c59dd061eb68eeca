//! Source control change entries

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Status of a changed file as reported by the editor's source control view.
///
/// The numeric codes are the host's resource status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScmChangeKind {
    /// Staged modification (code 0)
    IndexModified,
    /// Staged new file (code 1)
    IndexAdded,
    /// Unstaged modification (code 5)
    Modified,
    /// Untracked file (code 7)
    Untracked,
    /// Unresolved merge conflict (code 16)
    BothModified,
    /// Any status this crate has no diff for
    Other(u32),
}

impl ScmChangeKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => ScmChangeKind::IndexModified,
            1 => ScmChangeKind::IndexAdded,
            5 => ScmChangeKind::Modified,
            7 => ScmChangeKind::Untracked,
            16 => ScmChangeKind::BothModified,
            other => ScmChangeKind::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ScmChangeKind::IndexModified => 0,
            ScmChangeKind::IndexAdded => 1,
            ScmChangeKind::Modified => 5,
            ScmChangeKind::Untracked => 7,
            ScmChangeKind::BothModified => 16,
            ScmChangeKind::Other(code) => *code,
        }
    }
}

/// One entry of the source control change list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScmChange {
    /// Absolute path of the changed file in the working tree
    pub resource: PathBuf,
    pub kind: ScmChangeKind,
}

impl ScmChange {
    pub fn new(resource: impl Into<PathBuf>, kind: ScmChangeKind) -> Self {
        Self {
            resource: resource.into(),
            kind,
        }
    }
}
