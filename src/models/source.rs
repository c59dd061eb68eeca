//! Content source model types
//!
//! A [`ContentSource`] names one side of a comparison before it exists as a
//! file; a [`ResolvedPath`] is the concrete file the diff tool will open.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Numbered stage of a conflicted index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStage {
    /// Stage 1, the common ancestor
    Base,
    /// Stage 2, the current branch side
    Current,
    /// Stage 3, the incoming side
    Incoming,
}

impl MergeStage {
    pub fn number(&self) -> u8 {
        match self {
            MergeStage::Base => 1,
            MergeStage::Current => 2,
            MergeStage::Incoming => 3,
        }
    }
}

/// Which git revision of a path to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RevisionSpecifier {
    /// The staged version in the index
    WorkingIndex,
    /// The committed version at HEAD
    Head,
    /// One side of an unresolved merge conflict
    MergeStage(MergeStage),
}

impl RevisionSpecifier {
    /// Revision part of a `git show <rev>:<path>` object name, including the
    /// trailing colon
    pub fn object_prefix(&self) -> String {
        match self {
            RevisionSpecifier::WorkingIndex => ":".to_string(),
            RevisionSpecifier::Head => "HEAD:".to_string(),
            RevisionSpecifier::MergeStage(stage) => format!(":{}:", stage.number()),
        }
    }

    /// Role name used in temp file prefixes
    pub fn role(&self) -> &'static str {
        match self {
            RevisionSpecifier::WorkingIndex => "staged",
            RevisionSpecifier::Head => "head",
            RevisionSpecifier::MergeStage(MergeStage::Current) => "current",
            RevisionSpecifier::MergeStage(MergeStage::Incoming) => "incoming",
            RevisionSpecifier::MergeStage(MergeStage::Base) => "base",
        }
    }

    /// Whether the revision must exist for the path to be diffable at all
    pub fn is_merge_stage(&self) -> bool {
        matches!(self, RevisionSpecifier::MergeStage(_))
    }
}

/// What part of an editor buffer a snapshot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SnapshotKind {
    /// The whole buffer text
    Whole,
    /// Only the selected text
    Selection,
    /// Unsaved changes of a file that also exists on disk
    Changed,
    /// Scratch copy used only for an equality check
    Scratch,
}

/// Logical identity of one side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A file that already exists on disk
    OnDiskFile { path: PathBuf },
    /// In-memory buffer content, optionally owned by a file on disk
    BufferSnapshot {
        owner_path: Option<PathBuf>,
        text: String,
        kind: SnapshotKind,
    },
    /// Text read from the clipboard
    ClipboardSnapshot { text: String },
    /// A path as recorded in a git revision
    GitRevision {
        path: PathBuf,
        revision: RevisionSpecifier,
    },
}

impl ContentSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ContentSource::OnDiskFile { path: path.into() }
    }

    pub fn git(path: impl Into<PathBuf>, revision: RevisionSpecifier) -> Self {
        ContentSource::GitRevision {
            path: path.into(),
            revision,
        }
    }

    /// Prefix for the temp file that materializes this source, `None` for
    /// sources that are already plain files
    pub fn temp_prefix(&self) -> Option<String> {
        match self {
            ContentSource::OnDiskFile { .. } => None,
            ContentSource::BufferSnapshot {
                owner_path, kind, ..
            } => Some(match (kind, owner_path.as_deref().and_then(base_name)) {
                (SnapshotKind::Selection, _) => "selection_".to_string(),
                (SnapshotKind::Scratch, _) => "tmp_".to_string(),
                (SnapshotKind::Changed, Some(name)) => format!("{}_changed_", name),
                (SnapshotKind::Whole, Some(name)) => format!("{}_", name),
                (_, None) => "untitled_".to_string(),
            }),
            ContentSource::ClipboardSnapshot { .. } => Some("clipboard_".to_string()),
            ContentSource::GitRevision { path, revision } => Some(format!(
                "{}_{}_",
                revision.role(),
                base_name(path).unwrap_or_default()
            )),
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::OnDiskFile { path } => write!(f, "file {}", path.display()),
            ContentSource::BufferSnapshot {
                owner_path: Some(path),
                ..
            } => write!(f, "editor content of {}", path.display()),
            ContentSource::BufferSnapshot { .. } => write!(f, "untitled editor content"),
            ContentSource::ClipboardSnapshot { .. } => write!(f, "clipboard content"),
            ContentSource::GitRevision { path, revision } => {
                write!(f, "{} version of {}", revision.role(), path.display())
            }
        }
    }
}

/// A concrete path handed to the diff tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPath {
    pub path: PathBuf,
    /// Temp files are owned by a registry and deleted after use; other
    /// paths are never deleted
    pub is_temporary: bool,
}

impl ResolvedPath {
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_temporary: false,
        }
    }

    pub fn temporary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_temporary: true,
        }
    }
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
