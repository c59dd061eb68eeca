//! Error types for JetBrains Diff

use serde::Serialize;
use thiserror::Error;

/// Rejections raised before any external process is launched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Minimum two files are needed to diff!")]
    TooFewFiles,

    #[error("JetBrains can't compare files with directories!")]
    MixedFilesAndDirectories,
}

/// Application error types
#[derive(Error, Debug)]
pub enum DiffError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Can't resolve {description}: {reason}")]
    Resolution {
        description: String,
        #[source]
        reason: Box<DiffError>,
    },

    #[error("Git error: {0}")]
    Git(String),

    #[error("Diff tool cannot be found!")]
    ToolNotFound,

    #[error("Error running diff command! StdErr: {stderr}")]
    ToolFailed { stderr: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Current window is not an editor!")]
    NoActiveEditor,

    #[error("No saved version found to compare with!")]
    NoSavedVersion,

    #[error("Unsaved editors can not be selected for jetbrains diff comparison!")]
    UntitledSelection,

    #[error("First select a file to compare with!")]
    NothingSelected,

    #[error("First select a changed file in source control window and use context menu.")]
    NoScmEntry,

    #[error("Scm diff type {0} not supported.")]
    UnsupportedScmType(u32),

    #[error("Can't compare! {0} visible in editor!")]
    NotEnoughVisible(&'static str),

    #[error("{0}")]
    Custom(String),
}

impl DiffError {
    /// Stable identifier for hosts that forward errors over IPC
    pub fn code(&self) -> &'static str {
        match self {
            DiffError::Validation(_) => "VALIDATION_ERROR",
            DiffError::Io(_) => "IO_ERROR",
            DiffError::Serialization(_) => "SERIALIZATION_ERROR",
            DiffError::Resolution { .. } => "RESOLUTION_ERROR",
            DiffError::Git(_) => "GIT_ERROR",
            DiffError::ToolNotFound => "TOOL_NOT_FOUND",
            DiffError::ToolFailed { .. } => "TOOL_FAILED",
            DiffError::Config(_) => "CONFIG_ERROR",
            DiffError::NoActiveEditor => "NO_ACTIVE_EDITOR",
            DiffError::NoSavedVersion => "NO_SAVED_VERSION",
            DiffError::UntitledSelection => "UNTITLED_SELECTION",
            DiffError::NothingSelected => "NOTHING_SELECTED",
            DiffError::NoScmEntry => "NO_SCM_ENTRY",
            DiffError::UnsupportedScmType(_) => "UNSUPPORTED_SCM_TYPE",
            DiffError::NotEnoughVisible(_) => "NOT_ENOUGH_VISIBLE",
            DiffError::Custom(_) => "CUSTOM_ERROR",
        }
    }
}

/// Serializable error response for IPC
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<&DiffError> for ErrorResponse {
    fn from(error: &DiffError) -> Self {
        let details = match error {
            DiffError::Resolution { reason, .. } => Some(reason.to_string()),
            DiffError::ToolFailed { stderr } if !stderr.is_empty() => Some(stderr.clone()),
            _ => None,
        };

        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl serde::Serialize for DiffError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

/// Result type alias for JetBrains Diff operations
pub type Result<T> = std::result::Result<T, DiffError>;
