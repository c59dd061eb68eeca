//! Capabilities the hosting editor provides
//!
//! Commands only talk to the editor through these traits, so the same
//! command code runs under a real editor integration, the terminal host of
//! the `jbdiff` binary, and the test fakes.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Snapshot of one editor buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDocument {
    /// Backing file, `None` for untitled buffers
    pub file_name: Option<PathBuf>,
    /// Full buffer text
    pub text: String,
    /// Whether the buffer has unsaved changes
    pub is_dirty: bool,
    /// Selected text, `None` when the selection is empty
    pub selection: Option<String>,
}

impl EditorDocument {
    /// Clean buffer of a saved file
    pub fn saved(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            file_name: Some(path.into()),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Buffer with no backing file
    pub fn untitled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_dirty: true,
            ..Self::default()
        }
    }
}

/// The editor hosting the extension
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// The focused text editor, if any
    fn active_editor(&self) -> Option<EditorDocument>;

    /// All text editors currently shown side by side
    fn visible_editors(&self) -> Vec<EditorDocument>;

    async fn read_clipboard(&self) -> Result<String>;

    /// Ask the user for one file, `None` when dismissed
    async fn show_open_dialog(&self) -> Option<PathBuf>;

    /// Let the user pick one of `items`, `None` when dismissed
    async fn show_quick_pick(&self, items: Vec<PathBuf>, placeholder: &str) -> Option<PathBuf>;

    fn show_info(&self, message: &str);

    fn show_error(&self, message: &str);

    /// Toggle the host context flag that enables "compare with selected"
    fn set_selection_context(&self, _selected: bool) {}
}

/// Lists the files open in the editor
#[async_trait]
pub trait EditorEnumerator: Send + Sync {
    async fn list_open_paths(&self) -> Vec<PathBuf>;
}

/// Hosts without an enumeration API expose tab navigation instead
#[async_trait]
pub trait EditorNavigator: Send + Sync {
    /// File of the active editor, `None` when it is not a text editor
    fn active_path(&self) -> Option<PathBuf>;

    /// Switch to the next editor tab
    async fn next_editor(&self);
}
