//! Compare the clipboard with the active editor

use super::{launch, CommandOutcome};
use crate::error::{DiffError, Result};
use crate::extension::Extension;
use crate::models::{ContentSource, SnapshotKind};
use crate::services::equality::are_files_equal;

/// Diff the clipboard text against the active editor.
///
/// The editor side is the selection if there is one, else the untitled
/// buffer, else the file. Unsaved changes are taken into account for the
/// equality check, but the tool is opened on the saved file.
pub async fn diff_with_clipboard(ext: &Extension) -> Result<CommandOutcome> {
    let document = ext.host().active_editor().ok_or(DiffError::NoActiveEditor)?;
    let mut scope = ext.registry().begin_operation();

    let text = ext.host().read_clipboard().await?;
    let clipboard = ext
        .resolve(&ContentSource::ClipboardSnapshot { text }, &mut scope)
        .await?
        .path;

    let selection = document.selection.clone().filter(|s| !s.is_empty());
    let (current, compared) = match (selection, &document.file_name) {
        (Some(selection), owner) => {
            let source = ContentSource::BufferSnapshot {
                owner_path: owner.clone(),
                text: selection,
                kind: SnapshotKind::Selection,
            };
            let path = ext.resolve(&source, &mut scope).await?.path;
            (path.clone(), path)
        }
        (None, None) => {
            let source = ContentSource::BufferSnapshot {
                owner_path: None,
                text: document.text.clone(),
                kind: SnapshotKind::Whole,
            };
            let path = ext.resolve(&source, &mut scope).await?.path;
            (path.clone(), path)
        }
        (None, Some(saved)) if document.is_dirty => {
            let source = ContentSource::BufferSnapshot {
                owner_path: Some(saved.clone()),
                text: document.text.clone(),
                kind: SnapshotKind::Scratch,
            };
            let check = ext.resolve(&source, &mut scope).await?.path;
            (saved.clone(), check)
        }
        (None, Some(saved)) => (saved.clone(), saved.clone()),
    };

    if are_files_equal(&compared, &clipboard).await? {
        scope.purge().await;
        return Ok(CommandOutcome::Info("No difference".to_string()));
    }

    launch(ext, &[current, clipboard], scope).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EditorDocument;
    use crate::test_utils::{extension_with, FakeHost, FakeTool};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_same_content_reports_no_difference_and_purges() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "a.txt", "same");
        let tool = FakeTool::new();
        let host = FakeHost {
            active: Some(EditorDocument::saved(&file, "same")),
            clipboard: "same".to_string(),
            ..FakeHost::default()
        };
        let (ext, _) = extension_with(host, &tool);

        let outcome = diff_with_clipboard(&ext).await.unwrap();

        assert!(matches!(outcome, CommandOutcome::Info(ref m) if m == "No difference"));
        assert!(tool.invocations().is_empty());
        assert!(ext.registry().pending().is_empty());
        assert!(file.exists());
    }

    #[tokio::test]
    async fn test_dirty_buffer_checked_against_clipboard() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "a.txt", "saved");
        let tool = FakeTool::new();
        let host = FakeHost {
            active: Some(EditorDocument {
                file_name: Some(file.clone()),
                text: "edited".to_string(),
                is_dirty: true,
                selection: None,
            }),
            clipboard: "edited".to_string(),
            ..FakeHost::default()
        };
        let (ext, _) = extension_with(host, &tool);

        let outcome = diff_with_clipboard(&ext).await.unwrap();
        assert!(matches!(outcome, CommandOutcome::Info(_)));
        assert!(ext.registry().pending().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dirty_buffer_launches_against_saved_file() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "a.txt", "saved");
        let tool = FakeTool::new();
        let host = FakeHost {
            active: Some(EditorDocument {
                file_name: Some(file.clone()),
                text: "edited".to_string(),
                is_dirty: true,
                selection: None,
            }),
            clipboard: "pasted".to_string(),
            ..FakeHost::default()
        };
        let (ext, _) = extension_with(host, &tool);

        let CommandOutcome::Launched(process) = diff_with_clipboard(&ext).await.unwrap() else {
            panic!("expected a launch");
        };
        process.wait().await.unwrap();

        let call = &tool.invocations()[0];
        assert_eq!(call[0], "diff");
        assert_eq!(call[1], file.display().to_string());
        assert!(call[2].contains("clipboard_"));
        assert!(ext.registry().pending().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_selection_wins() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "a.txt", "whole file");
        let tool = FakeTool::new();
        let host = FakeHost {
            active: Some(EditorDocument {
                selection: Some("part".to_string()),
                ..EditorDocument::saved(&file, "whole file")
            }),
            clipboard: "other".to_string(),
            ..FakeHost::default()
        };
        let (ext, _) = extension_with(host, &tool);

        let CommandOutcome::Launched(process) = diff_with_clipboard(&ext).await.unwrap() else {
            panic!("expected a launch");
        };
        let recorded = ext.registry().pending();
        process.wait().await.unwrap();

        let call = &tool.invocations()[0];
        assert!(call[1].contains("selection_"));
        assert_eq!(recorded.len(), 2);
    }

    #[tokio::test]
    async fn test_selection_equal_to_clipboard() {
        let tool = FakeTool::new();
        let host = FakeHost {
            active: Some(EditorDocument {
                selection: Some("part".to_string()),
                ..EditorDocument::untitled("the whole part")
            }),
            clipboard: "part".to_string(),
            ..FakeHost::default()
        };
        let (ext, host) = extension_with(host, &tool);

        let outcome = diff_with_clipboard(&ext).await.unwrap();
        assert!(matches!(outcome, CommandOutcome::Info(_)));
        assert!(host.errors().is_empty());
    }
}
