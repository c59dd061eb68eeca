//! Test utilities: temporary git repositories and fake host collaborators

#![cfg(test)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::DiffConfig;
use crate::error::{DiffError, Result};
use crate::extension::Extension;
use crate::host::{EditorDocument, EditorHost};
use crate::models::RevisionSpecifier;
use crate::services::editors::StaticEnumerator;
use crate::services::git::BlobFetcher;
use crate::services::temp_files::TempFileRegistry;

/// A temporary git repository for testing
pub struct TestRepo {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Create a new empty git repository
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().to_path_buf();

        let repo = git2::Repository::init(&path).expect("Failed to init repo");

        let mut config = repo.config().expect("Failed to get config");
        config
            .set_str("user.name", "Test User")
            .expect("Failed to set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Failed to set user.email");

        Self { _dir: dir, path }
    }

    /// Create a repository with an initial commit
    pub fn with_initial_commit() -> Self {
        let test_repo = Self::new();
        test_repo.create_commit("Initial commit", &[("README.md", "# Test Repo")]);
        test_repo
    }

    /// Create a repository in the middle of a merge that conflicts on `name`
    pub fn with_conflict(name: &str, base: &str, ours: &str, theirs: &str) -> Self {
        let test_repo = Self::with_initial_commit();
        test_repo.create_commit("Add base", &[(name, base)]);
        let main = test_repo.current_branch();

        test_repo.create_branch("incoming");
        test_repo.create_commit("Our change", &[(name, ours)]);

        test_repo.checkout_branch("incoming");
        let their_oid = test_repo.create_commit("Their change", &[(name, theirs)]);

        test_repo.checkout_branch(&main);
        let repo = test_repo.repo();
        let annotated = repo
            .find_annotated_commit(their_oid)
            .expect("Failed to find their commit");
        repo.merge(&[&annotated], None, None)
            .expect("Failed to merge");
        assert!(
            repo.index().expect("Failed to get index").has_conflicts(),
            "merge should conflict"
        );

        test_repo
    }

    /// Get the git2 repository
    pub fn repo(&self) -> git2::Repository {
        git2::Repository::open(&self.path).expect("Failed to open repo")
    }

    /// Create a file with content
    pub fn create_file(&self, name: &str, content: &str) {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Stage a file
    pub fn stage_file(&self, name: &str) {
        let repo = self.repo();
        let mut index = repo.index().expect("Failed to get index");
        index
            .add_path(Path::new(name))
            .expect("Failed to stage file");
        index.write().expect("Failed to write index");
    }

    /// Create a commit with the given files
    pub fn create_commit(&self, message: &str, files: &[(&str, &str)]) -> git2::Oid {
        let repo = self.repo();

        for (name, content) in files {
            self.create_file(name, content);
            self.stage_file(name);
        }

        let mut index = repo.index().expect("Failed to get index");
        let tree_oid = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_oid).expect("Failed to find tree");
        let sig = repo.signature().expect("Failed to get signature");

        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.as_ref().into_iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a branch at the current HEAD
    pub fn create_branch(&self, name: &str) {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        let commit = head.peel_to_commit().expect("Failed to get commit");
        repo.branch(name, &commit, false)
            .expect("Failed to create branch");
    }

    /// Checkout a branch, overwriting the working tree
    pub fn checkout_branch(&self, name: &str) {
        let repo = self.repo();
        let branch = repo
            .find_branch(name, git2::BranchType::Local)
            .expect("Failed to find branch");
        let obj = branch
            .get()
            .peel(git2::ObjectType::Commit)
            .expect("Failed to peel");
        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();
        repo.checkout_tree(&obj, Some(&mut checkout))
            .expect("Failed to checkout");
        repo.set_head(branch.get().name().expect("Branch name is not utf-8"))
            .expect("Failed to set HEAD");
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> String {
        let repo = self.repo();
        let head = repo.head().expect("Failed to get HEAD");
        head.shorthand().unwrap_or("").to_string()
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Editor host returning canned answers and recording notifications
#[derive(Default)]
pub struct FakeHost {
    pub active: Option<EditorDocument>,
    pub visible: Vec<EditorDocument>,
    pub open: Vec<PathBuf>,
    pub clipboard: String,
    pub dialog: Option<PathBuf>,
    pub pick: Option<PathBuf>,
    pub offered: Mutex<Vec<Vec<PathBuf>>>,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub selection_context: Mutex<Option<bool>>,
}

impl FakeHost {
    pub fn offered(&self) -> Vec<Vec<PathBuf>> {
        self.offered.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn selection_context(&self) -> Option<bool> {
        *self.selection_context.lock().unwrap()
    }
}

#[async_trait]
impl EditorHost for FakeHost {
    fn active_editor(&self) -> Option<EditorDocument> {
        self.active.clone()
    }

    fn visible_editors(&self) -> Vec<EditorDocument> {
        self.visible.clone()
    }

    async fn read_clipboard(&self) -> Result<String> {
        Ok(self.clipboard.clone())
    }

    async fn show_open_dialog(&self) -> Option<PathBuf> {
        self.dialog.clone()
    }

    async fn show_quick_pick(&self, items: Vec<PathBuf>, _placeholder: &str) -> Option<PathBuf> {
        let answer = self.pick.clone().filter(|p| items.contains(p));
        self.offered.lock().unwrap().push(items);
        answer
    }

    fn show_info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn set_selection_context(&self, selected: bool) {
        *self.selection_context.lock().unwrap() = Some(selected);
    }
}

/// Blob fetcher serving canned content per revision and recording calls
#[derive(Clone, Default)]
pub struct FakeFetcher {
    blobs: HashMap<RevisionSpecifier, Vec<u8>>,
    calls: Arc<Mutex<Vec<(PathBuf, RevisionSpecifier)>>>,
}

impl FakeFetcher {
    pub fn with_blob(mut self, revision: RevisionSpecifier, content: &str) -> Self {
        self.blobs.insert(revision, content.as_bytes().to_vec());
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, RevisionSpecifier)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobFetcher for FakeFetcher {
    async fn fetch_blob(&self, path: &Path, revision: RevisionSpecifier) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), revision));
        self.blobs.get(&revision).cloned().ok_or_else(|| {
            DiffError::Git(format!(
                "fatal: path '{}' is not in the {} version",
                path.display(),
                revision.role()
            ))
        })
    }
}

/// Shell script standing in for the JetBrains launcher.
///
/// Each run appends its arguments, one per line, followed by a `---`
/// separator. The script is run through `sh` rather than executed directly.
pub struct FakeTool {
    dir: TempDir,
    script: PathBuf,
    log: PathBuf,
}

impl FakeTool {
    pub fn new() -> Self {
        Self::with_tail("exit 0")
    }

    /// A launcher that leaves a child running for `secs` seconds and exits
    pub fn with_background_child(secs: u32) -> Self {
        Self::with_tail(&format!("sleep {} &\nexit 0", secs))
    }

    /// A tool that records its call, prints `stderr` and exits with `code`
    pub fn failing(stderr: &str, code: i32) -> Self {
        Self::with_tail(&format!("printf '%s\\n' '{}' >&2\nexit {}", stderr, code))
    }

    fn with_tail(tail: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let script = dir.path().join("tool.sh");
        let log = dir.path().join("calls.log");
        let body = format!(
            "{{ for arg in \"$@\"; do printf '%s\\n' \"$arg\"; done; printf -- '---\\n'; }} >> '{}'\n{}\n",
            log.display(),
            tail
        );
        std::fs::write(&script, body).expect("Failed to write fake tool");
        Self { dir, script, log }
    }

    /// Tool command line to configure
    pub fn command(&self) -> String {
        format!("sh {}", self.script.display())
    }

    /// Settings launching this tool
    pub fn config(&self) -> DiffConfig {
        DiffConfig {
            diff_checker_tool: self.command(),
            ..DiffConfig::default()
        }
    }

    /// Scratch directory for temp files of the command under test
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Arguments of every recorded run
    pub fn invocations(&self) -> Vec<Vec<String>> {
        let Ok(log) = std::fs::read_to_string(&self.log) else {
            return Vec::new();
        };
        let mut calls = Vec::new();
        let mut current = Vec::new();
        for line in log.lines() {
            if line == "---" {
                calls.push(std::mem::take(&mut current));
            } else {
                current.push(line.to_string());
            }
        }
        calls
    }
}

/// Extension over `host` launching `tool`, with temp files in the tool's
/// scratch directory
pub fn extension_with(host: FakeHost, tool: &FakeTool) -> (Extension, Arc<FakeHost>) {
    extension_from(host, tool, tool.config(), FakeFetcher::default())
}

pub fn extension_from(
    host: FakeHost,
    tool: &FakeTool,
    config: DiffConfig,
    fetcher: FakeFetcher,
) -> (Extension, Arc<FakeHost>) {
    let enumerator = Arc::new(StaticEnumerator::new(host.open.clone()));
    let host = Arc::new(host);
    let ext = Extension::activate(config, host.clone(), enumerator)
        .with_fetcher(Arc::new(fetcher))
        .with_registry(TempFileRegistry::in_dir(tool.dir()));
    (ext, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_repo() {
        let repo = TestRepo::new();
        assert!(repo.path.exists());
        assert!(repo.path.join(".git").exists());
    }

    #[test]
    fn test_conflict_repo_has_all_stages() {
        let repo = TestRepo::with_conflict("story.txt", "base\n", "ours\n", "theirs\n");
        let index = repo.repo().index().unwrap();
        let conflict = index.conflicts().unwrap().next().unwrap().unwrap();
        assert!(conflict.ancestor.is_some());
        assert!(conflict.our.is_some());
        assert!(conflict.their.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_tool_records_arguments() {
        let tool = FakeTool::new();
        let status = std::process::Command::new("sh")
            .arg(&tool.script)
            .args(["diff", "a b", "c"])
            .status()
            .unwrap();
        assert!(status.success());
        assert_eq!(
            tool.invocations(),
            vec![vec!["diff".to_string(), "a b".to_string(), "c".to_string()]]
        );
    }
}
