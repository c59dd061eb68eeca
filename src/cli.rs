//! Terminal host for the `jbdiff` binary
//!
//! Every subcommand sets up the editor state a real host would report
//! (active file, visible files, clipboard) and runs one command against it.
//! Files named on the command line are presented as clean saved buffers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::commands::DiffCommand;
use crate::config::DiffConfig;
use crate::error::Result;
use crate::extension::Extension;
use crate::host::{EditorDocument, EditorHost};
use crate::models::{ScmChange, ScmChangeKind};
use crate::services::editors::StaticEnumerator;

/// Compare files, buffers and git revisions in a JetBrains IDE
#[derive(Parser, Debug)]
#[command(name = "jbdiff")]
#[command(version, about)]
pub struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Diff tool command for this run
    #[arg(long, global = true)]
    pub tool: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diff two files, or merge three or four
    Files { paths: Vec<PathBuf> },

    /// Diff the files shown side by side, newest first
    Visible { paths: Vec<PathBuf> },

    /// Diff the current file with another file
    Other { current: PathBuf, other: PathBuf },

    /// Diff the current file with one of the open files, picked on stdin
    Pick {
        current: PathBuf,
        #[arg(required = true)]
        open: Vec<PathBuf>,
    },

    /// Diff the clipboard with a file
    Clipboard {
        file: PathBuf,

        /// Read the clipboard text from this file instead of stdin
        #[arg(long)]
        text_from: Option<PathBuf>,
    },

    /// Diff unsaved buffer content with the saved file
    Saved {
        file: PathBuf,

        /// File holding the unsaved buffer content
        #[arg(long)]
        buffer: PathBuf,
    },

    /// Select a file, then compare another file with it
    Compare { selected: PathBuf, file: PathBuf },

    /// Diff a changed file against git
    Scm {
        file: PathBuf,

        /// staged, added, unstaged, untracked, conflict or a numeric code
        #[arg(long, value_parser = parse_status)]
        status: ScmChangeKind,
    },
}

fn parse_status(value: &str) -> std::result::Result<ScmChangeKind, String> {
    match value {
        "staged" => Ok(ScmChangeKind::IndexModified),
        "added" => Ok(ScmChangeKind::IndexAdded),
        "unstaged" => Ok(ScmChangeKind::Modified),
        "untracked" => Ok(ScmChangeKind::Untracked),
        "conflict" => Ok(ScmChangeKind::BothModified),
        other => other
            .parse::<u32>()
            .map(ScmChangeKind::from_code)
            .map_err(|_| format!("unknown status '{}'", other)),
    }
}

/// Editor state assembled from the command line
#[derive(Default)]
pub struct TerminalHost {
    active: Option<EditorDocument>,
    visible: Vec<EditorDocument>,
    dialog: Option<PathBuf>,
    clipboard_from: Option<PathBuf>,
    failed: AtomicBool,
}

impl TerminalHost {
    /// Whether an error was reported
    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EditorHost for TerminalHost {
    fn active_editor(&self) -> Option<EditorDocument> {
        self.active.clone()
    }

    fn visible_editors(&self) -> Vec<EditorDocument> {
        self.visible.clone()
    }

    async fn read_clipboard(&self) -> Result<String> {
        match &self.clipboard_from {
            Some(path) => Ok(tokio::fs::read_to_string(path).await?),
            None => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                Ok(text)
            }
        }
    }

    async fn show_open_dialog(&self) -> Option<PathBuf> {
        self.dialog.clone()
    }

    async fn show_quick_pick(&self, items: Vec<PathBuf>, placeholder: &str) -> Option<PathBuf> {
        if items.is_empty() {
            return None;
        }

        eprintln!("{}:", placeholder);
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {}) {}", i + 1, item.display());
        }

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = stdin.read_line(&mut line).await {
            tracing::warn!("Failed to read pick: {}", e);
            return None;
        }

        let index = line.trim().parse::<usize>().ok()?;
        items.into_iter().nth(index.checked_sub(1)?)
    }

    fn show_info(&self, message: &str) {
        println!("{}", message);
    }

    fn show_error(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        eprintln!("{}", message);
    }
}

/// Parse the command line and run it
pub async fn run() -> anyhow::Result<ExitCode> {
    let succeeded = execute(Cli::parse()).await?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run a parsed command line, waiting for the diff tool to exit.
///
/// Returns whether the commands finished without reporting an error.
pub async fn execute(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => DiffConfig::load_file(path),
        None => match DiffConfig::default_dir() {
            Some(dir) => DiffConfig::load(&dir),
            None => Ok(DiffConfig::default()),
        },
    }
    .context("Failed to load settings")?;

    if let Some(tool) = cli.tool {
        config.custom_diff_checker_tool = tool;
    }

    let (host, open, commands) = prepare(cli.command).await?;
    let host = Arc::new(host);
    let ext = Extension::activate(config, host.clone(), Arc::new(StaticEnumerator::new(open)));

    for command in commands {
        if let Some(monitor) = ext.execute(command).await {
            monitor.await.context("Diff tool monitor panicked")?;
        }
        if host.failed() {
            break;
        }
    }

    let removed = ext.deactivate().await;
    tracing::debug!("Removed {} leftover temp files", removed);

    Ok(!host.failed())
}

async fn prepare(
    command: Commands,
) -> anyhow::Result<(TerminalHost, Vec<PathBuf>, Vec<DiffCommand>)> {
    let mut host = TerminalHost::default();
    let mut open = Vec::new();

    let commands = match command {
        Commands::Files { paths } => vec![DiffCommand::FromFileListMultiple(paths)],
        Commands::Visible { paths } => {
            host.visible = paths
                .into_iter()
                .map(|path| EditorDocument::saved(path, String::new()))
                .collect();
            vec![DiffCommand::Visible]
        }
        Commands::Other { current, other } => {
            host.active = Some(EditorDocument::saved(current, String::new()));
            host.dialog = Some(other);
            vec![DiffCommand::CurrentToOther]
        }
        Commands::Pick { current, open: files } => {
            host.active = Some(EditorDocument::saved(current, String::new()));
            open = files;
            vec![DiffCommand::CurrentToOtherOpen]
        }
        Commands::Clipboard { file, text_from } => {
            host.active = Some(EditorDocument::saved(file, String::new()));
            host.clipboard_from = text_from;
            vec![DiffCommand::WithClipboard]
        }
        Commands::Saved { file, buffer } => {
            let text = tokio::fs::read_to_string(&buffer)
                .await
                .with_context(|| format!("Failed to read buffer {}", buffer.display()))?;
            host.active = Some(EditorDocument {
                file_name: Some(file),
                text,
                is_dirty: true,
                selection: None,
            });
            vec![DiffCommand::SavedVersion]
        }
        Commands::Compare { selected, file } => vec![
            DiffCommand::FromFileListSelect(Some(selected)),
            DiffCommand::FromFileList(Some(file)),
        ],
        Commands::Scm { file, status } => {
            vec![DiffCommand::Scm(Some(ScmChange::new(file, status)))]
        }
    };

    Ok((host, open, commands))
}
