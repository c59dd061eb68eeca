//! Extension settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};

const CONFIG_FILE: &str = "config.json";
const CONFIG_DIR_NAME: &str = "jetbrains-diff";

/// Command of the JetBrains launcher when nothing else is configured
pub const DEFAULT_DIFF_TOOL: &str = "idea";

/// Settings read from the host's settings store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffConfig {
    /// Default diff tool path or command
    pub diff_checker_tool: String,

    /// Overrides `diff_checker_tool` when non-empty
    pub custom_diff_checker_tool: String,

    /// Use the working tree file as merge base instead of fetching stage 1
    pub resolve_against_merged: bool,

    /// Delete leftover temp files when the extension shuts down
    pub clean_up_temp_files_on_code_close: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            diff_checker_tool: DEFAULT_DIFF_TOOL.to_string(),
            custom_diff_checker_tool: String::new(),
            resolve_against_merged: false,
            clean_up_temp_files_on_code_close: true,
        }
    }
}

impl DiffConfig {
    /// Platform config directory for this extension
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
    }

    /// Load configuration from a config directory
    pub fn load(config_dir: &Path) -> Result<Self> {
        Self::load_file(&config_dir.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file, defaults if it is absent
    pub fn load_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            DiffError::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            DiffError::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })
    }

    /// Save configuration to a config directory
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| DiffError::Config(format!("Failed to create config dir: {}", e)))?;

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(config_dir.join(CONFIG_FILE), contents)
            .map_err(|e| DiffError::Config(format!("Failed to write config: {}", e)))
    }

    /// The tool command line to launch.
    ///
    /// A custom tool wins over the default one. A custom path with an
    /// unescaped space is quoted unless it already is.
    pub fn tool_command(&self) -> String {
        let custom = self.custom_diff_checker_tool.as_str();
        if custom.is_empty() {
            return self.diff_checker_tool.clone();
        }

        if has_unescaped_space(custom) && !is_quoted(custom) {
            format!("\"{}\"", custom)
        } else {
            custom.to_string()
        }
    }
}

fn has_unescaped_space(value: &str) -> bool {
    let mut previous = None;
    for c in value.chars() {
        if c == ' ' && previous != Some('\\') {
            return true;
        }
        previous = Some(c);
    }
    false
}

fn is_quoted(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
}
