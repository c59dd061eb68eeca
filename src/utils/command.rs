//! Command utilities for cross-platform process spawning
//!
//! Builds the git and diff tool commands with the platform-specific
//! settings this crate relies on, returned as tokio commands so every
//! spawn can be awaited without blocking.

use tokio::process::Command;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Creates a Command with platform-specific settings to hide console windows.
///
/// Git commands never prompt for credentials.
pub fn create_command(program: &str) -> Command {
    let mut cmd = std::process::Command::new(program);

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    if program == "git" {
        cmd.env("GIT_TERMINAL_PROMPT", "0");
    }

    Command::from(cmd)
}

/// Creates a Command that hands a full command line to the platform shell
pub fn create_shell_command(command_line: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = create_command("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }

    #[cfg(not(target_os = "windows"))]
    {
        let mut cmd = create_command("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}

/// Exit status the shell reports when the program itself does not exist
pub const SHELL_COMMAND_NOT_FOUND: i32 = 127;
