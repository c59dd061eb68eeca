//! Shared helpers

pub mod command;

pub use command::{create_command, create_shell_command, SHELL_COMMAND_NOT_FOUND};
