//! JetBrains Diff
//!
//! Opens files, editor buffers, clipboard text and git revisions in the
//! diff and merge windows of a JetBrains IDE. The editor is reached through
//! the traits in [`host`]; the `jbdiff` binary drives the same commands
//! from a terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extension;
pub mod host;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use commands::{CommandOutcome, DiffCommand};
pub use config::DiffConfig;
pub use error::{DiffError, Result};
pub use extension::Extension;

/// Install the log subscriber, writing to stderr
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jetbrains_diff_lib=info,jbdiff=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
