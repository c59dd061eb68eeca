//! Service layer
//!
//! Content resolution, temp file bookkeeping and the diff tool process.
//! Command handlers compose these; none of them talks to the editor host.

pub mod editors;
pub mod equality;
pub mod git;
pub mod invoker;
pub mod resolver;
pub mod temp_files;

pub use editors::{NavigatingEnumerator, OpenEditorTracker, StaticEnumerator};
pub use equality::are_files_equal;
pub use git::{BlobFetcher, GitCli};
pub use invoker::{DiffInvoker, DiffProcess};
pub use temp_files::{TempFileRegistry, TempFileScope};
