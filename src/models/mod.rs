//! Data models for JetBrains Diff

pub mod request;
pub mod scm;
pub mod source;

pub use request::*;
pub use scm::*;
pub use source::*;
