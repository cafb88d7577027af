//! Git access: the client interface and change-set collection.

pub mod changes;
pub mod client;

pub use changes::collect_changes;
pub use client::{GitCli, GitClient, Identity, LogEntry};
