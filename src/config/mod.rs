#[cfg(feature = "cli")]
pub mod cli;
pub mod snapshot;

pub use snapshot::{load_snapshot, SnapshotConfig};
