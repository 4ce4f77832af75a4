pub mod context;
pub mod snapshot;

pub use context::SessionContext;
pub use snapshot::{SessionSnapshot, SnapshotError, SNAPSHOT_FILE};
