mod poller;
mod source;

pub use poller::{LinkMonitor, diff};
pub use source::{FileSource, HttpSource, Snapshot, SnapshotSource, from_location};
