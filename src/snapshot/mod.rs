mod decode;
mod error;
mod normalize;
pub mod source;
mod types;

pub use decode::decode_snapshot;
pub use error::SnapshotError;
pub use normalize::normalize;
pub use source::{fetch_all, DirSnapshotSource, HttpSnapshotSource, SnapshotSource};
pub use types::{RawValue, Snapshot, SnapshotLabel};
