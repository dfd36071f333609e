//! # Argus Snapshot Cache
//!
//! Raw API payloads are snapshotted to disk so the dashboard can redraw
//! without hammering the endpoints, and can still draw something when an
//! endpoint is down.
//!
//! ## Architectural Principles
//!
//! - **Injected collaborators:** the cache owns a `Clock` and a `Storage`
//!   rather than reading the wall clock and the filesystem directly, so the
//!   staleness logic is unit-testable without real file timestamps.
//! - **Raw bodies only:** the cache stores the exact text the wire returned.
//!   Decoding stays with the api-client, and a snapshot taken by one version
//!   of the dashboard remains readable by the next.

pub mod clock;
pub mod error;
pub mod snapshot;
pub mod storage;

// Re-export the key components to create a clean, public-facing API.
pub use clock::{Clock, SystemClock};
pub use error::CacheError;
pub use snapshot::SnapshotCache;
pub use storage::{FsStorage, Snapshot, Storage};
