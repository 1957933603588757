//! Snapshot cache under the temp root
//!
//! Every install leaves `<temp root>/<hash>/` behind; failed installs may also
//! leave `<temp root>/<hash>.zip`. Entries are keyed by BLAKE3 hex digest and
//! only hash-named entries are ever touched.

pub mod stats;

pub use stats::{cache_stats, clear_cache, list_snapshots, remove_snapshots};
