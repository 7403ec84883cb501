//! In-memory reference store.

/// Sharded in-memory player store.
pub mod store;
