//! Cache Module
//!
//! Provides durable TTL caching with least-recently-stored eviction.

mod entry;
mod preferences;
mod stats;
mod storage;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use preferences::PreferenceStore;
pub use stats::CacheStats;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::CacheStore;

// == Public Constants ==
/// Largest share of the total quota a single serialized entry may use
pub const ITEM_SIZE_FRACTION: f64 = 0.1;
