//! Reception cache: synchronized, multiply-indexed storage for recent
//! spots, with background pruning.
//!
//! The cache is the single owner of all [`Spot`](crate::model::Spot)
//! values. Index maps are views over one underlying store; a spot appears
//! in every applicable index or in none, and eviction removes it from all
//! of them atomically.

mod config;
mod decodes;
mod pruner;
mod reception;
mod stats;

pub use config::{CacheConfig, RetentionConfig};
pub use decodes::LocalDecodeBuffer;
pub use pruner::PruneDaemon;
pub use reception::ReceptionCache;
pub use stats::CacheStats;
