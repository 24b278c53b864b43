//! Bulk node operations
//!
//! Turns one logical "create N nodes" or "patch N nodes" request into as many
//! service requests as it takes, then folds the answers back together:
//! - `partition`: split a node list into a fixed number of contiguous shards
//! - `dispatch`: send one request per shard concurrently and join them all
//! - `merge`: union the per-shard outcome maps and tally successes
//!
//! Below the configured threshold no sharding happens at all and a single
//! request is sent.

mod dispatch;
mod error;
mod merge;
mod partition;

pub use dispatch::{BulkDispatcher, BulkSettings, DEFAULT_PARALLEL_THRESHOLD};
pub use error::DispatchError;
pub use merge::{BulkReport, Tally, merge};
pub use partition::{DEFAULT_SHARD_COUNT, partition};

#[cfg(test)]
mod tests;
