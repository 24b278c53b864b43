use thiserror::Error;

use crate::transport::TransportError;

/// Errors that abort a bulk node operation
///
/// There is no partial success: if any request of a batch fails, the whole
/// batch fails and no report is produced.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The single, unsharded request failed
    #[error("Bulk request failed: {0}")]
    Transport(#[from] TransportError),

    /// One shard of a sharded batch failed
    #[error("Shard {index} of the batch failed: {source}")]
    Shard {
        index: usize,
        #[source]
        source: TransportError,
    },

    /// The shard worker pool could not be started
    #[error("Could not start shard workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
