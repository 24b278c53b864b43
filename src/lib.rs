//! xcat3 - command line client for the xCAT3 cluster management service
//!
//! Most of the library maps CLI verbs onto REST calls against `/v1/<resource>`.
//! The interesting part is bulk node handling: [`range`] expands compact node
//! range expressions, and [`bulk`] shards large create/patch batches into
//! concurrent requests and merges their per-node outcomes.

use thiserror::Error;

pub mod api;
pub mod attrs;
pub mod bulk;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod output;
pub mod range;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use bulk::{BulkDispatcher, BulkReport, BulkSettings, Tally};
pub use range::{IdentifierSet, RangeError, expand};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum XcatError {
    /// Malformed node range expression
    #[error("{0}")]
    Range(#[from] range::RangeError),
    /// A bulk node operation failed
    #[error("{0}")]
    Dispatch(#[from] bulk::DispatchError),
    /// A single request to the service failed
    #[error("{0}")]
    Transport(#[from] transport::TransportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Malformed JSON in an import file
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
