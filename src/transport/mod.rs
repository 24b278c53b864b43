//! Transport layer
//!
//! - [`HttpSession`]: blocking HTTP session used by every resource client
//! - [`NodeTransport`]: the narrow capability the bulk engine depends on
//!
//! The bulk engine only ever needs to POST or PATCH a batch of nodes, so it is
//! written against [`NodeTransport`] instead of the HTTP session. Tests plug
//! in a counting mock; the CLI plugs in [`crate::client::NodeClient`].

mod error;
mod http;

pub use error::TransportError;
pub use http::{HttpSession, Query};

use crate::api::{BulkCreateRequest, BulkPatchRequest, BulkResponse};

/// Capability to issue bulk node requests against the service.
///
/// Implementations are shared by reference across shard workers, hence `Sync`.
pub trait NodeTransport: Sync {
    /// Enroll the nodes described by `request` (`POST /v1/nodes`)
    ///
    /// # Errors
    /// Returns `TransportError` when the request cannot be completed.
    fn create_nodes(&self, request: &BulkCreateRequest) -> Result<BulkResponse, TransportError>;

    /// Apply `request.patches` to every node in `request.nodes` (`PATCH /v1/nodes`)
    ///
    /// # Errors
    /// Returns `TransportError` when the request cannot be completed.
    fn patch_nodes(&self, request: &BulkPatchRequest) -> Result<BulkResponse, TransportError>;
}

impl<T: NodeTransport + ?Sized> NodeTransport for &T {
    fn create_nodes(&self, request: &BulkCreateRequest) -> Result<BulkResponse, TransportError> {
        (**self).create_nodes(request)
    }

    fn patch_nodes(&self, request: &BulkPatchRequest) -> Result<BulkResponse, TransportError> {
        (**self).patch_nodes(request)
    }
}
