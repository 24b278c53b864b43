//! Transport error types
//!
//! Every failure talking to the service surfaces as a [`TransportError`].
//! Nothing at this layer retries; callers decide whether the failure is fatal
//! (for bulk node operations it always is).

use thiserror::Error;

/// Errors raised while issuing a request to the service
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or protocol failure from the HTTP client
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status code
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not the JSON shape we expected
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request body could not be serialized
    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP client could not be constructed
    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Any other failure reported by a non-HTTP transport
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message() {
        let rejected = TransportError::Status {
            method: "PATCH".into(),
            url: "http://mgmt01:3010/v1/nodes".into(),
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(
            rejected.to_string(),
            "PATCH http://mgmt01:3010/v1/nodes returned 404: not found"
        );
        assert_eq!(TransportError::Other("down".into()).to_string(), "down");
    }
}
