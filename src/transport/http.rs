use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::TransportError;

/// Query string parameters, in order
pub type Query = Vec<(&'static str, String)>;

/// Blocking HTTP session against the service
///
/// Thin wrapper around a shared [`reqwest::blocking::Client`]. Every call sends
/// an optional JSON body (the service reads node lists from the body even on
/// `GET` and `DELETE`) and treats any non-2xx status as a failure.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    /// Build a session. `timeout` bounds each whole request; `None` disables it.
    ///
    /// # Errors
    /// Returns `TransportError::Client` if the TLS backend cannot be initialised.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("xcat3/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }

    /// Issue a request and return the raw response body.
    ///
    /// # Errors
    /// Returns `TransportError` on connection failure or non-success status.
    pub fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!(%method, url, "sending request");

        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(TransportError::Encode)?;
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let response = request.send().map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        let bytes = response.bytes().map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            warn!(%method, url, status = status.as_u16(), "request rejected");
            return Err(TransportError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }

    /// Issue a request and decode the JSON response into `R`.
    ///
    /// # Errors
    /// Returns `TransportError::Decode` when the body is not valid for `R`.
    pub fn send_json<B, R>(
        &self,
        method: Method,
        url: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let bytes = self.send(method, url, query, body)?;
        serde_json::from_slice(&bytes).map_err(|source| TransportError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
