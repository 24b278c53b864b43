//! Resource clients
//!
//! Maps each service resource onto its collection URL under `/v1`. Nodes get a
//! dedicated [`NodeClient`] because every node operation takes a node list in
//! the request body; the other resources share [`ResourceClient`].

mod node;

pub use node::{BootDevice, DeployOptions, NodeClient, PowerAction};

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::api::PatchOp;
use crate::transport::{HttpSession, Query, TransportError};

type Result<T> = std::result::Result<T, TransportError>;

/// Service resource collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Networks,
    Nics,
    Nodes,
    OsImages,
    Passwds,
    Services,
}

impl Resource {
    /// Collection path segment under `/v1`
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Networks => "networks",
            Self::Nics => "nics",
            Self::Nodes => "nodes",
            Self::OsImages => "osimages",
            Self::Passwds => "passwds",
            Self::Services => "services",
        }
    }

    /// Field identifying an entry in list responses
    #[must_use]
    pub const fn key_field(self) -> &'static str {
        match self {
            Self::Nics => "uuid",
            Self::Passwds => "key",
            Self::Services => "hostname",
            Self::Networks | Self::Nodes | Self::OsImages => "name",
        }
    }

    /// Singular label used when printing listings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Networks => "network",
            Self::Nics => "nic",
            Self::Nodes => "node",
            Self::OsImages => "osimage",
            Self::Passwds => "passwd",
            Self::Services => "service",
        }
    }

    /// Absolute collection URL for a service endpoint
    #[must_use]
    pub fn url(self, endpoint: &str) -> String {
        format!("{}/v1/{}", endpoint.trim_end_matches('/'), self.path())
    }
}

/// Add the identifying field to a `fields` selection so results stay labelled
#[must_use]
pub fn fields_query(fields: &[String], key_field: &str) -> Query {
    if fields.is_empty() {
        return Query::new();
    }
    let mut fields = fields.to_vec();
    if !fields.iter().any(|f| f == key_field) {
        fields.push(key_field.to_string());
    }
    vec![("fields", fields.join(","))]
}

/// Client for one non-node resource collection
#[derive(Debug, Clone)]
pub struct ResourceClient {
    session: HttpSession,
    resource: Resource,
    base: String,
}

impl ResourceClient {
    #[must_use]
    pub fn new(session: HttpSession, endpoint: &str, resource: Resource) -> Self {
        Self {
            session,
            resource,
            base: resource.url(endpoint),
        }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    fn item_url(&self, name: &str) -> String {
        format!("{}/{name}", self.base)
    }

    /// `GET /v1/<resource>`
    ///
    /// # Errors
    /// Returns `TransportError` on request or decode failure.
    pub fn list(&self) -> Result<Value> {
        self.session
            .send_json::<Value, _>(Method::GET, &self.base, &Query::new(), None)
    }

    /// `GET /v1/<resource>/<name>` as raw JSON bytes
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn show(&self, name: &str, fields: &[String]) -> Result<Vec<u8>> {
        let query = fields_query(fields, self.resource.key_field());
        self.session
            .send::<Value>(Method::GET, &self.item_url(name), &query, None)
    }

    /// `GET /v1/nics/address?mac=<mac>`
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn show_by_mac(&self, mac: &str, fields: &[String]) -> Result<Vec<u8>> {
        let mut query = fields_query(fields, self.resource.key_field());
        query.push(("mac", mac.to_string()));
        self.session
            .send::<Value>(Method::GET, &self.item_url("address"), &query, None)
    }

    /// `GET /v1/services/hostname?name=<hostname>`
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn show_by_hostname(&self, hostname: &str) -> Result<Vec<u8>> {
        let query = vec![("name", hostname.to_string())];
        self.session
            .send::<Value>(Method::GET, &self.item_url("hostname"), &query, None)
    }

    /// `POST /v1/<resource>`
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>> {
        self.session
            .send(Method::POST, &self.base, &Query::new(), Some(body))
    }

    /// `DELETE /v1/<resource>/<name>`
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.session
            .send::<Value>(Method::DELETE, &self.item_url(name), &Query::new(), None)
            .map(drop)
    }

    /// `PATCH /v1/<resource>/<name>` with a list of patch operations
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn update(&self, name: &str, patches: &[PatchOp]) -> Result<Vec<u8>> {
        self.session
            .send(Method::PATCH, &self.item_url(name), &Query::new(), Some(patches))
    }
}

/// Pull the identifying field out of every entry of a list response
///
/// The service answers `GET /v1/<resource>` with `{"<resource>": [...]}` where
/// entries are either bare names or objects carrying `key_field`.
#[must_use]
pub fn entry_names(listing: &Value, resource: Resource) -> Vec<String> {
    listing
        .get(resource.path())
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(name) => Some(name.clone()),
                    Value::Object(map) => map
                        .get(resource.key_field())
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
