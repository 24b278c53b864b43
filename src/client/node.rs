use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde_json::Value;

use super::{Resource, fields_query};
use crate::api::{BulkCreateRequest, BulkPatchRequest, BulkResponse, NodeList};
use crate::transport::{HttpSession, NodeTransport, Query, TransportError};

type Result<T> = std::result::Result<T, TransportError>;

/// Power operations accepted by `PUT /v1/nodes/power`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    On,
    Off,
    Boot,
    Status,
}

impl PowerAction {
    pub const ALL: [Self; 4] = [Self::On, Self::Off, Self::Boot, Self::Status];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Boot => "boot",
            Self::Status => "status",
        }
    }
}

/// Next boot devices accepted by `PUT /v1/nodes/boot_device`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootDevice {
    Disk,
    Net,
    Cdrom,
    Status,
}

impl BootDevice {
    pub const ALL: [Self; 4] = [Self::Disk, Self::Net, Self::Cdrom, Self::Status];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Net => "net",
            Self::Cdrom => "cdrom",
            Self::Status => "status",
        }
    }
}

macro_rules! keyword_enum {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        let allowed: Vec<_> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!("invalid {} '{s}', only allow {}", $what, allowed.join(" "))
                    })
            }
        }
    };
}

keyword_enum!(PowerAction, "power action");
keyword_enum!(BootDevice, "boot device");

/// Options for `PUT /v1/nodes/provision`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployOptions {
    pub osimage: Option<String>,
    /// Target state, `nodeset` when unset
    pub state: Option<String>,
    /// Undo a previous deploy (`un_<state>`)
    pub delete: bool,
}

impl DeployOptions {
    #[must_use]
    pub fn query(&self) -> Query {
        let mut query = Query::new();
        if let Some(osimage) = self.osimage.as_deref().filter(|s| !s.is_empty()) {
            query.push(("osimage", osimage.to_string()));
        }
        let state = self
            .state
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("nodeset");
        let target = if self.delete {
            format!("un_{state}")
        } else {
            state.to_string()
        };
        query.push(("target", target));
        query
    }
}

/// Client for `/v1/nodes`
#[derive(Debug, Clone)]
pub struct NodeClient {
    session: HttpSession,
    base: String,
}

impl NodeClient {
    #[must_use]
    pub fn new(session: HttpSession, endpoint: &str) -> Self {
        Self {
            session,
            base: Resource::Nodes.url(endpoint),
        }
    }

    fn url(&self, sub: &str) -> String {
        format!("{}/{sub}", self.base)
    }

    /// `GET /v1/nodes`
    ///
    /// # Errors
    /// Returns `TransportError` on request or decode failure.
    pub fn list(&self) -> Result<Value> {
        self.session
            .send_json::<Value, _>(Method::GET, &self.base, &Query::new(), None)
    }

    /// Node details as raw JSON. One node is fetched directly, several through
    /// `GET /v1/nodes/info` with the node list in the body.
    ///
    /// # Errors
    /// Returns `TransportError` on request failure.
    pub fn show(&self, names: &[String], fields: &[String]) -> Result<Vec<u8>> {
        let query = fields_query(fields, Resource::Nodes.key_field());
        if let [name] = names {
            return self
                .session
                .send::<Value>(Method::GET, &self.url(name), &query, None);
        }
        let body: NodeList = names.iter().map(String::as_str).collect();
        self.session
            .send(Method::GET, &self.url("info"), &query, Some(&body))
    }

    /// `DELETE /v1/nodes` with the node list in the body
    ///
    /// # Errors
    /// Returns `TransportError` on request or decode failure.
    pub fn delete(&self, names: &[String]) -> Result<BulkResponse> {
        let body: NodeList = names.iter().map(String::as_str).collect();
        self.session
            .send_json(Method::DELETE, &self.base, &Query::new(), Some(&body))
    }

    /// Query or change power state
    ///
    /// # Errors
    /// Returns `TransportError` on request or decode failure.
    pub fn power(&self, names: &[String], action: PowerAction) -> Result<BulkResponse> {
        self.node_state("power", names, action.as_str())
    }

    /// Query or set the next boot device
    ///
    /// # Errors
    /// Returns `TransportError` on request or decode failure.
    pub fn boot_device(&self, names: &[String], device: BootDevice) -> Result<BulkResponse> {
        self.node_state("boot_device", names, device.as_str())
    }

    /// `status` reads with `GET`, anything else writes with `PUT ?target=`
    fn node_state(&self, sub: &str, names: &[String], target: &str) -> Result<BulkResponse> {
        let body: NodeList = names.iter().map(String::as_str).collect();
        if target == "status" {
            return self
                .session
                .send_json(Method::GET, &self.url(sub), &Query::new(), Some(&body));
        }
        let query = vec![("target", target.to_string())];
        self.session
            .send_json(Method::PUT, &self.url(sub), &query, Some(&body))
    }

    /// `PUT /v1/nodes/provision`
    ///
    /// # Errors
    /// Returns `TransportError` on request or decode failure.
    pub fn deploy(&self, names: &[String], options: &DeployOptions) -> Result<BulkResponse> {
        let body: NodeList = names.iter().map(String::as_str).collect();
        self.session
            .send_json(Method::PUT, &self.url("provision"), &options.query(), Some(&body))
    }
}

impl NodeTransport for NodeClient {
    fn create_nodes(&self, request: &BulkCreateRequest) -> Result<BulkResponse> {
        self.session
            .send_json(Method::POST, &self.base, &Query::new(), Some(request))
    }

    fn patch_nodes(&self, request: &BulkPatchRequest) -> Result<BulkResponse> {
        self.session
            .send_json(Method::PATCH, &self.base, &Query::new(), Some(request))
    }
}
