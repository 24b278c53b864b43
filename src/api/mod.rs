//! Typed request and response bodies for the `/v1/nodes` bulk endpoints
//!
//! The service answers every bulk call with `{"nodes": {<name>: <outcome>}}`.
//! Outcomes are usually short tokens (`ok`, `updated`, ...) but some endpoints
//! return a nested object per node, so [`Outcome`] decodes either shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tokens the service uses to report a successful per-node operation
pub const SUCCESS_TOKENS: &[&str] = &[
    "ok",
    "updated",
    "deleted",
    "on",
    "off",
    "net",
    "cdrom",
    "disk",
    "provision",
];

/// Per-node attributes keyed by field name
pub type Attributes = Map<String, Value>;

/// Node creation template: a name plus arbitrary attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl NodeTemplate {
    /// Build a template for `name` sharing `attributes` with its siblings.
    ///
    /// A `name` key in `attributes` is dropped; the identifier always wins.
    #[must_use]
    pub fn new(name: impl Into<String>, mut attributes: Attributes) -> Self {
        attributes.remove("name");
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Reference to an existing node by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub name: String,
}

impl NodeRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// JSON-Patch style operation applied to every node of a patch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    Add { path: String, value: String },
    Remove { path: String },
}

impl PatchOp {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Add { path, .. } | Self::Remove { path } => path,
        }
    }
}

/// Body of `POST /v1/nodes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkCreateRequest {
    pub nodes: Vec<NodeTemplate>,
}

/// Body of `PATCH /v1/nodes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkPatchRequest {
    pub nodes: Vec<NodeRef>,
    pub patches: Vec<PatchOp>,
}

/// Body of any node-list request (`GET /nodes/info`, `DELETE`, power, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<NodeRef>,
}

impl<S: Into<String>> FromIterator<S> for NodeList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().map(NodeRef::new).collect(),
        }
    }
}

/// What the service reported for a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Flat status token such as `ok` or `failed`
    Token(String),
    /// Structured result (error details, status objects)
    Detail(Value),
}

impl Outcome {
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Whether this outcome is one of [`SUCCESS_TOKENS`]
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Token(token) => SUCCESS_TOKENS.contains(&token.as_str()),
            Self::Detail(_) => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => f.write_str(token),
            Self::Detail(value) => write!(f, "{value}"),
        }
    }
}

/// Node name to outcome, ordered by name
pub type OutcomeMap = BTreeMap<String, Outcome>;

/// Response body of every bulk node endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub nodes: OutcomeMap,
}
