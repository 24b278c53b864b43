//! Testing utilities for xcat3
//!
//! Provides [`MockTransport`], an in-memory [`NodeTransport`] that records
//! every request it receives and answers with a configurable token per node.
//!
//! Only available when compiled with `cfg(test)`.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{BulkCreateRequest, BulkPatchRequest, BulkResponse, Outcome, PatchOp};
use crate::transport::{NodeTransport, TransportError};

/// Recorded request, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { names: Vec<String> },
    Patch { names: Vec<String>, patches: Vec<PatchOp> },
}

impl Call {
    pub fn names(&self) -> &[String] {
        match self {
            Self::Create { names } | Self::Patch { names, .. } => names,
        }
    }
}

/// Transport double that never touches the network
///
/// Every node in a request is answered with `token_for(name)`, `ok` by default.
/// Requests containing `fail_on` fail with a `TransportError`.
pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    count: AtomicUsize,
    token_for: Box<dyn Fn(&str) -> String + Send + Sync>,
    fail_on: Option<String>,
}

impl MockTransport {
    /// Mock answering `ok` for every node
    pub fn new() -> Self {
        Self::with_tokens(|_| "ok".to_string())
    }

    /// Mock answering `token_for(name)` for every node
    pub fn with_tokens(token_for: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            count: AtomicUsize::new(0),
            token_for: Box::new(token_for),
            fail_on: None,
        }
    }

    /// Fail any request that contains `name`
    #[must_use]
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Snapshot of every request received so far
    ///
    /// # Panics
    /// Panics if the internal lock was poisoned by a panicking test thread.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("mock transport lock poisoned").clone()
    }

    fn answer(&self, call: Call) -> Result<BulkResponse, TransportError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .fail_on
            .as_ref()
            .is_some_and(|bad| call.names().contains(bad));
        let nodes = call
            .names()
            .iter()
            .map(|name| (name.clone(), Outcome::Token((self.token_for)(name))))
            .collect();
        self.calls
            .lock()
            .expect("mock transport lock poisoned")
            .push(call);
        if failed {
            return Err(TransportError::Other("connection reset by peer".into()));
        }
        Ok(BulkResponse { nodes })
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTransport for MockTransport {
    fn create_nodes(&self, request: &BulkCreateRequest) -> Result<BulkResponse, TransportError> {
        self.answer(Call::Create {
            names: request.nodes.iter().map(|n| n.name.clone()).collect(),
        })
    }

    fn patch_nodes(&self, request: &BulkPatchRequest) -> Result<BulkResponse, TransportError> {
        self.answer(Call::Patch {
            names: request.nodes.iter().map(|n| n.name.clone()).collect(),
            patches: request.patches.clone(),
        })
    }
}

/// `count` synthetic node names `node0 .. node{count-1}`
pub fn node_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("node{i}")).collect()
}
