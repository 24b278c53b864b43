use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::DispatchError;
use super::merge::{BulkReport, merge};
use super::partition::{DEFAULT_SHARD_COUNT, partition};
use crate::api::{
    Attributes, BulkCreateRequest, BulkPatchRequest, BulkResponse, NodeRef, NodeTemplate,
    OutcomeMap, PatchOp,
};
use crate::transport::{NodeTransport, TransportError};

type Result<T> = std::result::Result<T, DispatchError>;

/// Node count at which a batch is split into shards
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 3000;

/// Knobs controlling when and how a batch is sharded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSettings {
    /// Number of shards (and concurrent requests) for a large batch
    pub shard_count: usize,
    /// Batches with at least this many nodes are sharded
    pub parallel_threshold: usize,
}

impl Default for BulkSettings {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl BulkSettings {
    /// Whether a batch of `len` nodes takes the sharded path
    #[must_use]
    pub const fn should_shard(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }
}

/// Issues bulk create/patch requests, sharding large batches across workers
///
/// Small batches go out as one request. Large batches are partitioned into
/// `shard_count` shards and each non-empty shard is sent concurrently on its
/// own worker; the dispatcher waits for every worker before merging results.
#[derive(Debug)]
pub struct BulkDispatcher<T> {
    transport: T,
    settings: BulkSettings,
}

impl<T: NodeTransport> BulkDispatcher<T> {
    #[must_use]
    pub const fn new(transport: T, settings: BulkSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Create one node per identifier, all sharing `template`'s attributes.
    ///
    /// # Errors
    /// Returns `DispatchError` if any request fails.
    pub fn bulk_create(&self, identifiers: &[String], template: &Attributes) -> Result<BulkReport> {
        let nodes = identifiers
            .iter()
            .map(|name| NodeTemplate::new(name.clone(), template.clone()))
            .collect();
        self.bulk_create_nodes(nodes)
    }

    /// Create fully described nodes (the import path).
    ///
    /// # Errors
    /// Returns `DispatchError` if any request fails.
    pub fn bulk_create_nodes(&self, nodes: Vec<NodeTemplate>) -> Result<BulkReport> {
        if nodes.is_empty() {
            return Ok(BulkReport::default());
        }
        if !self.settings.should_shard(nodes.len()) {
            debug!(nodes = nodes.len(), "creating nodes with a single request");
            let response = self.transport.create_nodes(&BulkCreateRequest { nodes })?;
            return Ok(BulkReport::new(response.nodes));
        }

        info!(
            nodes = nodes.len(),
            shards = self.settings.shard_count,
            "creating nodes in parallel shards"
        );
        let shards = partition(nodes, self.settings.shard_count);
        let maps = self.dispatch_create(shards)?;
        Ok(BulkReport::new(merge(maps)))
    }

    /// Apply `patches` to every identifier.
    ///
    /// # Errors
    /// Returns `DispatchError` if any request fails.
    pub fn bulk_patch(&self, identifiers: &[String], patches: &[PatchOp]) -> Result<BulkReport> {
        if identifiers.is_empty() {
            return Ok(BulkReport::default());
        }
        let nodes: Vec<NodeRef> = identifiers.iter().map(NodeRef::new).collect();
        if !self.settings.should_shard(nodes.len()) {
            debug!(nodes = nodes.len(), "patching nodes with a single request");
            let response = self.transport.patch_nodes(&BulkPatchRequest {
                nodes,
                patches: patches.to_vec(),
            })?;
            return Ok(BulkReport::new(response.nodes));
        }

        info!(
            nodes = nodes.len(),
            shards = self.settings.shard_count,
            "patching nodes in parallel shards"
        );
        let shards = partition(nodes, self.settings.shard_count);
        let maps = self.dispatch_patch(shards, patches)?;
        Ok(BulkReport::new(merge(maps)))
    }

    /// Send one create request per non-empty shard and wait for all of them.
    ///
    /// Returned maps are in shard order, empty shards omitted.
    ///
    /// # Errors
    /// Returns `DispatchError::Shard` for the first failed shard (in shard order)
    /// once every shard has finished.
    pub fn dispatch_create(&self, shards: Vec<Vec<NodeTemplate>>) -> Result<Vec<OutcomeMap>> {
        self.run_shards(shards, |nodes| {
            self.transport.create_nodes(&BulkCreateRequest { nodes })
        })
    }

    /// Send one patch request per non-empty shard, each carrying the full
    /// `patches` list, and wait for all of them.
    ///
    /// # Errors
    /// Returns `DispatchError::Shard` for the first failed shard (in shard order)
    /// once every shard has finished.
    pub fn dispatch_patch(
        &self,
        shards: Vec<Vec<NodeRef>>,
        patches: &[PatchOp],
    ) -> Result<Vec<OutcomeMap>> {
        self.run_shards(shards, |nodes| {
            self.transport.patch_nodes(&BulkPatchRequest {
                nodes,
                patches: patches.to_vec(),
            })
        })
    }

    fn run_shards<X, F>(&self, shards: Vec<Vec<X>>, call: F) -> Result<Vec<OutcomeMap>>
    where
        X: Send,
        F: Fn(Vec<X>) -> std::result::Result<BulkResponse, TransportError> + Sync,
    {
        let jobs: Vec<(usize, Vec<X>)> = shards
            .into_iter()
            .enumerate()
            .filter(|(_, shard)| !shard.is_empty())
            .collect();
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        // One thread per shard so every request is in flight at once.
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs.len())
            .thread_name(|i| format!("xcat3-shard-{i}"))
            .build()?;

        let results: Vec<(usize, std::result::Result<BulkResponse, TransportError>)> =
            pool.install(|| {
                jobs.into_par_iter()
                    .map(|(index, shard)| {
                        debug!(shard = index, nodes = shard.len(), "dispatching shard");
                        (index, call(shard))
                    })
                    .collect()
            });

        let mut maps = Vec::with_capacity(results.len());
        for (index, result) in results {
            match result {
                Ok(response) => maps.push(response.nodes),
                Err(source) => {
                    warn!(shard = index, error = %source, "shard request failed, aborting batch");
                    return Err(DispatchError::Shard { index, source });
                }
            }
        }
        Ok(maps)
    }
}
