use std::collections::BTreeSet;

use serde_json::json;

use crate::api::{Attributes, NodeRef, NodeTemplate, Outcome, PatchOp};
use crate::testing::{Call, MockTransport, node_names};

use super::{BulkDispatcher, BulkSettings, DispatchError, Tally, partition};

fn dispatcher(mock: &MockTransport) -> BulkDispatcher<&MockTransport> {
    BulkDispatcher::new(mock, BulkSettings::default())
}

#[test]
fn test_bulk_create_sharded_covers_every_node() {
    let mock = MockTransport::new();
    let names = node_names(5000);

    let report = dispatcher(&mock)
        .bulk_create(&names, &Attributes::new())
        .unwrap();

    assert_eq!(mock.call_count(), 4);
    let expected: BTreeSet<String> = names.into_iter().collect();
    let got: BTreeSet<String> = report.outcomes.keys().cloned().collect();
    assert_eq!(got, expected);
    assert_eq!(
        report.tally,
        Tally {
            success: 5000,
            failure: 0
        }
    );
}

#[test]
fn test_threshold_boundary_below() {
    let mock = MockTransport::new();
    let report = dispatcher(&mock)
        .bulk_create(&node_names(2999), &Attributes::new())
        .unwrap();
    assert_eq!(mock.call_count(), 1);
    assert_eq!(report.outcomes.len(), 2999);
}

#[test]
fn test_threshold_boundary_at() {
    let mock = MockTransport::new();
    let report = dispatcher(&mock)
        .bulk_create(&node_names(3000), &Attributes::new())
        .unwrap();
    assert_eq!(mock.call_count(), 4);
    assert_eq!(report.outcomes.len(), 3000);

    let mut sizes: Vec<usize> = mock.calls().iter().map(|c| c.names().len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![750, 750, 750, 750]);
}

#[test]
fn test_bulk_create_shares_template() {
    let mock = MockTransport::new();
    let mut template = Attributes::new();
    template.insert("arch".into(), json!("x86_64"));

    let report = dispatcher(&mock)
        .bulk_create(&["c1".to_string(), "c2".to_string()], &template)
        .unwrap();

    assert_eq!(mock.call_count(), 1);
    assert_eq!(
        mock.calls(),
        vec![Call::Create {
            names: vec!["c1".into(), "c2".into()]
        }]
    );
    assert_eq!(report.tally.success, 2);
}

#[test]
fn test_bulk_patch_sharded_sends_patches_to_every_shard() {
    let mock = MockTransport::with_tokens(|_| "updated".to_string());
    let patches = vec![PatchOp::Add {
        path: "/netboot".into(),
        value: "pxe".into(),
    }];

    let report = dispatcher(&mock)
        .bulk_patch(&node_names(4001), &patches)
        .unwrap();

    assert_eq!(mock.call_count(), 4);
    for call in mock.calls() {
        match call {
            Call::Patch { patches: sent, .. } => assert_eq!(sent, patches),
            Call::Create { .. } => panic!("unexpected create call"),
        }
    }
    assert_eq!(report.outcomes.len(), 4001);
    assert_eq!(report.tally.success, 4001);
}

#[test]
fn test_bulk_patch_small_batch_single_request() {
    let mock = MockTransport::with_tokens(|name| {
        if name == "b" {
            "failed".to_string()
        } else {
            "updated".to_string()
        }
    });
    let patches = vec![PatchOp::Remove {
        path: "/mgt".into(),
    }];

    let report = dispatcher(&mock)
        .bulk_patch(&["a".to_string(), "b".to_string()], &patches)
        .unwrap();

    assert_eq!(mock.call_count(), 1);
    assert_eq!(report.outcomes["b"], Outcome::token("failed"));
    assert_eq!(
        report.tally,
        Tally {
            success: 1,
            failure: 1
        }
    );
}

#[test]
fn test_empty_shards_are_not_dispatched() {
    let mock = MockTransport::new();
    let nodes: Vec<NodeTemplate> = ["x", "y"]
        .into_iter()
        .map(|n| NodeTemplate::new(n, Attributes::new()))
        .collect();
    let shards = partition(nodes, 4);
    assert_eq!(shards.iter().filter(|s| s.is_empty()).count(), 2);

    let maps = dispatcher(&mock).dispatch_create(shards).unwrap();

    assert_eq!(mock.call_count(), 2);
    assert_eq!(maps.len(), 2);
}

#[test]
fn test_dispatch_all_empty_shards() {
    let mock = MockTransport::new();
    let shards: Vec<Vec<NodeRef>> = vec![Vec::new(); 4];
    let maps = dispatcher(&mock).dispatch_patch(shards, &[]).unwrap();
    assert!(maps.is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_shard_failure_aborts_batch_after_join() {
    let mock = MockTransport::new().failing_on("node10");
    let err = dispatcher(&mock)
        .bulk_create(&node_names(3200), &Attributes::new())
        .unwrap_err();

    assert!(matches!(err, DispatchError::Shard { .. }));
    // Every shard still ran to completion.
    assert_eq!(mock.call_count(), 4);
}

#[test]
fn test_single_request_failure() {
    let mock = MockTransport::new().failing_on("n1");
    let err = dispatcher(&mock)
        .bulk_patch(&["n1".to_string()], &[])
        .unwrap_err();
    assert!(matches!(err, DispatchError::Transport(_)));
}

#[test]
fn test_empty_input_sends_nothing() {
    let mock = MockTransport::new();
    let report = dispatcher(&mock).bulk_create_nodes(Vec::new()).unwrap();
    assert!(report.outcomes.is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_custom_settings() {
    let mock = MockTransport::new();
    let settings = BulkSettings {
        shard_count: 3,
        parallel_threshold: 10,
    };
    let report = BulkDispatcher::new(&mock, settings)
        .bulk_create(&node_names(10), &Attributes::new())
        .unwrap();
    assert_eq!(mock.call_count(), 3);
    assert_eq!(report.outcomes.len(), 10);
}
