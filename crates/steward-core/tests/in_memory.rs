//! End-to-end lifecycle tests against the in-memory gateway.

use std::sync::Arc;

use steward_core::resources::{PolicyAdapter, PolicyModel, ResourceSetAdapter, ResourceSetModel};
use steward_core::{ErrorCode, Lifecycle, LifecycleError, ReconcileSettings};
use steward_gateway::{DynGateway, Tag, TracedGateway};
use steward_gateway_memory::{GatewayOptions, InMemoryGateway};

fn instance(n: usize) -> String {
    format!("arn:aws:ec2:us-east-1:000000000000:instance/i-{n:04}")
}

#[tokio::test]
async fn resource_set_full_lifecycle() {
    let gateway = Arc::new(InMemoryGateway::new());
    let lifecycle = Lifecycle::new(gateway.clone(), ResourceSetAdapter);

    let desired = ResourceSetModel::new("web")
        .with_resources((0..3).map(instance))
        .with_tags(vec![Tag::new("env", "dev")]);
    let created = lifecycle.create(&desired).await.expect("create");
    let arn = created.arn.clone().expect("arn");
    assert!(arn.starts_with("arn:aws:fms:us-east-1:000000000000:resource-set/"));

    let desired = ResourceSetModel {
        resources: Some((2..5).map(instance).collect()),
        tags: Some(vec![Tag::new("env", "prod"), Tag::new("team", "edge")]),
        ..created.clone()
    };
    lifecycle
        .update(&desired, Some(&created))
        .await
        .expect("update");

    let read = lifecycle.read(&created).await.expect("read");
    assert_eq!(read.resources, Some((2..5).map(instance).collect()));
    assert_eq!(
        read.tags,
        Some(vec![Tag::new("env", "prod"), Tag::new("team", "edge")])
    );

    lifecycle.delete(&read).await.expect("delete");
    let err = lifecycle.read(&created).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(gateway.parent_count(), 0);
}

#[tokio::test]
async fn large_membership_is_chunked_under_the_remote_limit() {
    let gateway: DynGateway = Arc::new(TracedGateway::new(InMemoryGateway::new()));
    let lifecycle = Lifecycle::new(gateway, ResourceSetAdapter);

    let desired = ResourceSetModel::new("fleet").with_resources((0..250).map(instance));
    let created = lifecycle.create(&desired).await.expect("create");

    let read = lifecycle.read(&created).await.expect("read");
    assert_eq!(read.resources.map(|r| r.len()), Some(250));
}

#[tokio::test]
async fn batch_size_above_remote_limit_fails_create_and_compensates() {
    let gateway = Arc::new(InMemoryGateway::with_options(
        GatewayOptions::default().with_max_batch_items(10),
    ));
    let settings = ReconcileSettings::default().with_membership_batch_size(50);
    let lifecycle = Lifecycle::with_settings(gateway.clone(), ResourceSetAdapter, settings);

    let desired = ResourceSetModel::new("fleet").with_resources((0..20).map(instance));
    let err = lifecycle.create(&desired).await.unwrap_err();

    let LifecycleError::PostCreateReconciliation { source, .. } = err else {
        panic!("expected post-create failure");
    };
    assert_eq!(source.code(), ErrorCode::ServiceLimitExceeded);
    assert_eq!(gateway.parent_count(), 0);
}

#[tokio::test]
async fn invalid_member_uri_is_reported_as_partial_failure() {
    let gateway = Arc::new(InMemoryGateway::new());
    let lifecycle = Lifecycle::new(gateway.clone(), ResourceSetAdapter);

    let created = lifecycle
        .create(&ResourceSetModel::new("web"))
        .await
        .expect("create");
    let desired = ResourceSetModel {
        resources: Some(vec![instance(1), "not-an-arn".to_string()]),
        ..created.clone()
    };
    let err = lifecycle.update(&desired, None).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::PartialFailure);
    assert!(err.to_string().contains("not-an-arn"));

    let read = lifecycle.read(&created).await.expect("read");
    assert_eq!(read.resources, Some(vec![instance(1)]));
}

#[tokio::test]
async fn duplicate_names_are_rejected() {
    let gateway = Arc::new(InMemoryGateway::new());
    let lifecycle = Lifecycle::new(gateway, PolicyAdapter);
    let desired = PolicyModel::new("baseline", "AWS::EC2::Instance");

    lifecycle.create(&desired).await.expect("first create");
    let err = lifecycle.create(&desired).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn policy_and_resource_set_lists_are_separate() {
    let gateway: DynGateway = Arc::new(InMemoryGateway::new());
    let settings = ReconcileSettings::default().with_list_page_size(1);
    let policies = Lifecycle::with_settings(gateway.clone(), PolicyAdapter, settings);
    let sets = Lifecycle::new(gateway, ResourceSetAdapter);

    for name in ["c", "a", "b"] {
        policies
            .create(&PolicyModel::new(name, "AWS::EC2::Instance"))
            .await
            .expect("create policy");
    }
    sets.create(&ResourceSetModel::new("web"))
        .await
        .expect("create set");

    let listed = policies.list().await.expect("list policies");
    let names: Vec<_> = listed.iter().map(|p| p.policy_name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(sets.list().await.expect("list sets").len(), 1);
}

#[tokio::test]
async fn snapshot_restores_every_parent() {
    let gateway = Arc::new(InMemoryGateway::new());
    let lifecycle = Lifecycle::new(gateway.clone(), ResourceSetAdapter);
    let created = lifecycle
        .create(
            &ResourceSetModel::new("web")
                .with_resources([instance(7)])
                .with_tags(vec![Tag::new("env", "prod")]),
        )
        .await
        .expect("create");

    let restored = Arc::new(InMemoryGateway::from_snapshot(
        gateway.snapshot(),
        GatewayOptions::default(),
    ));
    let lifecycle = Lifecycle::new(restored, ResourceSetAdapter);

    let read = lifecycle.read(&created).await.expect("read");
    assert_eq!(read.resources, Some(vec![instance(7)]));
    assert_eq!(read.tags, Some(vec![Tag::new("env", "prod")]));
}
