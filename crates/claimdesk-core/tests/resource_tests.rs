//! Resource layer tests: sentinel returns, error state and fetch triggering.

mod common;

use std::sync::Arc;

use tokio::sync::Semaphore;

use claimdesk_core::entities::Zone;
use claimdesk_core::{AccessToken, Payload, Resource};

use common::{ListFailure, MockApi, token, until, zone};

fn resource(api: MockApi<Zone>) -> Resource<Zone, MockApi<Zone>> {
    Resource::new(api, token())
}

// ============================================================================
// List fetch
// ============================================================================

#[tokio::test]
async fn test_unsuccessful_list_clears_items() {
    let resource = resource(MockApi::new(vec![zone("a", "North")]));
    assert!(resource.fetch_items().await);
    assert_eq!(resource.items().len(), 1);

    resource.api().fail_list(Some(ListFailure::Envelope));
    assert!(!resource.fetch_items().await);

    assert!(resource.items().is_empty());
    assert_eq!(resource.error().as_deref(), Some("Failed to fetch items"));
    assert!(!resource.loading());
}

#[tokio::test]
async fn test_network_failure_keeps_items() {
    let resource = resource(MockApi::new(vec![zone("a", "North")]));
    resource.fetch_items().await;

    resource.api().fail_list(Some(ListFailure::Network));
    assert!(!resource.fetch_items().await);

    assert_eq!(resource.items().len(), 1);
    assert!(resource.error().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_successful_fetch_clears_previous_error() {
    let resource = resource(MockApi::new(vec![zone("a", "North")]));
    resource.api().fail_list(Some(ListFailure::Network));
    resource.fetch_items().await;
    assert!(resource.error().is_some());

    resource.api().fail_list(None);
    resource.fetch_items().await;

    assert_eq!(resource.error(), None);
    assert_eq!(resource.items().len(), 1);
}

#[tokio::test]
async fn test_fetch_without_token_is_noop() {
    let resource = Resource::new(MockApi::new(vec![zone("a", "North")]), None);

    resource.mount().await;
    resource.fetch_items().await;

    assert_eq!(resource.api().list_calls(), 0);
    assert!(resource.items().is_empty());
    assert_eq!(resource.error(), None);
}

#[tokio::test]
async fn test_blank_token_counts_as_missing() {
    let resource = Resource::new(MockApi::<Zone>::new(Vec::new()), Some(AccessToken::new("  ")));

    resource.mount().await;

    assert_eq!(resource.api().list_calls(), 0);
}

// ============================================================================
// Automatic fetch
// ============================================================================

#[tokio::test]
async fn test_mount_fetches_once_per_token() {
    let resource = resource(MockApi::new(vec![zone("a", "North")]));

    resource.mount().await;
    resource.mount().await;
    resource.set_token(token()).await;
    assert_eq!(resource.api().list_calls(), 1);

    resource.set_token(Some(AccessToken::new("other-token"))).await;
    assert_eq!(resource.api().list_calls(), 2);

    resource.set_token(None).await;
    assert_eq!(resource.api().list_calls(), 2);

    resource.set_token(token()).await;
    assert_eq!(resource.api().list_calls(), 3);
}

#[tokio::test]
async fn test_loading_tracks_in_flight_requests() {
    let gate = Arc::new(Semaphore::new(0));
    let resource = Resource::new(
        MockApi::gated(vec![zone("a", "North")], Arc::clone(&gate)),
        token(),
    );
    assert!(!resource.loading());

    let (deleted, ()) = tokio::join!(resource.delete_item("a"), async {
        until(|| resource.loading()).await;
        gate.add_permits(1);
    });

    assert!(deleted);
    assert!(!resource.loading());
}

// ============================================================================
// Single-record operations
// ============================================================================

#[tokio::test]
async fn test_get_item_sets_current_item() {
    let resource = resource(MockApi::new(vec![zone("a", "North")]));

    let item = resource.get_item("a").await.unwrap();

    assert_eq!(item.zone_name.as_deref(), Some("North"));
    assert_eq!(resource.current_item().map(|z| z.uuid), Some("a".to_string()));
}

#[tokio::test]
async fn test_get_missing_item_returns_none() {
    let resource = resource(MockApi::<Zone>::new(Vec::new()));

    assert!(resource.get_item("nope").await.is_none());
    assert_eq!(resource.error().as_deref(), Some("Record nope not found"));
    assert!(resource.current_item().is_none());
}

#[tokio::test]
async fn test_create_refetches_list() {
    let resource = resource(MockApi::<Zone>::new(Vec::new()));

    let created = resource
        .create_item(&Payload::new().field("zone_name", "West"))
        .await
        .unwrap();

    assert_eq!(resource.api().list_calls(), 1);
    assert_eq!(resource.items().len(), 1);
    assert_eq!(resource.current_item().unwrap().uuid, created.uuid);
}

#[tokio::test]
async fn test_create_failure_returns_none() {
    let resource = resource(MockApi::<Zone>::new(Vec::new()));
    resource.api().fail_writes(true);

    let created = resource
        .create_item(&Payload::new().field("zone_name", "West"))
        .await;

    assert!(created.is_none());
    assert!(resource.error().is_some());
    assert_eq!(resource.api().list_calls(), 0);
}

#[tokio::test]
async fn test_operations_without_token_report_missing_token() {
    let resource = Resource::new(MockApi::new(vec![zone("a", "North")]), None);

    assert!(!resource.delete_item("a").await);
    assert_eq!(
        resource.error().as_deref(),
        Some("authentication error: no access token")
    );
    assert!(resource.restore_item("a").await.is_none());
    assert_eq!(resource.api().write_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_delete_and_restore_refetch() {
    let resource = resource(MockApi::new(vec![zone("a", "North")]));

    assert!(resource.delete_item("a").await);
    assert!(resource.items()[0].deleted_at.is_some());

    let restored = resource.restore_item("a").await.unwrap();
    assert_eq!(restored.deleted_at, None);
    assert!(resource.items()[0].deleted_at.is_none());
    assert_eq!(resource.api().list_calls(), 2);
}
