use feed_test_utils::{ScriptedLegacyTransport, ScriptedUnifiedTransport};
use feedlink::transport::UnifiedItemUpdate;
use feedlink::{
    ConnectDetails, ConnectionState, FeedConnection, FeedSubscription, LegacyFeedClient,
    SubscriptionDescriptor, SubscriptionMode, UnifiedFeedClient, UnifiedSubscription,
};
use std::sync::Arc;

fn details() -> ConnectDetails {
    ConnectDetails::new("http://push.example.com", "DEMO")
}

fn descriptor() -> SubscriptionDescriptor {
    SubscriptionDescriptor::new(
        SubscriptionMode::Merge,
        "QUOTE_ADAPTER",
        ["item1"],
        ["stock_name", "last_price"],
        true,
    )
}

#[tokio::test]
async fn both_variants_report_the_same_canonical_sequence() {
    feed_test_utils::init_tracing();

    let unified_transport = Arc::new(ScriptedUnifiedTransport::new());
    let unified_client = UnifiedFeedClient::new(unified_transport.clone());
    let mut unified_status = unified_client.status_stream().await;

    unified_client.connect(details()).await;
    unified_transport.emit_status("CONNECTING").await;
    unified_transport.emit_status("CONNECTED:STREAM-SENSING").await;
    unified_transport.emit_status("CONNECTED:HTTP-STREAMING").await;

    let legacy_transport = Arc::new(ScriptedLegacyTransport::new());
    let legacy_client = LegacyFeedClient::new(legacy_transport.clone());
    let mut legacy_status = legacy_client.status_stream().await;

    legacy_client.connect(details()).await;
    legacy_transport.emit_connection_established().await;
    legacy_transport.emit_session_started(false).await;

    // The native CONNECTING ack repeats the synthesized state and is
    // suppressed, so both variants produce the identical sequence.
    let expected = [
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::StreamSensing,
        ConnectionState::HttpStreaming,
    ];
    for state in expected {
        assert_eq!(unified_status.next().await, Some(Ok(state)));
        assert_eq!(legacy_status.next().await, Some(Ok(state)));
    }

    assert_eq!(unified_transport.last_details().await, Some(details()));
    assert_eq!(legacy_transport.last_details().await, Some(details()));
}

#[tokio::test]
async fn resubscribing_starts_an_independent_event_cycle() {
    feed_test_utils::init_tracing();

    let transport = Arc::new(ScriptedUnifiedTransport::new());
    let client = UnifiedFeedClient::new(transport.clone());
    let subscription = Arc::new(UnifiedSubscription::new(descriptor()));

    let mut first_cycle = subscription.events().await;
    client.subscribe(Arc::clone(&subscription)).await;
    transport.emit_subscribed(0).await;
    transport
        .emit_update(
            0,
            UnifiedItemUpdate::new("item1").with_field("last_price", Some("3.04"), true),
        )
        .await;
    transport.emit_unsubscribed(0).await;

    let entered = first_cycle.next().await.unwrap().unwrap();
    assert!(entered.is_lifecycle() && entered.subscribed());
    let update = first_cycle.next().await.unwrap().unwrap();
    assert_eq!(
        update.item().unwrap().effective_value("last_price"),
        Some("3.04")
    );
    let left = first_cycle.next().await.unwrap().unwrap();
    assert!(left.is_lifecycle() && !left.subscribed());
    assert_eq!(first_cycle.next().await, None);

    let mut second_cycle = subscription.events().await;
    client.subscribe(Arc::clone(&subscription)).await;
    transport.emit_subscribed(0).await;

    let entered = second_cycle.next().await.unwrap().unwrap();
    assert!(entered.is_lifecycle() && entered.subscribed());

    // Same native handle both times; the finished stream stays finished.
    assert_eq!(transport.handle_count().await, 1);
    assert_eq!(transport.subscribe_calls(), 2);
    assert_eq!(first_cycle.next().await, None);
}

#[tokio::test]
async fn dropping_one_status_consumer_leaves_the_rest_attached() {
    feed_test_utils::init_tracing();

    let transport = Arc::new(ScriptedUnifiedTransport::new());
    let client = UnifiedFeedClient::new(transport.clone());

    let mut kept = client.status_stream().await;
    let dropped = client.status_stream().await;
    drop(dropped);

    client.connect(details()).await;
    transport.emit_status("CONNECTED:WS-STREAMING").await;

    assert_eq!(kept.next().await, Some(Ok(ConnectionState::Disconnected)));
    assert_eq!(kept.next().await, Some(Ok(ConnectionState::Connecting)));
    assert_eq!(kept.next().await, Some(Ok(ConnectionState::WsStreaming)));
    assert_eq!(transport.disconnect_calls(), 0);
}

#[tokio::test]
async fn a_slow_status_consumer_skips_to_the_freshest_states() {
    feed_test_utils::init_tracing();

    let transport = Arc::new(ScriptedUnifiedTransport::new());
    let client = UnifiedFeedClient::with_queue_size(transport.clone(), 2);
    let mut status = client.status_stream().await;

    client.connect(details()).await;
    transport.emit_status("CONNECTED:STREAM-SENSING").await;
    transport.emit_status("CONNECTED:WS-STREAMING").await;
    transport.emit_status("STALLED").await;
    transport.emit_status("CONNECTED:WS-POLLING").await;

    // The replay is delivered out of band. Of the five queued transitions
    // only the freshest two fit the capacity-2 queue; the gap is skipped,
    // not an error.
    assert_eq!(status.next().await, Some(Ok(ConnectionState::Disconnected)));
    assert_eq!(status.next().await, Some(Ok(ConnectionState::Stalled)));
    assert_eq!(status.next().await, Some(Ok(ConnectionState::WsPolling)));
}

#[tokio::test]
async fn a_server_end_then_reconnect_resumes_the_stream() {
    feed_test_utils::init_tracing();

    let transport = Arc::new(ScriptedLegacyTransport::new());
    let client = LegacyFeedClient::new(transport.clone());
    let mut status = client.status_stream().await;

    client.connect(details()).await;
    transport.emit_connection_established().await;
    transport.emit_session_started(true).await;
    transport.emit_end(31).await;
    transport.emit_close().await;

    client.connect(details()).await;
    transport.emit_connection_established().await;

    let expected = [
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::StreamSensing,
        ConnectionState::HttpPolling,
        ConnectionState::WillRetry,
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::StreamSensing,
    ];
    for state in expected {
        assert_eq!(status.next().await, Some(Ok(state)));
    }
    assert_eq!(transport.open_calls(), 2);
}
