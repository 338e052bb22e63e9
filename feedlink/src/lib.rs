/********************************************************************************
 * Copyright (c) 2026 Contributors to the Feedlink project
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! # feedlink
//!
//! `feedlink` adapts two generations of push-feed SDKs behind one
//! asynchronous client surface. Both the modern streaming stack and the
//! legacy HTTP stack are driven through transport trait objects and
//! translated into the same canonical vocabulary: one multicast status
//! stream per connection, one multicast event stream per subscription, and
//! one normalized field-update record feeding typed mapping.
//!
//! Typical usage is API-first and centered on [`FeedConnection`] and
//! [`FeedSubscription`]. Commands never return outcomes; everything,
//! including terminal errors, arrives on the streams.
//!
//! ## Connection status
//!
//! A status consumer first receives the state current at attach time, then
//! every transition in native callback order. Scripted transports stand in
//! for the native SDKs here; production code implements the same traits
//! over the real clients.
//!
//! ```
//! use std::sync::Arc;
//! use feedlink::{ConnectDetails, ConnectionState, FeedConnection, UnifiedFeedClient};
//! use feed_test_utils::ScriptedUnifiedTransport;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = Arc::new(ScriptedUnifiedTransport::new());
//! let client = UnifiedFeedClient::new(transport.clone());
//! let mut status = client.status_stream().await;
//!
//! client
//!     .connect(ConnectDetails::new("http://push.example.com", "DEMO"))
//!     .await;
//! transport.emit_status("CONNECTED:STREAM-SENSING").await;
//! transport.emit_status("CONNECTED:WS-STREAMING").await;
//!
//! assert_eq!(status.next().await, Some(Ok(ConnectionState::Disconnected)));
//! assert_eq!(status.next().await, Some(Ok(ConnectionState::Connecting)));
//! assert_eq!(status.next().await, Some(Ok(ConnectionState::StreamSensing)));
//! assert_eq!(status.next().await, Some(Ok(ConnectionState::WsStreaming)));
//! # });
//! ```
//!
//! ## Subscriptions
//!
//! A subscription object is built once and survives unsubscribe; every
//! subscribe starts a fresh event cycle of lifecycle and data events.
//!
//! ```
//! use std::sync::Arc;
//! use feedlink::{
//!     FeedConnection, FeedSubscription, SubscriptionDescriptor, SubscriptionMode,
//!     UnifiedFeedClient, UnifiedSubscription,
//! };
//! use feed_test_utils::ScriptedUnifiedTransport;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = Arc::new(ScriptedUnifiedTransport::new());
//! let client = UnifiedFeedClient::new(transport.clone());
//!
//! let descriptor = SubscriptionDescriptor::new(
//!     SubscriptionMode::Merge,
//!     "QUOTE_ADAPTER",
//!     ["item1"],
//!     ["stock_name", "last_price"],
//!     true,
//! );
//! let subscription = Arc::new(UnifiedSubscription::new(descriptor));
//! let mut events = subscription.events().await;
//!
//! client.subscribe(Arc::clone(&subscription)).await;
//! transport.emit_subscribed(0).await;
//!
//! let entered = events.next().await.unwrap().unwrap();
//! assert!(entered.is_lifecycle() && entered.subscribed());
//! assert_eq!(client.subscription_count().await, 1);
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Taxonomy: canonical states, modes, and error-code classification
//! - Streams: replaying status multicast and resettable subscription multicast
//! - Transport: native SDK boundary traits for both variants
//! - Subscription: per-subscription lifecycle managers and event shapes
//! - Connection: the two clients sharing the [`FeedConnection`] contract
//! - Mapping: normalized updates, decode helpers, typed streams
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events. Library code emits events
//! and does not unconditionally initialize a global subscriber; binaries
//! and tests own one-time `tracing_subscriber` initialization at process
//! boundaries.

mod connection;
pub use connection::{FeedConnection, LegacyFeedClient, UnifiedFeedClient};

mod error;
pub use error::{ConnectionError, FieldParseWarning, SubscriptionError};

pub mod mapping;
pub use mapping::{FieldChange, FieldMapper, RawFieldUpdate, TypedStream};

mod stream;
pub use stream::{StatusStream, SubscriptionStream};

mod subscription;
pub use subscription::{
    FeedSubscription, LegacySubscription, RawSubscriptionEvent, SubscriptionDescriptor,
    SubscriptionEvent, UnifiedSubscription,
};

mod taxonomy;
pub use taxonomy::{ConnectionState, ServerErrorKind, SubscriptionErrorKind, SubscriptionMode};

pub mod transport;
pub use transport::{ConnectDetails, TransportFailure};
