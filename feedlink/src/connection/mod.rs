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

//! Connection managers.
//!
//! A client owns exactly one native transport, translates its callback
//! surface into the canonical status stream, and tracks which
//! subscriptions are currently live. Commands are fire-and-forget; every
//! outcome, including failures, is observed through the streams.

mod legacy;
mod registry;
mod unified;

pub use legacy::LegacyFeedClient;
pub use unified::UnifiedFeedClient;

pub(crate) use registry::SubscriptionRegistry;

use crate::stream::StatusStream;
use crate::subscription::FeedSubscription;
use crate::taxonomy::ConnectionState;
use crate::transport::ConnectDetails;
use async_trait::async_trait;
use std::sync::Arc;

/// Client contract shared by both transport variants.
#[async_trait]
pub trait FeedConnection: Send + Sync {
    /// The subscription variant this client manages.
    type Subscription: FeedSubscription;

    /// Starts a session. Fire-and-forget; the outcome arrives on the
    /// status stream.
    async fn connect(&self, details: ConnectDetails);

    /// Passthrough to the native disconnect. `Disconnected` is emitted by
    /// the native close callback, never synthesized here.
    async fn disconnect(&self);

    /// Attaches a status consumer; the current state is replayed first.
    async fn status_stream(&self) -> StatusStream;

    /// The current canonical state, read directly.
    async fn current_state(&self) -> ConnectionState;

    /// Starts the subscription's next event cycle and forwards it to the
    /// native layer. Fire-and-forget; outcomes arrive on the
    /// subscription's event stream.
    async fn subscribe(&self, subscription: Arc<Self::Subscription>);

    /// Tears the subscription down at the native layer. A subscription
    /// that is not currently registered is a no-op.
    async fn unsubscribe(&self, subscription: &Arc<Self::Subscription>);

    /// Number of subscriptions currently believed active.
    async fn subscription_count(&self) -> usize;

    /// Positional diagnostic lookup into the live set.
    async fn subscription_at(&self, index: usize) -> Option<Arc<Self::Subscription>>;
}
