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

//! Subscription lifecycle managers.
//!
//! A subscription object is built once from a [`SubscriptionDescriptor`]
//! and stays reusable for the whole program: each native subscribe cycle
//! runs the arm/listen/end machine of its event feed, and consumers attach
//! to the current cycle through [`FeedSubscription::events`]. The two
//! variants differ only in the native glue; everything they emit is
//! normalized to the same event shapes.

mod descriptor;
mod event;
mod legacy;
mod unified;

pub use descriptor::SubscriptionDescriptor;
pub use event::{RawSubscriptionEvent, SubscriptionEvent};
pub use legacy::LegacySubscription;
pub use unified::UnifiedSubscription;

use crate::stream::SubscriptionStream;
use async_trait::async_trait;

/// Consumer-facing contract shared by both subscription variants.
#[async_trait]
pub trait FeedSubscription: Send + Sync {
    /// The immutable wire parameters this subscription was built with.
    fn descriptor(&self) -> &SubscriptionDescriptor;

    /// Attaches a consumer to the current cycle's event stream.
    async fn events(&self) -> SubscriptionStream;
}
