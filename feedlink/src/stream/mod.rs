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

//! Multicast primitives behind the canonical streams.
//!
//! Both primitives are thin state machines over `tokio::sync::broadcast`:
//! [`StatusFeed`] adds latest-value replay and transition suppression for
//! connection status, [`SubscriptionFeed`] adds the arm/listen/end cycle
//! that makes single-use native listener registrations reusable.

mod status_feed;
mod subscription_feed;

pub use status_feed::StatusStream;
pub use subscription_feed::SubscriptionStream;

pub(crate) use status_feed::StatusFeed;
pub(crate) use subscription_feed::SubscriptionFeed;

/// Default bound for per-feed broadcast buffers.
pub(crate) const DEFAULT_EVENT_QUEUE_SIZE: usize = 64;
