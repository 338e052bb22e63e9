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

//! Native SDK boundary.
//!
//! The adaptation layer never talks to a concrete push SDK directly; it
//! drives these trait objects and receives their callbacks. Production code
//! implements them over the real native clients, tests implement them over
//! scripted fakes. Failures cross this boundary raw ([`TransportFailure`]);
//! classification into the canonical taxonomy happens on the adaptation
//! side.

mod legacy;
mod unified;

pub use legacy::{
    LegacyConnectionListener, LegacyFieldState, LegacyItemUpdate, LegacyTableListener,
    LegacyTransport, TableKey,
};
pub use unified::{
    UnifiedItemUpdate, UnifiedStatusListener, UnifiedSubscriptionHandle,
    UnifiedSubscriptionListener, UnifiedTransport,
};

use thiserror::Error;

/// Session coordinates for a connect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectDetails {
    pub host: String,
    pub adapter_set: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectDetails {
    pub fn new(host: impl Into<String>, adapter_set: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            adapter_set: adapter_set.into(),
            user: None,
            password: None,
        }
    }

    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }
}

/// Raw failure reported by a native call, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure (code {code}): {message}")]
pub struct TransportFailure {
    pub code: i32,
    pub message: String,
}

impl TransportFailure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
