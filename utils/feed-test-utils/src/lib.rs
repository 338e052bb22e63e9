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

//! Scripted transport doubles for the workspace test suites.
//!
//! Each double implements one of the `feedlink` transport boundaries,
//! records every command it receives, and exposes `emit_*` drivers that
//! push native callbacks through whatever listeners are currently
//! registered. Tests script a session the way the real SDK threads would
//! deliver it and assert on the canonical streams coming out the other
//! side.

use std::sync::Once;

mod legacy;
mod unified;

pub use legacy::ScriptedLegacyTransport;
pub use unified::{ScriptedUnifiedHandle, ScriptedUnifiedTransport};

static TRACING_SETUP: Once = Once::new();

/// One-time `tracing` initialization for test binaries.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. The filter honors `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    TRACING_SETUP.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
