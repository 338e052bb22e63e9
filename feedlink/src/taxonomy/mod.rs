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

//! Canonical status and error-code vocabulary shared by both transport
//! variants. Pure mapping tables, no state and no I/O.

mod connection_state;
mod mode;
mod server_error;
mod subscription_error;

pub use connection_state::ConnectionState;
pub use mode::SubscriptionMode;
pub use server_error::ServerErrorKind;
pub use subscription_error::SubscriptionErrorKind;
