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

//! Static-file connection profile.
//!
//! A JSON profile names the transport variant to use and the session
//! coordinates to connect with. Loading resolves it into a validated
//! [`FeedProfile`]; the caller picks the matching `feedlink` client from
//! the `transport` selection.
//!
//! ```
//! use feed_profile_file::{FeedProfileFile, TransportSelection};
//!
//! let profile = FeedProfileFile::new("static-configs/profile.json")
//!     .load()
//!     .expect("bundled profile loads");
//!
//! assert_eq!(profile.transport, TransportSelection::Unified);
//! assert_eq!(profile.connect.host, "http://push.example.com");
//! ```

use feedlink::ConnectDetails;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

const PROFILE_TAG: &str = "FeedProfileFile:";

/// Which client variant the profile selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportSelection {
    Unified,
    Legacy,
}

/// A resolved, validated connection profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedProfile {
    pub transport: TransportSelection,
    pub connect: ConnectDetails,
}

/// Why a profile could not be resolved.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile file {path:?} not found")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("profile file {path:?} could not be read")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("profile file {path:?} is not a valid profile")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown transport label {label:?}, expected \"unified\" or \"legacy\"")]
    UnknownTransport { label: String },
    #[error("profile field {field:?} must not be empty")]
    EmptyField { field: &'static str },
    #[error("user and password must be given together")]
    IncompleteCredentials,
}

/// Loader bound to one profile path.
pub struct FeedProfileFile {
    path: PathBuf,
}

impl FeedProfileFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads, parses and validates the profile.
    pub fn load(&self) -> Result<FeedProfile, ProfileError> {
        let path = fs::canonicalize(&self.path).map_err(|source| ProfileError::NotFound {
            path: self.path.clone(),
            source,
        })?;
        debug!("{PROFILE_TAG} reading profile from {path:?}");

        let data = fs::read_to_string(&path).map_err(|source| ProfileError::Unreadable {
            path: path.clone(),
            source,
        })?;

        let raw: RawProfile =
            serde_json::from_str(&data).map_err(|source| ProfileError::Malformed {
                path: path.clone(),
                source,
            })?;

        let profile = raw.resolve()?;
        debug!(
            "{PROFILE_TAG} resolved {:?} profile for host {}",
            profile.transport, profile.connect.host
        );
        Ok(profile)
    }
}

/// Wire shape of the profile JSON, before validation.
#[derive(Deserialize)]
struct RawProfile {
    transport: String,
    host: String,
    adapter_set: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl RawProfile {
    fn resolve(self) -> Result<FeedProfile, ProfileError> {
        let transport = match self.transport.as_str() {
            "unified" => TransportSelection::Unified,
            "legacy" => TransportSelection::Legacy,
            other => {
                return Err(ProfileError::UnknownTransport {
                    label: other.to_owned(),
                })
            }
        };

        if self.host.is_empty() {
            return Err(ProfileError::EmptyField { field: "host" });
        }
        if self.adapter_set.is_empty() {
            return Err(ProfileError::EmptyField {
                field: "adapter_set",
            });
        }

        let connect = ConnectDetails::new(self.host, self.adapter_set);
        let connect = match (self.user, self.password) {
            (Some(user), Some(password)) => connect.with_credentials(user, password),
            (None, None) => connect,
            _ => return Err(ProfileError::IncompleteCredentials),
        };

        Ok(FeedProfile { transport, connect })
    }
}
