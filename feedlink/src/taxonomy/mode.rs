//! Item dispatch modes.

use std::fmt;
use std::fmt::{Display, Formatter};

/// How the push server dispatches updates for the items of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionMode {
    /// Field-level delta dispatch; unchanged fields are not resent.
    Merge,
    /// Every update is delivered whole, in order.
    Distinct,
    /// Unfiltered dispatch, no server-side conflation.
    Raw,
    /// Add/update/delete command semantics over a key field.
    Command,
}

impl SubscriptionMode {
    /// Every dispatch mode.
    pub const ALL: [SubscriptionMode; 4] = [
        SubscriptionMode::Merge,
        SubscriptionMode::Distinct,
        SubscriptionMode::Raw,
        SubscriptionMode::Command,
    ];

    /// The wire label the native clients use for this mode.
    pub fn wire_mode(&self) -> &'static str {
        match self {
            SubscriptionMode::Merge => "MERGE",
            SubscriptionMode::Distinct => "DISTINCT",
            SubscriptionMode::Raw => "RAW",
            SubscriptionMode::Command => "COMMAND",
        }
    }

    /// Maps a native wire label back to its mode; `None` outside the closed
    /// set.
    pub fn from_wire_mode(wire_mode: &str) -> Option<SubscriptionMode> {
        match wire_mode {
            "MERGE" => Some(SubscriptionMode::Merge),
            "DISTINCT" => Some(SubscriptionMode::Distinct),
            "RAW" => Some(SubscriptionMode::Raw),
            "COMMAND" => Some(SubscriptionMode::Command),
            _ => None,
        }
    }
}

impl Display for SubscriptionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_mode())
    }
}
