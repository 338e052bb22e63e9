//! Subscription-level error-code classification.

/// Classified reasons an adapter rejects a subscribe or unsubscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionErrorKind {
    /// Any negative code: the request was refused by a metadata adapter
    /// decision. The original code is preserved on the error that carries
    /// this kind.
    RequestRejected,
    UnknownDataAdapter,
    SessionInterrupted,
    UnknownGroup,
    GroupIncompatibleWithSchema,
    UnknownSchema,
    ModeNotAllowedForItem,
    UnknownSelector,
    UnfilteredDispatchForbidden,
    UnfilteredDispatchUnsupported,
    UnfilteredDispatchRestricted,
    RawModeRestricted,
    SubscriptionRestricted,
}

impl SubscriptionErrorKind {
    /// Classifies a native subscription error code.
    ///
    /// Negative codes are checked first, then the per-code table. Unlike the
    /// session-side classification there are no aggregate ranges here. Codes
    /// outside the table classify to `None`.
    pub fn classify(code: i32) -> Option<SubscriptionErrorKind> {
        match code {
            code if code < 0 => Some(SubscriptionErrorKind::RequestRejected),
            17 => Some(SubscriptionErrorKind::UnknownDataAdapter),
            20 => Some(SubscriptionErrorKind::SessionInterrupted),
            21 => Some(SubscriptionErrorKind::UnknownGroup),
            22 => Some(SubscriptionErrorKind::GroupIncompatibleWithSchema),
            23 => Some(SubscriptionErrorKind::UnknownSchema),
            24 => Some(SubscriptionErrorKind::ModeNotAllowedForItem),
            25 => Some(SubscriptionErrorKind::UnknownSelector),
            26 => Some(SubscriptionErrorKind::UnfilteredDispatchForbidden),
            27 => Some(SubscriptionErrorKind::UnfilteredDispatchUnsupported),
            28 => Some(SubscriptionErrorKind::UnfilteredDispatchRestricted),
            29 => Some(SubscriptionErrorKind::RawModeRestricted),
            30 => Some(SubscriptionErrorKind::SubscriptionRestricted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubscriptionErrorKind;

    #[test]
    fn negative_codes_classify_as_request_rejection() {
        for code in [-1, -20, -999] {
            assert_eq!(
                SubscriptionErrorKind::classify(code),
                Some(SubscriptionErrorKind::RequestRejected)
            );
        }
    }

    #[test]
    fn per_code_table_matches() {
        let expected = [
            (17, SubscriptionErrorKind::UnknownDataAdapter),
            (20, SubscriptionErrorKind::SessionInterrupted),
            (21, SubscriptionErrorKind::UnknownGroup),
            (22, SubscriptionErrorKind::GroupIncompatibleWithSchema),
            (23, SubscriptionErrorKind::UnknownSchema),
            (24, SubscriptionErrorKind::ModeNotAllowedForItem),
            (25, SubscriptionErrorKind::UnknownSelector),
            (26, SubscriptionErrorKind::UnfilteredDispatchForbidden),
            (27, SubscriptionErrorKind::UnfilteredDispatchUnsupported),
            (28, SubscriptionErrorKind::UnfilteredDispatchRestricted),
            (29, SubscriptionErrorKind::RawModeRestricted),
            (30, SubscriptionErrorKind::SubscriptionRestricted),
        ];
        for (code, kind) in expected {
            assert_eq!(SubscriptionErrorKind::classify(code), Some(kind));
        }
    }

    #[test]
    fn unrecognized_codes_classify_to_none() {
        for code in [0, 1, 16, 18, 19, 31, 61, 12345] {
            assert_eq!(SubscriptionErrorKind::classify(code), None);
        }
    }
}
