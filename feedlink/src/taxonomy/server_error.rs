//! Session-level error-code classification.

/// Classified reasons a server refuses or drops a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerErrorKind {
    /// Any negative code: the request was vetoed by backend policy. The
    /// original code is preserved on the error that carries this kind.
    RejectedByPolicy,
    InvalidCredentials,
    UnknownAdapterSet,
    LicensedSessionLimitReached,
    ConfiguredSessionLimitReached,
    ServerLoadLimitReached,
    NewSessionsBlocked,
    StreamingUnavailable,
    ClosedByDestroyRequest,
    ClosedByAdministrator,
    /// Codes 33 and 34.
    UnexpectedServerError,
    UserSessionLimitReached,
    /// Codes 36 through 39.
    UnknownServerIssue,
    ResponseParsingError,
}

impl ServerErrorKind {
    /// Classifies a native session error code.
    ///
    /// Checks run in order: negative codes, aggregate code ranges, then the
    /// per-code table. The aggregate ranges take precedence over any
    /// per-code meaning inside them; that shadowing is a compatibility
    /// contract. Codes outside the table classify to `None`.
    pub fn classify(code: i32) -> Option<ServerErrorKind> {
        match code {
            code if code < 0 => Some(ServerErrorKind::RejectedByPolicy),
            33..=34 => Some(ServerErrorKind::UnexpectedServerError),
            36..=39 => Some(ServerErrorKind::UnknownServerIssue),
            1 => Some(ServerErrorKind::InvalidCredentials),
            2 => Some(ServerErrorKind::UnknownAdapterSet),
            7 => Some(ServerErrorKind::LicensedSessionLimitReached),
            8 => Some(ServerErrorKind::ConfiguredSessionLimitReached),
            9 => Some(ServerErrorKind::ServerLoadLimitReached),
            10 => Some(ServerErrorKind::NewSessionsBlocked),
            11 => Some(ServerErrorKind::StreamingUnavailable),
            31 => Some(ServerErrorKind::ClosedByDestroyRequest),
            32 => Some(ServerErrorKind::ClosedByAdministrator),
            35 => Some(ServerErrorKind::UserSessionLimitReached),
            61 => Some(ServerErrorKind::ResponseParsingError),
            _ => None,
        }
    }
}
