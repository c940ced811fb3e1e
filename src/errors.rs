use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Error kind that represents failures reported by the [`crate::Client`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client or template was misconfigured (e.g. empty project id,
    /// or [`crate::ServerTemplate::evaluate`] was called with no template loaded).
    Configuration,
    /// A template JSON document could not be parsed or serialized.
    Codec,
    /// The Remote Config endpoint answered with a non-success HTTP status.
    Remote(RemoteErrorCode),
    /// The HTTP round-trip itself failed (connectivity, timeout, cancellation).
    Transport,
}

impl ErrorKind {
    pub(crate) fn event_id(&self) -> u8 {
        match self {
            ErrorKind::Configuration => 100,
            ErrorKind::Codec => 101,
            ErrorKind::Remote(_) => 102,
            ErrorKind::Transport => 103,
        }
    }
}

/// Stable code taxonomy for non-success responses from the Remote Config backend.
///
/// The variants mirror the platform error codes used across the Firebase Admin
/// SDKs, so a [`RemoteErrorCode`] can be matched on regardless of which HTTP
/// status produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteErrorCode {
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    Conflict,
    ResourceExhausted,
    Internal,
    Unavailable,
    DeadlineExceeded,
    Unknown,
}

impl RemoteErrorCode {
    pub(crate) fn from_status(status: u16) -> Self {
        match status {
            400 => RemoteErrorCode::InvalidArgument,
            401 => RemoteErrorCode::Unauthenticated,
            403 => RemoteErrorCode::PermissionDenied,
            404 => RemoteErrorCode::NotFound,
            409 => RemoteErrorCode::Conflict,
            429 => RemoteErrorCode::ResourceExhausted,
            500 => RemoteErrorCode::Internal,
            503 => RemoteErrorCode::Unavailable,
            504 => RemoteErrorCode::DeadlineExceeded,
            _ => RemoteErrorCode::Unknown,
        }
    }

    /// The platform error code tag, e.g. `PERMISSION_DENIED`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            RemoteErrorCode::Unauthenticated => "UNAUTHENTICATED",
            RemoteErrorCode::PermissionDenied => "PERMISSION_DENIED",
            RemoteErrorCode::NotFound => "NOT_FOUND",
            RemoteErrorCode::Conflict => "CONFLICT",
            RemoteErrorCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            RemoteErrorCode::Internal => "INTERNAL",
            RemoteErrorCode::Unavailable => "UNAVAILABLE",
            RemoteErrorCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            RemoteErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl Display for RemoteErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error struct that holds the [`ErrorKind`] and message of the reported failure.
#[derive(Debug, PartialEq)]
pub struct ClientError {
    /// Error kind that represents failures reported by the [`crate::Client`].
    pub kind: ErrorKind,
    /// The text representation of the failure.
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: ErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ClientError {}

#[derive(Error, Debug)]
pub(crate) enum InternalError {
    #[error("JSON parsing failed. ({0})")]
    Parse(String),
    #[error("JSON serialization failed. ({0})")]
    Serialize(String),
}

impl From<InternalError> for ClientError {
    fn from(err: InternalError) -> Self {
        ClientError::new(ErrorKind::Codec, err.to_string())
    }
}
