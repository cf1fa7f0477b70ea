//! Error taxonomy for the Harbor wire protocol.
//!
//! Server-reported errors ([`ErrorResponse`]) are user-correctable and shown
//! inline; they are data, not process failures. [`ProtoError`] covers
//! malformed wire data, which the client drops rather than crashes on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-side rejection codes returned instead of a success payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The channel is at capacity.
    MaxUsers,
    /// The requested user name is not acceptable.
    UsernameInvalid,
    /// The requested user name is taken in this channel.
    UsernameUnavailable,
}

impl ErrorCode {
    /// User-facing message for this code.
    pub fn message(self) -> &'static str {
        match self {
            Self::MaxUsers => "The maximum number of users have already joined the channel.",
            Self::UsernameInvalid => "User name is invalid.",
            Self::UsernameUnavailable => "User name is unavailable.",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Error payload returned by login/logout/send acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Rejection code.
    pub code: ErrorCode,
}

impl ErrorResponse {
    /// Wrap a code in the wire payload shape.
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }
}

/// Wire-level decode/encode failures.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Payload was not valid JSON or did not match any known shape.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Acknowledgement referenced a request id the client never issued.
    #[error("unknown request id: {0}")]
    UnknownRequestId(u64),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_response_wire_shape() {
        let response: ErrorResponse = serde_json::from_str(r#"{"code":"MaxUsers"}"#).unwrap();
        assert_eq!(response.code, ErrorCode::MaxUsers);
    }

    #[test]
    fn every_code_has_a_message() {
        for code in
            [ErrorCode::MaxUsers, ErrorCode::UsernameInvalid, ErrorCode::UsernameUnavailable]
        {
            assert!(!code.message().is_empty());
        }
    }
}
