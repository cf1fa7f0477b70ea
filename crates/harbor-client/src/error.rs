//! Session state machine errors.

use thiserror::Error;

/// Errors returned by [`Session::handle`](crate::Session::handle).
///
/// Server-side rejections (`MaxUsers` and friends) are not errors here; they
/// are surfaced through the session's last-error slot. This type covers
/// caller misuse only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A mutating request (login/logout/send) is already in flight; the
    /// session does not interleave operations against the server.
    #[error("a {pending} request is already in flight")]
    RequestPending {
        /// Wire method name of the outstanding request.
        pending: &'static str,
    },
}
