// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Chainfeed

//! Failure taxonomy for gateway operations.
//!
//! The client never recovers from a failure locally; every error is surfaced
//! to the caller as a typed value so the calling view can render it (inline
//! message, disabled control, toast). Reads are idempotent and safe to retry
//! by re-invoking; creation and revocation may require de-duplication by the
//! backend.

use reqwest::StatusCode;

/// Errors that can occur while talking to the Chainfeed backend.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network unreachable, connection refused, or timeout.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Non-2xx status with no more specific mapping.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Backend rejected the identity proof (401/403).
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Request was malformed (400), e.g. an empty key name.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The referenced resource is unknown to the backend (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The payment transaction could not be matched or validated on-chain.
    #[error("payment verification failed: {0}")]
    Verification(String),

    /// A 2xx response body failed to decode.
    #[error("response was invalid: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Map a non-2xx status to the taxonomy.
    ///
    /// `context` names the operation for the error message; `body` is the raw
    /// response body, passed through verbatim since the backend puts its
    /// human-readable detail there.
    pub(crate) fn from_status(status: StatusCode, body: String, context: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("{context} returned {status}")
        } else {
            format!("{context} returned {status}: {body}")
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth(message),
            StatusCode::BAD_REQUEST => GatewayError::Validation(message),
            StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            _ => GatewayError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Map a non-2xx status from the payment verification endpoint.
    ///
    /// Any 4xx other than 401/403 means the backend looked at the chain and
    /// could not match the transaction, so those collapse into
    /// [`GatewayError::Verification`] rather than the generic mapping.
    pub(crate) fn from_verify_status(status: StatusCode, body: String, context: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::from_status(status, body, context)
            }
            s if s.is_client_error() => {
                let message = if body.trim().is_empty() {
                    format!("{context} returned {s}")
                } else {
                    body
                };
                GatewayError::Verification(message)
            }
            s => Self::from_status(s, body, context),
        }
    }

    /// Map a reqwest transport-level failure.
    pub(crate) fn from_transport(err: reqwest::Error, context: &str) -> Self {
        GatewayError::Transport(format!("{context} failed: {err}"))
    }

    /// True if re-invoking the operation could plausibly succeed without any
    /// backend state change in between.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport(_)
                | GatewayError::Server {
                    status: 500..=599,
                    ..
                }
        )
    }
}
