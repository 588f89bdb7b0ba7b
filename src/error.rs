//! Relay error types.
//!
//! [`RelayError`] is the central error type for the relay. None of its
//! variants is ever sent to a client: callers log them and carry on, except
//! for [`RelayError::DuplicateRegistration`] which refuses the offending
//! connection and [`RelayError::Config`] which aborts startup.

use crate::domain::ConnectionId;

/// Why a single fan-out delivery did not reach its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailureReason {
    /// The target's outbound queue is full (slow reader).
    QueueFull,
    /// The target is tearing down and no longer reads its queue.
    Closed,
}

impl std::fmt::Display for DeliveryFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueueFull => f.write_str("outbound queue full"),
            Self::Closed => f.write_str("connection closed"),
        }
    }
}

/// Relay-side error enum.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RelayError {
    /// The connection identity is not (or no longer) registered.
    #[error("unknown session: {0}")]
    UnknownSession(ConnectionId),

    /// A broadcast send to one target failed.
    #[error("delivery to {target} failed: {reason}")]
    DeliveryFailure {
        /// Connection that missed the event.
        target: ConnectionId,
        /// What went wrong.
        reason: DeliveryFailureReason,
    },

    /// The same identity was registered twice without a removal in between.
    #[error("connection {0} is already registered")]
    DuplicateRegistration(ConnectionId),

    /// A client frame could not be decoded.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Invalid startup configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// Returns the stable machine-readable name of this variant, used as a
    /// structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownSession(_) => "unknown_session",
            Self::DeliveryFailure { .. } => "delivery_failure",
            Self::DuplicateRegistration(_) => "duplicate_registration",
            Self::MalformedFrame(_) => "malformed_frame",
            Self::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedFrame(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_failure_message_names_target_and_reason() {
        let target = ConnectionId::new();
        let err = RelayError::DeliveryFailure {
            target,
            reason: DeliveryFailureReason::QueueFull,
        };
        assert_eq!(
            err.to_string(),
            format!("delivery to {target} failed: outbound queue full")
        );
        assert_eq!(err.kind(), "delivery_failure");
    }

    #[test]
    fn json_errors_become_malformed_frames() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let Err(json_err) = parse else {
            return;
        };
        let err = RelayError::from(json_err);
        assert_eq!(err.kind(), "malformed_frame");
    }
}
