//! Error types for the upkeep admin adapter
//!
//! This module defines all error types used throughout the crate.
//!
//! The first four variants are the version-dispatch taxonomy. Their display
//! strings are matched literally by callers, so they must not change.

use alloy_primitives::Address;
use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message reported by trigger-specific registration paths on older registrars
pub const REGISTRAR_2_1_ONLY: &str = "This function is only supported for KeeperRegistrar2_1";

/// Core error type for the upkeep admin adapter
#[derive(Error, Debug)]
pub enum Error {
    /// The registry reported a typeAndVersion outside the known table
    #[error("Unsupported KeeperRegistry typeAndVersion")]
    UnsupportedRegistryVersion {
        /// The version string the registry reported
        version: String,
    },

    /// The registrar reported a typeAndVersion outside the known table
    #[error("Unsupported KeeperRegistrar typeAndVersion")]
    UnsupportedRegistrarVersion {
        /// The version string the registrar reported
        version: String,
    },

    /// Operation called against a generation that does not implement it
    #[error("{0}")]
    OperationNotSupportedForVersion(String),

    /// Per-trigger registrar configuration requested without a trigger kind
    #[error("'triggerType' must be provided for this typeAndVersion of the KeeperRegistrar")]
    MissingTriggerType,

    /// A cron intermediary was deployed but registering it failed
    ///
    /// The intermediary exists on-chain; pass `cron_upkeep` to
    /// `UpkeepAdmin::register_cron_upkeep` to retry the registration without
    /// deploying another one.
    #[error("Cron upkeep {cron_upkeep} was created but its registration failed: {source}")]
    CronRegistrationFailed {
        /// Intermediary deployed by the cron factory
        cron_upkeep: Address,
        /// Why the registration failed
        source: Box<Error>,
    },

    /// ABI encoding/decoding errors
    #[error("ABI error: {0}")]
    Abi(String),

    /// An expected event was absent from a receipt
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure reported by the broadcaster, passed through unchanged
    #[error("Broadcaster error ({broadcaster}): {message}")]
    Broadcast {
        /// Broadcaster name
        broadcaster: String,
        /// Error message
        message: String,
    },

    /// JSON-RPC level errors
    #[error("RPC error: {0}")]
    Rpc(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an ABI error
    pub fn abi(msg: impl Into<String>) -> Self {
        Self::Abi(msg.into())
    }

    /// Create an "event not found" error
    pub fn event_not_found(msg: impl Into<String>) -> Self {
        Self::EventNotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an RPC error
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a broadcaster error
    pub fn broadcast(broadcaster: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Broadcast {
            broadcaster: broadcaster.into(),
            message: message.into(),
        }
    }

    /// The error raised by trigger-specific registration paths on older registrars
    pub fn registrar_2_1_only() -> Self {
        Self::OperationNotSupportedForVersion(REGISTRAR_2_1_ONLY.to_string())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_messages_are_literal() {
        let registry = Error::UnsupportedRegistryVersion {
            version: "KeeperRegistry 9.9.9".to_string(),
        };
        assert_eq!(registry.to_string(), "Unsupported KeeperRegistry typeAndVersion");

        let registrar = Error::UnsupportedRegistrarVersion {
            version: String::new(),
        };
        assert_eq!(registrar.to_string(), "Unsupported KeeperRegistrar typeAndVersion");

        assert_eq!(
            Error::registrar_2_1_only().to_string(),
            "This function is only supported for KeeperRegistrar2_1"
        );
        assert_eq!(
            Error::MissingTriggerType.to_string(),
            "'triggerType' must be provided for this typeAndVersion of the KeeperRegistrar"
        );
    }

    #[test]
    fn test_cron_registration_failure_names_the_intermediary() {
        let err = Error::CronRegistrationFailed {
            cron_upkeep: Address::repeat_byte(0xcc),
            source: Box::new(Error::event_not_found("no logs")),
        };
        let message = err.to_string();
        assert!(message.to_lowercase().contains(&format!("0x{}", "cc".repeat(20))));
        assert!(message.ends_with("Event not found: no logs"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_broadcast_error_passthrough() {
        let err = Error::broadcast("json-rpc", "insufficient funds for gas");
        assert_eq!(
            err.to_string(),
            "Broadcaster error (json-rpc): insufficient funds for gas"
        );
    }
}
