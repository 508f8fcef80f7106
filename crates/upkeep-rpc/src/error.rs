//! Transport-level errors for the JSON-RPC broadcaster
//!
//! These never escape the crate as-is; the adapter only sees
//! [`upkeep_core::Error`].

use alloy_primitives::B256;
use thiserror::Error;

use crate::BROADCASTER_NAME;

#[derive(Error, Debug)]
pub enum RpcError {
    /// Connection, TLS or timeout failure in the HTTP client
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Node answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Node answered with a JSON-RPC error object
    #[error("{message}")]
    Node { code: i64, message: String },

    /// Response could not be interpreted
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No receipt appeared before the deadline
    #[error("no receipt for transaction {hash:?} after {secs}s")]
    ReceiptTimeout { hash: B256, secs: u64 },

    /// Transaction was mined with a failure status
    #[error("transaction {0:?} reverted")]
    Reverted(B256),
}

impl RpcError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<RpcError> for upkeep_core::Error {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport(_) | RpcError::Status { .. } => Self::http(err.to_string()),
            RpcError::Node { message, .. } => Self::broadcast(BROADCASTER_NAME, message),
            RpcError::Reverted(_) => Self::broadcast(BROADCASTER_NAME, err.to_string()),
            RpcError::Malformed(_) | RpcError::ReceiptTimeout { .. } => {
                Self::rpc(err.to_string())
            }
        }
    }
}
