// # Broadcaster Trait
//
// Defines the interface for reaching deployed contracts.
//
// ## Implementations
//
// - JSON-RPC: `upkeep-rpc` crate
// - Tests: an in-memory chain double in `upkeep-core/tests/common`
//
// ## Usage
//
// ```rust,ignore
// use upkeep_core::Broadcaster;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let broadcaster = /* Broadcaster implementation */;
//
//     // Read-only call
//     let raw = broadcaster.call(registry, calldata).await?;
//
//     // State-changing call; all emitted logs come back in order
//     let receipt = broadcaster.send(from, registry, calldata).await?;
//     println!("{} logs", receipt.logs.len());
//
//     Ok(())
// }
// ```

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A log emitted during a transaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Log {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics; topic 0 is normally the event signature hash
    pub topics: Vec<B256>,
    /// Non-indexed event data
    pub data: Vec<u8>,
}

impl Log {
    /// Create a log with the given topics and data
    pub fn new(address: Address, topics: Vec<B256>, data: Vec<u8>) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }
}

/// Outcome of one atomic state-changing call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub transaction_hash: B256,
    /// Every log emitted by the call, in emission order
    pub logs: Vec<Log>,
}

/// Trait for reaching the registry, registrar and token contracts
///
/// # Atomicity
///
/// [`Broadcaster::send`] executes exactly one transaction. It either
/// completes in full, returning every emitted log, or fails with no partial
/// effect. The adapter never retries; timeouts and cancellation belong to
/// the implementation.
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks. Read-only calls may be
/// issued concurrently with a pending `send`.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Execute a read-only call and return the raw ABI return data
    ///
    /// # Parameters
    ///
    /// - `to`: Contract address
    /// - `data`: Selector-prefixed call data
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, crate::Error>;

    /// Submit one state-changing call and wait for its receipt
    ///
    /// # Parameters
    ///
    /// - `from`: Sending account
    /// - `to`: Contract address
    /// - `data`: Selector-prefixed call data
    ///
    /// # Returns
    ///
    /// - `Ok(TxReceipt)`: The call succeeded; logs are in emission order
    /// - `Err(Error)`: The call failed or reverted with no effect
    async fn send(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
    ) -> Result<TxReceipt, crate::Error>;

    /// Get the broadcaster name (for logging/debugging)
    fn broadcaster_name(&self) -> &'static str;
}
