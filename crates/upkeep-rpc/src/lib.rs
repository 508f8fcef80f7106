// # JSON-RPC Broadcaster
//
// This crate reaches deployed contracts through an Ethereum node's JSON-RPC
// endpoint.
//
// - Read-only calls use `eth_call` against the `latest` block
// - State-changing calls use `eth_sendTransaction`; the node signs with the
//   `from` account, so that account must be unlocked on the node
// - Receipts are polled with `eth_getTransactionReceipt` until mined or the
//   configured timeout elapses
//
// ## Error Mapping
//
// - Transport failures and non-2xx statuses: `Error::Http`
// - JSON-RPC error objects: `Error::Broadcast`, message unchanged
// - Mined with status `0x0`: `Error::Broadcast`
// - Receipt timeout or unreadable responses: `Error::Rpc`
//
// No retries are performed; the caller decides whether to resubmit.

mod error;
mod wire;

pub use error::RpcError;

use alloy_primitives::{B256, Bytes};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use upkeep_core::{Address, Broadcaster, RpcConfig, TxReceipt};
use wire::{CallObject, Request, Response, RpcReceipt};

/// Name reported in broadcaster errors and logs
pub const BROADCASTER_NAME: &str = "json-rpc";

/// Broadcaster backed by an Ethereum JSON-RPC endpoint
pub struct JsonRpcBroadcaster {
    /// Endpoint and timings
    config: RpcConfig,

    /// HTTP client with the configured request timeout
    client: reqwest::Client,

    /// JSON-RPC request id counter
    next_id: AtomicU64,
}

impl std::fmt::Debug for JsonRpcBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Endpoint URLs commonly embed API keys
        f.debug_struct("JsonRpcBroadcaster")
            .field("url", &"<REDACTED>")
            .field("receipt_poll_interval_ms", &self.config.receipt_poll_interval_ms)
            .field("receipt_timeout_secs", &self.config.receipt_timeout_secs)
            .finish()
    }
}

impl JsonRpcBroadcaster {
    /// Create a broadcaster for the configured endpoint
    ///
    /// # Errors
    ///
    /// - `Error::Config`: Invalid configuration
    /// - `Error::Http`: HTTP client could not be built
    pub fn new(config: RpcConfig) -> upkeep_core::Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| upkeep_core::Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Send one JSON-RPC request and return its `result`
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("JSON-RPC #{} {}", id, method);

        let response = self
            .client
            .post(&self.config.url)
            .json(&Request::new(id, method, params))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(RpcError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: Response = response
            .json()
            .await
            .map_err(|e| RpcError::malformed(format!("{} response: {}", method, e)))?;
        response.into_result()
    }

    async fn send_transaction(&self, from: Address, to: Address, data: &[u8]) -> Result<B256, RpcError> {
        let call = CallObject {
            from: Some(from),
            to,
            data: Bytes::copy_from_slice(data),
        };
        let result = self.request("eth_sendTransaction", json!([call])).await?;
        serde_json::from_value(result)
            .map_err(|e| RpcError::malformed(format!("transaction hash: {}", e)))
    }

    /// Wait for the receipt, giving up after the configured timeout
    async fn wait_for_receipt(&self, hash: B256) -> Result<RpcReceipt, RpcError> {
        let deadline = Duration::from_secs(self.config.receipt_timeout_secs);

        tokio::time::timeout(deadline, self.poll_receipt(hash))
            .await
            .map_err(|_| RpcError::ReceiptTimeout {
                hash,
                secs: self.config.receipt_timeout_secs,
            })?
    }

    async fn poll_receipt(&self, hash: B256) -> Result<RpcReceipt, RpcError> {
        let interval = Duration::from_millis(self.config.receipt_poll_interval_ms);

        loop {
            let result = self
                .request("eth_getTransactionReceipt", json!([hash]))
                .await?;
            if !result.is_null() {
                return serde_json::from_value(result)
                    .map_err(|e| RpcError::malformed(format!("receipt: {}", e)));
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[async_trait]
impl Broadcaster for JsonRpcBroadcaster {
    async fn call(&self, to: Address, data: Vec<u8>) -> upkeep_core::Result<Vec<u8>> {
        let call = CallObject {
            from: None,
            to,
            data: data.into(),
        };
        let result = self.request("eth_call", json!([call, "latest"])).await?;
        let output: Bytes = serde_json::from_value(result)
            .map_err(|e| RpcError::malformed(format!("eth_call result: {}", e)))?;
        Ok(output.to_vec())
    }

    async fn send(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
    ) -> upkeep_core::Result<TxReceipt> {
        let hash = self.send_transaction(from, to, &data).await?;
        tracing::info!("Transaction {:?} submitted to {:?}", hash, to);

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.succeeded() {
            tracing::warn!("Transaction {:?} reverted", hash);
            return Err(RpcError::Reverted(hash).into());
        }

        tracing::debug!("Transaction {:?} mined with {} log(s)", hash, receipt.logs.len());
        Ok(receipt.into_receipt())
    }

    fn broadcaster_name(&self) -> &'static str {
        BROADCASTER_NAME
    }
}
