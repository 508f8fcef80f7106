// # Ethereum JSON-RPC wire types
//
// Only the fields the broadcaster reads are modelled. Hex quantities are
// `0x`-prefixed strings; hashes, addresses and data go through
// alloy-primitives' serde support.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use upkeep_core::{Log, TxReceipt};

use crate::error::RpcError;

#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> Request<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorObject {
    pub code: i64,
    pub message: String,
}

impl Response {
    /// Split into the result value or the node's error
    ///
    /// A `null` result is returned as `Value::Null`; receipt polling relies on
    /// it to mean "not yet mined".
    pub fn into_result(self) -> Result<Value, RpcError> {
        match (self.error, self.result) {
            (Some(error), _) => Err(RpcError::Node {
                code: error.code,
                message: error.message,
            }),
            (None, Some(result)) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }
}

/// Call object for `eth_call` and `eth_sendTransaction`
#[derive(Debug, Serialize)]
pub(crate) struct CallObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcReceipt {
    pub transaction_hash: B256,
    /// `0x1` success, `0x0` failure; absent on pre-Byzantium chains
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcLog {
    pub address: Address,
    #[serde(default)]
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
}

impl RpcReceipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0"))
    }

    pub fn into_receipt(self) -> TxReceipt {
        let logs = self
            .logs
            .into_iter()
            .map(|log| Log::new(log.address, log.topics, log.data.to_vec()))
            .collect();

        TxReceipt {
            transaction_hash: self.transaction_hash,
            logs,
        }
    }
}
