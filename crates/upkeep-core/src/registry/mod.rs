//! Registry operations
//!
//! Administrative calls have the same signature on every generation and are
//! forwarded unchanged. Upkeep reads differ per generation and are normalized
//! into [`UpkeepRecord`].

pub mod state;

pub use state::{
    OnchainConfigV1_0, OnchainConfigV2_0, OnchainConfigV2_1, RegistryCountersV1_0,
    RegistryCountersV2, RegistryState, RegistryStateParts, StateV1_0, StateV2_0, StateV2_1,
};

use crate::admin::UpkeepAdmin;
use crate::contracts::{
    juels, uint96, KeeperRegistry1_2, KeeperRegistry2_0, KeeperRegistry2_1, KeeperRegistryAdmin,
    UpkeepInfo2_0, UpkeepInfo2_1,
};
use crate::error::{Error, Result};
use crate::traits::TxReceipt;
use crate::version::ProtocolGeneration;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Upkeep details, normalized across generations
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpkeepRecord {
    pub target: Address,
    /// `executeGas` on 1.x and 2.0, `performGas` on 2.1
    pub gas_limit: u32,
    pub check_data: Vec<u8>,
    /// Remaining funds in juels
    pub balance: u128,
    pub admin: Address,
    pub max_valid_blocknumber: u64,
    /// Total juels spent on performs
    pub amount_spent: u128,
    pub paused: bool,
}

impl From<KeeperRegistry1_2::getUpkeepReturn> for UpkeepRecord {
    fn from(r: KeeperRegistry1_2::getUpkeepReturn) -> Self {
        // lastKeeper has no normalized counterpart
        Self {
            target: r.target,
            gas_limit: r.executeGas,
            check_data: r.checkData.to_vec(),
            balance: juels(r.balance),
            admin: r.admin,
            max_valid_blocknumber: r.maxValidBlocknumber,
            amount_spent: juels(r.amountSpent),
            paused: r.paused,
        }
    }
}

impl From<UpkeepInfo2_0> for UpkeepRecord {
    fn from(info: UpkeepInfo2_0) -> Self {
        Self {
            target: info.target,
            gas_limit: info.executeGas,
            check_data: info.checkData.to_vec(),
            balance: juels(info.balance),
            admin: info.admin,
            max_valid_blocknumber: info.maxValidBlocknumber,
            amount_spent: juels(info.amountSpent),
            paused: info.paused,
        }
    }
}

impl From<UpkeepInfo2_1> for UpkeepRecord {
    fn from(info: UpkeepInfo2_1) -> Self {
        Self {
            target: info.target,
            gas_limit: info.performGas,
            check_data: info.checkData.to_vec(),
            balance: juels(info.balance),
            admin: info.admin,
            max_valid_blocknumber: info.maxValidBlocknumber,
            amount_spent: juels(info.amountSpent),
            paused: info.paused,
        }
    }
}

impl UpkeepAdmin {
    /// Add funds to an upkeep
    ///
    /// The registry pulls `amount` juels from the caller, so the caller must
    /// have approved the registry on the funding token beforehand.
    pub async fn add_funds(&self, id: U256, amount: u128) -> Result<TxReceipt> {
        let amount = uint96(amount)?;
        self.submit(
            self.registry_address(),
            KeeperRegistryAdmin::addFundsCall { id, amount },
        )
        .await
    }

    pub async fn pause_upkeep(&self, id: U256) -> Result<TxReceipt> {
        self.submit(self.registry_address(), KeeperRegistryAdmin::pauseUpkeepCall { id })
            .await
    }

    pub async fn unpause_upkeep(&self, id: U256) -> Result<TxReceipt> {
        self.submit(self.registry_address(), KeeperRegistryAdmin::unpauseUpkeepCall { id })
            .await
    }

    pub async fn cancel_upkeep(&self, id: U256) -> Result<TxReceipt> {
        self.submit(self.registry_address(), KeeperRegistryAdmin::cancelUpkeepCall { id })
            .await
    }

    pub async fn set_upkeep_gas_limit(&self, id: U256, gas_limit: u32) -> Result<TxReceipt> {
        self.submit(
            self.registry_address(),
            KeeperRegistryAdmin::setUpkeepGasLimitCall {
                id,
                gasLimit: gas_limit,
            },
        )
        .await
    }

    /// Withdraw a cancelled upkeep's remaining balance
    pub async fn withdraw_funds(&self, id: U256, to: Address) -> Result<TxReceipt> {
        self.submit(
            self.registry_address(),
            KeeperRegistryAdmin::withdrawFundsCall { id, to },
        )
        .await
    }

    /// Propose a new admin; takes effect once accepted
    pub async fn transfer_upkeep_admin(&self, id: U256, proposed: Address) -> Result<TxReceipt> {
        self.submit(
            self.registry_address(),
            KeeperRegistryAdmin::transferUpkeepAdminCall { id, proposed },
        )
        .await
    }

    pub async fn accept_upkeep_admin(&self, id: U256) -> Result<TxReceipt> {
        self.submit(
            self.registry_address(),
            KeeperRegistryAdmin::acceptUpkeepAdminCall { id },
        )
        .await
    }

    /// Minimum balance (in juels) an upkeep needs to stay eligible
    pub async fn get_min_balance_for_upkeep(&self, id: U256) -> Result<u128> {
        let min = self
            .read(
                self.registry_address(),
                KeeperRegistryAdmin::getMinBalanceForUpkeepCall { id },
            )
            .await?;
        Ok(juels(min.minBalance))
    }

    /// Active upkeep IDs in `[start_index, start_index + max_count)`
    ///
    /// A `max_count` of zero returns every ID from `start_index` onwards.
    pub async fn get_active_upkeep_ids(&self, start_index: U256, max_count: U256) -> Result<Vec<U256>> {
        let ids = self
            .read(
                self.registry_address(),
                KeeperRegistryAdmin::getActiveUpkeepIDsCall {
                    startIndex: start_index,
                    maxCount: max_count,
                },
            )
            .await?;
        Ok(ids._0)
    }

    /// Read an upkeep, normalized across generations
    pub async fn get_upkeep(&self, id: U256) -> Result<UpkeepRecord> {
        let registry = self.registry_address();

        Ok(match self.registry_generation() {
            ProtocolGeneration::Gen1_0 => self
                .read(registry, KeeperRegistry1_2::getUpkeepCall { id })
                .await?
                .into(),
            ProtocolGeneration::Gen2_0 => self
                .read(registry, KeeperRegistry2_0::getUpkeepCall { id })
                .await?
                .upkeepInfo
                .into(),
            ProtocolGeneration::Gen2_1 => self
                .read(registry, KeeperRegistry2_1::getUpkeepCall { id })
                .await?
                .upkeepInfo
                .into(),
        })
    }

    /// Upkeep format version used by the registry's transcoder (1.x only)
    pub async fn get_upkeep_transcoder_version(&self) -> Result<u8> {
        match self.registry_generation() {
            ProtocolGeneration::Gen1_0 => Ok(self
                .read(
                    self.registry_address(),
                    KeeperRegistry1_2::upkeepTranscoderVersionCall {},
                )
                .await?
                ._0),
            ProtocolGeneration::Gen2_0 | ProtocolGeneration::Gen2_1 => {
                Err(Error::OperationNotSupportedForVersion(
                    "upkeepTranscoderVersion is only supported for KeeperRegistry 1.x".to_string(),
                ))
            }
        }
    }
}
