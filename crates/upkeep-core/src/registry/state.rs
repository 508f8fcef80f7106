// # Registry aggregate state
//
// `getState()` returns a different tuple per generation:
//
// - 1.x: (State, Config, keepers)
// - 2.0: (State, OnchainConfig, signers, transmitters, f)
// - 2.1: (State, OnchainConfig, signers, transmitters, f), with a wider config
//
// The result is a tagged union holding exactly one generation's payload.

use crate::admin::{self, UpkeepAdmin};
use crate::contracts::{
    juels, Config1_2, KeeperRegistry1_2, KeeperRegistry2_0, KeeperRegistry2_1,
    OnchainConfig2_0, OnchainConfig2_1, State1_2, State2_0,
};
use crate::error::{Error, Result};
use crate::traits::Broadcaster;
use crate::version::ProtocolGeneration;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

/// 1.x registry counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryCountersV1_0 {
    pub nonce: u32,
    pub owner_link_balance: u128,
    pub expected_link_balance: U256,
    pub num_upkeeps: U256,
}

/// 1.x registry config
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnchainConfigV1_0 {
    pub payment_premium_ppb: u32,
    pub flat_fee_micro_link: u32,
    pub block_count_per_turn: u32,
    pub check_gas_limit: u32,
    pub staleness_seconds: u32,
    pub gas_ceiling_multiplier: u16,
    pub min_upkeep_spend: u128,
    pub max_perform_gas: u32,
    pub fallback_gas_price: U256,
    pub fallback_link_price: U256,
    pub transcoder: Address,
    pub registrar: Address,
}

/// 2.0 and 2.1 registry counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryCountersV2 {
    pub nonce: u32,
    pub owner_link_balance: u128,
    pub expected_link_balance: U256,
    pub total_premium: u128,
    pub num_upkeeps: U256,
    pub config_count: u32,
    pub latest_config_block_number: u32,
    pub latest_config_digest: B256,
    pub latest_epoch: u32,
    pub paused: bool,
}

/// 2.0 registry config
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnchainConfigV2_0 {
    pub payment_premium_ppb: u32,
    pub flat_fee_micro_link: u32,
    pub check_gas_limit: u32,
    pub staleness_seconds: u32,
    pub gas_ceiling_multiplier: u16,
    pub min_upkeep_spend: u128,
    pub max_perform_gas: u32,
    pub max_check_data_size: u32,
    pub max_perform_data_size: u32,
    pub fallback_gas_price: U256,
    pub fallback_link_price: U256,
    pub transcoder: Address,
    pub registrar: Address,
}

/// 2.1 registry config
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnchainConfigV2_1 {
    pub payment_premium_ppb: u32,
    pub flat_fee_micro_link: u32,
    pub check_gas_limit: u32,
    pub staleness_seconds: u32,
    pub gas_ceiling_multiplier: u16,
    pub min_upkeep_spend: u128,
    pub max_perform_gas: u32,
    pub max_check_data_size: u32,
    pub max_perform_data_size: u32,
    pub max_revert_data_size: u32,
    pub fallback_gas_price: U256,
    pub fallback_link_price: U256,
    pub transcoder: Address,
    pub registrars: Vec<Address>,
    pub upkeep_privilege_manager: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateV1_0 {
    pub state: RegistryCountersV1_0,
    pub config: OnchainConfigV1_0,
    pub keepers: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateV2_0 {
    pub state: RegistryCountersV2,
    pub config: OnchainConfigV2_0,
    pub signers: Vec<Address>,
    pub transmitters: Vec<Address>,
    /// Fault-tolerance threshold
    pub f: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateV2_1 {
    pub state: RegistryCountersV2,
    pub config: OnchainConfigV2_1,
    pub signers: Vec<Address>,
    pub transmitters: Vec<Address>,
    /// Fault-tolerance threshold
    pub f: u8,
}

/// Aggregate registry state; exactly one generation's payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "generation", content = "state")]
pub enum RegistryState {
    V1_0(StateV1_0),
    V2_0(StateV2_0),
    V2_1(StateV2_1),
}

/// Flattened view with every generation's slot present
///
/// The slot matching the resolved generation is populated; the others hold
/// their zero values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryStateParts {
    pub state_v1_0: StateV1_0,
    pub state_v2_0: StateV2_0,
    pub state_v2_1: StateV2_1,
}

impl RegistryState {
    /// Generation this state was read from
    pub fn generation(&self) -> ProtocolGeneration {
        match self {
            RegistryState::V1_0(_) => ProtocolGeneration::Gen1_0,
            RegistryState::V2_0(_) => ProtocolGeneration::Gen2_0,
            RegistryState::V2_1(_) => ProtocolGeneration::Gen2_1,
        }
    }

    /// Registrar address from the on-chain config
    ///
    /// 2.1 registries list several registrars; the first one is used.
    pub fn registrar(&self) -> Result<Address> {
        match self {
            RegistryState::V1_0(s) => Ok(s.config.registrar),
            RegistryState::V2_0(s) => Ok(s.config.registrar),
            RegistryState::V2_1(s) => s
                .config
                .registrars
                .first()
                .copied()
                .ok_or_else(|| Error::config("Registry config lists no registrars")),
        }
    }

    /// Expand into the flattened, zero-filled view
    pub fn into_parts(self) -> RegistryStateParts {
        let mut parts = RegistryStateParts::default();
        match self {
            RegistryState::V1_0(s) => parts.state_v1_0 = s,
            RegistryState::V2_0(s) => parts.state_v2_0 = s,
            RegistryState::V2_1(s) => parts.state_v2_1 = s,
        }
        parts
    }
}

impl From<State1_2> for RegistryCountersV1_0 {
    fn from(s: State1_2) -> Self {
        Self {
            nonce: s.nonce,
            owner_link_balance: juels(s.ownerLinkBalance),
            expected_link_balance: s.expectedLinkBalance,
            num_upkeeps: s.numUpkeeps,
        }
    }
}

impl From<Config1_2> for OnchainConfigV1_0 {
    fn from(c: Config1_2) -> Self {
        Self {
            payment_premium_ppb: c.paymentPremiumPPB,
            flat_fee_micro_link: c.flatFeeMicroLink,
            block_count_per_turn: c.blockCountPerTurn.to::<u32>(),
            check_gas_limit: c.checkGasLimit,
            staleness_seconds: c.stalenessSeconds.to::<u32>(),
            gas_ceiling_multiplier: c.gasCeilingMultiplier,
            min_upkeep_spend: juels(c.minUpkeepSpend),
            max_perform_gas: c.maxPerformGas,
            fallback_gas_price: c.fallbackGasPrice,
            fallback_link_price: c.fallbackLinkPrice,
            transcoder: c.transcoder,
            registrar: c.registrar,
        }
    }
}

impl From<State2_0> for RegistryCountersV2 {
    fn from(s: State2_0) -> Self {
        Self {
            nonce: s.nonce,
            owner_link_balance: juels(s.ownerLinkBalance),
            expected_link_balance: s.expectedLinkBalance,
            total_premium: juels(s.totalPremium),
            num_upkeeps: s.numUpkeeps,
            config_count: s.configCount,
            latest_config_block_number: s.latestConfigBlockNumber,
            latest_config_digest: s.latestConfigDigest,
            latest_epoch: s.latestEpoch,
            paused: s.paused,
        }
    }
}

impl From<OnchainConfig2_0> for OnchainConfigV2_0 {
    fn from(c: OnchainConfig2_0) -> Self {
        Self {
            payment_premium_ppb: c.paymentPremiumPPB,
            flat_fee_micro_link: c.flatFeeMicroLink,
            check_gas_limit: c.checkGasLimit,
            staleness_seconds: c.stalenessSeconds.to::<u32>(),
            gas_ceiling_multiplier: c.gasCeilingMultiplier,
            min_upkeep_spend: juels(c.minUpkeepSpend),
            max_perform_gas: c.maxPerformGas,
            max_check_data_size: c.maxCheckDataSize,
            max_perform_data_size: c.maxPerformDataSize,
            fallback_gas_price: c.fallbackGasPrice,
            fallback_link_price: c.fallbackLinkPrice,
            transcoder: c.transcoder,
            registrar: c.registrar,
        }
    }
}

impl From<OnchainConfig2_1> for OnchainConfigV2_1 {
    fn from(c: OnchainConfig2_1) -> Self {
        Self {
            payment_premium_ppb: c.paymentPremiumPPB,
            flat_fee_micro_link: c.flatFeeMicroLink,
            check_gas_limit: c.checkGasLimit,
            staleness_seconds: c.stalenessSeconds.to::<u32>(),
            gas_ceiling_multiplier: c.gasCeilingMultiplier,
            min_upkeep_spend: juels(c.minUpkeepSpend),
            max_perform_gas: c.maxPerformGas,
            max_check_data_size: c.maxCheckDataSize,
            max_perform_data_size: c.maxPerformDataSize,
            max_revert_data_size: c.maxRevertDataSize,
            fallback_gas_price: c.fallbackGasPrice,
            fallback_link_price: c.fallbackLinkPrice,
            transcoder: c.transcoder,
            registrars: c.registrars,
            upkeep_privilege_manager: c.upkeepPrivilegeManager,
        }
    }
}

impl From<KeeperRegistry1_2::getStateReturn> for StateV1_0 {
    fn from(r: KeeperRegistry1_2::getStateReturn) -> Self {
        Self {
            state: r.state.into(),
            config: r.config.into(),
            keepers: r.keepers,
        }
    }
}

impl From<KeeperRegistry2_0::getStateReturn> for StateV2_0 {
    fn from(r: KeeperRegistry2_0::getStateReturn) -> Self {
        Self {
            state: r.state.into(),
            config: r.config.into(),
            signers: r.signers,
            transmitters: r.transmitters,
            f: r.f,
        }
    }
}

impl From<KeeperRegistry2_1::getStateReturn> for StateV2_1 {
    fn from(r: KeeperRegistry2_1::getStateReturn) -> Self {
        Self {
            state: r.state.into(),
            config: r.config.into(),
            signers: r.signers,
            transmitters: r.transmitters,
            f: r.f,
        }
    }
}

/// Decode raw `getState()` return data for a generation
pub fn decode_state(generation: ProtocolGeneration, raw: &[u8]) -> Result<RegistryState> {
    let abi_err =
        |e: alloy_sol_types::Error| Error::abi(format!("decoding getState() result: {}", e));

    Ok(match generation {
        ProtocolGeneration::Gen1_0 => RegistryState::V1_0(
            KeeperRegistry1_2::getStateCall::abi_decode_returns(raw, true)
                .map_err(abi_err)?
                .into(),
        ),
        ProtocolGeneration::Gen2_0 => RegistryState::V2_0(
            KeeperRegistry2_0::getStateCall::abi_decode_returns(raw, true)
                .map_err(abi_err)?
                .into(),
        ),
        ProtocolGeneration::Gen2_1 => RegistryState::V2_1(
            KeeperRegistry2_1::getStateCall::abi_decode_returns(raw, true)
                .map_err(abi_err)?
                .into(),
        ),
    })
}

/// Read and decode `getState()` from a registry
pub(crate) async fn fetch_state(
    broadcaster: &dyn Broadcaster,
    registry: Address,
    generation: ProtocolGeneration,
) -> Result<RegistryState> {
    Ok(match generation {
        ProtocolGeneration::Gen1_0 => RegistryState::V1_0(
            admin::read_call(broadcaster, registry, KeeperRegistry1_2::getStateCall {})
                .await?
                .into(),
        ),
        ProtocolGeneration::Gen2_0 => RegistryState::V2_0(
            admin::read_call(broadcaster, registry, KeeperRegistry2_0::getStateCall {})
                .await?
                .into(),
        ),
        ProtocolGeneration::Gen2_1 => RegistryState::V2_1(
            admin::read_call(broadcaster, registry, KeeperRegistry2_1::getStateCall {})
                .await?
                .into(),
        ),
    })
}

impl UpkeepAdmin {
    /// Read the registry's aggregate state
    ///
    /// The returned variant always matches
    /// [`UpkeepAdmin::registry_generation`].
    pub async fn get_state(&self) -> Result<RegistryState> {
        fetch_state(
            self.broadcaster_ref(),
            self.registry_address(),
            self.registry_generation(),
        )
        .await
    }
}
