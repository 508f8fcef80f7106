//! Test doubles and common utilities for adapter contract tests
//!
//! [`MockChain`] stands in for the registry, registrar, funding token and
//! cron factory. It answers read calls from canned responses, records every
//! submitted transaction, and hands back scripted receipts.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use alloy_primitives::aliases::{U24, U96};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use upkeep_core::contracts::{
    Config1_2, CronUpkeepFactory, ITypeAndVersion, KeeperRegistry1_2, KeeperRegistry2_0,
    KeeperRegistry2_1, OnchainConfig2_0, OnchainConfig2_1, State1_2, State2_0,
};
use upkeep_core::error::{Error, Result};
use upkeep_core::traits::{Broadcaster, Log, TxReceipt};
use upkeep_core::{AdminConfig, ProtocolGeneration, StaticSigner, UpkeepAdmin};

pub fn registry() -> Address {
    Address::repeat_byte(0x10)
}

pub fn registrar() -> Address {
    Address::repeat_byte(0x20)
}

pub fn link_token() -> Address {
    Address::repeat_byte(0x30)
}

pub fn cron_factory() -> Address {
    Address::repeat_byte(0x40)
}

pub fn caller() -> Address {
    Address::repeat_byte(0x50)
}

pub fn upkeep_contract() -> Address {
    Address::repeat_byte(0x60)
}

/// Request hash planted in scripted registration receipts
pub fn request_hash() -> B256 {
    B256::repeat_byte(0xab)
}

/// A transaction recorded by [`MockChain::send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTx {
    pub from: Address,
    pub to: Address,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct ChainState {
    /// Responses keyed by exact calldata
    exact: HashMap<(Address, Vec<u8>), Vec<u8>>,
    /// Responses keyed by selector, used when no exact match exists
    by_selector: HashMap<(Address, [u8; 4]), Vec<u8>>,
    /// Read calls in the order they arrived
    calls: Vec<(Address, Vec<u8>)>,
    /// Submitted transactions
    sends: Vec<SentTx>,
    /// Receipts handed out in order; an empty queue yields a log-less receipt
    receipts: VecDeque<TxReceipt>,
    /// When set, every send fails with this message
    send_failure: Option<String>,
}

/// In-memory chain double shared between the adapter and the test
#[derive(Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
    call_count: Arc<AtomicUsize>,
    send_count: Arc<AtomicUsize>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with both contracts answering `typeAndVersion()`
    pub fn with_versions(registry_version: &str, registrar_version: &str) -> Self {
        let chain = Self::new();
        chain.respond_to::<ITypeAndVersion::typeAndVersionCall>(
            registry(),
            version_response(registry_version),
        );
        chain.respond_to::<ITypeAndVersion::typeAndVersionCall>(
            registrar(),
            version_response(registrar_version),
        );
        chain
    }

    /// Answer any call of kind `C` on `to` with raw return data
    pub fn respond_to<C: SolCall>(&self, to: Address, returns: Vec<u8>) {
        self.state
            .lock()
            .unwrap()
            .by_selector
            .insert((to, C::SELECTOR), returns);
    }

    /// Answer one exact call
    pub fn respond_to_call<C: SolCall>(&self, to: Address, call: &C, returns: Vec<u8>) {
        self.state
            .lock()
            .unwrap()
            .exact
            .insert((to, call.abi_encode()), returns);
    }

    /// Queue the receipt for the next send
    pub fn push_receipt(&self, receipt: TxReceipt) {
        self.state.lock().unwrap().receipts.push_back(receipt);
    }

    /// Make every send fail
    pub fn fail_sends_with(&self, message: &str) {
        self.state.lock().unwrap().send_failure = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    /// Number of read calls of kind `C` on `to`
    pub fn calls_to<C: SolCall>(&self, to: Address) -> usize {
        let selector = C::SELECTOR;
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(addr, data)| *addr == to && data.starts_with(&selector))
            .count()
    }

    pub fn sends(&self) -> Vec<SentTx> {
        self.state.lock().unwrap().sends.clone()
    }

    pub fn last_send(&self) -> SentTx {
        self.sends().last().cloned().expect("no transaction was sent")
    }
}

#[async_trait::async_trait]
impl Broadcaster for MockChain {
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.calls.push((to, data.clone()));

        if let Some(raw) = state.exact.get(&(to, data.clone())) {
            return Ok(raw.clone());
        }
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| Error::rpc("calldata shorter than a selector"))?;
        state
            .by_selector
            .get(&(to, selector))
            .cloned()
            .ok_or_else(|| Error::rpc(format!("execution reverted: no response for {:?}", to)))
    }

    async fn send(&self, from: Address, to: Address, data: Vec<u8>) -> Result<TxReceipt> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        if let Some(message) = &state.send_failure {
            return Err(Error::broadcast("mock", message.clone()));
        }

        state.sends.push(SentTx { from, to, data });
        Ok(state.receipts.pop_front().unwrap_or_default())
    }

    fn broadcaster_name(&self) -> &'static str {
        "mock"
    }
}

/// Config with the registrar given explicitly, so construction skips getState
pub fn admin_config() -> AdminConfig {
    AdminConfig::new(registry(), link_token())
        .with_registrar(registrar())
        .with_cron_factory(cron_factory())
}

/// Connect an adapter to the chain double
pub async fn connect(chain: &MockChain) -> Result<UpkeepAdmin> {
    connect_with(chain, admin_config()).await
}

pub async fn connect_with(chain: &MockChain, config: AdminConfig) -> Result<UpkeepAdmin> {
    UpkeepAdmin::connect(
        Box::new(chain.clone()),
        Box::new(StaticSigner::new(caller())),
        config,
    )
    .await
}

/// `typeAndVersion()` return data
pub fn version_response(version: &str) -> Vec<u8> {
    ITypeAndVersion::typeAndVersionCall::abi_encode_returns(&(version.to_string(),))
}

/// Funded-call receipt: transfer, bookkeeping, then the registration event
///
/// `registration_topics` become the topics of the third log.
pub fn registration_receipt(registration_topics: Vec<B256>) -> TxReceipt {
    TxReceipt {
        transaction_hash: B256::repeat_byte(0x01),
        logs: vec![
            Log::new(
                link_token(),
                vec![
                    alloy_primitives::keccak256("Transfer(address,address,uint256,bytes)"),
                    caller().into_word(),
                    registrar().into_word(),
                ],
                Vec::new(),
            ),
            Log::new(
                registrar(),
                vec![alloy_primitives::keccak256("RegistrationRequested(bytes32)")],
                Vec::new(),
            ),
            Log::new(registrar(), registration_topics, Vec::new()),
        ],
    }
}

/// Receipt with the request hash in topic 1 of the registration event
pub fn condition_receipt() -> TxReceipt {
    registration_receipt(vec![B256::repeat_byte(0xee), request_hash()])
}

/// Cron factory receipt announcing a new intermediary
pub fn cron_created_receipt(cron_upkeep: Address) -> TxReceipt {
    TxReceipt {
        transaction_hash: B256::repeat_byte(0x02),
        logs: vec![Log::new(
            cron_factory(),
            vec![CronUpkeepFactory::NewCronUpkeepCreated::SIGNATURE_HASH],
            (cron_upkeep, caller()).abi_encode_params(),
        )],
    }
}

pub fn signers() -> Vec<Address> {
    vec![Address::repeat_byte(0x71), Address::repeat_byte(0x72)]
}

pub fn transmitters() -> Vec<Address> {
    vec![Address::repeat_byte(0x73), Address::repeat_byte(0x74)]
}

fn counters_v2() -> State2_0 {
    State2_0 {
        nonce: 7,
        ownerLinkBalance: U96::from(1_000u64),
        expectedLinkBalance: U256::from(5_000u64),
        totalPremium: U96::from(42u64),
        numUpkeeps: U256::from(3u64),
        configCount: 2,
        latestConfigBlockNumber: 123_456,
        latestConfigDigest: B256::repeat_byte(0xcd),
        latestEpoch: 9,
        paused: false,
    }
}

/// `getState()` return data for a generation, naming `registrar`
pub fn state_response(generation: ProtocolGeneration, registrar: Address) -> Vec<u8> {
    match generation {
        ProtocolGeneration::Gen1_0 => {
            let state = State1_2 {
                nonce: 7,
                ownerLinkBalance: U96::from(1_000u64),
                expectedLinkBalance: U256::from(5_000u64),
                numUpkeeps: U256::from(3u64),
            };
            let config = Config1_2 {
                paymentPremiumPPB: 250_000_000,
                flatFeeMicroLink: 0,
                blockCountPerTurn: U24::from(20u32),
                checkGasLimit: 6_500_000,
                stalenessSeconds: U24::from(90_000u32),
                gasCeilingMultiplier: 3,
                minUpkeepSpend: U96::ZERO,
                maxPerformGas: 5_000_000,
                fallbackGasPrice: U256::from(20_000_000_000u64),
                fallbackLinkPrice: U256::from(200_000_000_000_000u64),
                transcoder: Address::repeat_byte(0x80),
                registrar,
            };
            KeeperRegistry1_2::getStateCall::abi_encode_returns(&(state, config, signers()))
        }
        ProtocolGeneration::Gen2_0 => {
            let config = OnchainConfig2_0 {
                paymentPremiumPPB: 250_000_000,
                flatFeeMicroLink: 0,
                checkGasLimit: 6_500_000,
                stalenessSeconds: U24::from(90_000u32),
                gasCeilingMultiplier: 3,
                minUpkeepSpend: U96::ZERO,
                maxPerformGas: 5_000_000,
                maxCheckDataSize: 5_000,
                maxPerformDataSize: 5_000,
                fallbackGasPrice: U256::from(20_000_000_000u64),
                fallbackLinkPrice: U256::from(200_000_000_000_000u64),
                transcoder: Address::repeat_byte(0x80),
                registrar,
            };
            KeeperRegistry2_0::getStateCall::abi_encode_returns(&(
                counters_v2(),
                config,
                signers(),
                transmitters(),
                1u8,
            ))
        }
        ProtocolGeneration::Gen2_1 => {
            let config = OnchainConfig2_1 {
                paymentPremiumPPB: 250_000_000,
                flatFeeMicroLink: 0,
                checkGasLimit: 6_500_000,
                stalenessSeconds: U24::from(90_000u32),
                gasCeilingMultiplier: 3,
                minUpkeepSpend: U96::ZERO,
                maxPerformGas: 5_000_000,
                maxCheckDataSize: 5_000,
                maxPerformDataSize: 5_000,
                maxRevertDataSize: 1_000,
                fallbackGasPrice: U256::from(20_000_000_000u64),
                fallbackLinkPrice: U256::from(200_000_000_000_000u64),
                transcoder: Address::repeat_byte(0x80),
                registrars: vec![registrar, Address::repeat_byte(0x21)],
                upkeepPrivilegeManager: Address::repeat_byte(0x90),
            };
            KeeperRegistry2_1::getStateCall::abi_encode_returns(&(
                counters_v2(),
                config,
                signers(),
                transmitters(),
                1u8,
            ))
        }
    }
}

/// Registry version string for a generation
pub fn registry_version(generation: ProtocolGeneration) -> &'static str {
    match generation {
        ProtocolGeneration::Gen1_0 => "KeeperRegistry 1.3.0",
        ProtocolGeneration::Gen2_0 => "KeeperRegistry 2.0.2",
        ProtocolGeneration::Gen2_1 => "KeeperRegistry 2.1.0",
    }
}

/// Registrar version string for a generation
pub fn registrar_version(generation: ProtocolGeneration) -> &'static str {
    match generation {
        ProtocolGeneration::Gen1_0 => "KeeperRegistrar 1.1.0",
        ProtocolGeneration::Gen2_0 => "KeeperRegistrar 2.0.0",
        ProtocolGeneration::Gen2_1 => "AutomationRegistrar 2.1.0",
    }
}

/// Chain where registry and registrar both report `generation`
pub fn chain_for(generation: ProtocolGeneration) -> MockChain {
    MockChain::with_versions(registry_version(generation), registrar_version(generation))
}

pub const ALL_GENERATIONS: [ProtocolGeneration; 3] = [
    ProtocolGeneration::Gen1_0,
    ProtocolGeneration::Gen2_0,
    ProtocolGeneration::Gen2_1,
];
