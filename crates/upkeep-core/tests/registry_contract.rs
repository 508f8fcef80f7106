//! Architectural Contract Test: Registry Operations
//!
//! This test verifies registry administration and reads across generations.
//!
//! Constraints verified:
//! - Administrative calls produce identical calldata on every generation
//! - getUpkeep results are normalized into one record shape
//! - getState populates exactly the slot of the resolved generation
//! - Generation-specific reads fail cleanly where unsupported
//!
//! If this test fails, registry dispatch is broken.

mod common;

use common::*;
use tokio_test::{assert_err, assert_ok};
use alloy_primitives::aliases::U96;
use alloy_primitives::Bytes;
use alloy_sol_types::SolCall;
use upkeep_core::contracts::{
    KeeperRegistry1_2, KeeperRegistry2_0, KeeperRegistry2_1, KeeperRegistryAdmin, UpkeepInfo2_0,
    UpkeepInfo2_1,
};
use upkeep_core::registry::{StateV1_0, StateV2_0, StateV2_1};
use upkeep_core::{Address, Error, ProtocolGeneration, RegistryState, U256};

/// Run every administrative call and return the calldata sent
async fn admin_calldata(generation: ProtocolGeneration) -> Vec<Vec<u8>> {
    let chain = chain_for(generation);
    let admin = connect(&chain).await.unwrap();
    let id = U256::from(42);
    let other = Address::repeat_byte(0x99);

    admin.add_funds(id, 1_000).await.unwrap();
    admin.pause_upkeep(id).await.unwrap();
    admin.unpause_upkeep(id).await.unwrap();
    admin.cancel_upkeep(id).await.unwrap();
    admin.set_upkeep_gas_limit(id, 750_000).await.unwrap();
    admin.withdraw_funds(id, other).await.unwrap();
    admin.transfer_upkeep_admin(id, other).await.unwrap();
    admin.accept_upkeep_admin(id).await.unwrap();

    let sends = chain.sends();
    assert!(sends.iter().all(|tx| tx.to == registry() && tx.from == caller()));
    sends.into_iter().map(|tx| tx.data).collect()
}

#[tokio::test]
async fn admin_calls_are_identical_across_generations() {
    let v1_0 = admin_calldata(ProtocolGeneration::Gen1_0).await;
    let v2_0 = admin_calldata(ProtocolGeneration::Gen2_0).await;
    let v2_1 = admin_calldata(ProtocolGeneration::Gen2_1).await;

    assert_eq!(v1_0.len(), 8);
    assert_eq!(v1_0, v2_0);
    assert_eq!(v2_0, v2_1);

    let id = U256::from(42);
    assert_eq!(
        v1_0[0],
        KeeperRegistryAdmin::addFundsCall {
            id,
            amount: U96::from(1_000u64),
        }
        .abi_encode()
    );
    assert_eq!(
        v1_0[4],
        KeeperRegistryAdmin::setUpkeepGasLimitCall {
            id,
            gasLimit: 750_000,
        }
        .abi_encode()
    );
}

#[tokio::test]
async fn add_funds_rejects_oversized_amount() {
    let chain = chain_for(ProtocolGeneration::Gen2_1);
    let admin = connect(&chain).await.unwrap();

    let err = assert_err!(admin.add_funds(U256::from(1), u128::MAX).await);
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(chain.send_count(), 0);
}

#[tokio::test]
async fn get_upkeep_is_normalized() {
    let v1_0 = KeeperRegistry1_2::getUpkeepCall::abi_encode_returns(&(
        upkeep_contract(),
        400_000u32,
        Bytes::from(vec![0x0c]),
        U96::from(9_000u64),
        Address::repeat_byte(0x71),
        caller(),
        u64::MAX,
        U96::from(300u64),
        true,
    ));
    let v2_0 = KeeperRegistry2_0::getUpkeepCall::abi_encode_returns(&(UpkeepInfo2_0 {
        target: upkeep_contract(),
        executeGas: 400_000,
        checkData: Bytes::from(vec![0x0c]),
        balance: U96::from(9_000u64),
        admin: caller(),
        maxValidBlocknumber: u64::MAX,
        lastPerformBlockNumber: 17,
        amountSpent: U96::from(300u64),
        paused: true,
        offchainConfig: Bytes::from(vec![0x0f]),
    },));
    let v2_1 = KeeperRegistry2_1::getUpkeepCall::abi_encode_returns(&(UpkeepInfo2_1 {
        target: upkeep_contract(),
        performGas: 400_000,
        checkData: Bytes::from(vec![0x0c]),
        balance: U96::from(9_000u64),
        admin: caller(),
        maxValidBlocknumber: u64::MAX,
        lastPerformedBlockNumber: 17,
        amountSpent: U96::from(300u64),
        paused: true,
        offchainConfig: Bytes::from(vec![0x0f]),
    },));

    let cases = [
        (ProtocolGeneration::Gen1_0, v1_0),
        (ProtocolGeneration::Gen2_0, v2_0),
        (ProtocolGeneration::Gen2_1, v2_1),
    ];

    let mut records = Vec::new();
    for (generation, returns) in cases {
        let chain = chain_for(generation);
        // every generation shares the getUpkeep(uint256) selector
        chain.respond_to::<KeeperRegistry2_1::getUpkeepCall>(registry(), returns);
        let admin = connect(&chain).await.unwrap();
        records.push(assert_ok!(admin.get_upkeep(U256::from(7)).await));
    }

    let record = &records[0];
    assert_eq!(record.target, upkeep_contract());
    assert_eq!(record.gas_limit, 400_000);
    assert_eq!(record.check_data, vec![0x0c]);
    assert_eq!(record.balance, 9_000);
    assert_eq!(record.admin, caller());
    assert_eq!(record.max_valid_blocknumber, u64::MAX);
    assert_eq!(record.amount_spent, 300);
    assert!(record.paused);
    assert_eq!(&records[1], record);
    assert_eq!(&records[2], record);
}

#[tokio::test]
async fn get_state_fills_only_the_resolved_generation() {
    for generation in ALL_GENERATIONS {
        let chain = chain_for(generation);
        chain.respond_to::<KeeperRegistry2_1::getStateCall>(
            registry(),
            state_response(generation, registrar()),
        );
        let admin = connect(&chain).await.unwrap();

        let state = assert_ok!(admin.get_state().await);
        assert_eq!(state.generation(), generation);
        assert_eq!(state.registrar().unwrap(), registrar());

        let parts = state.clone().into_parts();
        let populated = [
            parts.state_v1_0 != StateV1_0::default(),
            parts.state_v2_0 != StateV2_0::default(),
            parts.state_v2_1 != StateV2_1::default(),
        ];
        assert_eq!(populated.iter().filter(|p| **p).count(), 1, "{}", generation);

        match state {
            RegistryState::V1_0(s) => {
                assert_eq!(s.state.nonce, 7);
                assert_eq!(s.config.block_count_per_turn, 20);
                assert_eq!(s.keepers, signers());
            }
            RegistryState::V2_0(s) => {
                assert_eq!(s.state.latest_epoch, 9);
                assert_eq!(s.config.max_check_data_size, 5_000);
                assert_eq!(s.signers, signers());
                assert_eq!(s.transmitters, transmitters());
                assert_eq!(s.f, 1);
            }
            RegistryState::V2_1(s) => {
                assert_eq!(s.config.max_revert_data_size, 1_000);
                assert_eq!(s.config.registrars.len(), 2);
                assert_eq!(s.config.upkeep_privilege_manager, Address::repeat_byte(0x90));
                assert_eq!(s.signers, signers());
                assert_eq!(s.transmitters, transmitters());
            }
        }
    }
}

#[tokio::test]
async fn active_ids_and_min_balance() {
    let chain = chain_for(ProtocolGeneration::Gen2_0);
    chain.respond_to_call(
        registry(),
        &KeeperRegistryAdmin::getActiveUpkeepIDsCall {
            startIndex: U256::ZERO,
            maxCount: U256::ZERO,
        },
        KeeperRegistryAdmin::getActiveUpkeepIDsCall::abi_encode_returns(&(vec![
            U256::from(1),
            U256::from(2),
            U256::from(3),
        ],)),
    );
    chain.respond_to::<KeeperRegistryAdmin::getMinBalanceForUpkeepCall>(
        registry(),
        KeeperRegistryAdmin::getMinBalanceForUpkeepCall::abi_encode_returns(&(U96::from(55u64),)),
    );
    let admin = connect(&chain).await.unwrap();

    let ids = admin
        .get_active_upkeep_ids(U256::ZERO, U256::ZERO)
        .await
        .unwrap();
    assert_eq!(ids, vec![U256::from(1), U256::from(2), U256::from(3)]);
    assert_eq!(admin.get_min_balance_for_upkeep(U256::from(1)).await.unwrap(), 55);
}

#[tokio::test]
async fn transcoder_version_is_1_x_only() {
    let chain = chain_for(ProtocolGeneration::Gen1_0);
    chain.respond_to::<KeeperRegistry1_2::upkeepTranscoderVersionCall>(
        registry(),
        KeeperRegistry1_2::upkeepTranscoderVersionCall::abi_encode_returns(&(1u8,)),
    );
    let admin = connect(&chain).await.unwrap();
    assert_eq!(admin.get_upkeep_transcoder_version().await.unwrap(), 1);

    for generation in [ProtocolGeneration::Gen2_0, ProtocolGeneration::Gen2_1] {
        let chain = chain_for(generation);
        let admin = connect(&chain).await.unwrap();
        let err = assert_err!(admin.get_upkeep_transcoder_version().await);
        assert!(matches!(err, Error::OperationNotSupportedForVersion(_)));
        assert_eq!(
            chain.calls_to::<KeeperRegistry1_2::upkeepTranscoderVersionCall>(registry()),
            0
        );
    }
}

#[tokio::test]
async fn malformed_return_data_is_an_abi_error() {
    let chain = chain_for(ProtocolGeneration::Gen2_1);
    chain.respond_to::<KeeperRegistry2_1::getUpkeepCall>(registry(), vec![0u8; 31]);
    let admin = connect(&chain).await.unwrap();

    let err = assert_err!(admin.get_upkeep(U256::from(1)).await);
    assert!(matches!(err, Error::Abi(_)));
}
