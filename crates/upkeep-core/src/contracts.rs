//! Contract bindings
//!
//! Calldata and return types for the registry, registrar, funding token and
//! cron factory, generated by `alloy_sol_types::sol!`. Each generation's
//! interface is declared on its own so that a wire-shape difference is a
//! type difference.
//!
//! Calls that every generation shares with an identical signature live in
//! [`KeeperRegistryAdmin`] and [`RegistrarRequests`].

use crate::error::{Error, Result};
use alloy_primitives::aliases::U96;
use alloy_sol_types::sol;

/// Largest value representable as `uint96`
pub const UINT96_MAX: u128 = (1u128 << 96) - 1;

sol! {
    /// 1.x registry counters
    struct State1_2 {
        uint32 nonce;
        uint96 ownerLinkBalance;
        uint256 expectedLinkBalance;
        uint256 numUpkeeps;
    }

    /// 1.x registry config
    struct Config1_2 {
        uint32 paymentPremiumPPB;
        uint32 flatFeeMicroLink;
        uint24 blockCountPerTurn;
        uint32 checkGasLimit;
        uint24 stalenessSeconds;
        uint16 gasCeilingMultiplier;
        uint96 minUpkeepSpend;
        uint32 maxPerformGas;
        uint256 fallbackGasPrice;
        uint256 fallbackLinkPrice;
        address transcoder;
        address registrar;
    }

    /// 2.0 and 2.1 registry counters
    struct State2_0 {
        uint32 nonce;
        uint96 ownerLinkBalance;
        uint256 expectedLinkBalance;
        uint96 totalPremium;
        uint256 numUpkeeps;
        uint32 configCount;
        uint32 latestConfigBlockNumber;
        bytes32 latestConfigDigest;
        uint32 latestEpoch;
        bool paused;
    }

    struct OnchainConfig2_0 {
        uint32 paymentPremiumPPB;
        uint32 flatFeeMicroLink;
        uint32 checkGasLimit;
        uint24 stalenessSeconds;
        uint16 gasCeilingMultiplier;
        uint96 minUpkeepSpend;
        uint32 maxPerformGas;
        uint32 maxCheckDataSize;
        uint32 maxPerformDataSize;
        uint256 fallbackGasPrice;
        uint256 fallbackLinkPrice;
        address transcoder;
        address registrar;
    }

    struct OnchainConfig2_1 {
        uint32 paymentPremiumPPB;
        uint32 flatFeeMicroLink;
        uint32 checkGasLimit;
        uint24 stalenessSeconds;
        uint16 gasCeilingMultiplier;
        uint96 minUpkeepSpend;
        uint32 maxPerformGas;
        uint32 maxCheckDataSize;
        uint32 maxPerformDataSize;
        uint32 maxRevertDataSize;
        uint256 fallbackGasPrice;
        uint256 fallbackLinkPrice;
        address transcoder;
        address[] registrars;
        address upkeepPrivilegeManager;
    }

    struct UpkeepInfo2_0 {
        address target;
        uint32 executeGas;
        bytes checkData;
        uint96 balance;
        address admin;
        uint64 maxValidBlocknumber;
        uint32 lastPerformBlockNumber;
        uint96 amountSpent;
        bool paused;
        bytes offchainConfig;
    }

    struct UpkeepInfo2_1 {
        address target;
        uint32 performGas;
        bytes checkData;
        uint96 balance;
        address admin;
        uint64 maxValidBlocknumber;
        uint32 lastPerformedBlockNumber;
        uint96 amountSpent;
        bool paused;
        bytes offchainConfig;
    }

    /// Per-trigger auto-approval policy kept by 2.1 registrars
    struct TriggerRegistrationStorage {
        uint8 autoApproveType;
        uint32 autoApproveMaxAllowed;
        uint32 approvedCount;
    }

    /// Version string reported by every registry and registrar
    interface ITypeAndVersion {
        function typeAndVersion() external view returns (string memory);
    }

    /// Funding token
    interface LinkTokenInterface {
        function transferAndCall(address to, uint256 value, bytes calldata data) external returns (bool success);
    }

    /// Registry calls with the same signature on every generation
    interface KeeperRegistryAdmin {
        function addFunds(uint256 id, uint96 amount) external;
        function pauseUpkeep(uint256 id) external;
        function unpauseUpkeep(uint256 id) external;
        function cancelUpkeep(uint256 id) external;
        function setUpkeepGasLimit(uint256 id, uint32 gasLimit) external;
        function withdrawFunds(uint256 id, address to) external;
        function transferUpkeepAdmin(uint256 id, address proposed) external;
        function acceptUpkeepAdmin(uint256 id) external;
        function getMinBalanceForUpkeep(uint256 id) external view returns (uint96 minBalance);
        function getActiveUpkeepIDs(uint256 startIndex, uint256 maxCount) external view returns (uint256[] memory);
    }

    interface KeeperRegistry1_2 {
        function getUpkeep(uint256 id) external view returns (
            address target,
            uint32 executeGas,
            bytes memory checkData,
            uint96 balance,
            address lastKeeper,
            address admin,
            uint64 maxValidBlocknumber,
            uint96 amountSpent,
            bool paused
        );
        function getState() external view returns (State1_2 memory state, Config1_2 memory config, address[] memory keepers);
        function upkeepTranscoderVersion() external view returns (uint8);
    }

    interface KeeperRegistry2_0 {
        function getUpkeep(uint256 id) external view returns (UpkeepInfo2_0 memory upkeepInfo);
        function getState() external view returns (
            State2_0 memory state,
            OnchainConfig2_0 memory config,
            address[] memory signers,
            address[] memory transmitters,
            uint8 f
        );
    }

    interface KeeperRegistry2_1 {
        function getUpkeep(uint256 id) external view returns (UpkeepInfo2_1 memory upkeepInfo);
        function getState() external view returns (
            State2_0 memory state,
            OnchainConfig2_1 memory config,
            address[] memory signers,
            address[] memory transmitters,
            uint8 f
        );
    }

    /// Registrar calls with the same signature on every generation
    interface RegistrarRequests {
        function getPendingRequest(bytes32 hash) external view returns (address admin, uint96 balance);
        function cancel(bytes32 hash) external;
    }

    /// Registrar 1.x, register shape introduced in 1.2
    interface KeeperRegistrar1_2 {
        function register(
            string memory name,
            bytes calldata encryptedEmail,
            address upkeepContract,
            uint32 gasLimit,
            address adminAddress,
            bytes calldata checkData,
            uint96 amount,
            uint8 source,
            address sender
        ) external;
        function getRegistrationConfig() external view returns (
            uint8 autoApproveConfigType,
            uint32 autoApproveMaxAllowed,
            uint32 approvedCount,
            address keeperRegistry,
            uint256 minLINKJuels
        );
    }

    interface KeeperRegistrar2_0 {
        function register(
            string memory name,
            bytes calldata encryptedEmail,
            address upkeepContract,
            uint32 gasLimit,
            address adminAddress,
            bytes calldata checkData,
            bytes calldata offchainConfig,
            uint96 amount,
            address sender
        ) external;
        function getRegistrationConfig() external view returns (
            uint8 autoApproveConfigType,
            uint32 autoApproveMaxAllowed,
            uint32 approvedCount,
            address keeperRegistry,
            uint256 minLINKJuels
        );
    }

    interface AutomationRegistrar2_1 {
        function register(
            string memory name,
            bytes calldata encryptedEmail,
            address upkeepContract,
            uint32 gasLimit,
            address adminAddress,
            uint8 triggerType,
            bytes memory checkData,
            bytes memory triggerConfig,
            bytes memory offchainConfig,
            uint96 amount,
            address sender
        ) external;
        function getTriggerRegistrationDetails(uint8 triggerType) external view returns (TriggerRegistrationStorage memory);
        function getConfig() external view returns (address keeperRegistry, uint256 minLINKJuels);
    }

    /// Deploys cron intermediaries for time-based upkeeps
    interface CronUpkeepFactory {
        event NewCronUpkeepCreated(address upkeep, address owner);

        function encodeCronJob(address target, bytes memory handler, string memory cronString) external pure returns (bytes memory);
        function newCronUpkeepWithJob(bytes memory encodedJob) external;
    }
}

/// Narrow a juel amount to `uint96`
pub fn uint96(amount: u128) -> Result<U96> {
    if amount > UINT96_MAX {
        return Err(Error::invalid_input(format!(
            "amount {} does not fit in uint96",
            amount
        )));
    }
    Ok(U96::from(amount))
}

/// Widen a decoded `uint96`
pub(crate) fn juels(value: U96) -> u128 {
    value.to::<u128>()
}
