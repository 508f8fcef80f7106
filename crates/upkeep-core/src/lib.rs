// # upkeep-core
//
// Version-aware admin adapter for upkeep registry and registrar contracts.
//
// ## Architecture Overview
//
// - **Broadcaster**: Trait for read-only calls and transaction submission
// - **Signer**: Trait supplying the caller's account
// - **UpkeepAdmin**: Adapter that resolves contract generations once and
//   dispatches every operation on them
// - **contracts**: `sol!` bindings for every contract generation
// - **logs**: Request hash extraction from registration receipts
//
// ## Supported generations
//
// Registries report `KeeperRegistry 1.x.0`, `2.0.x` or `2.1.0`; registrars
// report `KeeperRegistrar 1.x.0`, `2.0.0` or `2.1.0` (or
// `AutomationRegistrar 2.1.0`). Anything else is rejected for the registry
// and disables registrar operations for the registrar.

pub mod admin;
pub mod config;
pub mod contracts;
pub mod error;
pub mod logs;
pub mod registrar;
pub mod registry;
pub mod traits;
pub mod version;

// Re-export core types for convenience
pub use admin::UpkeepAdmin;
pub use alloy_primitives::{Address, B256, U256};
pub use config::{AdminConfig, RpcConfig};
pub use error::{Error, Result};
pub use registrar::{
    AutoApproveType, CronJob, PendingRequest, RegistrationConfig, TimeBasedRegistration,
    TriggerKind, UpkeepParams,
};
pub use registry::{RegistryState, RegistryStateParts, UpkeepRecord};
pub use traits::{Broadcaster, Log, Signer, StaticSigner, TxReceipt};
pub use version::ProtocolGeneration;
