//! Version-aware upkeep admin adapter
//!
//! [`UpkeepAdmin`] is the single entry point. It resolves the registry and
//! registrar generations once, at construction, and every later operation
//! dispatches on those frozen values.
//!
//! ## Architecture
//!
//! ```text
//!                ┌──────────────┐
//!   caller ────▶ │ UpkeepAdmin  │
//!                └──────────────┘
//!                       │ generation-specific calldata
//!                       ▼
//!                ┌──────────────┐      ┌──────────┐
//!                │ Broadcaster  │ ───▶ │ contracts │
//!                └──────────────┘      └──────────┘
//!                       │ return data / receipt logs
//!                       ▼
//!            normalized records, request hashes
//! ```
//!
//! The operations themselves live next to the contract they address:
//! registration in [`crate::registrar`], registry administration and reads in
//! [`crate::registry`].

use crate::config::AdminConfig;
use crate::contracts::ITypeAndVersion;
use crate::error::{Error, Result};
use crate::registry::state;
use crate::traits::{Broadcaster, Signer, TxReceipt};
use crate::version::{self, ProtocolGeneration};
use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use std::fmt;
use tracing::{debug, info, warn};

/// Admin adapter bound to one registry/registrar pair
///
/// ## Concurrency
///
/// The adapter holds no mutable state. Read-only queries may run
/// concurrently with each other and with a pending state-changing call.
pub struct UpkeepAdmin {
    /// Broadcaster for reads and transactions
    broadcaster: Box<dyn Broadcaster>,

    /// Source of the caller's address
    signer: Box<dyn Signer>,

    /// Contract addresses
    config: AdminConfig,

    /// Resolved registry generation
    registry_generation: ProtocolGeneration,

    /// Registrar in use (configured or read from the registry)
    registrar: Address,

    /// Registrar's self-reported typeAndVersion
    registrar_version: String,

    /// Resolved registrar generation, `None` if the version is unknown
    registrar_generation: Option<ProtocolGeneration>,
}

impl fmt::Debug for UpkeepAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpkeepAdmin")
            .field("broadcaster", &self.broadcaster.broadcaster_name())
            .field("caller", &self.signer.address())
            .field("registry", &self.config.registry)
            .field("registry_generation", &self.registry_generation)
            .field("registrar", &self.registrar)
            .field("registrar_version", &self.registrar_version)
            .field("registrar_generation", &self.registrar_generation)
            .finish()
    }
}

impl UpkeepAdmin {
    /// Connect to a registry and resolve both generations
    ///
    /// # Parameters
    ///
    /// - `broadcaster`: Broadcaster implementation
    /// - `signer`: Signer implementation
    /// - `config`: Contract addresses
    ///
    /// # Returns
    ///
    /// - `Ok(UpkeepAdmin)`: Adapter with frozen generations
    /// - `Err(Error::UnsupportedRegistryVersion)`: Unknown registry version
    ///
    /// An unknown registrar version does not fail construction. Registry
    /// operations stay available; registrar operations fail with
    /// [`Error::UnsupportedRegistrarVersion`].
    pub async fn connect(
        broadcaster: Box<dyn Broadcaster>,
        signer: Box<dyn Signer>,
        config: AdminConfig,
    ) -> Result<Self> {
        config.validate()?;

        let registry_version = read_type_and_version(broadcaster.as_ref(), config.registry).await?;
        let registry_generation = version::resolve(&registry_version)?;
        info!(
            "Registry {} reports '{}' (generation {})",
            config.registry, registry_version, registry_generation
        );

        let registrar = match config.registrar {
            Some(registrar) => registrar,
            None => {
                let state =
                    state::fetch_state(broadcaster.as_ref(), config.registry, registry_generation)
                        .await?;
                let registrar = state.registrar()?;
                debug!("Registrar {} read from registry config", registrar);
                registrar
            }
        };

        let registrar_version = read_type_and_version(broadcaster.as_ref(), registrar).await?;
        let registrar_generation = match version::resolve_registrar(&registrar_version) {
            Ok(generation) => {
                info!(
                    "Registrar {} reports '{}' (generation {})",
                    registrar, registrar_version, generation
                );
                Some(generation)
            }
            Err(_) => {
                warn!(
                    "Registrar {} reports unsupported version '{}'; registrar operations disabled",
                    registrar, registrar_version
                );
                None
            }
        };

        Ok(Self {
            broadcaster,
            signer,
            config,
            registry_generation,
            registrar,
            registrar_version,
            registrar_generation,
        })
    }

    /// Resolved registry generation
    pub fn registry_generation(&self) -> ProtocolGeneration {
        self.registry_generation
    }

    /// Resolved registrar generation
    pub fn registrar_generation(&self) -> Result<ProtocolGeneration> {
        self.registrar_generation
            .ok_or_else(|| Error::UnsupportedRegistrarVersion {
                version: self.registrar_version.clone(),
            })
    }

    pub fn registry_address(&self) -> Address {
        self.config.registry
    }

    pub fn registrar_address(&self) -> Address {
        self.registrar
    }

    /// The caller's account
    pub fn caller(&self) -> Address {
        self.signer.address()
    }

    pub(crate) fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub(crate) fn broadcaster_ref(&self) -> &dyn Broadcaster {
        self.broadcaster.as_ref()
    }

    pub(crate) fn registrar_generation_opt(&self) -> Option<ProtocolGeneration> {
        self.registrar_generation
    }

    /// Read-only call with decoded return values
    pub(crate) async fn read<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return> {
        read_call(self.broadcaster.as_ref(), to, call).await
    }

    /// Submit one state-changing call from the caller's account
    pub(crate) async fn submit<C: SolCall>(&self, to: Address, call: C) -> Result<TxReceipt> {
        let data = call.abi_encode();
        let from = self.signer.address();

        info!(
            "Submitting {} to {} via {} ({} bytes)",
            C::SIGNATURE,
            to,
            self.broadcaster.broadcaster_name(),
            data.len()
        );

        let receipt = self.broadcaster.send(from, to, data).await?;
        debug!(
            "{} mined in {} with {} log(s)",
            C::SIGNATURE,
            receipt.transaction_hash,
            receipt.logs.len()
        );
        Ok(receipt)
    }
}

/// Read-only call with decoded return values
pub(crate) async fn read_call<C: SolCall>(
    broadcaster: &dyn Broadcaster,
    to: Address,
    call: C,
) -> Result<C::Return> {
    let raw = broadcaster.call(to, call.abi_encode()).await?;
    debug!("{} on {} returned {} bytes", C::SIGNATURE, to, raw.len());

    C::abi_decode_returns(&raw, true)
        .map_err(|e| Error::abi(format!("decoding {} result: {}", C::SIGNATURE, e)))
}

async fn read_type_and_version(broadcaster: &dyn Broadcaster, contract: Address) -> Result<String> {
    let version = read_call(broadcaster, contract, ITypeAndVersion::typeAndVersionCall {}).await?;
    Ok(version._0)
}
