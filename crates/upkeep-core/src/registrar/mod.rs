//! Registrar operations
//!
//! Registration is a funded call: the registrar's `register` calldata rides
//! inside a single `transferAndCall` on the funding token, which moves the
//! funds and submits the request atomically. The request hash is then read
//! back from the receipt's logs (see [`crate::logs`]).
//!
//! ## Wire shapes
//!
//! | Generation | `register` parameters |
//! |---|---|
//! | 1.0 (registrar 1.2 shape) | name, email, target, gas, admin, checkData, amount, source, sender |
//! | 2.0 | name, email, target, gas, admin, checkData, offchainConfig, amount, sender |
//! | 2.1 | name, email, target, gas, admin, triggerType, checkData, triggerConfig, offchainConfig, amount, sender |

pub mod config;

pub use config::{AutoApproveType, RegistrationConfig};

use crate::admin::UpkeepAdmin;
use crate::contracts::{
    self, AutomationRegistrar2_1, CronUpkeepFactory, KeeperRegistrar1_2, KeeperRegistrar2_0,
    LinkTokenInterface, RegistrarRequests,
};
use crate::error::{Error, Result};
use crate::logs;
use crate::traits::TxReceipt;
use crate::version::ProtocolGeneration;
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{SolCall, SolEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Registration source tag sent to 1.2-shape registrars
pub const REGISTRATION_SOURCE: u8 = 0;

/// Condition under which an upkeep becomes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Custom or conditional logic
    Condition,
    /// Emitted log
    Log,
    /// Cron schedule, layered on a condition trigger by an intermediary
    Cron,
}

impl TriggerKind {
    /// Trigger tag understood by 2.1 registrars
    ///
    /// Cron upkeeps register as condition upkeeps.
    pub fn abi_tag(self) -> u8 {
        match self {
            TriggerKind::Condition | TriggerKind::Cron => 0,
            TriggerKind::Log => 1,
        }
    }
}

/// Caller-supplied fields of a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpkeepParams {
    /// Display name
    pub name: String,
    /// Contact info, opaque to the adapter
    pub encrypted_email: Vec<u8>,
    /// Contract to upkeep
    pub upkeep_contract: Address,
    /// Gas budget per perform
    pub gas_limit: u32,
    /// Payload passed to the check function
    pub check_data: Vec<u8>,
    /// Payload for the execution layer (2.0 and 2.1 only)
    pub offchain_config: Vec<u8>,
    /// Initial funding in juels
    pub amount: u128,
}

impl UpkeepParams {
    /// Create parameters with empty payloads
    pub fn new(name: impl Into<String>, upkeep_contract: Address, gas_limit: u32, amount: u128) -> Self {
        Self {
            name: name.into(),
            encrypted_email: Vec::new(),
            upkeep_contract,
            gas_limit,
            check_data: Vec::new(),
            offchain_config: Vec::new(),
            amount,
        }
    }

    /// Set the contact info
    pub fn with_encrypted_email(mut self, email: impl Into<Vec<u8>>) -> Self {
        self.encrypted_email = email.into();
        self
    }

    /// Set the check data
    pub fn with_check_data(mut self, check_data: impl Into<Vec<u8>>) -> Self {
        self.check_data = check_data.into();
        self
    }

    /// Set the offchain config
    pub fn with_offchain_config(mut self, offchain_config: impl Into<Vec<u8>>) -> Self {
        self.offchain_config = offchain_config.into();
        self
    }
}

/// A complete registration request, ready to encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: String,
    pub encrypted_email: Vec<u8>,
    pub upkeep_contract: Address,
    pub gas_limit: u32,
    pub check_data: Vec<u8>,
    pub trigger_kind: TriggerKind,
    /// Empty unless the trigger kind needs it
    pub trigger_config: Vec<u8>,
    pub offchain_config: Vec<u8>,
    /// Funding in juels; must fit in 96 bits
    pub amount: u128,
    /// Admin and sender of the upkeep
    pub requester: Address,
}

impl RegistrationRequest {
    /// Build a request from caller parameters
    pub fn new(
        params: UpkeepParams,
        trigger_kind: TriggerKind,
        trigger_config: Vec<u8>,
        requester: Address,
    ) -> Self {
        Self {
            name: params.name,
            encrypted_email: params.encrypted_email,
            upkeep_contract: params.upkeep_contract,
            gas_limit: params.gas_limit,
            check_data: params.check_data,
            trigger_kind,
            trigger_config,
            offchain_config: params.offchain_config,
            amount: params.amount,
            requester,
        }
    }
}

/// Cron schedule for a time-based upkeep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronJob {
    /// Calldata the intermediary invokes on the target (usually a bare selector)
    pub handler: Vec<u8>,
    /// Cron expression, e.g. `"0 * * * *"`
    pub cron_expression: String,
}

impl CronJob {
    pub fn new(handler: impl Into<Vec<u8>>, cron_expression: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            cron_expression: cron_expression.into(),
        }
    }
}

/// Result of a time-based registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBasedRegistration {
    /// Intermediary deployed by the cron factory; the registered target
    pub cron_upkeep: Address,
    /// Registrar request hash
    pub request_hash: B256,
}

/// A registration awaiting approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingRequest {
    pub admin: Address,
    /// Escrowed funds in juels
    pub balance: u128,
}

/// Encode the registrar's `register` call for a generation
pub fn encode_register_call(
    generation: ProtocolGeneration,
    request: &RegistrationRequest,
) -> Result<Vec<u8>> {
    let amount = contracts::uint96(request.amount)?;

    let calldata = match generation {
        ProtocolGeneration::Gen1_0 => KeeperRegistrar1_2::registerCall {
            name: request.name.clone(),
            encryptedEmail: request.encrypted_email.clone().into(),
            upkeepContract: request.upkeep_contract,
            gasLimit: request.gas_limit,
            adminAddress: request.requester,
            checkData: request.check_data.clone().into(),
            amount,
            source: REGISTRATION_SOURCE,
            sender: request.requester,
        }
        .abi_encode(),
        ProtocolGeneration::Gen2_0 => KeeperRegistrar2_0::registerCall {
            name: request.name.clone(),
            encryptedEmail: request.encrypted_email.clone().into(),
            upkeepContract: request.upkeep_contract,
            gasLimit: request.gas_limit,
            adminAddress: request.requester,
            checkData: request.check_data.clone().into(),
            offchainConfig: request.offchain_config.clone().into(),
            amount,
            sender: request.requester,
        }
        .abi_encode(),
        ProtocolGeneration::Gen2_1 => AutomationRegistrar2_1::registerCall {
            name: request.name.clone(),
            encryptedEmail: request.encrypted_email.clone().into(),
            upkeepContract: request.upkeep_contract,
            gasLimit: request.gas_limit,
            adminAddress: request.requester,
            triggerType: request.trigger_kind.abi_tag(),
            checkData: request.check_data.clone().into(),
            triggerConfig: request.trigger_config.clone().into(),
            offchainConfig: request.offchain_config.clone().into(),
            amount,
            sender: request.requester,
        }
        .abi_encode(),
    };

    Ok(calldata)
}

impl UpkeepAdmin {
    /// Register a condition or custom-logic upkeep
    ///
    /// Supported on every registrar generation. On 2.1 the trigger kind is
    /// Condition with an empty trigger config.
    ///
    /// # Returns
    ///
    /// The registrar's request hash.
    pub async fn register_condition_or_custom(&self, params: UpkeepParams) -> Result<B256> {
        let generation = self.registrar_generation()?;
        let request = RegistrationRequest::new(
            params,
            TriggerKind::Condition,
            Vec::new(),
            self.caller(),
        );
        self.submit_registration(generation, &request, TriggerKind::Condition)
            .await
    }

    /// Register a log-triggered upkeep (2.1 registrars only)
    ///
    /// # Parameters
    ///
    /// - `params`: Registration fields
    /// - `trigger_config`: Encoded log filter
    pub async fn register_log_trigger(
        &self,
        params: UpkeepParams,
        trigger_config: Vec<u8>,
    ) -> Result<B256> {
        let generation = self.require_registrar_2_1()?;
        let request =
            RegistrationRequest::new(params, TriggerKind::Log, trigger_config, self.caller());
        self.submit_registration(generation, &request, TriggerKind::Log)
            .await
    }

    /// Register a time-based upkeep (2.1 registrars only)
    ///
    /// Runs in two phases. First the cron factory deploys an intermediary
    /// that calls `params.upkeep_contract` on schedule; then the intermediary,
    /// not the caller's contract, is registered as a condition upkeep.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`]: No cron factory configured
    /// - [`Error::EventNotFound`]: The factory receipt lacks the creation
    ///   event; nothing was registered
    /// - [`Error::CronRegistrationFailed`]: The intermediary was deployed but
    ///   registering it failed; retry with
    ///   [`UpkeepAdmin::register_cron_upkeep`]
    pub async fn register_time_based(
        &self,
        params: UpkeepParams,
        job: CronJob,
    ) -> Result<TimeBasedRegistration> {
        self.require_registrar_2_1()?;
        let factory = self
            .config()
            .cron_factory
            .ok_or_else(|| Error::config("Time-based registration requires a cron factory"))?;

        let cron_upkeep = self
            .create_cron_upkeep(factory, params.upkeep_contract, &job)
            .await?;
        info!(
            "Cron upkeep {} created for target {} ('{}')",
            cron_upkeep, params.upkeep_contract, job.cron_expression
        );

        match self.register_cron_upkeep(cron_upkeep, params).await {
            Ok(request_hash) => Ok(TimeBasedRegistration {
                cron_upkeep,
                request_hash,
            }),
            Err(source) => {
                warn!(
                    "Cron upkeep {} is deployed but unregistered: {}",
                    cron_upkeep, source
                );
                Err(Error::CronRegistrationFailed {
                    cron_upkeep,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Register an already deployed cron intermediary (2.1 registrars only)
    ///
    /// This is the second phase of [`UpkeepAdmin::register_time_based`]. It
    /// registers `cron_upkeep` in place of `params.upkeep_contract`.
    pub async fn register_cron_upkeep(
        &self,
        cron_upkeep: Address,
        mut params: UpkeepParams,
    ) -> Result<B256> {
        let generation = self.require_registrar_2_1()?;
        params.upkeep_contract = cron_upkeep;
        let request =
            RegistrationRequest::new(params, TriggerKind::Condition, Vec::new(), self.caller());
        self.submit_registration(generation, &request, TriggerKind::Cron)
            .await
    }

    /// Read a pending registration request
    pub async fn get_pending_request(&self, hash: B256) -> Result<PendingRequest> {
        let pending = self
            .read(
                self.registrar_address(),
                RegistrarRequests::getPendingRequestCall { hash },
            )
            .await?;

        Ok(PendingRequest {
            admin: pending.admin,
            balance: contracts::juels(pending.balance),
        })
    }

    /// Cancel a pending registration request, refunding its balance
    pub async fn cancel_request(&self, hash: B256) -> Result<TxReceipt> {
        self.submit(
            self.registrar_address(),
            RegistrarRequests::cancelCall { hash },
        )
        .await
    }

    fn require_registrar_2_1(&self) -> Result<ProtocolGeneration> {
        match self.registrar_generation_opt() {
            Some(ProtocolGeneration::Gen2_1) => Ok(ProtocolGeneration::Gen2_1),
            Some(ProtocolGeneration::Gen1_0 | ProtocolGeneration::Gen2_0) | None => {
                Err(Error::registrar_2_1_only())
            }
        }
    }

    async fn submit_registration(
        &self,
        generation: ProtocolGeneration,
        request: &RegistrationRequest,
        path: TriggerKind,
    ) -> Result<B256> {
        let payload = encode_register_call(generation, request)?;
        let receipt = self
            .submit(
                self.config().link_token,
                LinkTokenInterface::transferAndCallCall {
                    to: self.registrar_address(),
                    value: U256::from(request.amount),
                    data: payload.into(),
                },
            )
            .await?;

        let hash = match self.config().registration_event_topic {
            Some(topic) => logs::extract_by_signature(&receipt.logs, topic)?,
            None => logs::extract(&receipt.logs, generation, path)?,
        };

        info!(
            "Registration '{}' submitted to registrar {} (generation {}), request {}",
            request.name,
            self.registrar_address(),
            generation,
            hash
        );
        Ok(hash)
    }

    async fn create_cron_upkeep(
        &self,
        factory: Address,
        target: Address,
        job: &CronJob,
    ) -> Result<Address> {
        let encoded_job = self
            .read(
                factory,
                CronUpkeepFactory::encodeCronJobCall {
                    target,
                    handler: job.handler.clone().into(),
                    cronString: job.cron_expression.clone(),
                },
            )
            .await?
            ._0;

        let receipt = self
            .submit(
                factory,
                CronUpkeepFactory::newCronUpkeepWithJobCall {
                    encodedJob: encoded_job,
                },
            )
            .await?;

        cron_upkeep_from_logs(&receipt, factory)
    }
}

/// Find the intermediary address in a cron factory receipt
fn cron_upkeep_from_logs(receipt: &TxReceipt, factory: Address) -> Result<Address> {
    let topic = CronUpkeepFactory::NewCronUpkeepCreated::SIGNATURE_HASH;
    let log = receipt
        .logs
        .iter()
        .find(|log| log.address == factory && log.topics.first() == Some(&topic))
        .ok_or_else(|| {
            Error::event_not_found(format!(
                "{} missing from cron factory receipt {}",
                CronUpkeepFactory::NewCronUpkeepCreated::SIGNATURE,
                receipt.transaction_hash
            ))
        })?;

    let (cron_upkeep, _owner) =
        CronUpkeepFactory::NewCronUpkeepCreated::abi_decode_data(&log.data, true)
            .map_err(|e| Error::abi(format!("decoding cron creation event: {}", e)))?;
    Ok(cron_upkeep)
}
