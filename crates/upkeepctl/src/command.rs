//! Command-line parsing and dispatch

use alloy_primitives::{B256, Bytes, U256};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use upkeep_core::{Address, CronJob, TriggerKind, UpkeepAdmin, UpkeepParams};

/// Administer upkeeps on a registry and its registrar
///
/// Connection settings come from the environment; see the UPKEEP_* variables.
#[derive(Parser, Debug)]
#[command(name = "upkeepctl", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// One CLI invocation
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show resolved contracts and generations
    Info,

    /// Registry aggregate state
    State,

    /// Read one upkeep
    Upkeep {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    /// Active upkeep IDs; a max of zero lists every ID from start
    ActiveIds {
        #[arg(value_parser = parse_u256, default_value = "0")]
        start: U256,
        #[arg(value_parser = parse_u256, default_value = "0")]
        max: U256,
    },

    /// Minimum balance in juels an upkeep needs
    MinBalance {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    /// Upkeep transcoder version (1.x registries)
    TranscoderVersion,

    /// Registrar auto-approval configuration
    RegistrationConfig {
        /// condition, log or cron; required on 2.1 registrars
        #[arg(value_parser = parse_trigger_kind)]
        kind: Option<TriggerKind>,
    },

    /// Read a pending registration request
    Pending {
        #[arg(value_parser = parse_hash)]
        hash: B256,
    },

    /// Fund an upkeep
    AddFunds {
        #[arg(value_parser = parse_u256)]
        id: U256,
        /// Juels, decimal
        amount: u128,
    },

    Pause {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    Unpause {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    Cancel {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    SetGasLimit {
        #[arg(value_parser = parse_u256)]
        id: U256,
        gas_limit: u32,
    },

    /// Withdraw a cancelled upkeep's balance
    Withdraw {
        #[arg(value_parser = parse_u256)]
        id: U256,
        #[arg(value_parser = parse_address)]
        to: Address,
    },

    /// Propose a new upkeep admin
    TransferAdmin {
        #[arg(value_parser = parse_u256)]
        id: U256,
        #[arg(value_parser = parse_address)]
        proposed: Address,
    },

    AcceptAdmin {
        #[arg(value_parser = parse_u256)]
        id: U256,
    },

    /// Register a condition or custom-logic upkeep
    Register {
        #[command(flatten)]
        upkeep: UpkeepArgs,
        /// Hex payload for the check function
        #[arg(value_parser = parse_hex)]
        check_data: Option<Bytes>,
    },

    /// Register a log-trigger upkeep (2.1 registrars)
    RegisterLog {
        #[command(flatten)]
        upkeep: UpkeepArgs,
        #[arg(value_parser = parse_hex)]
        trigger_config: Bytes,
    },

    /// Deploy a cron intermediary for the target and register it (2.1 registrars)
    RegisterCron {
        #[command(flatten)]
        upkeep: UpkeepArgs,
        /// Calldata invoked on the target, usually a bare selector
        #[arg(value_parser = parse_hex)]
        handler: Bytes,
        cron_expression: String,
    },

    /// Register an already deployed cron intermediary (2.1 registrars)
    RegisterCronUpkeep {
        #[arg(value_parser = parse_address)]
        cron_upkeep: Address,
        #[command(flatten)]
        upkeep: UpkeepArgs,
    },

    /// Cancel a pending registration request
    CancelRequest {
        #[arg(value_parser = parse_hash)]
        hash: B256,
    },
}

/// Fields shared by every registration command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UpkeepArgs {
    pub name: String,
    #[arg(value_parser = parse_address)]
    pub contract: Address,
    pub gas_limit: u32,
    /// Initial funding in juels, decimal
    pub amount: u128,
}

impl UpkeepArgs {
    fn into_params(self) -> UpkeepParams {
        UpkeepParams::new(self.name, self.contract, self.gas_limit, self.amount)
    }
}

impl Command {
    /// Run against a connected adapter
    pub async fn execute(self, admin: &UpkeepAdmin) -> Result<Value> {
        let value = match self {
            Command::Info => json!({
                "registry": admin.registry_address(),
                "registry_generation": admin.registry_generation(),
                "registrar": admin.registrar_address(),
                "registrar_generation": admin.registrar_generation().ok(),
                "caller": admin.caller(),
            }),
            Command::State => serde_json::to_value(admin.get_state().await?)?,
            Command::Upkeep { id } => serde_json::to_value(admin.get_upkeep(id).await?)?,
            Command::ActiveIds { start, max } => {
                let ids = admin.get_active_upkeep_ids(start, max).await?;
                json!(ids.iter().map(|id| id.to_string()).collect::<Vec<_>>())
            }
            Command::MinBalance { id } => {
                json!({ "min_balance": admin.get_min_balance_for_upkeep(id).await?.to_string() })
            }
            Command::TranscoderVersion => {
                json!({ "transcoder_version": admin.get_upkeep_transcoder_version().await? })
            }
            Command::RegistrationConfig { kind: None } => {
                serde_json::to_value(admin.registration_config().await?)?
            }
            Command::RegistrationConfig { kind: Some(kind) } => {
                serde_json::to_value(admin.registration_config_for(kind).await?)?
            }
            Command::Pending { hash } => {
                serde_json::to_value(admin.get_pending_request(hash).await?)?
            }
            Command::AddFunds { id, amount } => {
                serde_json::to_value(admin.add_funds(id, amount).await?)?
            }
            Command::Pause { id } => serde_json::to_value(admin.pause_upkeep(id).await?)?,
            Command::Unpause { id } => serde_json::to_value(admin.unpause_upkeep(id).await?)?,
            Command::Cancel { id } => serde_json::to_value(admin.cancel_upkeep(id).await?)?,
            Command::SetGasLimit { id, gas_limit } => {
                serde_json::to_value(admin.set_upkeep_gas_limit(id, gas_limit).await?)?
            }
            Command::Withdraw { id, to } => {
                serde_json::to_value(admin.withdraw_funds(id, to).await?)?
            }
            Command::TransferAdmin { id, proposed } => {
                serde_json::to_value(admin.transfer_upkeep_admin(id, proposed).await?)?
            }
            Command::AcceptAdmin { id } => {
                serde_json::to_value(admin.accept_upkeep_admin(id).await?)?
            }
            Command::Register { upkeep, check_data } => {
                let mut params = upkeep.into_params();
                if let Some(check_data) = check_data {
                    params = params.with_check_data(check_data.to_vec());
                }
                json!({ "request_hash": admin.register_condition_or_custom(params).await? })
            }
            Command::RegisterLog {
                upkeep,
                trigger_config,
            } => {
                let hash = admin
                    .register_log_trigger(upkeep.into_params(), trigger_config.to_vec())
                    .await?;
                json!({ "request_hash": hash })
            }
            Command::RegisterCron {
                upkeep,
                handler,
                cron_expression,
            } => {
                let job = CronJob::new(handler.to_vec(), cron_expression);
                serde_json::to_value(admin.register_time_based(upkeep.into_params(), job).await?)?
            }
            Command::RegisterCronUpkeep {
                cron_upkeep,
                upkeep,
            } => {
                let hash = admin
                    .register_cron_upkeep(cron_upkeep, upkeep.into_params())
                    .await?;
                json!({ "cron_upkeep": cron_upkeep, "request_hash": hash })
            }
            Command::CancelRequest { hash } => {
                serde_json::to_value(admin.cancel_request(hash).await?)?
            }
        };

        Ok(value)
    }
}

fn parse_trigger_kind(text: &str) -> Result<TriggerKind, String> {
    match text {
        "condition" => Ok(TriggerKind::Condition),
        "log" => Ok(TriggerKind::Log),
        "cron" => Ok(TriggerKind::Cron),
        other => Err(format!("unknown trigger kind '{}' (condition, log, cron)", other)),
    }
}

/// `0x`-prefixed (or bare) hex
fn parse_hex(text: &str) -> Result<Bytes, String> {
    text.parse()
        .map_err(|e| format!("invalid hex '{}': {}", text, e))
}

pub fn parse_address(text: &str) -> Result<Address, String> {
    text.parse()
        .map_err(|e| format!("invalid address '{}': {}", text, e))
}

fn parse_hash(text: &str) -> Result<B256, String> {
    text.parse()
        .map_err(|e| format!("invalid 32-byte hash '{}': {}", text, e))
}

/// Decimal, or hex with a `0x` prefix
fn parse_u256(text: &str) -> Result<U256, String> {
    text.parse()
        .map_err(|e| format!("invalid number '{}': {}", text, e))
}
