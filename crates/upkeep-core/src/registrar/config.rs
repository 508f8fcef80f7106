// # Registrar auto-approval configuration
//
// 1.2-shape and 2.0 registrars keep a single auto-approval policy. 2.1
// registrars keep one policy per trigger kind, plus a shared registry address
// and minimum funding, so the no-argument read is undefined there.

use super::TriggerKind;
use crate::admin::UpkeepAdmin;
use crate::contracts::{AutomationRegistrar2_1, KeeperRegistrar1_2, KeeperRegistrar2_0};
use crate::error::{Error, Result};
use crate::version::ProtocolGeneration;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Auto-approval policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoApproveType {
    #[default]
    Disabled,
    EnabledSenderAllowlist,
    EnabledAll,
}

impl TryFrom<u8> for AutoApproveType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(AutoApproveType::Disabled),
            1 => Ok(AutoApproveType::EnabledSenderAllowlist),
            2 => Ok(AutoApproveType::EnabledAll),
            other => Err(Error::abi(format!("unknown auto-approve type {}", other))),
        }
    }
}

/// Registrar auto-approval configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationConfig {
    pub auto_approve_type: AutoApproveType,
    pub auto_approve_max_allowed: u32,
    pub approved_count: u32,
    /// Registry that approved upkeeps are created on
    pub registry: Address,
    /// Minimum registration funding in juels
    pub min_link_juels: U256,
}

impl UpkeepAdmin {
    /// Read the registrar's auto-approval configuration
    ///
    /// Fails with [`Error::MissingTriggerType`] on 2.1 registrars; use
    /// [`UpkeepAdmin::registration_config_for`] there.
    pub async fn registration_config(&self) -> Result<RegistrationConfig> {
        let registrar = self.registrar_address();

        match self.registrar_generation()? {
            ProtocolGeneration::Gen1_0 => {
                let config = self
                    .read(registrar, KeeperRegistrar1_2::getRegistrationConfigCall {})
                    .await?;
                Ok(RegistrationConfig {
                    auto_approve_type: AutoApproveType::try_from(config.autoApproveConfigType)?,
                    auto_approve_max_allowed: config.autoApproveMaxAllowed,
                    approved_count: config.approvedCount,
                    registry: config.keeperRegistry,
                    min_link_juels: config.minLINKJuels,
                })
            }
            ProtocolGeneration::Gen2_0 => {
                let config = self
                    .read(registrar, KeeperRegistrar2_0::getRegistrationConfigCall {})
                    .await?;
                Ok(RegistrationConfig {
                    auto_approve_type: AutoApproveType::try_from(config.autoApproveConfigType)?,
                    auto_approve_max_allowed: config.autoApproveMaxAllowed,
                    approved_count: config.approvedCount,
                    registry: config.keeperRegistry,
                    min_link_juels: config.minLINKJuels,
                })
            }
            ProtocolGeneration::Gen2_1 => Err(Error::MissingTriggerType),
        }
    }

    /// Read the auto-approval configuration for a trigger kind
    ///
    /// On 2.1 registrars this merges the per-trigger policy with the shared
    /// registry address and minimum funding. Older registrars have a single
    /// policy; the trigger kind is ignored.
    pub async fn registration_config_for(&self, kind: TriggerKind) -> Result<RegistrationConfig> {
        match self.registrar_generation()? {
            ProtocolGeneration::Gen2_1 => {
                let registrar = self.registrar_address();
                let details = self
                    .read(
                        registrar,
                        AutomationRegistrar2_1::getTriggerRegistrationDetailsCall {
                            triggerType: kind.abi_tag(),
                        },
                    )
                    .await?
                    ._0;
                let shared = self
                    .read(registrar, AutomationRegistrar2_1::getConfigCall {})
                    .await?;

                Ok(RegistrationConfig {
                    auto_approve_type: AutoApproveType::try_from(details.autoApproveType)?,
                    auto_approve_max_allowed: details.autoApproveMaxAllowed,
                    approved_count: details.approvedCount,
                    registry: shared.keeperRegistry,
                    min_link_juels: shared.minLINKJuels,
                })
            }
            ProtocolGeneration::Gen1_0 | ProtocolGeneration::Gen2_0 => {
                self.registration_config().await
            }
        }
    }
}
