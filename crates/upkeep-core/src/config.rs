//! Configuration types for the upkeep admin adapter
//!
//! This module defines all configuration structures used throughout the crate.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Contract addresses and extraction settings for one adapter instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Registry contract
    pub registry: Address,

    /// Registrar contract
    ///
    /// When absent, the registrar is read from the registry's on-chain config.
    #[serde(default)]
    pub registrar: Option<Address>,

    /// Funding token contract that exposes `transferAndCall`
    pub link_token: Address,

    /// Cron upkeep factory, required only for time-based registration
    #[serde(default)]
    pub cron_factory: Option<Address>,

    /// Signature topic of the registrar's registration event
    ///
    /// When set, the request hash is taken from the first log whose topic 0
    /// matches, instead of from a fixed log position.
    #[serde(default)]
    pub registration_event_topic: Option<B256>,
}

impl AdminConfig {
    /// Create a configuration with the required addresses
    pub fn new(registry: Address, link_token: Address) -> Self {
        Self {
            registry,
            registrar: None,
            link_token,
            cron_factory: None,
            registration_event_topic: None,
        }
    }

    /// Pin the registrar address
    pub fn with_registrar(mut self, registrar: Address) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Set the cron upkeep factory
    pub fn with_cron_factory(mut self, factory: Address) -> Self {
        self.cron_factory = Some(factory);
        self
    }

    /// Match the registration event by signature instead of position
    pub fn with_registration_event_topic(mut self, topic: B256) -> Self {
        self.registration_event_topic = Some(topic);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.registry.is_zero() {
            return Err(crate::Error::config("Registry address cannot be zero"));
        }
        if self.link_token.is_zero() {
            return Err(crate::Error::config("Funding token address cannot be zero"));
        }
        if self.registrar.is_some_and(|r| r.is_zero()) {
            return Err(crate::Error::config("Registrar address cannot be zero"));
        }
        if self.cron_factory.is_some_and(|f| f.is_zero()) {
            return Err(crate::Error::config("Cron factory address cannot be zero"));
        }
        Ok(())
    }
}

/// JSON-RPC broadcaster configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Node endpoint (http or https)
    pub url: String,

    /// Interval between receipt polls (in milliseconds)
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Time to wait for a receipt before giving up (in seconds)
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,

    /// Per-request HTTP timeout (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl RpcConfig {
    /// Create a configuration for the given endpoint with default timings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("RPC URL cannot be empty"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "RPC URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }
        if self.receipt_poll_interval_ms == 0 {
            return Err(crate::Error::config("Receipt poll interval must be > 0"));
        }
        if self.receipt_timeout_secs == 0 {
            return Err(crate::Error::config("Receipt timeout must be > 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }
        Ok(())
    }
}

fn default_receipt_poll_interval_ms() -> u64 {
    1000
}

fn default_receipt_timeout_secs() -> u64 {
    120
}

fn default_http_timeout_secs() -> u64 {
    30
}
