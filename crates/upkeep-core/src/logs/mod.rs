//! Request hash extraction from funded-call receipts
//!
//! A funded registration emits, in order:
//!
//! ```text
//! [0] token transfer notification
//! [1] registrar bookkeeping event
//! [2] registration-submitted event carrying the request hash
//! ```
//!
//! The hash is recovered by position, using a fixed (log index, topic slot)
//! rule per generation and registration path. If the emitting contracts ever
//! reorder their events, positional extraction returns the wrong value
//! without failing. Configure a signature topic (see
//! [`crate::config::AdminConfig::registration_event_topic`]) to match by
//! event signature instead.

use crate::error::{Error, Result};
use crate::registrar::TriggerKind;
use crate::traits::Log;
use crate::version::ProtocolGeneration;
use alloy_primitives::B256;

/// Position of the registration-submitted event in a funded-call receipt
pub const REQUEST_EVENT_INDEX: usize = 2;

/// Topic slot holding the request hash on the condition and cron paths
pub const REQUEST_HASH_TOPIC: usize = 1;

/// Topic slot read on the log-trigger path
///
/// Slot 0 is the event signature, not the hash. Deployed tooling reads this
/// slot for log-trigger registrations and callers depend on the value, so it
/// is kept as-is until checked against a live registrar's event layout.
pub const LOG_TRIGGER_REQUEST_HASH_TOPIC: usize = 0;

/// Where to find the request hash in a receipt's logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Index into the receipt's logs
    pub event_index: usize,
    /// Index into that log's topics
    pub topic_index: usize,
}

const CONDITION_RULE: ExtractionRule = ExtractionRule {
    event_index: REQUEST_EVENT_INDEX,
    topic_index: REQUEST_HASH_TOPIC,
};

const LOG_TRIGGER_RULE: ExtractionRule = ExtractionRule {
    event_index: REQUEST_EVENT_INDEX,
    topic_index: LOG_TRIGGER_REQUEST_HASH_TOPIC,
};

/// Look up the extraction rule for a registrar generation and path
///
/// Log-trigger and cron paths only exist on 2.1 registrars.
pub fn rule(generation: ProtocolGeneration, kind: TriggerKind) -> Result<ExtractionRule> {
    use ProtocolGeneration::*;

    match (generation, kind) {
        (Gen1_0 | Gen2_0 | Gen2_1, TriggerKind::Condition) => Ok(CONDITION_RULE),
        (Gen2_1, TriggerKind::Cron) => Ok(CONDITION_RULE),
        (Gen2_1, TriggerKind::Log) => Ok(LOG_TRIGGER_RULE),
        (Gen1_0 | Gen2_0, TriggerKind::Log | TriggerKind::Cron) => {
            Err(Error::registrar_2_1_only())
        }
    }
}

/// Extract the request hash by position
pub fn extract(logs: &[Log], generation: ProtocolGeneration, kind: TriggerKind) -> Result<B256> {
    let rule = rule(generation, kind)?;

    let log = logs.get(rule.event_index).ok_or_else(|| {
        Error::event_not_found(format!(
            "expected at least {} logs from funded call, receipt has {}",
            rule.event_index + 1,
            logs.len()
        ))
    })?;

    log.topics.get(rule.topic_index).copied().ok_or_else(|| {
        Error::event_not_found(format!(
            "log {} has {} topics, need topic {}",
            rule.event_index,
            log.topics.len(),
            rule.topic_index
        ))
    })
}

/// Extract the request hash from the first log whose signature matches
///
/// The hash is the first indexed argument (topic 1).
pub fn extract_by_signature(logs: &[Log], signature_topic: B256) -> Result<B256> {
    logs.iter()
        .find(|log| log.topics.first() == Some(&signature_topic))
        .and_then(|log| log.topics.get(REQUEST_HASH_TOPIC).copied())
        .ok_or_else(|| {
            Error::event_not_found(format!(
                "no log with signature {:?} and an indexed request hash",
                signature_topic
            ))
        })
}
