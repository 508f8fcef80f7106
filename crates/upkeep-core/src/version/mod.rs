//! Protocol generation resolution
//!
//! Deployed registries and registrars self-report a `typeAndVersion` string.
//! The string is classified by exact table lookup, never parsed: several point
//! releases share one wire shape, and anything outside the table is rejected.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three incompatible registry/registrar wire generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolGeneration {
    /// Legacy 1.x registries (registrar wire shape "1.2")
    Gen1_0,
    /// OCR-based 2.0 family
    Gen2_0,
    /// 2.1, with per-trigger registration
    Gen2_1,
}

impl fmt::Display for ProtocolGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolGeneration::Gen1_0 => "1.0",
            ProtocolGeneration::Gen2_0 => "2.0",
            ProtocolGeneration::Gen2_1 => "2.1",
        };
        f.write_str(name)
    }
}

const REGISTRY_VERSIONS: &[(&str, ProtocolGeneration)] = &[
    ("KeeperRegistry 1.0.0", ProtocolGeneration::Gen1_0),
    ("KeeperRegistry 1.1.0", ProtocolGeneration::Gen1_0),
    ("KeeperRegistry 1.2.0", ProtocolGeneration::Gen1_0),
    ("KeeperRegistry 1.3.0", ProtocolGeneration::Gen1_0),
    ("KeeperRegistry 2.0.0", ProtocolGeneration::Gen2_0),
    ("KeeperRegistry 2.0.1", ProtocolGeneration::Gen2_0),
    ("KeeperRegistry 2.0.2", ProtocolGeneration::Gen2_0),
    ("KeeperRegistry 2.1.0", ProtocolGeneration::Gen2_1),
];

const REGISTRAR_VERSIONS: &[(&str, ProtocolGeneration)] = &[
    ("KeeperRegistrar 1.0.0", ProtocolGeneration::Gen1_0),
    ("KeeperRegistrar 1.1.0", ProtocolGeneration::Gen1_0),
    ("KeeperRegistrar 2.0.0", ProtocolGeneration::Gen2_0),
    ("KeeperRegistrar 2.1.0", ProtocolGeneration::Gen2_1),
    ("AutomationRegistrar 2.1.0", ProtocolGeneration::Gen2_1),
];

fn lookup(table: &[(&str, ProtocolGeneration)], version: &str) -> Option<ProtocolGeneration> {
    table
        .iter()
        .find(|(known, _)| *known == version)
        .map(|(_, generation)| *generation)
}

/// Classify a registry `typeAndVersion` string
///
/// Fails with [`Error::UnsupportedRegistryVersion`] for any string outside
/// the table.
pub fn resolve(version: &str) -> Result<ProtocolGeneration> {
    lookup(REGISTRY_VERSIONS, version).ok_or_else(|| Error::UnsupportedRegistryVersion {
        version: version.to_string(),
    })
}

/// Classify a registrar `typeAndVersion` string
///
/// Fails with [`Error::UnsupportedRegistrarVersion`] for any string outside
/// the table.
pub fn resolve_registrar(version: &str) -> Result<ProtocolGeneration> {
    lookup(REGISTRAR_VERSIONS, version).ok_or_else(|| Error::UnsupportedRegistrarVersion {
        version: version.to_string(),
    })
}

/// Whether a registry version resolves to 1.x; wraps [`resolve`]
pub fn is_gen1_0(version: &str) -> bool {
    matches!(resolve(version), Ok(ProtocolGeneration::Gen1_0))
}

/// Whether a registry version resolves to 2.0; wraps [`resolve`]
pub fn is_gen2_0(version: &str) -> bool {
    matches!(resolve(version), Ok(ProtocolGeneration::Gen2_0))
}

/// Whether a registry version resolves to 2.1; wraps [`resolve`]
pub fn is_gen2_1(version: &str) -> bool {
    matches!(resolve(version), Ok(ProtocolGeneration::Gen2_1))
}
