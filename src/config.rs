//! # Network Profile
//!
//! Explicit, immutable configuration for the codec.
//!
//! Chain parameters used to live in a process-global registry patched at
//! startup; here they are an ordinary value the caller constructs once and
//! passes into every assembler entry point. The profile also owns the
//! per-operation extension schema table, built once in `Default` and never
//! mutated afterwards, which is what makes unsynchronized concurrent encoding
//! safe.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Direct instantiation with defaults
//!
//! Only the simple chain parameters are configurable; the schema table is
//! part of the protocol definition and always comes from
//! [`SchemaTable::standard`].

use crate::error::{CodecError, Result};
use crate::protocol::extensions::{ExtensionKind, ExtensionSchema};
use crate::protocol::operations::OperationKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current supported protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Immutable per-operation extension schema table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTable {
    schemas: BTreeMap<OperationKind, ExtensionSchema>,
}

impl SchemaTable {
    /// The standard protocol table: one schema per operation kind. Most
    /// operations define no extension slots yet; supplying any extension to
    /// those fails validation rather than being dropped.
    pub fn standard() -> Self {
        use crate::protocol::operations::ALL_KINDS;

        let mut schemas = BTreeMap::new();
        for kind in ALL_KINDS {
            let slots: &[(u8, ExtensionKind)] = match kind {
                // transfer accepts a note string (1) and a vesting period (4)
                OperationKind::Transfer => &[(1, ExtensionKind::Str), (4, ExtensionKind::U64)],
                OperationKind::OverrideTransfer => &[(1, ExtensionKind::Str)],
                // order-level fee override
                OperationKind::LimitOrderCreate => &[(1, ExtensionKind::U64)],
                OperationKind::ExchangeParticipate => &[(2, ExtensionKind::Amount)],
                // issued tokens may carry a display name, serial, rarity
                // class, and a backing amount
                OperationKind::NftIssue => &[
                    (1, ExtensionKind::Str),
                    (2, ExtensionKind::U64),
                    (3, ExtensionKind::U8),
                    (7, ExtensionKind::Amount),
                ],
                OperationKind::NftSell => &[(1, ExtensionKind::U64)],
                OperationKind::DiceBetPlace => &[(1, ExtensionKind::U64)],
                _ => &[],
            };
            schemas.insert(kind, ExtensionSchema::new(kind.name(), slots));
        }
        Self { schemas }
    }

    /// Schema for one operation kind. The table is total over all kinds.
    pub fn schema_for(&self, kind: OperationKind) -> &ExtensionSchema {
        // standard() inserts every kind; a miss would be a construction bug.
        &self.schemas[&kind]
    }
}

impl Default for SchemaTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Immutable network parameters passed into the assembler's entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Human-readable network name, for diagnostics only.
    #[serde(default = "default_network_name")]
    pub network_name: String,

    /// Chain identifier the signed bytes are bound to.
    #[serde(default)]
    pub chain_id: String,

    /// The core asset, as `space.type.instance` text.
    #[serde(default = "default_core_asset")]
    pub core_asset: String,

    /// Per-operation extension schemas. Protocol-defined, not configurable.
    #[serde(skip, default)]
    pub schemas: SchemaTable,
}

fn default_network_name() -> String {
    String::from("mainnet")
}

fn default_core_asset() -> String {
    String::from("1.3.0")
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            network_name: default_network_name(),
            chain_id: String::new(),
            core_asset: default_core_asset(),
            schemas: SchemaTable::standard(),
        }
    }
}

impl NetworkProfile {
    /// Load a profile from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CodecError::Config(format!("failed to read profile file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let profile: Self = toml::from_str(content)
            .map_err(|e| CodecError::Config(format!("failed to parse TOML: {e}")))?;
        profile.validate_strict()?;
        Ok(profile)
    }

    /// Apply overrides to the default profile.
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut profile = Self::default();
        mutator(&mut profile);
        profile
    }

    /// Validate the profile for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means the profile is
    /// valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.network_name.is_empty() {
            errors.push("network name cannot be empty".to_string());
        }

        if !self.chain_id.is_empty() {
            if self.chain_id.len() != 64 || !self.chain_id.bytes().all(|b| b.is_ascii_hexdigit()) {
                errors.push(format!(
                    "chain id must be 64 hex digits, got {:?}",
                    self.chain_id
                ));
            }
        }

        match self.core_asset.parse::<crate::protocol::object_id::ObjectId>() {
            Ok(id) => {
                if id.space != 1 || id.ty != 3 {
                    errors.push(format!(
                        "core asset must be an asset object (1.3.x), got {id}"
                    ));
                }
            }
            Err(e) => errors.push(format!("invalid core asset id: {e}")),
        }

        errors
    }

    /// Validate and return Result - convenience method.
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::Config(format!(
                "profile validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }

    /// The core asset reference. Valid for any profile that passed
    /// validation.
    pub fn core_asset_id(&self) -> Result<crate::protocol::object_id::ObjectId> {
        self.core_asset.parse()
    }
}
