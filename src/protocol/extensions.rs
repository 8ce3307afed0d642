//! # Extension Registry & Variant Encoder
//!
//! Operations carry a forward-compatible extension set: optional, identified
//! sub-records appended after the principal fields. Each extension pairs a
//! small integer id with a tagged-variant payload. The payload tag travels on
//! the wire so that a decoder can tell a bare scalar from a structured record
//! without consulting anything but the bytes.
//!
//! ## Wire Form
//! `varint(count)` then, per entry, `varint(id) + varint(type_tag) + payload`.
//! Entries are serialized ascending by id regardless of input order; an empty
//! set is the single byte `0x00`.
//!
//! ## Schema Validation
//! Every operation kind owns an [`ExtensionSchema`] mapping the ids it accepts
//! to the payload kind expected in that slot. An id outside the schema fails
//! [`CodecError::UnknownExtension`] on both encode and decode — an
//! unrecognized extension may carry semantically significant state, so it is
//! never silently skipped. Payload kind mismatches fail eagerly as well.
//!
//! Schemas are plain immutable tables built once at startup and owned by the
//! network profile; nothing here is global or mutable.

use crate::core::{ByteReader, ByteWriter};
use crate::error::{CodecError, Result};
use crate::protocol::asset::AssetAmount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payload kind a schema slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionKind {
    Str,
    U64,
    U8,
    Amount,
}

impl ExtensionKind {
    /// Variant type tag as it appears on the wire.
    pub fn tag(self) -> u64 {
        match self {
            ExtensionKind::Str => 0,
            ExtensionKind::U64 => 1,
            ExtensionKind::U8 => 2,
            ExtensionKind::Amount => 3,
        }
    }
}

/// One tagged-variant payload. Primitive scalars are first-class variants,
/// not wrapped in records: several extension values are bare scalars on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionValue {
    Str(String),
    U64(u64),
    U8(u8),
    Amount(AssetAmount),
}

impl ExtensionValue {
    pub fn kind(&self) -> ExtensionKind {
        match self {
            ExtensionValue::Str(_) => ExtensionKind::Str,
            ExtensionValue::U64(_) => ExtensionKind::U64,
            ExtensionValue::U8(_) => ExtensionKind::U8,
            ExtensionValue::Amount(_) => ExtensionKind::Amount,
        }
    }

    fn write_payload(&self, w: &mut ByteWriter) -> Result<()> {
        match self {
            ExtensionValue::Str(s) => w.write_string(s),
            ExtensionValue::U64(v) => w.write_u64(*v),
            ExtensionValue::U8(v) => w.write_u8(*v),
            ExtensionValue::Amount(a) => a.write(w),
        }
        Ok(())
    }

    fn read_payload(r: &mut ByteReader<'_>, kind: ExtensionKind) -> Result<Self> {
        Ok(match kind {
            ExtensionKind::Str => ExtensionValue::Str(r.read_string()?),
            ExtensionKind::U64 => ExtensionValue::U64(r.read_u64()?),
            ExtensionKind::U8 => ExtensionValue::U8(r.read_u8()?),
            ExtensionKind::Amount => ExtensionValue::Amount(AssetAmount::read(r)?),
        })
    }
}

/// One extension attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub id: u8,
    pub value: ExtensionValue,
}

impl Extension {
    pub fn new(id: u8, value: ExtensionValue) -> Self {
        Self { id, value }
    }
}

/// Immutable per-operation table of accepted extension slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSchema {
    operation: &'static str,
    slots: BTreeMap<u8, ExtensionKind>,
}

impl ExtensionSchema {
    pub fn new(operation: &'static str, slots: &[(u8, ExtensionKind)]) -> Self {
        Self {
            operation,
            slots: slots.iter().copied().collect(),
        }
    }

    /// Operation kind this schema belongs to.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Expected payload kind for an id, if the id is part of the schema.
    pub fn kind_of(&self, id: u8) -> Option<ExtensionKind> {
        self.slots.get(&id).copied()
    }

    /// Ids accepted by this schema, ascending.
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.slots.keys().copied()
    }

    /// Encode an extension set: validate every entry against the schema,
    /// sort ascending by id, then emit count and entries.
    pub fn write_set(&self, w: &mut ByteWriter, extensions: &[Extension]) -> Result<()> {
        let mut sorted: Vec<&Extension> = Vec::with_capacity(extensions.len());
        for ext in extensions {
            let expected = self.kind_of(ext.id).ok_or(CodecError::UnknownExtension {
                id: ext.id,
                operation: self.operation,
            })?;
            if ext.value.kind() != expected {
                return Err(CodecError::Value(format!(
                    "extension id {} on {} expects {:?} payload, got {:?}",
                    ext.id,
                    self.operation,
                    expected,
                    ext.value.kind()
                )));
            }
            if sorted.iter().any(|e| e.id == ext.id) {
                return Err(CodecError::Value(format!(
                    "duplicate extension id {} on {}",
                    ext.id, self.operation
                )));
            }
            sorted.push(ext);
        }
        sorted.sort_by_key(|e| e.id);

        w.write_varint(sorted.len() as u64);
        for ext in sorted {
            w.write_varint(ext.id as u64);
            w.write_varint(ext.value.kind().tag());
            ext.value.write_payload(w)?;
        }
        Ok(())
    }

    /// Decode an extension set. Fails on ids outside the schema exactly as
    /// encode does; extensions are never dropped on the floor.
    pub fn read_set(&self, r: &mut ByteReader<'_>) -> Result<Vec<Extension>> {
        let count = r.read_varint()?;
        let mut out = Vec::with_capacity(count.min(64) as usize);
        let mut last_id: Option<u8> = None;
        for _ in 0..count {
            let raw_id = r.read_varint()?;
            let id = u8::try_from(raw_id)
                .map_err(|_| CodecError::Value(format!("extension id {raw_id} exceeds u8")))?;
            // ids must be strictly ascending, which also rules out duplicates
            if last_id.is_some_and(|prev| id <= prev) {
                return Err(CodecError::Value(format!(
                    "extension id {} on {} out of canonical order",
                    id, self.operation
                )));
            }
            last_id = Some(id);
            let expected = self.kind_of(id).ok_or(CodecError::UnknownExtension {
                id,
                operation: self.operation,
            })?;
            let tag = r.read_varint()?;
            if tag != expected.tag() {
                return Err(CodecError::Value(format!(
                    "extension id {} on {} carries variant tag {}, expected {}",
                    id,
                    self.operation,
                    tag,
                    expected.tag()
                )));
            }
            out.push(Extension::new(id, ExtensionValue::read_payload(r, expected)?));
        }
        Ok(out)
    }
}
