//! # Object References & Canonical Ordering
//!
//! Every ledger object is addressed by a `(space, type, instance)` triple,
//! printed as `"space.type.instance"`. On the wire only the instance travels
//! as a varint; space and type are implied by the field's position in its
//! operation. Collections of references serialized as *flat sets* must be
//! sorted into one canonical order regardless of how the caller assembled
//! them, because the encoded bytes are what gets signed.

use crate::core::{ByteReader, ByteWriter};
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instances occupy the low 48 bits of the order key.
pub const MAX_INSTANCE: u64 = (1 << 48) - 1;

/// Reference to one ledger object: `space.type.instance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    pub space: u8,
    pub ty: u8,
    pub instance: u64,
}

impl ObjectId {
    /// Construct a reference, rejecting instances wider than 48 bits.
    pub fn new(space: u8, ty: u8, instance: u64) -> Result<Self> {
        if instance > MAX_INSTANCE {
            return Err(CodecError::InvalidObjectId(format!(
                "instance {instance} exceeds 48-bit limit"
            )));
        }
        Ok(Self {
            space,
            ty,
            instance,
        })
    }

    /// Total-order key: `space << 56 | type << 48 | instance`.
    pub fn order_key(self) -> u64 {
        ((self.space as u64) << 56) | ((self.ty as u64) << 48) | self.instance
    }

    /// Binary form in a field whose space/type are implied by context.
    pub fn write(self, w: &mut ByteWriter) {
        w.write_varint(self.instance);
    }

    /// Decode an instance varint back into a full reference using the
    /// field's implied space/type.
    pub fn read(r: &mut ByteReader<'_>, space: u8, ty: u8) -> Result<Self> {
        let instance = r.read_varint()?;
        Self::new(space, ty, instance)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.ty, self.instance)
    }
}

impl FromStr for ObjectId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.');
        let (space, ty, instance) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(a), Some(b), Some(c), None) => (a, b, c),
            _ => {
                return Err(CodecError::InvalidObjectId(format!(
                    "expected space.type.instance, got {s:?}"
                )))
            }
        };
        let space = space
            .parse::<u8>()
            .map_err(|_| CodecError::InvalidObjectId(format!("bad space in {s:?}")))?;
        let ty = ty
            .parse::<u8>()
            .map_err(|_| CodecError::InvalidObjectId(format!("bad type in {s:?}")))?;
        let instance = instance
            .parse::<u64>()
            .map_err(|_| CodecError::InvalidObjectId(format!("bad instance in {s:?}")))?;
        Self::new(space, ty, instance)
    }
}

/// Sort references ascending by order key. Empty input stays empty.
/// Duplicates are not removed; supplying them is a caller error.
pub fn sort_canonical(ids: &mut [ObjectId]) {
    ids.sort_by_key(|id| id.order_key());
}

/// Encode a collection as a canonical flat set: varint(count) followed by
/// the instance varints in sorted order.
pub fn write_flat_set(w: &mut ByteWriter, ids: &[ObjectId]) {
    let mut sorted = ids.to_vec();
    sort_canonical(&mut sorted);
    w.write_varint(sorted.len() as u64);
    for id in &sorted {
        id.write(w);
    }
}

/// Decode a flat set whose elements share an implied space/type.
pub fn read_flat_set(r: &mut ByteReader<'_>, space: u8, ty: u8) -> Result<Vec<ObjectId>> {
    let count = r.read_varint()?;
    let mut out = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        out.push(ObjectId::read(r, space, ty)?);
    }
    Ok(out)
}
