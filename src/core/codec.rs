//! # Primitive Codec
//!
//! Byte-level building blocks for the canonical wire format.
//!
//! Every structure in the protocol bottoms out in the primitives defined here:
//! fixed-width little-endian integers, LEB128-style varints, length-prefixed
//! byte strings, presence-prefixed optionals, and second-resolution
//! timestamps. The encoding is canonical: for any logical value there is
//! exactly one byte representation, because the output is what ultimately gets
//! signed.
//!
//! ## Wire Rules
//! - Fixed-width unsigned integers: little-endian, widths 8/16/32/64
//! - Signed 64-bit: little-endian two's complement
//! - Varint: 7-bit groups, low group first, 0x80 continuation on all but last
//! - Bytes: varint(length) + raw bytes; strings are UTF-8 via the same rule
//! - Bool: single byte, 0 or 1 (decode rejects anything else)
//! - Optional: 1 presence byte, then the value iff present
//! - Point-in-time: u32 unix seconds, little-endian
//!
//! Both [`ByteWriter`] and [`ByteReader`] are pure state machines over a
//! buffer. They perform no I/O and hold no shared state, so concurrent use of
//! independent instances needs no synchronization.

use crate::error::{constants, CodecError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// Declared width of an unsigned integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Number of bits in this width.
    pub fn bits(self) -> u8 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Largest value representable at this width.
    pub fn max_value(self) -> u64 {
        match self {
            IntWidth::W8 => u8::MAX as u64,
            IntWidth::W16 => u16::MAX as u64,
            IntWidth::W32 => u32::MAX as u64,
            IntWidth::W64 => u64::MAX,
        }
    }
}

/// A point in time with one-second resolution, as carried on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct PointInTime(pub u32);

impl PointInTime {
    /// Construct from unix seconds.
    pub fn from_unix(secs: u32) -> Self {
        Self(secs)
    }

    /// Unix seconds.
    pub fn as_unix(self) -> u32 {
        self.0
    }

    /// Offset by a signed number of seconds, failing if the result leaves
    /// the representable range.
    pub fn offset(self, delta: i64) -> Result<Self> {
        let shifted = (self.0 as i64).checked_add(delta).ok_or(CodecError::Range {
            value: i128::from(self.0) + i128::from(delta),
            width: 32,
        })?;
        let secs = u32::try_from(shifted).map_err(|_| CodecError::Range {
            value: shifted as i128,
            width: 32,
        })?;
        Ok(Self(secs))
    }
}

/// Append-only writer producing canonical wire bytes.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the encoded bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.put_u16_le(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.put_u32_le(v);
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.put_u64_le(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.put_i64_le(v);
    }

    /// Write a signed input into a declared unsigned field, validating sign
    /// and width. This is the checked entry point for schema-driven paths
    /// where the caller's value arrives untyped.
    pub fn write_uint(&mut self, value: i64, width: IntWidth) -> Result<()> {
        if value < 0 {
            return Err(CodecError::Range {
                value: value as i128,
                width: width.bits(),
            });
        }
        let v = value as u64;
        if v > width.max_value() {
            return Err(CodecError::Range {
                value: value as i128,
                width: width.bits(),
            });
        }
        match width {
            IntWidth::W8 => self.write_u8(v as u8),
            IntWidth::W16 => self.write_u16(v as u16),
            IntWidth::W32 => self.write_u32(v as u32),
            IntWidth::W64 => self.write_u64(v),
        }
        Ok(())
    }

    /// LEB128-style varint: 7-bit groups, continuation bit on all but last.
    pub fn write_varint(&mut self, mut v: u64) {
        loop {
            let byte = (v & 0x7f) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.put_u8(byte);
                return;
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    /// varint(length) + raw bytes.
    pub fn write_bytes(&mut self, v: &[u8]) {
        self.write_varint(v.len() as u64);
        self.buf.put_slice(v);
    }

    /// UTF-8 bytes via [`Self::write_bytes`].
    pub fn write_string(&mut self, v: &str) {
        self.write_bytes(v.as_bytes());
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.put_u8(v as u8);
    }

    pub fn write_point_in_time(&mut self, v: PointInTime) {
        self.write_u32(v.0);
    }

    /// Raw bytes with no length prefix. Used where an outer structure has
    /// already committed to the length (fixed-size keys, opaque memos).
    pub fn write_raw(&mut self, v: &[u8]) {
        self.buf.put_slice(v);
    }

    /// One presence byte, then the value iff present.
    pub fn write_optional<T, F>(&mut self, value: Option<&T>, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self, &T) -> Result<()>,
    {
        match value {
            Some(v) => {
                self.write_u8(1);
                f(self, v)
            }
            None => {
                self.write_u8(0);
                Ok(())
            }
        }
    }
}

/// Bounds-checked cursor over canonical wire bytes.
///
/// Every read validates remaining length before touching the buffer and
/// reports the exact offset and shortfall on truncation, so a malformed
/// payload fails loudly instead of being misread.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take `n` bytes, failing with the exact shortfall on truncation.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut out: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift == 63 && byte > 1 {
                return Err(CodecError::VarintOverflow(start));
            }
            out |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(out);
            }
            shift += 7;
            if shift > 63 {
                return Err(CodecError::VarintOverflow(start));
            }
        }
    }

    /// varint(length) + raw bytes; returns a zero-copy slice of the input.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| CodecError::UnexpectedEof {
            offset: self.pos,
            needed: usize::MAX,
        })?;
        self.take(len)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let raw = self.read_bytes()?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| CodecError::Value(format!("invalid UTF-8 in string field: {e}")))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::Value(constants::ERR_BAD_BOOL.to_string())),
        }
    }

    pub fn read_point_in_time(&mut self) -> Result<PointInTime> {
        Ok(PointInTime(self.read_u32()?))
    }

    /// One presence byte, then the value iff present.
    pub fn read_optional<T, F>(&mut self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if self.read_bool()? {
            Ok(Some(f(self)?))
        } else {
            Ok(None)
        }
    }

    /// Fail unless the entire input has been consumed. Called by top-level
    /// decoders so trailing garbage never round-trips silently.
    pub fn expect_end(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CodecError::Value(format!(
                "{} trailing bytes after decoded structure",
                self.remaining()
            )))
        }
    }
}
