//! # Memo Payloads
//!
//! Operations that carry a memo encode it as an optional field: a single zero
//! presence byte when absent, otherwise the memo bytes. The memo itself comes
//! in two shapes. Callers that run their own encryption hand us the final
//! opaque bytes verbatim; callers that want the structured wire record supply
//! sender/recipient keys, a nonce, and the (already encrypted) message body.
//! Encryption itself is an external collaborator; this module only fixes the
//! byte layout.

use crate::core::{ByteReader, ByteWriter};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Compressed public key length on the wire.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Structured memo record: fixed-size keys, nonce, then the message bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoData {
    #[serde(with = "serde_key")]
    pub from: [u8; PUBLIC_KEY_LEN],
    #[serde(with = "serde_key")]
    pub to: [u8; PUBLIC_KEY_LEN],
    pub nonce: u64,
    pub message: Vec<u8>,
}

/// A memo as attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    /// Pre-encoded memo bytes produced elsewhere, written verbatim.
    Opaque(Vec<u8>),
    /// Structured record encoded field by field.
    Data(MemoData),
}

impl Memo {
    pub fn write(&self, w: &mut ByteWriter) -> Result<()> {
        match self {
            Memo::Opaque(raw) => {
                w.write_raw(raw);
                Ok(())
            }
            Memo::Data(data) => {
                w.write_raw(&data.from);
                w.write_raw(&data.to);
                w.write_u64(data.nonce);
                w.write_bytes(&data.message);
                Ok(())
            }
        }
    }

    /// Decode always yields the structured form; an opaque memo was by
    /// definition written in the same layout.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let mut from = [0u8; PUBLIC_KEY_LEN];
        from.copy_from_slice(r.take(PUBLIC_KEY_LEN)?);
        let mut to = [0u8; PUBLIC_KEY_LEN];
        to.copy_from_slice(r.take(PUBLIC_KEY_LEN)?);
        let nonce = r.read_u64()?;
        let message = r.read_bytes()?.to_vec();
        Ok(Memo::Data(MemoData {
            from,
            to,
            nonce,
            message,
        }))
    }
}

/// Hex string form for compressed public keys in the serde representation.
pub(crate) mod serde_key {
    use super::PUBLIC_KEY_LEN;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &[u8; PUBLIC_KEY_LEN], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(key))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<[u8; PUBLIC_KEY_LEN], D::Error> {
        let text = String::deserialize(d)?;
        let raw = hex::decode(&text).map_err(serde::de::Error::custom)?;
        raw.try_into()
            .map_err(|_| serde::de::Error::custom("public key must be 33 bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoData {
        MemoData {
            from: [0x02; PUBLIC_KEY_LEN],
            to: [0x03; PUBLIC_KEY_LEN],
            nonce: 0xfeed,
            message: vec![1, 2, 3, 4],
        }
    }

    #[test]
    fn structured_memo_roundtrip() {
        let memo = Memo::Data(sample());
        let mut w = ByteWriter::new();
        memo.write(&mut w).unwrap();
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(Memo::read(&mut r).unwrap(), memo);
        assert!(r.is_empty());
    }

    #[test]
    fn opaque_memo_is_verbatim() {
        let memo = Memo::Data(sample());
        let mut w = ByteWriter::new();
        memo.write(&mut w).unwrap();

        let opaque = Memo::Opaque(w.as_slice().to_vec());
        let mut w2 = ByteWriter::new();
        opaque.write(&mut w2).unwrap();
        assert_eq!(w.as_slice(), w2.as_slice());
    }
}
