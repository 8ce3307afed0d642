//! Asset amounts: a signed 64-bit quantity paired with the asset it denominates.

use crate::core::{ByteReader, ByteWriter};
use crate::error::Result;
use crate::protocol::object_id::ObjectId;
use serde::{Deserialize, Serialize};

/// Asset objects live in space 1, type 3.
pub const ASSET_SPACE: u8 = 1;
pub const ASSET_TYPE: u8 = 3;

/// A quantity of a specific asset. Amounts are signed on the wire; whether a
/// negative amount is meaningful is an operation-level concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    pub amount: i64,
    pub asset_id: ObjectId,
}

impl AssetAmount {
    pub fn new(amount: i64, asset_id: ObjectId) -> Self {
        Self { amount, asset_id }
    }

    /// Wire form: i64 LE amount + varint asset instance.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_i64(self.amount);
        self.asset_id.write(w);
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let amount = r.read_i64()?;
        let asset_id = ObjectId::read(r, ASSET_SPACE, ASSET_TYPE)?;
        Ok(Self { amount, asset_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_layout() {
        let amt = AssetAmount::new(500, ObjectId::new(1, 3, 0).unwrap());
        let mut w = ByteWriter::new();
        amt.write(&mut w);
        assert_eq!(w.as_slice(), &[0xf4, 0x01, 0, 0, 0, 0, 0, 0, 0x00]);
    }

    #[test]
    fn negative_amount_roundtrips() {
        let amt = AssetAmount::new(-1, ObjectId::new(1, 3, 7).unwrap());
        let mut w = ByteWriter::new();
        amt.write(&mut w);
        let mut r = ByteReader::new(w.as_slice());
        assert_eq!(AssetAmount::read(&mut r).unwrap(), amt);
    }
}
