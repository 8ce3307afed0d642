//! Property-based tests using proptest
//!
//! These tests validate codec invariants across a wide range of randomly
//! generated inputs, ensuring canonical behavior under all conditions.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ledger_protocol::config::NetworkProfile;
use ledger_protocol::core::{ByteReader, ByteWriter, PointInTime};
use ledger_protocol::hex_transport;
use ledger_protocol::protocol::asset::AssetAmount;
use ledger_protocol::protocol::object_id::{self, ObjectId, MAX_INSTANCE};
use ledger_protocol::protocol::operations::Transfer;
use ledger_protocol::protocol::selector::{compile, TokenSelector, TOKEN_SPACE, TOKEN_TYPE};
use ledger_protocol::{decode_operation, encode_operation, Operation};
use proptest::prelude::*;

// Property: every varint round-trips and is minimal-length
proptest! {
    #[test]
    fn prop_varint_roundtrip(v in any::<u64>()) {
        let mut w = ByteWriter::new();
        w.write_varint(v);
        let mut r = ByteReader::new(w.as_slice());
        prop_assert_eq!(r.read_varint().expect("decode"), v);
        prop_assert!(r.is_empty());

        // 7 bits per byte, so ceil(bits/7) bytes, minimum 1
        let bits = 64 - v.leading_zeros() as usize;
        let expected_len = std::cmp::max(1, bits.div_ceil(7));
        prop_assert_eq!(w.len(), expected_len);
    }
}

// Property: byte strings round-trip through length-prefixed encoding
proptest! {
    #[test]
    fn prop_bytes_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let mut w = ByteWriter::new();
        w.write_bytes(&data);
        let mut r = ByteReader::new(w.as_slice());
        prop_assert_eq!(r.read_bytes().expect("decode"), data.as_slice());
    }
}

// Property: hex transport round-trips for all payloads, with the length law
proptest! {
    #[test]
    fn prop_hex_transport_roundtrip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let wrapped = hex_transport::encode(&data);
        prop_assert_eq!(wrapped.len(), 6 + 2 * data.len());
        prop_assert_eq!(hex_transport::decode(&wrapped).expect("decode"), data);
    }
}

// Property: decoding random non-prefixed text never panics
proptest! {
    #[test]
    fn prop_hex_transport_garbage_never_panics(text in ".{0,64}") {
        let _ = hex_transport::decode(&text);
    }
}

// Property: flat-set encoding is permutation-invariant
proptest! {
    #[test]
    fn prop_flat_set_permutation_invariant(
        instances in prop::collection::vec(0u64..MAX_INSTANCE, 0..20),
        seed in any::<u64>(),
    ) {
        let ids: Vec<ObjectId> = instances
            .iter()
            .map(|&i| ObjectId::new(TOKEN_SPACE, TOKEN_TYPE, i).expect("token id"))
            .collect();

        // cheap deterministic shuffle driven by the seed
        let mut shuffled = ids.clone();
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            shuffled.swap(i, (state % (i as u64 + 1)) as usize);
        }

        let mut wa = ByteWriter::new();
        object_id::write_flat_set(&mut wa, &ids);
        let mut wb = ByteWriter::new();
        object_id::write_flat_set(&mut wb, &shuffled);
        prop_assert_eq!(wa.as_slice(), wb.as_slice());
    }
}

// Property: transfers round-trip and re-encode to identical bytes for any
// field values
proptest! {
    #[test]
    fn prop_transfer_roundtrip(
        fee in any::<i64>(),
        amount in any::<i64>(),
        from in 0u64..MAX_INSTANCE,
        to in 0u64..MAX_INSTANCE,
        asset in 0u64..1000,
    ) {
        let profile = NetworkProfile::default();
        let asset_id = ObjectId::new(1, 3, asset).expect("asset id");
        let op = Operation::Transfer(Transfer {
            fee: AssetAmount::new(fee, asset_id),
            from: ObjectId::new(1, 2, from).expect("account"),
            to: ObjectId::new(1, 2, to).expect("account"),
            amount: AssetAmount::new(amount, asset_id),
            memo: None,
            extensions: vec![],
        });

        let bytes = encode_operation(&profile, &op).expect("encode");
        let back = decode_operation(&profile, &bytes).expect("decode");
        prop_assert_eq!(&back, &op);
        prop_assert_eq!(encode_operation(&profile, &back).expect("re-encode"), bytes);
    }
}

// Property: compiled id-set selectors round-trip through the wire
proptest! {
    #[test]
    fn prop_selector_ids_roundtrip(
        instances in prop::collection::vec(0u64..MAX_INSTANCE, 0..16),
    ) {
        let ids: Vec<ObjectId> = instances
            .iter()
            .map(|&i| ObjectId::new(TOKEN_SPACE, TOKEN_TYPE, i).expect("token id"))
            .collect();
        let compiled = compile(&TokenSelector::Ids(ids), PointInTime::from_unix(0))
            .expect("compile");

        let mut w = ByteWriter::new();
        compiled.write(&mut w).expect("write");
        let mut r = ByteReader::new(w.as_slice());
        let back = ledger_protocol::protocol::selector::CompiledSelector::read(&mut r)
            .expect("read");
        prop_assert_eq!(back, compiled);
    }
}

// Property: decoding arbitrary bytes never panics, only errors
proptest! {
    #[test]
    fn prop_decode_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let profile = NetworkProfile::default();
        let _ = decode_operation(&profile, &data);
    }
}
