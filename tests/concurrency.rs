//! Concurrency tests: the codec is pure and shares only the immutable
//! profile, so unsynchronized concurrent encoding from many threads must
//! produce byte-identical results.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ledger_protocol::config::NetworkProfile;
use ledger_protocol::protocol::asset::AssetAmount;
use ledger_protocol::protocol::extensions::{Extension, ExtensionValue};
use ledger_protocol::protocol::operations::Transfer;
use ledger_protocol::{decode_operation, encode_operation, Operation};
use std::sync::Arc;
use std::thread;

fn sample(extensions: Vec<Extension>) -> Operation {
    Operation::Transfer(Transfer {
        fee: AssetAmount::new(20, "1.3.0".parse().unwrap()),
        from: "1.2.17".parse().unwrap(),
        to: "1.2.42".parse().unwrap(),
        amount: AssetAmount::new(1000, "1.3.0".parse().unwrap()),
        memo: None,
        extensions,
    })
}

#[test]
fn parallel_encoding_is_byte_identical() {
    let profile = Arc::new(NetworkProfile::default());
    let op = Arc::new(sample(vec![
        Extension::new(1, ExtensionValue::Str("note".into())),
        Extension::new(4, ExtensionValue::U64(3600)),
    ]));
    let reference = encode_operation(&profile, &op).expect("encode");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let profile = Arc::clone(&profile);
            let op = Arc::clone(&op);
            let reference = reference.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let bytes = encode_operation(&profile, &op).expect("encode");
                    assert_eq!(bytes, reference);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

#[test]
fn parallel_decode_of_shared_bytes() {
    let profile = Arc::new(NetworkProfile::default());
    let op = sample(vec![]);
    let bytes = Arc::new(encode_operation(&profile, &op).expect("encode"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let profile = Arc::clone(&profile);
            let bytes = Arc::clone(&bytes);
            let expected = op.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let back = decode_operation(&profile, &bytes).expect("decode");
                    assert_eq!(back, expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}
