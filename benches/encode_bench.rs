//! Encoding throughput benchmarks for the operation assembler.

#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ledger_protocol::config::NetworkProfile;
use ledger_protocol::core::PointInTime;
use ledger_protocol::protocol::asset::AssetAmount;
use ledger_protocol::protocol::extensions::{Extension, ExtensionValue};
use ledger_protocol::protocol::operations::{NftTransfer, Transfer};
use ledger_protocol::protocol::selector::{
    compile, CompareOp, FilterExpr, Literal, TokenSelector,
};
use ledger_protocol::{decode_operation, encode_operation, Operation};

fn transfer_op() -> Operation {
    Operation::Transfer(Transfer {
        fee: AssetAmount::new(20, "1.3.0".parse().unwrap()),
        from: "1.2.17".parse().unwrap(),
        to: "1.2.42".parse().unwrap(),
        amount: AssetAmount::new(1000, "1.3.0".parse().unwrap()),
        memo: None,
        extensions: vec![
            Extension::new(1, ExtensionValue::Str("note".into())),
            Extension::new(4, ExtensionValue::U64(3600)),
        ],
    })
}

fn selector_op() -> Operation {
    let tokens = compile(
        &TokenSelector::Filter {
            max_count: 10,
            max_amount: 50_000,
            filter: FilterExpr::And(
                Box::new(FilterExpr::predicate("rarity", CompareOp::Ge, Literal::Int(3))),
                Box::new(FilterExpr::predicate(
                    "edition",
                    CompareOp::Eq,
                    Literal::Str("first".into()),
                )),
            ),
        },
        PointInTime::from_unix(1_700_000_000),
    )
    .unwrap();
    Operation::NftTransfer(NftTransfer {
        fee: AssetAmount::new(5, "1.3.0".parse().unwrap()),
        from: "1.2.1".parse().unwrap(),
        to: "1.2.2".parse().unwrap(),
        tokens,
        memo: None,
        extensions: vec![],
    })
}

fn bench_encode(c: &mut Criterion) {
    let profile = NetworkProfile::default();
    let transfer = transfer_op();
    let with_selector = selector_op();

    c.bench_function("encode_transfer", |b| {
        b.iter(|| encode_operation(black_box(&profile), black_box(&transfer)).unwrap())
    });

    c.bench_function("encode_nft_transfer_with_filter", |b| {
        b.iter(|| encode_operation(black_box(&profile), black_box(&with_selector)).unwrap())
    });

    let bytes = encode_operation(&profile, &transfer).unwrap();
    c.bench_function("decode_transfer", |b| {
        b.iter(|| decode_operation(black_box(&profile), black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
