//! Network profile validation tests: TOML loading, override construction,
//! and rejection of misconfigured chain parameters.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ledger_protocol::config::{NetworkProfile, SchemaTable};
use ledger_protocol::protocol::operations::OperationKind;
use ledger_protocol::CodecError;

#[test]
fn default_profile_validates_clean() {
    let profile = NetworkProfile::default();
    assert!(profile.validate().is_empty());
    profile.validate_strict().expect("default must be valid");
}

#[test]
fn profile_loads_from_toml() {
    let profile = NetworkProfile::from_toml(
        r#"
        network_name = "testnet"
        chain_id = "8b7bd36a146a03d0e5d0a971e286098f41b1b4b57b6d05e30bd2c7de39250b1b"
        core_asset = "1.3.0"
        "#,
    )
    .expect("valid TOML profile");
    assert_eq!(profile.network_name, "testnet");
    assert_eq!(profile.chain_id.len(), 64);
}

#[test]
fn omitted_fields_take_defaults() {
    let profile = NetworkProfile::from_toml("").expect("empty profile");
    assert_eq!(profile.network_name, "mainnet");
    assert_eq!(profile.core_asset, "1.3.0");
    assert_eq!(profile.schemas, SchemaTable::standard());
}

#[test]
fn short_chain_id_rejected() {
    let err = NetworkProfile::from_toml(r#"chain_id = "abcd""#).unwrap_err();
    assert!(matches!(err, CodecError::Config(_)));
    assert!(err.to_string().contains("chain id"));
}

#[test]
fn non_asset_core_asset_rejected() {
    let err = NetworkProfile::from_toml(r#"core_asset = "1.2.0""#).unwrap_err();
    assert!(matches!(err, CodecError::Config(_)));
}

#[test]
fn overrides_apply_on_top_of_defaults() {
    let profile = NetworkProfile::default_with_overrides(|p| {
        p.network_name = "devnet".into();
    });
    assert_eq!(profile.network_name, "devnet");
    assert_eq!(profile.core_asset, "1.3.0");
}

#[test]
fn schema_table_is_part_of_the_protocol_not_the_config() {
    // a loaded profile always carries the standard table
    let profile = NetworkProfile::from_toml(r#"network_name = "x""#).expect("profile");
    let schema = profile.schemas.schema_for(OperationKind::Transfer);
    let ids: Vec<u8> = schema.ids().collect();
    assert_eq!(ids, [1, 4]);
}
