//! # Error Types
//!
//! Comprehensive error handling for the ledger codec.
//!
//! This module defines all error variants that can occur while encoding or
//! decoding operations, from scalar range violations up to schema-level
//! extension mismatches.
//!
//! ## Error Categories
//! - **Range Errors**: scalar value outside its declared width or sign
//! - **Missing Field Errors**: a required operation field was never supplied
//! - **Unknown Extension Errors**: extension id outside an operation's schema
//! - **Format Errors**: malformed hex transport strings
//! - **Value Errors**: semantically invalid values (negative into unsigned,
//!   bad selector op-codes, non-canonical booleans)
//! - **Truncation Errors**: decode input ended before the structure did
//!
//! All failures are detected eagerly at the point of malformed input. Nothing
//! is silently defaulted or dropped: the encoded bytes are what gets signed,
//! so a corrupted encoding is a protocol-breaking defect, not a recoverable
//! condition. Encode and decode are pure and deterministic; a failure here is
//! a caller bug to fix, never something to retry.
//!
//! All errors implement `std::error::Error` for interoperability.

use serde::Serialize;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common cases.
pub mod constants {
    /// Hex transport errors
    pub const ERR_HEX_TOO_SHORT: &str = "hex transport string shorter than magic prefix";
    pub const ERR_HEX_BAD_PREFIX: &str = "hex transport string does not start with magic prefix";
    pub const ERR_HEX_ODD_DIGITS: &str = "hex transport string has odd number of hex digits";
    pub const ERR_HEX_BAD_DIGIT: &str = "hex transport string contains a non-hex digit";

    /// Value errors
    pub const ERR_NEGATIVE_UNSIGNED: &str = "negative integer where unsigned value required";
    pub const ERR_BAD_BOOL: &str = "boolean byte must be 0 or 1";
    pub const ERR_BAD_FILTER_OPCODE: &str = "malformed filter instruction op-code";
    pub const ERR_BAD_COMPARE_OPCODE: &str = "malformed predicate comparison op-code";
    pub const ERR_BAD_LITERAL_TAG: &str = "malformed typed-literal tag";
    pub const ERR_BAD_SELECTOR_TAG: &str = "malformed token-selector tag";
    pub const ERR_DANGLING_OPERATOR: &str = "filter stack ends before operator operands";
    pub const ERR_TRAILING_INSTRUCTIONS: &str = "filter stack has trailing instructions";
}

/// CodecError is the primary error type for all codec operations.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CodecError {
    #[error("value {value} out of range for unsigned {width}-bit field")]
    Range { value: i128, width: u8 },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown extension id {id} for operation {operation}")]
    UnknownExtension { id: u8, operation: &'static str },

    #[error("malformed hex transport: {0}")]
    Format(String),

    #[error("invalid value: {0}")]
    Value(String),

    #[error("unexpected end of input at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("varint exceeds 64 bits at offset {0}")]
    VarintOverflow(usize),

    #[error("unknown operation tag {0}")]
    UnknownOperation(u64),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
