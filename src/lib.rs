//! # ledger-protocol
//!
//! Canonical, consensus-compatible binary codec for ledger operations.
//!
//! The bytes this crate produces are what gets cryptographically signed, so
//! the encoding is canonical by construction: fixed little-endian scalar
//! layouts, LEB128-style varints, deterministic ordering of unordered
//! collections, and schema-validated tagged-variant extensions. An
//! independent full-node implementation encoding the same logical operation
//! must produce the same bytes.
//!
//! ## Layers
//! - [`core`]: byte-level primitives — writer/reader, hex transport
//! - [`protocol`]: object references, assets, memos, extensions, the token
//!   selector compiler, and the operation assembler
//! - [`config`]: the immutable [`config::NetworkProfile`] passed into every
//!   assembler entry point
//! - [`error`]: the [`error::CodecError`] taxonomy
//!
//! ## Example
//! ```
//! use ledger_protocol::config::NetworkProfile;
//! use ledger_protocol::protocol::{
//!     encode_operation, AssetAmount, ObjectId, Operation, TransferBuilder,
//! };
//!
//! # fn main() -> ledger_protocol::error::Result<()> {
//! let profile = NetworkProfile::default();
//! let core_asset: ObjectId = "1.3.0".parse()?;
//!
//! let transfer = TransferBuilder::new()
//!     .fee(AssetAmount::new(20, core_asset))
//!     .from("1.2.17".parse()?)
//!     .to("1.2.42".parse()?)
//!     .amount(AssetAmount::new(1000, core_asset))
//!     .build()?;
//!
//! let bytes = encode_operation(&profile, &Operation::Transfer(transfer))?;
//! assert!(!bytes.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! Everything is synchronous, CPU-bound, and free of shared mutable state;
//! concurrent encoding from multiple threads needs no synchronization.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;

pub use config::NetworkProfile;
pub use crate::core::hex_transport;
pub use error::{CodecError, Result};
pub use protocol::{decode_operation, encode_operation, Operation, OperationKind};
