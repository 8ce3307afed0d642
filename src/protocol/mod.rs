//! # Protocol Layer
//!
//! Domain types and the canonical operation codec: object references, asset
//! amounts, memos, the extension registry, the token-selector compiler, and
//! the operation assembler.

pub mod assembler;
pub mod asset;
pub mod extensions;
pub mod memo;
pub mod object_id;
pub mod operations;
pub mod selector;


pub use assembler::{decode_operation, encode_operation};
pub use asset::AssetAmount;
pub use extensions::{Extension, ExtensionKind, ExtensionSchema, ExtensionValue};
pub use memo::{Memo, MemoData};
pub use object_id::ObjectId;
pub use operations::{Operation, OperationKind, TransferBuilder};
pub use selector::{CompiledSelector, FilterExpr, TokenSelector};
