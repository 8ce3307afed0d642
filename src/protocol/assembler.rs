//! # Operation Assembler
//!
//! Entry points that turn a fully-populated [`Operation`] into its canonical
//! byte form and back. The wire shape of a full operation is
//! `varint(kind tag) + body`; the body layout is fixed per kind, fee first
//! and extension set last (always present, possibly empty).
//!
//! The assembler takes the [`NetworkProfile`] explicitly on every call. It is
//! a pure function of its arguments: no clock, no I/O, no global state. The
//! profile's schema table is the only lookup involved, and it is immutable
//! after construction, so concurrent calls need no synchronization.
//!
//! Encoding identical logical input always yields identical bytes. The
//! output is handed to an external finalizer for signing and broadcast; this
//! module's contract ends at the byte shapes.

use crate::config::NetworkProfile;
use crate::core::{ByteReader, ByteWriter};
use crate::error::Result;
use crate::protocol::operations::{Operation, OperationKind};
use bytes::Bytes;
use tracing::trace;

/// Encode one operation into its canonical signed form.
pub fn encode_operation(profile: &NetworkProfile, op: &Operation) -> Result<Bytes> {
    let mut w = ByteWriter::with_capacity(128);
    write_operation(&mut w, profile, op)?;
    let bytes = w.into_bytes();
    trace!(
        operation = op.kind().name(),
        len = bytes.len(),
        "encoded operation"
    );
    Ok(bytes)
}

/// Append one operation (tag + body) to an existing writer. Used directly
/// when several operations are packed into one transaction envelope.
pub fn write_operation(w: &mut ByteWriter, profile: &NetworkProfile, op: &Operation) -> Result<()> {
    let kind = op.kind();
    w.write_varint(kind.tag());
    op.write_body(w, profile.schemas.schema_for(kind))
}

/// Decode a complete operation, requiring the input to be exactly one
/// operation with nothing trailing.
pub fn decode_operation(profile: &NetworkProfile, bytes: &[u8]) -> Result<Operation> {
    let mut r = ByteReader::new(bytes);
    let op = read_operation(&mut r, profile)?;
    r.expect_end()?;
    Ok(op)
}

/// Decode one operation from a reader, leaving the cursor after its body.
pub fn read_operation(r: &mut ByteReader<'_>, profile: &NetworkProfile) -> Result<Operation> {
    let kind = OperationKind::from_tag(r.read_varint()?)?;
    let op = Operation::read_body(kind, r, profile.schemas.schema_for(kind))?;
    trace!(operation = kind.name(), "decoded operation");
    Ok(op)
}
