//! # Core Byte-Level Codec
//!
//! Low-level wire primitives shared by every protocol structure: the
//! canonical byte writer/reader and the hex transport wrapper.

pub mod codec;
pub mod hex_transport;

pub use codec::{ByteReader, ByteWriter, IntWidth, PointInTime};
