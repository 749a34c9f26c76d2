//! Wire forms of a record batch.
//!
//! The protocol only needs records delivered in order; how they are framed is
//! up to the transport. Three forms are provided:
//! - [`verbose`]: self-describing JSON objects, one per record
//! - [`compact`]: positional JSON arrays
//! - [`compact_binary`]: the compact form as CBOR

pub mod compact;
pub mod compact_binary;
pub mod verbose;
