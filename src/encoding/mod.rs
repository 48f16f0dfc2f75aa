//! # Encoding Module
//!
//! Wire helpers shared by the schema serializers:
//!
//! - **Sized payloads**: length-prefixed chunks (`[u32 LE length][bytes]`)
//!   used for every self-describing field in schema files
//! - **Fixed-width scalars**: u32/u64 little-endian and single-byte bools
//!   for declared sizes, row sizes, and nullability flags
//!
//! The length-prefix width is fixed at 4 bytes on every architecture so
//! schema files written on one host load on any other.

pub mod payload;

pub use payload::{
    read, read_all, read_bool, read_u32, read_u64, sized, SIZE_PREFIX_LEN,
};
