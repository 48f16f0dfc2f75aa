//! # Built-In Codecs
//!
//! A codec is the decode half of a column type: the encode half lives on
//! [`Value`] itself, since encoding starts from a typed value while decoding
//! starts from a tag found in a schema. This mirrors the cell wire contract:
//!
//! ```text
//! encode: Value  --(size)-->  [size bytes]
//! decode: [size bytes]  --(TypeId, size)-->  Value
//! ```
//!
//! ## Supported Widths
//!
//! | Codec | Declared size | Range / limit |
//! |---------|---------------|-----------------------------------|
//! | int | 2, 4, 8 | i16 / i32 / i64 range, checked at encode |
//! | varchar | any | UTF-8 byte length <= size |
//!
//! Varchar values may not end in a literal NUL byte: the wire form pads with
//! `0x00` and decode strips that padding, so a trailing NUL would not
//! round-trip. Rejecting it at encode time keeps decode lossless.

use eyre::{bail, ensure, Result};

use super::value::{TypeId, Value};

pub const INT: &str = "int";
pub const VARCHAR: &str = "varchar";

/// Decode capability registered under one [`TypeId`].
pub trait Codec: Send + Sync {
    /// The tag this codec is registered under.
    fn type_id(&self) -> TypeId;

    /// Decodes exactly `size` payload bytes into a value.
    fn decode(&self, size: usize, payload: &[u8]) -> Result<Value>;
}

pub(crate) fn encode_int(value: i64, size: usize) -> Result<Vec<u8>> {
    let id = TypeId::new(INT);
    match size {
        2 => {
            ensure!(
                i16::try_from(value).is_ok(),
                "({}) number [int={}] out of range",
                id.format(size),
                value
            );
            Ok((value as i16).to_le_bytes().to_vec())
        }
        4 => {
            ensure!(
                i32::try_from(value).is_ok(),
                "({}) number [int={}] out of range",
                id.format(size),
                value
            );
            Ok((value as i32).to_le_bytes().to_vec())
        }
        8 => Ok(value.to_le_bytes().to_vec()),
        _ => bail!("({}) unsupported size", id.format(size)),
    }
}

pub(crate) fn encode_varchar(value: &str, size: usize) -> Result<Vec<u8>> {
    let id = TypeId::new(VARCHAR);
    ensure!(
        value.len() <= size,
        "({}) data exceeds maximum size [bytes={}]",
        id.format(size),
        value.len()
    );
    ensure!(
        !value.ends_with('\0'),
        "({}) data ends with a NUL byte",
        id.format(size)
    );

    let mut res = vec![0u8; size];
    res[..value.len()].copy_from_slice(value.as_bytes());
    Ok(res)
}

/// Little-endian integers at widths 2, 4 and 8.
#[derive(Debug, Default)]
pub struct IntCodec;

impl Codec for IntCodec {
    fn type_id(&self) -> TypeId {
        TypeId::new(INT)
    }

    fn decode(&self, size: usize, payload: &[u8]) -> Result<Value> {
        ensure!(
            payload.len() == size,
            "({}) payload byte count [bytes={}] differs from the declared size",
            self.type_id().format(size),
            payload.len()
        );

        let value = match size {
            2 => i16::from_le_bytes(payload.try_into()?) as i64,
            4 => i32::from_le_bytes(payload.try_into()?) as i64,
            8 => i64::from_le_bytes(payload.try_into()?),
            _ => bail!("({}) unsupported size", self.type_id().format(size)),
        };

        Ok(Value::Int(value))
    }
}

/// NUL-padded UTF-8 strings.
#[derive(Debug, Default)]
pub struct VarcharCodec;

impl Codec for VarcharCodec {
    fn type_id(&self) -> TypeId {
        TypeId::new(VARCHAR)
    }

    fn decode(&self, size: usize, payload: &[u8]) -> Result<Value> {
        ensure!(
            payload.len() == size,
            "({}) payload byte count [bytes={}] differs from the declared size",
            self.type_id().format(size),
            payload.len()
        );

        let end = payload
            .iter()
            .rposition(|&b| b != 0x00)
            .map_or(0, |pos| pos + 1);

        let text = std::str::from_utf8(&payload[..end]).map_err(|_| {
            eyre::eyre!(
                "({}) payload bytes are not valid UTF-8",
                self.type_id().format(size)
            )
        })?;

        Ok(Value::Varchar(text.to_string()))
    }
}
