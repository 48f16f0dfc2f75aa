//! # Runtime Value Representation
//!
//! `Value` is the in-memory form of a single cell. Values are never
//! persisted as objects; they exist only on the way into `encode` or out of
//! `decode`. A cell that is null is represented as `Option::<Value>::None`
//! by the schema layer, not as a variant here.
//!
//! | Variant | Rust Type | Wire form |
//! |---------|-----------|-----------|
//! | Int | i64 | little-endian two's complement at the declared width |
//! | Varchar | String | UTF-8, right-padded with `0x00` to the declared size |

use std::fmt;

use eyre::Result;

use super::codec::{encode_int, encode_varchar, INT, VARCHAR};

/// Stable string tag naming a codec.
///
/// The tag is the unit of type identity: a value matches a column schema iff
/// their tags are equal. Diagnostics render the tag as `name[size=N]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeId(String);

impl TypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Diagnostic form carrying the declared size, e.g. `varchar[size=32]`.
    pub fn format(&self, size: usize) -> String {
        format!("{}[size={}]", self.0, size)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Varchar(String),
}

impl Value {
    /// The tag of the codec this value belongs to.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Int(_) => TypeId::new(INT),
            Value::Varchar(_) => TypeId::new(VARCHAR),
        }
    }

    /// Encodes the value into exactly `size` bytes.
    ///
    /// Fails when the value does not fit the declared size: an integer
    /// outside the width's range or a varchar longer than `size` bytes.
    pub fn encode(&self, size: usize) -> Result<Vec<u8>> {
        match self {
            Value::Int(v) => encode_int(*v, size),
            Value::Varchar(s) => encode_varchar(s, size),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_varchar(&self) -> Option<&str> {
        match self {
            Value::Varchar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Varchar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Varchar(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_id_format_carries_size() {
        assert_eq!(TypeId::new("int").format(8), "int[size=8]");
        assert_eq!(TypeId::from("varchar").format(32), "varchar[size=32]");
    }

    #[test]
    fn values_report_their_type_id() {
        assert_eq!(Value::Int(1).type_id().as_str(), "int");
        assert_eq!(Value::from("x").type_id().as_str(), "varchar");
    }

    #[test]
    fn encode_dispatches_to_the_right_codec() {
        assert_eq!(Value::Int(1).encode(2).unwrap(), vec![1, 0]);
        assert_eq!(Value::from("ab").encode(4).unwrap(), vec![b'a', b'b', 0, 0]);
    }
}
