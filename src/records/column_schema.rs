//! # Column Schema
//!
//! The static per-column contract: name, type tag, declared size,
//! nullability and an optional default. A column schema encodes and decodes
//! one cell and serializes itself into the schema file.
//!
//! ## Serialized Form
//!
//! Five sized payloads, in a fixed order:
//!
//! ```text
//! [type id (UTF-8)] [default (codec bytes or empty)] [name (UTF-8)]
//! [declared size (u32 LE)] [nullable (1 byte)]
//! ```
//!
//! Loading resolves type, size and nullability before decoding the default:
//! the default is stored as raw codec output and cannot be interpreted
//! until the other three fields are known.

use eyre::{bail, ensure, Result, WrapErr};

use crate::encoding::payload;
use crate::types::{TypeId, TypeRegistry, Value};

/// Flag byte marking a null cell.
pub const NULL_FLAG: u8 = 0x00;
/// Flag byte marking a present cell.
pub const PRESENT_FLAG: u8 = 0xFF;

const SERIALIZED_FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    name: String,
    type_id: TypeId,
    size: usize,
    nullable: bool,
    default: Option<Value>,
}

impl ColumnSchema {
    pub fn new(
        name: impl Into<String>,
        type_id: impl Into<TypeId>,
        size: usize,
        nullable: bool,
        default: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            size,
            nullable,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> &TypeId {
        &self.type_id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// On-disk width of one cell: the flag byte plus the declared size.
    pub fn byte_size(&self) -> usize {
        self.size + 1
    }

    /// Checks a candidate cell value against this column's contract.
    pub fn validate(&self, value: Option<&Value>) -> Result<()> {
        match value {
            None => {
                ensure!(self.nullable, "{} is not nullable", self.descriptor());
            }
            Some(value) => {
                ensure!(
                    value.type_id() == self.type_id,
                    "{} unsupported value [type={}]",
                    self.descriptor(),
                    value.type_id()
                );
            }
        }
        Ok(())
    }

    /// Encodes one cell: validates, then writes the flag byte and the codec
    /// output. A null cell is all-zero bytes.
    pub fn encode(&self, value: Option<&Value>) -> Result<Vec<u8>> {
        self.validate(value).wrap_err("validation failed")?;

        let mut res = vec![0u8; self.byte_size()];
        if let Some(value) = value {
            res[0] = PRESENT_FLAG;
            let bytes = value
                .encode(self.size)
                .wrap_err_with(|| format!("{} encode failed", self.descriptor()))?;
            res[1..].copy_from_slice(&bytes);
        }

        Ok(res)
    }

    /// Decodes one cell of exactly `byte_size()` bytes.
    pub fn decode(&self, registry: &TypeRegistry, payload: &[u8]) -> Result<Option<Value>> {
        ensure!(
            payload.len() == self.byte_size(),
            "{} corrupted data: payload size [size={}] differs from the expected [size={}]",
            self.descriptor(),
            payload.len(),
            self.byte_size()
        );

        match payload[0] {
            NULL_FLAG => {
                ensure!(
                    self.nullable,
                    "{} corrupted data: cannot assign null on a non-nullable column",
                    self.descriptor()
                );
                Ok(None)
            }
            PRESENT_FLAG => registry
                .resolve(&self.type_id, self.size, &payload[1..])
                .map(Some)
                .wrap_err_with(|| format!("{} decode failed", self.descriptor())),
            other => bail!(
                "{} corrupted data: invalid flag byte [byte={:#04x}]",
                self.descriptor(),
                other
            ),
        }
    }

    /// Serializes the schema into its five-field sized-payload sequence.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let default_bytes = match &self.default {
            Some(value) => value
                .encode(self.size)
                .wrap_err_with(|| format!("{} could not encode default value", self.descriptor()))?,
            None => Vec::new(),
        };

        let mut res = Vec::new();
        res.extend(payload::sized(self.type_id.as_str().as_bytes()));
        res.extend(payload::sized(&default_bytes));
        res.extend(payload::sized(self.name.as_bytes()));
        res.extend(payload::sized(&(self.size as u32).to_le_bytes()));
        res.extend(payload::sized(&[self.nullable as u8]));
        Ok(res)
    }

    /// Reconstructs a schema from [`ColumnSchema::to_bytes`] output.
    pub fn load(registry: &TypeRegistry, bytes: &[u8]) -> Result<Self> {
        let parts = payload::read_all(bytes).wrap_err("deserialization failed")?;
        ensure!(
            parts.len() == SERIALIZED_FIELDS,
            "corrupted payload: expected {} fields, got {}",
            SERIALIZED_FIELDS,
            parts.len()
        );

        let type_id = TypeId::new(
            std::str::from_utf8(parts[0])
                .map_err(|_| eyre::eyre!("could not load type: not valid UTF-8"))?,
        );
        let name = std::str::from_utf8(parts[2])
            .map_err(|_| eyre::eyre!("could not load name: not valid UTF-8"))?
            .to_string();
        let size = payload::read_u32(parts[3]).wrap_err("could not load column size")? as usize;
        let nullable = payload::read_bool(parts[4]).wrap_err("could not load nullable flag")?;

        // Type, size and nullability first: the default bytes are opaque
        // codec output until those are known.
        let default = if parts[1].is_empty() {
            None
        } else {
            Some(
                registry
                    .resolve(&type_id, size, parts[1])
                    .wrap_err("could not load default value")?,
            )
        };

        let schema = Self {
            name,
            type_id,
            size,
            nullable,
            default,
        };
        schema.validate_definition().wrap_err("validation failed")?;
        Ok(schema)
    }

    pub(crate) fn validate_definition(&self) -> Result<()> {
        ensure!(!self.name.is_empty(), "{} name cannot be empty", self.descriptor());
        ensure!(
            !self.type_id.is_empty(),
            "{} type cannot be empty",
            self.descriptor()
        );
        Ok(())
    }

    pub(crate) fn descriptor(&self) -> String {
        format!(
            "(column=[name={}, type={}])",
            self.name,
            self.type_id.format(self.size)
        )
    }
}
