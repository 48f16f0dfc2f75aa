//! # Table
//!
//! A table binds a [`RowSchema`] to a [`Layer`] and turns integer row ids
//! into byte offsets. Each table directory holds two flat files:
//!
//! ```text
//! users/
//! ├── schema.bin   # serialized RowSchema, written once at create()
//! └── data.bin     # concatenated fixed-size rows, no framing
//! ```
//!
//! ## Addressing
//!
//! Row ids are 1-based. Row `r` occupies the byte range
//! `[row_size * (r - 1), row_size * r)` in the data file — pure arithmetic,
//! no index structure. The row count is the data file length divided by the
//! row size; the file length is assumed to always be an exact multiple.
//!
//! ## Lifecycle
//!
//! A table is either *created* (fresh schema serialized to disk, empty data
//! file) or *loaded* (schema deserialized from the schema file). Both paths
//! converge on the identical operational surface.

use eyre::{ensure, Result, WrapErr};

use crate::records::{Row, RowSchema};
use crate::storage::{Layer, Partial};
use crate::types::TypeRegistry;

pub const DATA_FILE: &str = "data.bin";
pub const SCHEMA_FILE: &str = "schema.bin";

#[derive(Debug)]
pub struct Table {
    name: String,
    storage: Layer,
    schema: RowSchema,
}

impl Table {
    /// Creates a fresh table: writes the schema file and an empty data file.
    pub fn create(storage: Layer, name: &str, schema: RowSchema) -> Result<Self> {
        let table = Self {
            name: name.to_string(),
            storage,
            schema,
        };

        let schema_bytes = table.schema.to_bytes().wrap_err_with(|| {
            format!("{} could not serialize schema", table.descriptor())
        })?;
        table
            .storage
            .create_or_override(SCHEMA_FILE, &schema_bytes)
            .wrap_err_with(|| format!("{} could not create schema file", table.descriptor()))?;
        table
            .storage
            .create_or_override(DATA_FILE, &[])
            .wrap_err_with(|| format!("{} could not create data file", table.descriptor()))?;

        Ok(table)
    }

    /// Loads an existing table by deserializing its schema file.
    pub fn load(registry: &TypeRegistry, storage: Layer, name: &str) -> Result<Self> {
        let descriptor = format!("(table=[name={}])", name);

        let schema_bytes = storage
            .read_all(SCHEMA_FILE)
            .wrap_err_with(|| format!("{} could not read schema", descriptor))?;
        let schema = RowSchema::load(registry, &schema_bytes)
            .wrap_err_with(|| format!("{} could not load schema", descriptor))?;

        Ok(Self {
            name: name.to_string(),
            storage,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    /// Reads one row by id.
    pub fn row(&self, id: u64) -> Result<Row> {
        ensure!(id >= 1, "{} invalid row [id={}]", self.descriptor(), id);

        let row_size = self.schema.row_size() as u64;
        let mut rows = self
            .storage
            .read_partials(
                DATA_FILE,
                &[Partial::new(row_size * (id - 1), row_size * id)],
            )
            .wrap_err_with(|| format!("{} could not read row [id={}]", self.descriptor(), id))?;

        Ok(rows.remove(0))
    }

    /// Overwrites one row in place; the row must match the schema's size.
    pub fn set(&self, id: u64, row: &[u8]) -> Result<()> {
        ensure!(id >= 1, "{} invalid row [id={}]", self.descriptor(), id);
        ensure!(
            row.len() == self.schema.row_size(),
            "{} row size [bytes={}] differs from the schema [bytes={}]",
            self.descriptor(),
            row.len(),
            self.schema.row_size()
        );

        let offset = self.schema.row_size() as u64 * (id - 1);
        self.storage
            .write_at(DATA_FILE, offset, row)
            .wrap_err_with(|| format!("{} could not set row [id={}]", self.descriptor(), id))
    }

    /// Appends one row; its id is the previous row count plus one.
    pub fn append(&self, row: &[u8]) -> Result<()> {
        ensure!(
            row.len() == self.schema.row_size(),
            "{} row size [bytes={}] differs from the schema [bytes={}]",
            self.descriptor(),
            row.len(),
            self.schema.row_size()
        );

        self.storage
            .append(DATA_FILE, row)
            .wrap_err_with(|| format!("{} could not append row", self.descriptor()))
    }

    /// Data file length divided by the row size.
    pub fn total_rows(&self) -> Result<u64> {
        let size = self
            .storage
            .file_size(DATA_FILE)
            .wrap_err_with(|| format!("{} could not read data file info", self.descriptor()))?;
        Ok(size / self.schema.row_size() as u64)
    }

    /// Removes both table files; used by the catalog when dropping a table.
    pub fn delete(&self) -> Result<()> {
        self.storage
            .delete(DATA_FILE)
            .wrap_err_with(|| format!("{} could not delete data file", self.descriptor()))?;
        self.storage
            .delete(SCHEMA_FILE)
            .wrap_err_with(|| format!("{} could not delete schema file", self.descriptor()))
    }

    fn descriptor(&self) -> String {
        format!("(table=[name={}])", self.name)
    }
}
