//! # Row Schema
//!
//! An ordered composition of column schemas. The row schema owns the two
//! numbers everything above it relies on: the fixed `row_size` and the
//! fixed byte offset of every column inside a row.
//!
//! ## Serialized Form
//!
//! ```text
//! [row_size (u64 LE, sized)] [column schema 0 (sized)] ... [column schema N-1 (sized)]
//! ```
//!
//! On load the stored row size is trusted as-is rather than recomputed from
//! the loaded columns; the writer is the single source of truth for layout.

use std::collections::{HashMap, HashSet};

use eyre::{ensure, Result, WrapErr};

use crate::encoding::payload;
use crate::types::{TypeRegistry, Value};

use super::column_schema::ColumnSchema;

/// A raw encoded row: exactly `row_size` bytes, no embedded schema.
pub type Row = Vec<u8>;

#[derive(Debug, Clone)]
pub struct RowSchema {
    row_size: usize,
    columns: Vec<ColumnSchema>,
}

impl RowSchema {
    /// Composes column schemas into a row schema.
    ///
    /// Validates each column in order and rejects the first violation,
    /// reporting the column position and name: empty names, duplicate
    /// names, empty type identifiers, and defaults that fail their own
    /// column's validation.
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self> {
        let mut row_size = 0;
        let mut seen = HashSet::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            ensure!(
                !column.name().is_empty(),
                "(row=[column_position={}]) is missing a name",
                position
            );
            ensure!(
                seen.insert(column.name().to_string()),
                "(row=[column_position={}, column_name={}]) already exists",
                position,
                column.name()
            );
            ensure!(
                !column.type_id().is_empty(),
                "(row=[column_position={}, column_name={}]) is missing a type",
                position,
                column.name()
            );

            if let Some(default) = column.default() {
                column.validate(Some(default)).wrap_err_with(|| {
                    format!(
                        "(row=[column_position={}, column_name={}]) default value validation failed",
                        position,
                        column.name()
                    )
                })?;
            }

            row_size += column.byte_size();
        }

        Ok(Self { row_size, columns })
    }

    /// Total encoded size of one row, fixed for the schema's lifetime.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// Converts sparse name-keyed input into the dense positional tuple the
    /// encoder requires.
    ///
    /// A missing key falls back to the column default; an explicit `None`
    /// stays null. Every slot is validated, failing on the first violation
    /// with column context.
    pub fn prepare(
        &self,
        values: &HashMap<String, Option<Value>>,
    ) -> Result<Vec<Option<Value>>> {
        let mut res = Vec::with_capacity(self.columns.len());
        for (position, column) in self.columns.iter().enumerate() {
            let value = match values.get(column.name()) {
                Some(value) => value.clone(),
                None => column.default().cloned(),
            };

            column.validate(value.as_ref()).wrap_err_with(|| {
                format!(
                    "(row=[column_position={}, column_name={}]) validation failed",
                    position,
                    column.name()
                )
            })?;
            res.push(value);
        }

        Ok(res)
    }

    /// Encodes one positional tuple into a row of exactly `row_size` bytes.
    pub fn encode(&self, values: &[Option<Value>]) -> Result<Row> {
        ensure!(
            values.len() == self.columns.len(),
            "expected columns [count={}], got [count={}]",
            self.columns.len(),
            values.len()
        );

        let mut row = Vec::with_capacity(self.row_size);
        for (position, (column, value)) in self.columns.iter().zip(values).enumerate() {
            let cell = column.encode(value.as_ref()).wrap_err_with(|| {
                format!(
                    "(row=[column_position={}, column_name={}]) could not encode column",
                    position,
                    column.name()
                )
            })?;
            row.extend(cell);
        }

        Ok(row)
    }

    /// Decodes a row of exactly `row_size` bytes by slicing at each
    /// column's fixed offset.
    pub fn decode(&self, registry: &TypeRegistry, row: &[u8]) -> Result<Vec<Option<Value>>> {
        ensure!(
            row.len() == self.row_size,
            "expected row of [bytes={}], got [bytes={}]",
            self.row_size,
            row.len()
        );

        let mut res = Vec::with_capacity(self.columns.len());
        let mut offset = 0;
        for (position, column) in self.columns.iter().enumerate() {
            let end = offset + column.byte_size();
            let value = column.decode(registry, &row[offset..end]).wrap_err_with(|| {
                format!(
                    "(row=[column_position={}, column_name={}]) could not decode column",
                    position,
                    column.name()
                )
            })?;
            res.push(value);
            offset = end;
        }

        Ok(res)
    }

    /// Serializes the schema: the row size followed by every column schema,
    /// each as a sized payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut res = payload::sized(&(self.row_size as u64).to_le_bytes());
        for (position, column) in self.columns.iter().enumerate() {
            let bytes = column.to_bytes().wrap_err_with(|| {
                format!(
                    "(row=[column_position={}, column_name={}]) could not serialize column schema",
                    position,
                    column.name()
                )
            })?;
            res.extend(payload::sized(&bytes));
        }
        Ok(res)
    }

    /// Reconstructs a schema from [`RowSchema::to_bytes`] output.
    pub fn load(registry: &TypeRegistry, bytes: &[u8]) -> Result<Self> {
        let parts = payload::read_all(bytes).wrap_err("deserialization failed")?;
        ensure!(!parts.is_empty(), "corrupted payload: missing row size");

        let row_size = payload::read_u64(parts[0]).wrap_err("loading row size failed")? as usize;

        let mut columns = Vec::with_capacity(parts.len() - 1);
        for (position, part) in parts[1..].iter().enumerate() {
            let column = ColumnSchema::load(registry, part).wrap_err_with(|| {
                format!("(row=[column_position={}]) loading column schema failed", position)
            })?;
            columns.push(column);
        }

        Ok(Self { row_size, columns })
    }
}
