//! # Fixed-Layout Record Serialization
//!
//! This module defines the physical row format. Unlike formats that frame
//! every record with its own length, flatdb rows carry no header at all:
//! the layout is derived entirely from the externally stored schema, and
//! every row of a table is exactly `row_size` bytes.
//!
//! ## Cell Binary Layout
//!
//! ```text
//! +-----------+----------------------+
//! | Flag (u8) | Data (size bytes)    |
//! +-----------+----------------------+
//! ```
//!
//! | Flag | Meaning |
//! |--------|--------------------------------------|
//! | `0x00` | null (data bytes are all zero) |
//! | `0xFF` | present (data bytes hold the codec output) |
//! | other | corrupted data, decode hard-fails |
//!
//! The flag byte is paid for every column, nullable or not: one byte of
//! overhead per cell buys a uniform layout where each column lives at a
//! fixed offset inside the row.
//!
//! ## Row Binary Layout
//!
//! ```text
//! +-------------+-------------+-----+-------------+
//! | Cell 0      | Cell 1      | ... | Cell N-1    |
//! | (size0 + 1) | (size1 + 1) |     | (sizeN + 1) |
//! +-------------+-------------+-----+-------------+
//! ```
//!
//! ## Module Structure
//!
//! - `column_schema`: per-column contract and cell encode/decode
//! - `row_schema`: ordered column composition, row encode/decode,
//!   sparse-to-positional preparation

pub mod column_schema;
pub mod row_schema;


pub use column_schema::ColumnSchema;
pub use row_schema::{Row, RowSchema};
