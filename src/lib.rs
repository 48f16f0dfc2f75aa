//! # flatdb - Schema-Driven Flat-File Row Storage
//!
//! flatdb converts typed column values to and from fixed-layout byte
//! sequences and persists them as flat files addressable by integer row id.
//! Every row of a table occupies exactly the same number of bytes, so row
//! access is pure arithmetic: no index structures, no per-record framing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use flatdb::{Catalog, ColumnSchema, RowSchema, TypeRegistry, Value};
//!
//! let registry = Arc::new(TypeRegistry::standard());
//! let catalog = Catalog::open("./data", registry.clone())?;
//! let users = catalog.database("app")?.namespace("public")?;
//!
//! let schema = RowSchema::new(vec![
//!     ColumnSchema::new("username", "varchar", 32, false, None),
//!     ColumnSchema::new("age", "int", 8, false, Some(Value::Int(18))),
//! ])?;
//!
//! let table = users.create_table("users", schema)?;
//! let values = table.schema().prepare(&HashMap::from([(
//!     "username".to_string(),
//!     Some(Value::Varchar("alice".to_string())),
//! )]))?;
//! table.append(&table.schema().encode(&values)?)?;
//! ```
//!
//! ## Architecture
//!
//! flatdb uses a layered architecture, leaves first:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Catalog (database/namespace dirs)   │
//! ├─────────────────────────────────────┤
//! │  Table (row id -> byte offset)       │
//! ├──────────────────┬──────────────────┤
//! │ RowSchema /      │  Storage Layer    │
//! │ ColumnSchema     │  (one I/O action  │
//! │ (cell codec)     │   per call)       │
//! ├──────────────────┼──────────────────┤
//! │ TypeRegistry     │  std::fs          │
//! │ (tag -> codec)   │                   │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! ## File Layout
//!
//! Each table is a directory holding two flat files:
//!
//! ```text
//! catalog_dir/
//! ├── app/                 # database
//! │   └── public/          # namespace
//! │       └── users/       # table
//! │           ├── schema.bin   # serialized RowSchema
//! │           └── data.bin     # fixed-size row records
//! └── analytics/
//!     └── ...
//! ```
//!
//! ## Cell Layout
//!
//! Every cell is `1 flag byte + size data bytes`, nullable or not: flag
//! `0x00` marks null, `0xFF` marks present. Row size is the sum of the cell
//! sizes and never changes for the lifetime of a schema.
//!
//! ## Concurrency
//!
//! All operations are synchronous blocking filesystem calls. The storage
//! layer takes no locks and opens a fresh handle per call; concurrency
//! control belongs to whatever engine sits above this crate.
//!
//! ## Module Overview
//!
//! - [`encoding`]: length-prefixed (sized) payload wire helpers
//! - [`types`]: runtime values, codecs, and the type registry
//! - [`records`]: column and row schemas, cell/row encode/decode
//! - [`storage`]: directory-scoped byte-addressed file operations
//! - [`table`]: row-id addressed flat-file tables
//! - [`catalog`]: database/namespace directory hierarchy

pub mod catalog;
pub mod encoding;
pub mod records;
pub mod storage;
pub mod table;
pub mod types;

pub use catalog::{Catalog, Database, Namespace};
pub use records::{ColumnSchema, Row, RowSchema};
pub use storage::{Layer, Partial};
pub use table::Table;
pub use types::{Codec, TypeId, TypeRegistry, Value};
