//! # Catalog Hierarchy
//!
//! Thin orchestration over the storage layer realizing the
//! database -> namespace -> table directory nesting:
//!
//! ```text
//! catalog_dir/
//! ├── app/                  # Database
//! │   ├── public/           # Namespace
//! │   │   ├── users/        # Table (schema.bin + data.bin)
//! │   │   └── orders/
//! │   └── audit/
//! └── analytics/
//! ```
//!
//! Every level is just a [`Layer`]; `database()` and `namespace()` are
//! idempotent create-or-open operations, because creating a directory that
//! exists is a no-op. The registry rides along as an `Arc` so loaded tables
//! can decode their schema defaults.

use std::path::Path;
use std::sync::Arc;

use eyre::{Result, WrapErr};

use crate::records::RowSchema;
use crate::storage::{is_dir, Layer};
use crate::table::Table;
use crate::types::TypeRegistry;

/// Root of the directory hierarchy.
pub struct Catalog {
    storage: Layer,
    registry: Arc<TypeRegistry>,
}

impl Catalog {
    pub fn open<P: AsRef<Path>>(path: P, registry: Arc<TypeRegistry>) -> Result<Self> {
        let storage = Layer::open(path).wrap_err("could not open catalog storage")?;
        Ok(Self { storage, registry })
    }

    /// Creates or opens a database scope; both are the same operation.
    pub fn database(&self, name: &str) -> Result<Database> {
        let storage = self
            .storage
            .new_layer(name)
            .wrap_err_with(|| format!("(database=[name={}]) could not create storage layer", name))?;

        Ok(Database {
            name: name.to_string(),
            storage,
            registry: self.registry.clone(),
        })
    }

    pub fn databases(&self) -> Result<Vec<String>> {
        self.storage.list(&[is_dir]).wrap_err("could not list databases")
    }
}

/// One database directory; holds namespaces.
pub struct Database {
    name: String,
    storage: Layer,
    registry: Arc<TypeRegistry>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl Database {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates or opens a namespace scope; both are the same operation.
    pub fn namespace(&self, name: &str) -> Result<Namespace> {
        let storage = self.storage.new_layer(name).wrap_err_with(|| {
            format!(
                "(database=[name={}]) could not create storage layer for namespace [name={}]",
                self.name, name
            )
        })?;

        Ok(Namespace {
            name: name.to_string(),
            storage,
            registry: self.registry.clone(),
        })
    }

    pub fn namespaces(&self) -> Result<Vec<String>> {
        self.storage
            .list(&[is_dir])
            .wrap_err_with(|| format!("(database=[name={}]) could not list namespaces", self.name))
    }
}

/// One namespace directory; holds tables.
pub struct Namespace {
    name: String,
    storage: Layer,
    registry: Arc<TypeRegistry>,
}

impl Namespace {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a table in its own directory scope under this namespace.
    pub fn create_table(&self, name: &str, schema: RowSchema) -> Result<Table> {
        let storage = self.table_layer(name)?;
        Table::create(storage, name, schema)
            .wrap_err_with(|| format!("(namespace=[name={}]) could not create table", self.name))
    }

    /// Loads an existing table.
    pub fn table(&self, name: &str) -> Result<Table> {
        let storage = self.table_layer(name)?;
        Table::load(&self.registry, storage, name)
            .wrap_err_with(|| format!("(namespace=[name={}]) could not load table", self.name))
    }

    pub fn tables(&self) -> Result<Vec<String>> {
        self.storage
            .list(&[is_dir])
            .wrap_err_with(|| format!("(namespace=[name={}]) could not list tables", self.name))
    }

    /// Deletes a table's files; the directory scope itself stays behind.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.table(name)?.delete().wrap_err_with(|| {
            format!("(namespace=[name={}]) could not drop table [name={}]", self.name, name)
        })
    }

    fn table_layer(&self, name: &str) -> Result<Layer> {
        self.storage.new_layer(name).wrap_err_with(|| {
            format!(
                "(namespace=[name={}]) could not create storage layer for table [name={}]",
                self.name, name
            )
        })
    }
}
