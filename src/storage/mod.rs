//! # Storage Module
//!
//! The foundational storage layer: byte-addressed file operations scoped to
//! a directory path. This is deliberately the dumbest layer in the crate —
//! no caching, no buffering across calls, no locking, no retries. Every
//! operation opens a handle, performs one I/O action, and closes it.
//!
//! ## Directory Scoping
//!
//! A [`Layer`] owns one directory. Nested scopes are spawned with
//! [`Layer::new_layer`], which is how the catalog realizes its
//! database/namespace/table hierarchy:
//!
//! ```text
//! catalog_dir/              <- Layer
//! ├── app/                  <- layer.new_layer("app")
//! │   └── public/           <- .new_layer("public")
//! │       └── users/        <- .new_layer("users")
//! │           ├── schema.bin
//! │           └── data.bin
//! └── analytics/
//! ```
//!
//! ## Targeted Access
//!
//! A [`Partial`] names a `[from, to)` byte range. `read_partials` serves the
//! table's single fixed-size row fetch; `write_at` serves the in-place row
//! update. `replace` is the one variable-length operation: it rebuilds
//! prefix + data + suffix in memory and performs the final overwrite as a
//! single write call, which limits (but does not eliminate) the corruption
//! window.
//!
//! ## Concurrency
//!
//! None. Concurrent appends to one file can interleave at the OS level and
//! concurrent `write_at`/`replace` calls can tear. That gap is explicit:
//! coordination belongs to a higher layer, not here.

pub mod layer;

pub use layer::{is_dir, is_file, EntryFilter, Layer, Partial};
