//! # Type System
//!
//! The closed, explicit set of column types flatdb can store, and the
//! registry that maps a stable string tag to its codec.
//!
//! ## Module Structure
//!
//! - `value`: `TypeId` tags and the runtime `Value` enum
//! - `codec`: the `Codec` trait plus the built-in int/varchar codecs
//! - `registry`: `TypeRegistry`, the tag -> codec lookup
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `TypeId` | Stable string tag naming a codec (`"int"`, `"varchar"`) |
//! | `Value` | Runtime column value; knows how to encode itself |
//! | `Codec` | Decode capability registered under one `TypeId` |
//! | `TypeRegistry` | Closed codec set, registered once before first use |
//!
//! ## Extension
//!
//! New column types are added by implementing [`Codec`] and handing the
//! boxed codec to [`TypeRegistry::new`]. Lookup is a plain hash lookup;
//! there is no reflection and no late registration.

mod codec;
mod registry;
mod value;

pub use codec::{IntCodec, VarcharCodec, INT, VARCHAR};
pub use codec::Codec;
pub use registry::TypeRegistry;
pub use value::{TypeId, Value};
