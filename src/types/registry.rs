//! # Type Registry
//!
//! Maps a [`TypeId`] to its boxed [`Codec`]. The set is closed: codecs are
//! handed over once at construction and the registry never mutates after
//! that. Registration-time misuse (empty or duplicate identifier) aborts
//! construction instead of surfacing later as a decode failure.
//!
//! Resolution is a pure hash lookup with no side effects.

use std::collections::HashMap;

use eyre::{ensure, Result, WrapErr};

use super::codec::{Codec, IntCodec, VarcharCodec};
use super::value::{TypeId, Value};

pub struct TypeRegistry {
    codecs: HashMap<TypeId, Box<dyn Codec>>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("codecs", &self.codecs.keys())
            .finish()
    }
}

impl TypeRegistry {
    /// Builds a registry from an explicit codec set.
    ///
    /// Fails on an empty identifier or when two codecs claim the same tag.
    pub fn new(codecs: Vec<Box<dyn Codec>>) -> Result<Self> {
        let mut map: HashMap<TypeId, Box<dyn Codec>> = HashMap::with_capacity(codecs.len());
        for codec in codecs {
            let id = codec.type_id();
            ensure!(!id.is_empty(), "(codec=[type=]) invalid identifier");
            ensure!(
                !map.contains_key(&id),
                "(codec=[type={}]) identifier already used",
                id
            );
            map.insert(id, codec);
        }
        Ok(Self { codecs: map })
    }

    /// The built-in codec set: `int` and `varchar`.
    pub fn standard() -> Self {
        let mut codecs: HashMap<TypeId, Box<dyn Codec>> = HashMap::with_capacity(2);
        codecs.insert(IntCodec.type_id(), Box::new(IntCodec));
        codecs.insert(VarcharCodec.type_id(), Box::new(VarcharCodec));
        Self { codecs }
    }

    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.codecs.contains_key(type_id)
    }

    /// Decodes `payload` as a value of the named type.
    ///
    /// Fails when `type_id` is unregistered; codec decode errors propagate
    /// wrapped with the codec descriptor.
    pub fn resolve(&self, type_id: &TypeId, size: usize, payload: &[u8]) -> Result<Value> {
        let codec = self
            .codecs
            .get(type_id)
            .ok_or_else(|| eyre::eyre!("(codec=[type={}]) not found", type_id))?;

        codec
            .decode(size, payload)
            .wrap_err_with(|| format!("(codec=[type={}]) decode failed", type_id))
    }
}
