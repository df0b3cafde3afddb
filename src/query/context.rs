use crate::Value;
use std::collections::BTreeMap;

/// A typed key into a [Context]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextKey(&'static str);

impl ContextKey {
    /// Create a key; names should be unique across the application
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Name of the key
    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Holds the identity of whoever is deleting rows, recorded by soft delete
/// when the field has an actor field configured.
pub const DELETED_BY: ContextKey = ContextKey::new("sea_orm_soft_delete.deleted_by");

/// Ambient values passed along with an operation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    values: BTreeMap<ContextKey, Value>,
}

impl Context {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a context that also carries `value` under `key`
    pub fn with_value<V>(mut self, key: ContextKey, value: V) -> Self
    where
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value
    pub fn insert<V>(&mut self, key: ContextKey, value: V)
    where
        V: Into<Value>,
    {
        self.values.insert(key, value.into());
    }

    /// Look up a value; absence is not an error
    pub fn value(&self, key: &ContextKey) -> Option<&Value> {
        self.values.get(key)
    }
}
