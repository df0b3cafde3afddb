use crate::StatementModifier;
use std::{collections::BTreeMap, sync::Arc};

/// Tag setting naming a sibling field that records who deleted a row
pub const TAG_ACTOR_FIELD: &str = "ACTORFIELD";

/// Tag setting overriding the value that means "not deleted"
pub const TAG_ZERO_VALUE: &str = "ZEROVALUE";

type ClausesFn = fn(&Schema, &Field) -> Vec<Arc<dyn StatementModifier>>;

/// A type that contributes statement modifiers for the field it is attached to.
///
/// Each method is called once, when the [Schema] is finished, and the returned
/// modifiers are reused by every operation touching the table.
pub trait FieldClauses {
    /// Modifiers applied to `SELECT` operations
    fn query_clauses(_schema: &Schema, _field: &Field) -> Vec<Arc<dyn StatementModifier>> {
        Vec::new()
    }

    /// Modifiers applied to `UPDATE` operations
    fn update_clauses(_schema: &Schema, _field: &Field) -> Vec<Arc<dyn StatementModifier>> {
        Vec::new()
    }

    /// Modifiers applied to `DELETE` operations
    fn delete_clauses(_schema: &Schema, _field: &Field) -> Vec<Arc<dyn StatementModifier>> {
        Vec::new()
    }
}

#[derive(Clone, Copy)]
struct FieldClausesFns {
    query: ClausesFn,
    update: ClausesFn,
    delete: ClausesFn,
}

/// Metadata of one column of a table
#[derive(Clone, derive_more::Debug)]
pub struct Field {
    /// Field name on the Rust side
    pub name: String,
    /// Column name in the database
    pub db_name: String,
    /// Whether this column is part of the primary key
    pub primary_key: bool,
    /// Upper-cased tag settings, e.g. `ACTORFIELD` or `ZEROVALUE`
    pub tag_settings: BTreeMap<String, String>,
    #[debug(skip)]
    clauses: Option<FieldClausesFns>,
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.db_name == other.db_name
            && self.primary_key == other.primary_key
            && self.tag_settings == other.tag_settings
    }
}

impl Field {
    /// Define a field whose column name equals the field name
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        let name = name.into();
        Self {
            db_name: name.clone(),
            name,
            primary_key: false,
            tag_settings: BTreeMap::new(),
            clauses: None,
        }
    }

    /// Override the column name
    pub fn db_name<N>(mut self, db_name: N) -> Self
    where
        N: Into<String>,
    {
        self.db_name = db_name.into();
        self
    }

    /// Mark this field as (part of) the primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Add a tag setting; keys are case-insensitive
    pub fn setting<K, V>(mut self, key: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.tag_settings
            .insert(key.as_ref().to_uppercase(), value.into());
        self
    }

    /// Attach the statement modifiers contributed by the field's type
    pub fn with_clauses<T>(mut self) -> Self
    where
        T: FieldClauses,
    {
        self.clauses = Some(FieldClausesFns {
            query: T::query_clauses,
            update: T::update_clauses,
            delete: T::delete_clauses,
        });
        self
    }

    /// Get a tag setting by its (case-insensitive) key
    pub fn tag_setting(&self, key: &str) -> Option<&str> {
        self.tag_settings
            .get(&key.to_uppercase())
            .map(String::as_str)
    }
}

/// Metadata of a table: its name, fields and the modifiers registered by field types
#[derive(Clone, derive_more::Debug, Default)]
pub struct Schema {
    /// Table name
    pub table: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    #[debug(skip)]
    query_clauses: Vec<Arc<dyn StatementModifier>>,
    #[debug(skip)]
    update_clauses: Vec<Arc<dyn StatementModifier>>,
    #[debug(skip)]
    delete_clauses: Vec<Arc<dyn StatementModifier>>,
}

impl Schema {
    /// Start defining the schema of a table
    pub fn new<T>(table: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Append a field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Resolve the modifiers contributed by every field and freeze the schema
    pub fn finish(mut self) -> Arc<Self> {
        let mut query_clauses = Vec::new();
        let mut update_clauses = Vec::new();
        let mut delete_clauses = Vec::new();
        for field in self.fields.iter() {
            if let Some(fns) = field.clauses {
                query_clauses.extend((fns.query)(&self, field));
                update_clauses.extend((fns.update)(&self, field));
                delete_clauses.extend((fns.delete)(&self, field));
            }
        }
        self.query_clauses = query_clauses;
        self.update_clauses = update_clauses;
        self.delete_clauses = delete_clauses;
        Arc::new(self)
    }

    /// Find a field by its Rust name, falling back to its column name
    pub fn look_up_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.db_name == name))
    }

    /// Fields that make up the primary key
    pub fn primary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    /// Column names of the primary key
    pub fn primary_field_db_names(&self) -> Vec<&str> {
        self.primary_fields().map(|f| f.db_name.as_str()).collect()
    }

    /// Modifiers to run on `SELECT` operations
    pub fn query_clauses(&self) -> &[Arc<dyn StatementModifier>] {
        &self.query_clauses
    }

    /// Modifiers to run on `UPDATE` operations
    pub fn update_clauses(&self) -> &[Arc<dyn StatementModifier>] {
        &self.update_clauses
    }

    /// Modifiers to run on `DELETE` operations
    pub fn delete_clauses(&self) -> &[Arc<dyn StatementModifier>] {
        &self.delete_clauses
    }
}
