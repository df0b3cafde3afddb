use crate::{ActiveValue, Value};
use std::collections::BTreeMap;

/// A row held in memory, keyed by column name.
///
/// Values loaded from the database are [ActiveValue::Unchanged];
/// values written by the application or by a statement rewrite are [ActiveValue::Set].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<String, ActiveValue>,
}

impl Record {
    /// An empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unchanged column value, as if it was loaded from the database
    pub fn with<C, V>(mut self, column: C, value: V) -> Self
    where
        C: Into<String>,
        V: Into<Value>,
    {
        self.values
            .insert(column.into(), ActiveValue::Unchanged(value.into()));
        self
    }

    /// Explicitly set a column value
    pub fn set<C, V>(&mut self, column: C, value: V)
    where
        C: Into<String>,
        V: Into<Value>,
    {
        self.values.insert(column.into(), ActiveValue::Set(value.into()));
    }

    /// Get the value of a column, if it holds one
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column).and_then(ActiveValue::as_ref)
    }

    /// Get the state of a column; `None` if the record does not carry the column at all
    pub fn get_active(&self, column: &str) -> Option<&ActiveValue> {
        self.values.get(column)
    }

    /// Whether the record carries the column, in any state
    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Whether any column has been explicitly set
    pub fn is_changed(&self) -> bool {
        self.values.values().any(ActiveValue::is_set)
    }

    /// Iterate over all columns
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActiveValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<&str, Value>> for Record {
    fn from(values: BTreeMap<&str, Value>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_owned(), ActiveValue::Unchanged(v)))
                .collect(),
        }
    }
}

/// The record value(s) an operation works on
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    /// A single record
    One(Record),
    /// A batch of records
    Many(Vec<Record>),
}

impl Target {
    /// All records of the target
    pub fn records(&self) -> &[Record] {
        match self {
            Self::One(record) => std::slice::from_ref(record),
            Self::Many(records) => records,
        }
    }

    /// All records of the target, mutably
    pub fn records_mut(&mut self) -> &mut [Record] {
        match self {
            Self::One(record) => std::slice::from_mut(record),
            Self::Many(records) => records,
        }
    }

    /// Unwrap a single record; `None` for a batch
    pub fn into_one(self) -> Option<Record> {
        match self {
            Self::One(record) => Some(record),
            Self::Many(_) => None,
        }
    }
}

impl From<Record> for Target {
    fn from(record: Record) -> Self {
        Self::One(record)
    }
}

impl From<Vec<Record>> for Target {
    fn from(records: Vec<Record>) -> Self {
        Self::Many(records)
    }
}
