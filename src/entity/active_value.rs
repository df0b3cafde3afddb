use crate::Value;

/// The state of a column in a [Record][crate::Record].
///
/// There are three possible states represented by three enum variants:
///
/// - [ActiveValue::Set] - a value that's explicitly set, either by the application or by a statement rewrite.
/// - [ActiveValue::Unchanged] - an existing, unchanged value loaded from the database.
/// - [ActiveValue::NotSet] - an undefined value.
///
/// A soft delete marks the deletion timestamp (and the actor, if tracked) as [ActiveValue::Set]
/// on the in-memory record, so the caller can observe the new values after execution.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveValue<V = Value>
where
    V: Into<Value>,
{
    /// A value that's explicitly set and sent to the database.
    Set(V),
    /// An existing, unchanged value from the database.
    Unchanged(V),
    /// An undefined value. Nothing is sent to the database.
    NotSet,
}

impl<V> Default for ActiveValue<V>
where
    V: Into<Value>,
{
    fn default() -> Self {
        Self::NotSet
    }
}

impl<V> ActiveValue<V>
where
    V: Into<Value>,
{
    /// Create an [ActiveValue::Set]
    pub fn set(value: V) -> Self {
        Self::Set(value)
    }

    /// Create an [ActiveValue::Unchanged]
    pub fn unchanged(value: V) -> Self {
        Self::Unchanged(value)
    }

    /// Create an [ActiveValue::NotSet]
    pub fn not_set() -> Self {
        Self::default()
    }

    /// Check if the [ActiveValue] is [ActiveValue::Set]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Check if the [ActiveValue] is [ActiveValue::Unchanged]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }

    /// Check if the [ActiveValue] is [ActiveValue::NotSet]
    pub fn is_not_set(&self) -> bool {
        matches!(self, Self::NotSet)
    }

    /// Get a reference to the wrapped value, if any
    pub fn as_ref(&self) -> Option<&V> {
        match self {
            Self::Set(value) | Self::Unchanged(value) => Some(value),
            Self::NotSet => None,
        }
    }

    /// Take ownership of the inner value, if any
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Set(value) | Self::Unchanged(value) => Some(value.into()),
            Self::NotSet => None,
        }
    }
}
