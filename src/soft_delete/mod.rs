//! Soft delete: deletes become timestamped updates and reads skip deleted rows.
//!
//! Declare the soft delete column as a [DeletedAt] field:
//!
//! ```
//! use sea_orm_soft_delete::{DeletedAt, Field, Schema, TAG_ACTOR_FIELD};
//!
//! let schema = Schema::new("users")
//!     .field(Field::new("id").primary_key())
//!     .field(Field::new("name"))
//!     .field(Field::new("deleted_by"))
//!     .field(
//!         Field::new("deleted_at")
//!             .setting(TAG_ACTOR_FIELD, "deleted_by")
//!             .with_clauses::<DeletedAt>(),
//!     )
//!     .finish();
//!
//! assert_eq!(schema.query_clauses().len(), 1);
//! assert_eq!(schema.delete_clauses().len(), 1);
//! ```

mod actor;
mod deleted_at;
mod delete;
mod query;
mod update;
mod zero_value;

pub use actor::*;
pub use deleted_at::*;
pub use delete::*;
pub use query::*;
pub use update::*;
pub use zero_value::*;

use crate::{Column, Field, Schema, TAG_ACTOR_FIELD, Value};

/// Soft delete configuration of one field, resolved once when the schema is finished
#[derive(Clone, Debug, PartialEq)]
pub struct SoftDeleteField {
    /// The timestamp field
    pub field: Field,
    /// Explicit "not deleted" sentinel; `None` means `NULL`
    pub zero_value: Option<String>,
    /// Sibling field recording who deleted the row
    pub actor_field: Option<Field>,
}

impl SoftDeleteField {
    /// Read the tag settings of `field`
    pub fn resolve(schema: &Schema, field: &Field) -> Self {
        let actor_field = match field.tag_setting(TAG_ACTOR_FIELD) {
            Some(name) if !name.is_empty() => {
                let actor_field = schema.look_up_field(name).cloned();
                if actor_field.is_none() {
                    tracing::warn!(
                        table = schema.table.as_str(),
                        field = field.name.as_str(),
                        actor_field = name,
                        "actor field not found, deletions won't be attributed"
                    );
                }
                actor_field
            }
            _ => None,
        };

        Self {
            field: field.clone(),
            zero_value: parse_zero_value_tag(field),
            actor_field,
        }
    }

    /// The timestamp column, qualified with the statement's table
    pub fn column(&self) -> Column {
        Column::current(self.field.db_name.as_str())
    }

    /// The value meaning "not deleted"
    pub fn zero_value(&self) -> Value {
        self.zero_value.clone().into()
    }
}
