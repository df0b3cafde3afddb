use super::SoftDeleteField;
use crate::{Assignment, Column, DELETED_BY, StatementContext};

/// Resolve who is deleting from the statement's [DELETED_BY] context value.
///
/// Returns the assignment of the actor column, after marking the column as set on the
/// in-memory records. Returns `None` if the field has no actor field, or the context
/// carries no actor; the deletion then proceeds unattributed.
pub fn bind_actor(field: &SoftDeleteField, stmt: &mut StatementContext) -> Option<Assignment> {
    let actor_field = field.actor_field.as_ref()?;
    let actor = stmt.context.value(&DELETED_BY)?.clone();
    stmt.set_column(&actor_field.db_name, actor.clone());
    Some(Assignment::new(
        Column::new(actor_field.db_name.as_str()),
        actor,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ActiveValue, Context, DbBackend, Field, OperationKind, Record, Schema, TAG_ACTOR_FIELD,
        Value,
    };
    use pretty_assertions::assert_eq;

    fn setup(actor_field: bool, context: Context) -> (SoftDeleteField, StatementContext) {
        let mut deleted_at = Field::new("deleted_at");
        if actor_field {
            deleted_at = deleted_at.setting(TAG_ACTOR_FIELD, "deleted_by");
        }
        let schema = Schema::new("users")
            .field(Field::new("id").primary_key())
            .field(Field::new("deleted_by"))
            .field(deleted_at)
            .finish();
        let field = SoftDeleteField::resolve(&schema, &schema.fields[2]);
        let mut stmt = StatementContext::new(OperationKind::Delete, DbBackend::Postgres, schema);
        stmt.context = context;
        stmt.dest = Some(Record::new().with("id", 1).into());
        (field, stmt)
    }

    #[test]
    fn binds_actor() {
        let (field, mut stmt) = setup(true, Context::new().with_value(DELETED_BY, "alice"));
        assert_eq!(
            bind_actor(&field, &mut stmt),
            Some(Assignment::new(Column::new("deleted_by"), "alice"))
        );
        let record = stmt.dest.and_then(|t| t.into_one()).unwrap();
        assert_eq!(
            record.get_active("deleted_by"),
            Some(&ActiveValue::Set(Value::from("alice")))
        );
    }

    #[test]
    fn no_actor_in_context() {
        let (field, mut stmt) = setup(true, Context::new());
        assert_eq!(bind_actor(&field, &mut stmt), None);
        assert!(!stmt.dest.unwrap().records()[0].is_changed());
    }

    #[test]
    fn no_actor_field() {
        let (field, mut stmt) = setup(false, Context::new().with_value(DELETED_BY, "alice"));
        assert_eq!(bind_actor(&field, &mut stmt), None);
        assert!(!stmt.dest.unwrap().records()[0].is_changed());
    }
}
