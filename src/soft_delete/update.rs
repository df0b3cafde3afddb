use super::{SoftDeleteField, exclude_deleted};
use crate::{DbErr, StatementContext, StatementModifier};

/// Excludes soft deleted rows from `UPDATE` statements that have not been rendered yet
#[derive(Clone, Debug, PartialEq)]
pub struct SoftDeleteUpdateClause(pub SoftDeleteField);

impl StatementModifier for SoftDeleteUpdateClause {
    fn modify_statement(&self, stmt: &mut StatementContext) -> Result<(), DbErr> {
        if !stmt.is_rendered() && !stmt.unscoped {
            exclude_deleted(&self.0, stmt);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Assignment, Column, DbBackend, Field, OperationKind, Schema, Set, Statement,
    };
    use pretty_assertions::assert_eq;

    fn setup() -> (SoftDeleteUpdateClause, StatementContext) {
        let schema = Schema::new("users")
            .field(Field::new("id").primary_key())
            .field(Field::new("deleted_at"))
            .finish();
        let clause = SoftDeleteUpdateClause(SoftDeleteField::resolve(&schema, &schema.fields[1]));
        let mut stmt = StatementContext::new(OperationKind::Update, DbBackend::MySql, schema);
        stmt.add_clause(Set::new(vec![Assignment::new(Column::new("name"), "x")]));
        (clause, stmt)
    }

    #[test]
    fn scopes_update() {
        let (clause, mut stmt) = setup();
        clause.modify_statement(&mut stmt).unwrap();
        stmt.build().unwrap();
        assert_eq!(
            stmt.statement().cloned(),
            Some(Statement::from_sql_and_values(
                DbBackend::MySql,
                "UPDATE `users` SET `name` = ? WHERE `users`.`deleted_at` IS NULL",
                ["x".into()]
            ))
        );
    }

    #[test]
    fn rendered_statement_is_untouched() {
        let (clause, mut stmt) = setup();
        stmt.build().unwrap();
        clause.modify_statement(&mut stmt).unwrap();
        assert_eq!(stmt.where_clause(), None);
    }

    #[test]
    fn unscoped_is_untouched() {
        let (clause, mut stmt) = setup();
        stmt.unscoped = true;
        clause.modify_statement(&mut stmt).unwrap();
        assert_eq!(stmt.where_clause(), None);
    }
}
