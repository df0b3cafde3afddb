use super::SoftDeleteField;
use crate::{DbErr, Expression, StatementContext, StatementModifier, Where};

/// Marker left on a statement once deleted rows have been excluded
pub const SOFT_DELETE_ENABLED: &str = "soft_delete_enabled";

/// Excludes soft deleted rows from `SELECT` (and, through the update and delete
/// clauses, `UPDATE`) statements
#[derive(Clone, Debug, PartialEq)]
pub struct SoftDeleteQueryClause(pub SoftDeleteField);

impl StatementModifier for SoftDeleteQueryClause {
    fn modify_statement(&self, stmt: &mut StatementContext) -> Result<(), DbErr> {
        exclude_deleted(&self.0, stmt);
        Ok(())
    }
}

/// Add `<column> = <zero value>` to the `WHERE` clause, at most once per statement.
///
/// A filter holding a single-expression `OR` group at the top level (e.g. `a OR b`)
/// is first wrapped as a whole, so that the new predicate constrains every branch:
/// `(a OR b) AND deleted_at IS NULL`.
pub fn exclude_deleted(field: &SoftDeleteField, stmt: &mut StatementContext) {
    if stmt.unscoped || stmt.has_marker(SOFT_DELETE_ENABLED) {
        tracing::trace!(table = stmt.table.as_str(), "skip soft delete scope");
        return;
    }

    if let Some(clause) = stmt.where_clause_mut() {
        let has_or_group = clause
            .exprs
            .iter()
            .any(|expr| matches!(expr, Expression::Or(inner) if inner.len() == 1));
        if has_or_group {
            let exprs = std::mem::take(&mut clause.exprs);
            clause.exprs.push(Expression::And(exprs));
        }
    }

    stmt.add_clause(Where::new(vec![Expression::eq(
        field.column(),
        field.zero_value(),
    )]));
    stmt.insert_marker(SOFT_DELETE_ENABLED);
    tracing::debug!(
        table = stmt.table.as_str(),
        column = field.field.db_name.as_str(),
        "excluded soft deleted rows"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Column, DbBackend, DeletedAt, Field, OperationKind, Schema, TAG_ZERO_VALUE, Value,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn schema(deleted_at: Field) -> Arc<Schema> {
        Schema::new("users")
            .field(Field::new("id").primary_key())
            .field(Field::new("name"))
            .field(deleted_at.with_clauses::<DeletedAt>())
            .finish()
    }

    fn field(schema: &Schema) -> SoftDeleteField {
        SoftDeleteField::resolve(schema, &schema.fields[2])
    }

    fn query(schema: &Arc<Schema>) -> StatementContext {
        StatementContext::new(OperationKind::Query, DbBackend::Postgres, schema.clone())
    }

    fn name_eq(name: &str) -> Expression {
        Expression::eq(Column::current("name"), name)
    }

    fn not_deleted() -> Expression {
        Expression::eq(Column::current("deleted_at"), Value::String(None))
    }

    #[test]
    fn adds_exclusion_predicate() {
        let schema = schema(Field::new("deleted_at"));
        let mut stmt = query(&schema);
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(stmt.where_clause(), Some(&Where::new(vec![not_deleted()])));
        assert!(stmt.has_marker(SOFT_DELETE_ENABLED));

        stmt.build().unwrap();
        assert_eq!(
            stmt.statement().map(ToString::to_string),
            Some(r#"SELECT * FROM "users" WHERE "users"."deleted_at" IS NULL"#.to_owned())
        );
    }

    #[test]
    fn idempotent() {
        let schema = schema(Field::new("deleted_at"));
        let mut stmt = query(&schema);
        let field = field(&schema);
        exclude_deleted(&field, &mut stmt);
        exclude_deleted(&field, &mut stmt);
        SoftDeleteQueryClause(field).modify_statement(&mut stmt).unwrap();

        assert_eq!(stmt.where_clause().map(|w| w.exprs.len()), Some(1));
    }

    #[test]
    fn unscoped_is_untouched() {
        let schema = schema(Field::new("deleted_at"));
        let mut stmt = query(&schema);
        stmt.unscoped = true;
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(stmt.where_clause(), None);
        assert!(!stmt.has_marker(SOFT_DELETE_ENABLED));
    }

    #[test]
    fn user_predicates_are_kept_in_order() {
        let schema = schema(Field::new("deleted_at"));
        let mut stmt = query(&schema);
        stmt.add_clause(Where::new(vec![name_eq("a"), name_eq("b")]));
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(
            stmt.where_clause(),
            Some(&Where::new(vec![name_eq("a"), name_eq("b"), not_deleted()]))
        );
    }

    #[test]
    fn or_condition_is_wrapped() {
        let schema = schema(Field::new("deleted_at"));
        let mut stmt = query(&schema);
        stmt.add_clause(Where::new(vec![
            name_eq("a"),
            Expression::Or(vec![name_eq("b")]),
        ]));
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(
            stmt.where_clause(),
            Some(&Where::new(vec![
                Expression::And(vec![name_eq("a"), Expression::Or(vec![name_eq("b")])]),
                not_deleted(),
            ]))
        );

        stmt.build().unwrap();
        assert_eq!(
            stmt.statement().map(ToString::to_string),
            Some(
                [
                    r#"SELECT * FROM "users""#,
                    r#"WHERE ("users"."name" = 'a' OR "users"."name" = 'b')"#,
                    r#"AND "users"."deleted_at" IS NULL"#,
                ]
                .join(" ")
            )
        );
    }

    #[test]
    fn multi_expression_or_group_is_not_wrapped() {
        let schema = schema(Field::new("deleted_at"));
        let mut stmt = query(&schema);
        let or_group = Expression::Or(vec![name_eq("b"), name_eq("c")]);
        stmt.add_clause(Where::new(vec![name_eq("a"), or_group.clone()]));
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(
            stmt.where_clause(),
            Some(&Where::new(vec![name_eq("a"), or_group, not_deleted()]))
        );
    }

    #[test]
    fn explicit_zero_value() {
        let schema = schema(Field::new("deleted_at").setting(TAG_ZERO_VALUE, "2000-01-01"));
        let mut stmt = query(&schema);
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(
            stmt.where_clause(),
            Some(&Where::new(vec![Expression::eq(
                Column::current("deleted_at"),
                "2000-01-01"
            )]))
        );
        stmt.build().unwrap();
        assert_eq!(
            stmt.statement().map(ToString::to_string),
            Some(r#"SELECT * FROM "users" WHERE "users"."deleted_at" = '2000-01-01'"#.to_owned())
        );
    }

    #[test]
    fn unparseable_zero_value_falls_back_to_null() {
        let schema = schema(Field::new("deleted_at").setting(TAG_ZERO_VALUE, "someday"));
        let mut stmt = query(&schema);
        exclude_deleted(&field(&schema), &mut stmt);

        assert_eq!(stmt.where_clause(), Some(&Where::new(vec![not_deleted()])));
    }
}
