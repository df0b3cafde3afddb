use super::{SoftDeleteField, bind_actor, exclude_deleted};
use crate::{
    Assignment, Clause, Column, DbErr, Expression, Set, StatementContext, StatementModifier,
    Where, get_identity_field_values, to_query_values,
};

/// Turns a `DELETE` into an `UPDATE` stamping the deletion time (and actor)
#[derive(Clone, Debug, PartialEq)]
pub struct SoftDeleteDeleteClause(pub SoftDeleteField);

impl StatementModifier for SoftDeleteDeleteClause {
    fn modify_statement(&self, stmt: &mut StatementContext) -> Result<(), DbErr> {
        rewrite_delete(&self.0, stmt)
    }
}

/// Rewrite a delete statement into the soft delete update, and render it.
///
/// Does nothing if the statement is unscoped or has already been rendered. Records without
/// a primary key value don't scope the update; the filter alone does.
pub fn rewrite_delete(field: &SoftDeleteField, stmt: &mut StatementContext) -> Result<(), DbErr> {
    if stmt.unscoped || stmt.is_rendered() {
        tracing::trace!(table = stmt.table.as_str(), "skip soft delete rewrite");
        return Ok(());
    }

    let scopes = primary_key_scopes(stmt);

    let now = stmt.now();
    let column = field.field.db_name.as_str();
    let mut set = Set::new(vec![Assignment::new(Column::new(column), now)]);
    if let Some(actor) = bind_actor(field, stmt) {
        set.push(actor);
    }
    stmt.add_clause(set);
    stmt.set_column(column, now);

    for scope in scopes {
        stmt.add_clause(Where::new(vec![scope]));
    }
    exclude_deleted(field, stmt);

    stmt.add_clause_if_not_exists(Clause::Update(None));
    stmt.build_update()?;

    tracing::debug!(
        table = stmt.table.as_str(),
        column,
        deleted_at = %now,
        "rewrote delete into soft delete"
    );
    Ok(())
}

fn primary_key_scopes(stmt: &StatementContext) -> Vec<Expression> {
    let schema = match &stmt.schema {
        Some(schema) => schema,
        None => return Vec::new(),
    };
    let columns = schema.primary_field_db_names();

    let mut targets = Vec::new();
    match (&stmt.dest, &stmt.model) {
        (Some(dest), Some(model)) if dest != model => {
            targets.push(dest);
            targets.push(model);
        }
        (Some(target), _) | (None, Some(target)) => targets.push(target),
        (None, None) => (),
    }

    let mut scopes = Vec::new();
    for target in targets {
        let rows = get_identity_field_values(target, &columns);
        if let Some(expr) = to_query_values(&columns, rows) {
            scopes.push(expr);
        }
    }
    scopes
}
