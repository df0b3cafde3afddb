use crate::{
    Assignment, Clause, Column, Context, Database, DbErr, Expression, OperationKind, Record,
    Schema, Set, Statement, StatementContext, Target, Value, Where, debug_print,
};
use std::sync::Arc;
use tracing::instrument;

/// A pending operation on one table.
///
/// The registered modifiers of the table run when the operation is built, in the order
/// the fields declared them.
#[derive(Debug)]
pub struct Operation<'a> {
    db: &'a Database,
    stmt: StatementContext,
}

/// The outcome of an executed [Operation]
#[derive(Clone, Debug, PartialEq)]
pub struct OperationResult {
    /// Rows affected, or rows returned for a `SELECT`
    pub rows_affected: u64,
    /// Rows returned by a `SELECT`
    pub rows: Vec<Record>,
    /// The statement that was executed
    pub statement: Statement,
    /// The record(s) operated on, with the columns written by the operation marked as set
    pub dest: Option<Target>,
    /// The associated model value, likewise updated
    pub model: Option<Target>,
}

impl<'a> Operation<'a> {
    pub(crate) fn new(db: &'a Database, kind: OperationKind, schema: &Arc<Schema>) -> Self {
        let mut stmt = StatementContext::new(kind, db.get_database_backend(), schema.clone());
        stmt.set_now_fn(db.now_fn());
        Self { db, stmt }
    }

    /// AND a predicate to the filter
    pub fn filter<E>(mut self, expr: E) -> Self
    where
        E: Into<Expression>,
    {
        self.stmt.add_clause(Where::new(vec![expr.into()]));
        self
    }

    /// OR a predicate to the filter
    pub fn or_filter<E>(mut self, expr: E) -> Self
    where
        E: Into<Expression>,
    {
        self.stmt
            .add_clause(Where::new(vec![Expression::Or(vec![expr.into()])]));
        self
    }

    /// Assign a column; only meaningful for `UPDATE`
    pub fn set<C, V>(mut self, column: C, value: V) -> Self
    where
        C: Into<String>,
        V: Into<Value>,
    {
        self.stmt
            .add_clause(Set::new(vec![Assignment::new(Column::new(column), value)]));
        self
    }

    /// Operate on the full table, bypassing soft delete
    pub fn unscoped(mut self) -> Self {
        self.stmt.unscoped = true;
        self
    }

    /// Pass ambient values, e.g. [DELETED_BY][crate::DELETED_BY]
    pub fn context(mut self, context: Context) -> Self {
        self.stmt.context = context;
        self
    }

    /// The record(s) to operate on; their primary keys scope the statement
    pub fn dest<T>(mut self, dest: T) -> Self
    where
        T: Into<Target>,
    {
        self.stmt.dest = Some(dest.into());
        self
    }

    /// An associated model value, when it differs from the destination
    pub fn model<T>(mut self, model: T) -> Self
    where
        T: Into<Target>,
    {
        self.stmt.model = Some(model.into());
        self
    }

    /// Run the table's modifiers and render the statement, without executing it
    pub fn build(mut self) -> Result<StatementContext, DbErr> {
        self.prepare()?;
        Ok(self.stmt)
    }

    fn prepare(&mut self) -> Result<(), DbErr> {
        let kind = self.stmt.kind();
        if let Some(schema) = self.stmt.schema.clone() {
            let modifiers = match kind {
                OperationKind::Query => schema.query_clauses(),
                OperationKind::Update => schema.update_clauses(),
                OperationKind::Delete => schema.delete_clauses(),
            };
            for modifier in modifiers {
                modifier.modify_statement(&mut self.stmt)?;
            }
        }

        if !self.stmt.is_rendered() {
            if kind == OperationKind::Update {
                self.stmt.add_clause_if_not_exists(Clause::Update(None));
            }
            self.stmt.build()?;
        }
        Ok(())
    }

    /// Build and execute the operation
    #[instrument(level = "trace", skip(self), fields(table = %self.stmt.table))]
    pub async fn exec(mut self) -> Result<OperationResult, DbErr> {
        self.prepare()?;
        let statement = self
            .stmt
            .take_statement()
            .ok_or_else(|| DbErr::Custom("Statement was not rendered".to_owned()))?;
        debug_print!("{}", statement);

        let conn = self.db.connection();
        let (rows_affected, rows) = match self.stmt.kind() {
            OperationKind::Query => {
                let rows = conn.query_all(statement.clone()).await?;
                (rows.len() as u64, rows)
            }
            OperationKind::Update | OperationKind::Delete => {
                let result = conn.execute(statement.clone()).await?;
                (result.rows_affected, Vec::new())
            }
        };

        Ok(OperationResult {
            rows_affected,
            rows,
            statement,
            dest: self.stmt.dest.take(),
            model: self.stmt.model.take(),
        })
    }
}
