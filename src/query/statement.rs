use crate::{
    Clause, ClauseKind, Context, DbBackend, DbErr, Schema, Set, Statement, Target, Value, Where,
};
use chrono::{DateTime, Utc};
use sea_query::{Alias, Asterisk, ConditionalStatement, Query};
use std::{collections::BTreeSet, sync::Arc};

/// The clock used to timestamp rows
pub type NowFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The kind of operation a statement is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `SELECT`
    Query,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
}

/// A hook that rewrites a statement before it is rendered.
///
/// Modifiers are registered per table (see [FieldClauses][crate::FieldClauses]) and run
/// in registration order for every operation of the matching kind.
pub trait StatementModifier: Send + Sync {
    /// Inspect and rewrite the statement
    fn modify_statement(&self, stmt: &mut StatementContext) -> Result<(), DbErr>;
}

/// The mutable state of one operation while its statement is being built.
///
/// It is owned by that operation alone; markers set by one modifier are visible to
/// the modifiers that run after it, and to nothing else.
#[derive(derive_more::Debug)]
pub struct StatementContext {
    kind: OperationKind,
    db_backend: DbBackend,
    /// Target table
    pub table: String,
    /// Metadata of the target table
    pub schema: Option<Arc<Schema>>,
    /// Bypass every scoping modifier, i.e. operate on the full table
    pub unscoped: bool,
    /// Ambient values
    pub context: Context,
    /// The record(s) operated on
    pub dest: Option<Target>,
    /// An associated model value, when it is distinct from `dest`
    pub model: Option<Target>,
    #[debug(skip)]
    now_fn: NowFn,
    where_clause: Option<Where>,
    set_clause: Option<Set>,
    update_clause: Option<Option<String>>,
    markers: BTreeSet<&'static str>,
    statement: Option<Statement>,
}

impl StatementContext {
    /// Create the statement of an operation on the table described by `schema`
    pub fn new(kind: OperationKind, db_backend: DbBackend, schema: Arc<Schema>) -> Self {
        let mut stmt = Self::with_table(kind, db_backend, schema.table.as_str());
        stmt.schema = Some(schema);
        stmt
    }

    /// Create the statement of an operation on a table without metadata
    pub fn with_table<T>(kind: OperationKind, db_backend: DbBackend, table: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            kind,
            db_backend,
            table: table.into(),
            schema: None,
            unscoped: false,
            context: Context::default(),
            dest: None,
            model: None,
            now_fn: Arc::new(Utc::now),
            where_clause: None,
            set_clause: None,
            update_clause: None,
            markers: BTreeSet::new(),
            statement: None,
        }
    }

    /// The kind of operation
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The backend the statement is rendered for
    pub fn db_backend(&self) -> DbBackend {
        self.db_backend
    }

    /// Replace the clock
    pub fn set_now_fn(&mut self, now_fn: NowFn) {
        self.now_fn = now_fn;
    }

    /// Current time according to the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        (self.now_fn)()
    }

    /// Add a clause, merging it into an existing clause of the same kind
    pub fn add_clause<C>(&mut self, clause: C)
    where
        C: Into<Clause>,
    {
        match clause.into() {
            Clause::Where(clause) => self
                .where_clause
                .get_or_insert_with(Where::default)
                .exprs
                .extend(clause.exprs),
            Clause::Set(clause) => {
                let set = self.set_clause.get_or_insert_with(Set::default);
                for assignment in clause.0 {
                    set.push(assignment);
                }
            }
            Clause::Update(table) => self.update_clause = Some(table),
        }
    }

    /// Add a clause only if there is no clause of the same kind yet
    pub fn add_clause_if_not_exists<C>(&mut self, clause: C)
    where
        C: Into<Clause>,
    {
        let clause = clause.into();
        if !self.has_clause(clause.kind()) {
            self.add_clause(clause);
        }
    }

    /// Whether a clause of this kind exists
    pub fn has_clause(&self, kind: ClauseKind) -> bool {
        match kind {
            ClauseKind::Where => self.where_clause.is_some(),
            ClauseKind::Set => self.set_clause.is_some(),
            ClauseKind::Update => self.update_clause.is_some(),
        }
    }

    /// The `WHERE` clause
    pub fn where_clause(&self) -> Option<&Where> {
        self.where_clause.as_ref()
    }

    /// The `WHERE` clause, mutably
    pub fn where_clause_mut(&mut self) -> Option<&mut Where> {
        self.where_clause.as_mut()
    }

    /// The `SET` clause
    pub fn set_clause(&self) -> Option<&Set> {
        self.set_clause.as_ref()
    }

    /// Whether a modifier has already left this marker
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    /// Leave a marker; returns `false` if it was already there
    pub fn insert_marker(&mut self, marker: &'static str) -> bool {
        self.markers.insert(marker)
    }

    /// Explicitly set a column on every in-memory record of the operation
    pub fn set_column<V>(&mut self, column: &str, value: V)
    where
        V: Into<Value>,
    {
        let value = value.into();
        for target in [self.dest.as_mut(), self.model.as_mut()].into_iter().flatten() {
            for record in target.records_mut() {
                record.set(column, value.clone());
            }
        }
    }

    /// Whether the SQL has been rendered already
    pub fn is_rendered(&self) -> bool {
        self.statement.is_some()
    }

    /// The rendered SQL, if any
    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    /// Take the rendered SQL out
    pub fn take_statement(&mut self) -> Option<Statement> {
        self.statement.take()
    }

    /// Render the clauses as the statement of the operation's own kind
    pub fn build(&mut self) -> Result<(), DbErr> {
        match self.kind {
            OperationKind::Query => self.build_select(),
            OperationKind::Update => self.build_update(),
            OperationKind::Delete => self.build_delete(),
        }
    }

    /// Render the clauses as a `SELECT`
    pub fn build_select(&mut self) -> Result<(), DbErr> {
        let mut query = Query::select();
        query.column(Asterisk).from(Alias::new(self.table.as_str()));
        if let Some(clause) = self.where_clause.as_ref().filter(|w| !w.is_empty()) {
            query.cond_where(clause.to_condition(&self.table));
        }
        self.statement = Some(self.db_backend.build(&query));
        Ok(())
    }

    /// Render the clauses as an `UPDATE`
    pub fn build_update(&mut self) -> Result<(), DbErr> {
        let set = match self.set_clause.as_ref().filter(|s| !s.is_empty()) {
            Some(set) => set,
            None => {
                return Err(DbErr::Custom(format!(
                    "No columns to update on table `{}`",
                    self.table
                )));
            }
        };
        let table = self
            .update_clause
            .clone()
            .flatten()
            .unwrap_or_else(|| self.table.clone());
        let mut query = Query::update();
        query.table(Alias::new(table.as_str()));
        for assignment in set.0.iter() {
            query.value(
                Alias::new(assignment.column.name.as_str()),
                assignment.value.clone(),
            );
        }
        if let Some(clause) = self.where_clause.as_ref().filter(|w| !w.is_empty()) {
            query.cond_where(clause.to_condition(&table));
        }
        self.statement = Some(self.db_backend.build(&query));
        Ok(())
    }

    /// Render the clauses as a `DELETE`
    pub fn build_delete(&mut self) -> Result<(), DbErr> {
        let mut query = Query::delete();
        query.from_table(Alias::new(self.table.as_str()));
        if let Some(clause) = self.where_clause.as_ref().filter(|w| !w.is_empty()) {
            query.cond_where(clause.to_condition(&self.table));
        }
        self.statement = Some(self.db_backend.build(&query));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Assignment, Column, Expression, Record};
    use pretty_assertions::assert_eq;

    fn stmt(kind: OperationKind) -> StatementContext {
        StatementContext::with_table(kind, DbBackend::Postgres, "users")
    }

    #[test]
    fn where_clauses_merge() {
        let mut stmt = stmt(OperationKind::Query);
        stmt.add_clause(Where::new(vec![Expression::eq(Column::current("a"), 1)]));
        stmt.add_clause(Where::new(vec![Expression::eq(Column::current("b"), 2)]));
        assert_eq!(stmt.where_clause().map(|w| w.exprs.len()), Some(2));

        stmt.build().unwrap();
        assert_eq!(
            stmt.statement().map(ToString::to_string),
            Some(r#"SELECT * FROM "users" WHERE "users"."a" = 1 AND "users"."b" = 2"#.to_owned())
        );
    }

    #[test]
    fn add_clause_if_not_exists() {
        let mut stmt = stmt(OperationKind::Delete);
        stmt.add_clause_if_not_exists(Clause::Update(Some("archive".to_owned())));
        stmt.add_clause_if_not_exists(Clause::Update(None));
        stmt.add_clause(Set::new(vec![Assignment::new(Column::new("a"), 1)]));
        stmt.build_update().unwrap();
        assert_eq!(
            stmt.take_statement().map(|s| s.to_string()),
            Some(r#"UPDATE "archive" SET "a" = 1"#.to_owned())
        );
        assert!(!stmt.is_rendered());
    }

    #[test]
    fn update_without_assignments() {
        let mut stmt = stmt(OperationKind::Update);
        assert_eq!(
            stmt.build(),
            Err(DbErr::Custom(
                "No columns to update on table `users`".to_owned()
            ))
        );
        assert!(!stmt.is_rendered());
    }

    #[test]
    fn markers() {
        let mut stmt = stmt(OperationKind::Query);
        assert!(!stmt.has_marker("m"));
        assert!(stmt.insert_marker("m"));
        assert!(!stmt.insert_marker("m"));
        assert!(stmt.has_marker("m"));
    }

    #[test]
    fn set_column_reaches_dest_and_model() {
        let mut stmt = stmt(OperationKind::Delete);
        stmt.dest = Some(vec![Record::new().with("id", 1), Record::new().with("id", 2)].into());
        stmt.model = Some(Record::new().with("id", 3).into());
        stmt.set_column("name", "x");

        let records = stmt
            .dest
            .iter()
            .chain(stmt.model.iter())
            .flat_map(|t| t.records().to_vec())
            .collect::<Vec<_>>();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.get("name") == Some(&Value::from("x"))));
    }

    #[test]
    fn configurable_clock() {
        let mut stmt = stmt(OperationKind::Delete);
        let fixed = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        stmt.set_now_fn(Arc::new(move || fixed));
        assert_eq!(stmt.now(), fixed);
    }
}
