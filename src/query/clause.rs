use crate::{Value, is_null};
use sea_query::{Alias, Condition, Expr, SimpleExpr};

/// Which table a [Column] belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableRef {
    /// Unqualified column
    None,
    /// The table of the statement the column ends up in
    Current,
    /// An explicitly named table
    Named(String),
}

/// A column reference
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// The table qualifier
    pub table: TableRef,
    /// Column name
    pub name: String,
}

impl Column {
    /// An unqualified column
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            table: TableRef::None,
            name: name.into(),
        }
    }

    /// A column of the statement's own table
    pub fn current<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        Self {
            table: TableRef::Current,
            name: name.into(),
        }
    }

    /// A column of a named table
    pub fn of<T, N>(table: T, name: N) -> Self
    where
        T: Into<String>,
        N: Into<String>,
    {
        Self {
            table: TableRef::Named(table.into()),
            name: name.into(),
        }
    }

    fn expr(&self, table: &str) -> Expr {
        match &self.table {
            TableRef::None => Expr::col(Alias::new(self.name.as_str())),
            TableRef::Current => Expr::col((Alias::new(table), Alias::new(self.name.as_str()))),
            TableRef::Named(named) => {
                Expr::col((Alias::new(named.as_str()), Alias::new(self.name.as_str())))
            }
        }
    }
}

/// A filter expression.
///
/// In a list of expressions (a [Where] clause, or the body of [Expression::And] and [Expression::Or]),
/// consecutive expressions are joined with `AND`, except that an [Expression::Or] is joined
/// with `OR` to everything before it. The list is rendered with plain SQL precedence, so
/// `[a, Or([b]), c]` means `a OR (b AND c)`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// `column = value`, or `column IS NULL` when the value is `NULL`
    Eq(Column, Value),
    /// `column IN (..)`; with several columns, every row of values is matched as a tuple
    In(Vec<Column>, Vec<Vec<Value>>),
    /// A parenthesized group
    And(Vec<Expression>),
    /// A group joined with `OR` to the preceding expressions
    Or(Vec<Expression>),
    /// Any other predicate
    Expr(SimpleExpr),
}

impl Expression {
    /// `column = value`
    pub fn eq<V>(column: Column, value: V) -> Self
    where
        V: Into<Value>,
    {
        Self::Eq(column, value.into())
    }

    /// `column IN (..)` over a single column; `None` when there is nothing to match
    pub fn is_in<I, V>(column: Column, values: I) -> Option<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let rows: Vec<Vec<Value>> = values.into_iter().map(|v| vec![v.into()]).collect();
        Self::in_tuples(vec![column], rows)
    }

    /// `(columns..) IN (..)`; `None` when there is nothing to match
    pub fn in_tuples(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Option<Self> {
        if columns.is_empty() || rows.is_empty() {
            None
        } else {
            Some(Self::In(columns, rows))
        }
    }

    /// Render into a [Condition], qualifying [TableRef::Current] columns with `table`
    pub fn to_condition(&self, table: &str) -> Condition {
        match self {
            Self::Eq(column, value) => {
                let expr = if is_null(value) {
                    column.expr(table).is_null()
                } else {
                    column.expr(table).eq(value.clone())
                };
                Condition::all().add(expr)
            }
            Self::In(columns, rows) => match columns.as_slice() {
                [column] => Condition::all().add(
                    column
                        .expr(table)
                        .is_in(rows.iter().filter_map(|row| row.first().cloned())),
                ),
                _ => rows.iter().fold(Condition::any(), |any, row| {
                    let all = columns
                        .iter()
                        .zip(row.iter())
                        .fold(Condition::all(), |all, (column, value)| {
                            all.add(column.expr(table).eq(value.clone()))
                        });
                    any.add(all)
                }),
            },
            Self::And(exprs) | Self::Or(exprs) => list_condition(exprs, table),
            Self::Expr(expr) => Condition::all().add(expr.clone()),
        }
    }
}

impl From<SimpleExpr> for Expression {
    fn from(expr: SimpleExpr) -> Self {
        Self::Expr(expr)
    }
}

fn list_condition(exprs: &[Expression], table: &str) -> Condition {
    let mut groups: Vec<Condition> = Vec::new();
    let mut group = Condition::all();
    for (i, expr) in exprs.iter().enumerate() {
        match expr {
            Expression::Or(inner) if i > 0 && !inner.is_empty() => {
                if !group.is_empty() {
                    groups.push(group);
                }
                group = Condition::all().add(list_condition(inner, table));
            }
            _ => {
                let condition = expr.to_condition(table);
                if !condition.is_empty() {
                    group = group.add(condition);
                }
            }
        }
    }
    if !group.is_empty() {
        groups.push(group);
    }
    if groups.len() == 1 {
        groups.remove(0)
    } else {
        groups
            .into_iter()
            .fold(Condition::any(), |any, group| any.add(group))
    }
}

/// The `WHERE` clause
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Where {
    /// Top level expressions, joined as described on [Expression]
    pub exprs: Vec<Expression>,
}

impl Where {
    /// Create a `WHERE` clause from a list of expressions
    pub fn new(exprs: Vec<Expression>) -> Self {
        Self { exprs }
    }

    /// Whether there is nothing to filter on
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Render into a [Condition]
    pub fn to_condition(&self, table: &str) -> Condition {
        list_condition(&self.exprs, table)
    }
}

/// `column = value` in a `SET` clause
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// Target column; the table qualifier is ignored
    pub column: Column,
    /// New value
    pub value: Value,
}

impl Assignment {
    /// Create an assignment
    pub fn new<V>(column: Column, value: V) -> Self
    where
        V: Into<Value>,
    {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// The `SET` clause of an `UPDATE`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Set(pub Vec<Assignment>);

impl Set {
    /// Create a `SET` clause from a list of assignments
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self(assignments)
    }

    /// Add an assignment, replacing any earlier assignment to the same column
    pub fn push(&mut self, assignment: Assignment) {
        match self
            .0
            .iter_mut()
            .find(|a| a.column.name == assignment.column.name)
        {
            Some(existing) => *existing = assignment,
            None => self.0.push(assignment),
        }
    }

    /// Whether there is no assignment
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the assignment to a column
    pub fn get(&self, column: &str) -> Option<&Assignment> {
        self.0.iter().find(|a| a.column.name == column)
    }
}

/// Kinds of clause a statement holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseKind {
    /// `WHERE`
    Where,
    /// `SET`
    Set,
    /// `UPDATE <table>`
    Update,
}

/// A clause added to a [StatementContext][crate::StatementContext]
#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    /// Expressions are appended to the existing `WHERE` clause
    Where(Where),
    /// Assignments are merged into the existing `SET` clause
    Set(Set),
    /// Turns the statement into an `UPDATE`, optionally of another table
    Update(Option<String>),
}

impl Clause {
    /// The kind of this clause
    pub fn kind(&self) -> ClauseKind {
        match self {
            Self::Where(_) => ClauseKind::Where,
            Self::Set(_) => ClauseKind::Set,
            Self::Update(_) => ClauseKind::Update,
        }
    }
}

impl From<Where> for Clause {
    fn from(clause: Where) -> Self {
        Self::Where(clause)
    }
}

impl From<Set> for Clause {
    fn from(clause: Set) -> Self {
        Self::Set(clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sea_query::{ConditionalStatement, PostgresQueryBuilder, Query};

    fn render(clause: &Where) -> String {
        Query::select()
            .column(Alias::new("id"))
            .from(Alias::new("users"))
            .cond_where(clause.to_condition("users"))
            .to_string(PostgresQueryBuilder)
    }

    fn name_eq(name: &str) -> Expression {
        Expression::eq(Column::current("name"), name)
    }

    #[test]
    fn eq_null_renders_is_null() {
        let clause = Where::new(vec![Expression::eq(
            Column::current("deleted_at"),
            Option::<String>::None,
        )]);
        assert_eq!(
            render(&clause),
            r#"SELECT "id" FROM "users" WHERE "users"."deleted_at" IS NULL"#
        );
    }

    #[test]
    fn or_is_joined_to_preceding() {
        let clause = Where::new(vec![name_eq("a"), Expression::Or(vec![name_eq("b")])]);
        assert_eq!(
            render(&clause),
            r#"SELECT "id" FROM "users" WHERE "users"."name" = 'a' OR "users"."name" = 'b'"#
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let clause = Where::new(vec![
            name_eq("a"),
            Expression::Or(vec![name_eq("b")]),
            name_eq("c"),
        ]);
        assert_eq!(
            render(&clause),
            r#"SELECT "id" FROM "users" WHERE "users"."name" = 'a' OR ("users"."name" = 'b' AND "users"."name" = 'c')"#
        );
    }

    #[test]
    fn and_group_is_parenthesized() {
        let clause = Where::new(vec![
            Expression::And(vec![name_eq("a"), Expression::Or(vec![name_eq("b")])]),
            name_eq("c"),
        ]);
        assert_eq!(
            render(&clause),
            r#"SELECT "id" FROM "users" WHERE ("users"."name" = 'a' OR "users"."name" = 'b') AND "users"."name" = 'c'"#
        );
    }

    #[test]
    fn in_single_column() {
        let expr = Expression::is_in(Column::current("id"), [1, 2, 3]).unwrap();
        assert_eq!(
            render(&Where::new(vec![expr])),
            r#"SELECT "id" FROM "users" WHERE "users"."id" IN (1, 2, 3)"#
        );
        assert_eq!(Expression::is_in(Column::current("id"), Vec::<i32>::new()), None);
    }

    #[test]
    fn set_push_replaces_same_column() {
        let mut set = Set::new(vec![Assignment::new(Column::new("name"), "a")]);
        set.push(Assignment::new(Column::new("age"), 1));
        set.push(Assignment::new(Column::new("name"), "b"));
        assert_eq!(set.0.len(), 2);
        assert_eq!(set.get("name").map(|a| a.value.clone()), Some(Value::from("b")));
    }
}
