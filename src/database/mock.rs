use crate::{ConnectionTrait, DbBackend, DbErr, ExecResult, Record, Statement, debug_print};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
};

/// A connection that records every statement and replays canned results
#[derive(Debug)]
pub struct MockDatabase {
    db_backend: DbBackend,
    transaction_log: Mutex<Vec<Statement>>,
    exec_results: Mutex<VecDeque<Result<MockExecResult, DbErr>>>,
    query_results: Mutex<VecDeque<Result<Vec<Record>, DbErr>>>,
}

/// Defines the results obtained from a [MockDatabase]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockExecResult {
    /// The last inserted id on auto-increment
    pub last_insert_id: u64,
    /// The number of rows affected by the database operation
    pub rows_affected: u64,
}

impl From<MockExecResult> for ExecResult {
    fn from(result: MockExecResult) -> Self {
        Self {
            last_insert_id: result.last_insert_id,
            rows_affected: result.rows_affected,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DbErr> {
    mutex
        .lock()
        .map_err(|_| DbErr::Conn("MockDatabase mutex poisoned".to_owned()))
}

impl MockDatabase {
    /// Instantiate a mock database with a [DbBackend] to simulate real
    /// world SQL databases
    pub fn new(db_backend: DbBackend) -> Self {
        Self {
            db_backend,
            transaction_log: Mutex::new(Vec::new()),
            exec_results: Mutex::new(VecDeque::new()),
            query_results: Mutex::new(VecDeque::new()),
        }
    }

    /// Add the [MockExecResult]s to the `exec_results` field for `Self`
    pub fn append_exec_results<I>(self, results: I) -> Self
    where
        I: IntoIterator<Item = MockExecResult>,
    {
        if let Ok(mut queue) = self.exec_results.lock() {
            queue.extend(results.into_iter().map(Ok));
        }
        self
    }

    /// Add errors to be returned by subsequent executions
    pub fn append_exec_errors<I>(self, errors: I) -> Self
    where
        I: IntoIterator<Item = DbErr>,
    {
        if let Ok(mut queue) = self.exec_results.lock() {
            queue.extend(errors.into_iter().map(Err));
        }
        self
    }

    /// Add rows to be returned by subsequent queries, one `Vec` per query
    pub fn append_query_results<I, R>(self, results: I) -> Self
    where
        I: IntoIterator<Item = Vec<R>>,
        R: Into<Record>,
    {
        if let Ok(mut queue) = self.query_results.lock() {
            queue.extend(
                results
                    .into_iter()
                    .map(|rows| Ok(rows.into_iter().map(Into::into).collect())),
            );
        }
        self
    }

    /// Take every statement executed so far
    pub fn into_transaction_log(&self) -> Vec<Statement> {
        match self.transaction_log.lock() {
            Ok(mut log) => std::mem::take(&mut *log),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

#[async_trait::async_trait]
impl ConnectionTrait for MockDatabase {
    fn get_database_backend(&self) -> DbBackend {
        self.db_backend
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        debug_print!("{}", stmt);
        lock(&self.transaction_log)?.push(stmt);
        match lock(&self.exec_results)?.pop_front() {
            Some(result) => result.map(Into::into),
            None => Err(DbErr::Exec("MockDatabase has no more exec results".to_owned())),
        }
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<Record>, DbErr> {
        debug_print!("{}", stmt);
        lock(&self.transaction_log)?.push(stmt);
        match lock(&self.query_results)?.pop_front() {
            Some(result) => result,
            None => Err(DbErr::Query(
                "MockDatabase has no more query results".to_owned(),
            )),
        }
    }

    fn is_mock_connection(&self) -> bool {
        true
    }
}
