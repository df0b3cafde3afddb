use crate::{DbBackend, DbErr, Record, Statement};

/// The result of executing a statement that does not return rows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// The id of the last inserted row, if the backend reports one
    pub last_insert_id: u64,
    /// The number of rows affected
    pub rows_affected: u64,
}

/// Creates constraints for any structure that can execute SQL statements
#[async_trait::async_trait]
pub trait ConnectionTrait: Send + Sync {
    /// Fetch the database backend as specified in [DbBackend].
    fn get_database_backend(&self) -> DbBackend;

    /// Execute a [Statement]
    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr>;

    /// Execute a [Statement] and return the fetched rows
    async fn query_all(&self, stmt: Statement) -> Result<Vec<Record>, DbErr>;

    /// Check if the connection is a test connection for the Mock database
    fn is_mock_connection(&self) -> bool {
        false
    }
}
