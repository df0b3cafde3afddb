mod connection;
#[cfg(feature = "mock")]
mod mock;
mod operation;
mod statement;

pub use connection::*;
#[cfg(feature = "mock")]
pub use mock::*;
pub use operation::*;
pub use statement::*;

use crate::{NowFn, OperationKind, Schema};
use chrono::Utc;
use std::sync::Arc;

/// Entry point for running operations against a connection
#[derive(Clone, derive_more::Debug)]
pub struct Database {
    #[debug(skip)]
    conn: Arc<dyn ConnectionTrait>,
    db_backend: DbBackend,
    #[debug(skip)]
    now_fn: NowFn,
}

impl Database {
    /// Wrap a connection; timestamps come from the system clock
    pub fn new(conn: Arc<dyn ConnectionTrait>) -> Self {
        let db_backend = conn.get_database_backend();
        Self {
            conn,
            db_backend,
            now_fn: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to timestamp rows
    pub fn with_now_fn(mut self, now_fn: NowFn) -> Self {
        self.now_fn = now_fn;
        self
    }

    /// Get the database backend of the connection
    pub fn get_database_backend(&self) -> DbBackend {
        self.db_backend
    }

    /// The underlying connection
    pub fn connection(&self) -> &dyn ConnectionTrait {
        self.conn.as_ref()
    }

    /// Start a `SELECT` on the table of `schema`
    pub fn find(&self, schema: &Arc<Schema>) -> Operation<'_> {
        Operation::new(self, OperationKind::Query, schema)
    }

    /// Start an `UPDATE` on the table of `schema`
    pub fn update(&self, schema: &Arc<Schema>) -> Operation<'_> {
        Operation::new(self, OperationKind::Update, schema)
    }

    /// Start a `DELETE` on the table of `schema`
    pub fn delete(&self, schema: &Arc<Schema>) -> Operation<'_> {
        Operation::new(self, OperationKind::Delete, schema)
    }

    pub(crate) fn now_fn(&self) -> NowFn {
        self.now_fn.clone()
    }
}
