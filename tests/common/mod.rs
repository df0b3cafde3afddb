use chrono::{DateTime, TimeZone, Utc};
use sea_orm_soft_delete::*;
use std::sync::Arc;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

/// `users (id, name, deleted_by, deleted_at)`, soft deleted with actor tracking
pub fn users() -> Arc<Schema> {
    users_with(Field::new("deleted_at").setting(TAG_ACTOR_FIELD, "deleted_by"))
}

pub fn users_with(deleted_at: Field) -> Arc<Schema> {
    Schema::new("users")
        .field(Field::new("id").primary_key())
        .field(Field::new("name"))
        .field(Field::new("deleted_by"))
        .field(deleted_at.with_clauses::<DeletedAt>())
        .finish()
}

pub fn setup(mock: MockDatabase) -> (Arc<MockDatabase>, Database) {
    let mock = Arc::new(mock);
    let db = Database::new(mock.clone()).with_now_fn(Arc::new(now));
    (mock, db)
}

pub fn affected(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn name_eq(name: &str) -> Expression {
    Expression::eq(Column::current("name"), name)
}
