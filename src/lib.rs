#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # SeaORM Soft Delete
//!
//! Soft delete for statements built with [SeaQuery](https://github.com/SeaQL/sea-query).
//!
//! A field declared as [DeletedAt] changes how its table is operated on:
//!
//! 1. Deletes become updates
//!
//!     `DELETE` is rewritten into an `UPDATE` setting the field to the current time,
//!     and optionally recording who deleted the row.
//!
//! 2. Reads skip deleted rows
//!
//!     `SELECT` and `UPDATE` only see rows whose field still holds the "not deleted" value,
//!     `NULL` unless configured otherwise.
//!
//! 3. Unscoped access
//!
//!     An unscoped operation sees and removes rows for real.
//!
//! ## Declare the table
//!
//! ```
//! use sea_orm_soft_delete::{DeletedAt, Field, Schema, TAG_ACTOR_FIELD};
//!
//! let users = Schema::new("users")
//!     .field(Field::new("id").primary_key())
//!     .field(Field::new("name"))
//!     .field(Field::new("deleted_by"))
//!     .field(
//!         Field::new("deleted_at")
//!             .setting(TAG_ACTOR_FIELD, "deleted_by")
//!             .with_clauses::<DeletedAt>(),
//!     )
//!     .finish();
//! # let _ = users;
//! ```
//!
//! ## Operate on it
//!
//! ```
//! # use sea_orm_soft_delete::*;
//! # use std::sync::Arc;
//! # fn main() -> Result<(), DbErr> {
//! # let users = Schema::new("users")
//! #     .field(Field::new("id").primary_key())
//! #     .field(Field::new("name"))
//! #     .field(Field::new("deleted_by"))
//! #     .field(Field::new("deleted_at").setting(TAG_ACTOR_FIELD, "deleted_by").with_clauses::<DeletedAt>())
//! #     .finish();
//! # #[cfg(feature = "mock")]
//! # {
//! let db = Database::new(Arc::new(MockDatabase::new(DbBackend::Postgres)));
//!
//! let find = db
//!     .find(&users)
//!     .filter(Expression::eq(Column::current("name"), "Alice"))
//!     .build()?;
//! assert_eq!(
//!     find.statement().map(|s| s.sql.as_str()),
//!     Some(r#"SELECT * FROM "users" WHERE "users"."name" = $1 AND "users"."deleted_at" IS NULL"#)
//! );
//!
//! let delete = db
//!     .delete(&users)
//!     .context(Context::new().with_value(DELETED_BY, "admin"))
//!     .dest(Record::new().with("id", 1))
//!     .build()?;
//! assert_eq!(
//!     delete.statement().map(|s| s.sql.as_str()),
//!     Some(r#"UPDATE "users" SET "deleted_at" = $1, "deleted_by" = $2 WHERE "users"."id" IN ($3) AND "users"."deleted_at" IS NULL"#)
//! );
//! # }
//! # Ok(())
//! # }
//! ```

mod database;
pub mod entity;
pub mod error;
pub mod query;
pub mod soft_delete;
mod util;
pub mod value;

pub use database::*;
pub use entity::*;
pub use error::*;
pub use query::*;
pub use soft_delete::*;
pub use value::*;

pub use sea_query;
