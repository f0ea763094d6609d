//! Database layer (SQLite via sqlx).

pub mod sqlite;

pub use sqlite::Db;
