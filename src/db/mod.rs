//! Database module: models, schema and the SQLite-backed storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and the profile projection
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool setup and every statement the service runs

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{IdealizadorRow, LoginRow, NewIdealizador, Profile, ProfileUpdate};
pub use schema::SQLITE_INIT;
pub use sqlite::{IdealizadoresStorage, SqlitePool, connect};
