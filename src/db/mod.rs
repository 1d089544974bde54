//! Database layer
//!
//! Connection pooling, embedded migrations and entity repositories.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool};
