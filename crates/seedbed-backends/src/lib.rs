//! # seedbed backends
//!
//! The database collaborator used by the seedbed fixture loader: a closed
//! scalar value type, a backend/transaction trait pair, and sqlx-backed
//! implementations for the supported engines.
//!
//! ## Supported Databases
//!
//! | Database | Feature Flag | Backend Type |
//! |----------|--------------|--------------|
//! | PostgreSQL | `postgres` | [`PostgresBackend`] |
//! | MySQL/MariaDB | `mysql` | [`MySqlBackend`] |
//! | SQLite | `sqlite` | [`SqliteBackend`] |
//!
//! ## Core Traits
//!
//! - **[`DatabaseBackend`]**: opens transactions
//! - **[`TransactionExecutor`]**: `execute`, `query_scalar`, `commit`, `rollback`
//!   on a single dedicated connection
//!
//! ```rust,ignore
//! use seedbed_backends::{FixtureValue, connect};
//!
//! let backend = connect("sqlite::memory:").await?;
//! let mut tx = backend.begin().await?;
//! let count = tx
//! 	.query_scalar("SELECT COUNT(*) FROM \"users\" WHERE \"id\" = ?", vec![FixtureValue::Int(1)])
//! 	.await?;
//! tx.commit().await?;
//! ```

pub mod backend;
pub mod connection;
pub mod drivers;
pub mod error;
pub mod types;

pub use backend::{DatabaseBackend, TransactionExecutor};
pub use connection::connect;
pub use error::{DatabaseError, Result};
pub use types::{DatabaseType, FixtureValue, QueryResult};

#[cfg(feature = "mysql")]
pub use drivers::mysql::{MySqlBackend, MySqlTransactionExecutor};
#[cfg(feature = "postgres")]
pub use drivers::postgres::{PgTransactionExecutor, PostgresBackend};
#[cfg(feature = "sqlite")]
pub use drivers::sqlite::{SqliteBackend, SqliteTransactionExecutor};
