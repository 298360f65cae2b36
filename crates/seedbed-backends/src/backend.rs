//! Backend and transaction traits consumed by the fixture loader.

use async_trait::async_trait;

use crate::{
	error::Result,
	types::{DatabaseType, FixtureValue, QueryResult},
};

/// A database that can open transactions for a fixture batch.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
	/// Returns the engine family behind this backend.
	fn database_type(&self) -> DatabaseType;

	/// Begins a transaction on a dedicated connection.
	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>>;
}

/// Transaction executor trait for database-specific transaction handling
///
/// This trait represents a dedicated database connection that is used for
/// transaction operations. All statements executed through this executor
/// are guaranteed to run on the same physical connection, so a batch sees
/// its own uncommitted writes.
///
/// # Implementation Notes
///
/// SQLx connection pools distribute queries across multiple connections.
/// Implementations hold the `Transaction` returned by `pool.begin()`, which
/// maintains connection affinity until it is committed or rolled back.
#[async_trait]
pub trait TransactionExecutor: Send {
	/// Execute a statement within the transaction.
	async fn execute(&mut self, sql: &str, params: Vec<FixtureValue>) -> Result<QueryResult>;

	/// Run a query and return the first column of its first row.
	///
	/// SQL `NULL` is returned as [`FixtureValue::Null`]. A query that returns
	/// no row at all fails with [`crate::DatabaseError::NoRows`].
	async fn query_scalar(&mut self, sql: &str, params: Vec<FixtureValue>) -> Result<FixtureValue>;

	/// Commit the transaction
	async fn commit(self: Box<Self>) -> Result<()>;

	/// Rollback the transaction
	async fn rollback(self: Box<Self>) -> Result<()>;
}
