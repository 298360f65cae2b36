//! SQLite driver implementation

use async_trait::async_trait;
use sqlx::{
	Row as SqlxRow, Sqlite, SqlitePool, Transaction,
	query::Query,
	sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow},
};
use std::sync::Arc;
use std::time::Duration;

use crate::{
	backend::{DatabaseBackend, TransactionExecutor},
	error::{DatabaseError, Result},
	types::{DatabaseType, FixtureValue, QueryResult},
};

/// SQLite database backend
pub struct SqliteBackend {
	pool: Arc<SqlitePool>,
}

impl SqliteBackend {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			pool: Arc::new(pool),
		}
	}

	/// Opens a connection pool for `url` (`sqlite://path/to/db` or `sqlite::memory:`).
	///
	/// Every pooled connection to `:memory:` would see its own empty database,
	/// so in-memory URLs are served by a single long-lived connection.
	pub async fn connect(url: &str) -> Result<Self> {
		let pool = if url.contains(":memory:") {
			SqlitePoolOptions::new()
				.max_connections(1)
				.idle_timeout(None::<Duration>)
				.max_lifetime(None::<Duration>)
				.connect(url)
				.await?
		} else {
			SqlitePool::connect(url).await?
		};
		Ok(Self::new(pool))
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
	fn database_type(&self) -> DatabaseType {
		DatabaseType::Sqlite
	}

	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>> {
		let tx = self.pool.begin().await?;
		Ok(Box::new(SqliteTransactionExecutor::new(tx)))
	}
}

/// SQLite transaction executor
pub struct SqliteTransactionExecutor {
	tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteTransactionExecutor {
	pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
		Self { tx: Some(tx) }
	}

	fn active(&mut self) -> Result<&mut Transaction<'static, Sqlite>> {
		self.tx.as_mut().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})
	}

	fn bind_value<'q>(
		query: Query<'q, Sqlite, SqliteArguments<'q>>,
		value: &'q FixtureValue,
	) -> Query<'q, Sqlite, SqliteArguments<'q>> {
		match value {
			FixtureValue::Null => query.bind(None::<i32>),
			FixtureValue::Bool(b) => query.bind(b),
			FixtureValue::Int(i) => query.bind(i),
			FixtureValue::Float(f) => query.bind(f),
			FixtureValue::String(s) => query.bind(s),
			FixtureValue::Timestamp(dt) => query.bind(dt),
		}
	}

	fn decode_scalar(row: &SqliteRow) -> Result<FixtureValue> {
		// SQLite is dynamically typed; the storage class of the value decides
		// which decode succeeds.
		if let Ok(value) = row.try_get::<Option<i64>, _>(0) {
			return Ok(value.map_or(FixtureValue::Null, FixtureValue::Int));
		}
		if let Ok(value) = row.try_get::<Option<f64>, _>(0) {
			return Ok(value.map_or(FixtureValue::Null, FixtureValue::Float));
		}
		if let Ok(value) = row.try_get::<Option<String>, _>(0) {
			return Ok(value.map_or(FixtureValue::Null, FixtureValue::String));
		}
		Err(DatabaseError::TypeError(
			"Unsupported SQLite scalar column type".to_string(),
		))
	}
}

#[async_trait]
impl TransactionExecutor for SqliteTransactionExecutor {
	async fn execute(&mut self, sql: &str, params: Vec<FixtureValue>) -> Result<QueryResult> {
		let tx = self.active()?;

		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let result = query.execute(&mut **tx).await?;
		let last_insert_id = match result.last_insert_rowid() {
			0 => None,
			id => Some(id),
		};
		Ok(QueryResult {
			rows_affected: result.rows_affected(),
			last_insert_id,
		})
	}

	async fn query_scalar(&mut self, sql: &str, params: Vec<FixtureValue>) -> Result<FixtureValue> {
		let tx = self.active()?;

		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let row = query
			.fetch_optional(&mut **tx)
			.await?
			.ok_or_else(|| DatabaseError::NoRows(sql.to_string()))?;
		Self::decode_scalar(&row)
	}

	async fn commit(mut self: Box<Self>) -> Result<()> {
		let tx = self.tx.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})?;
		tx.commit().await?;
		Ok(())
	}

	async fn rollback(mut self: Box<Self>) -> Result<()> {
		let tx = self.tx.take().ok_or_else(|| {
			DatabaseError::TransactionError("Transaction already consumed".to_string())
		})?;
		tx.rollback().await?;
		Ok(())
	}
}
