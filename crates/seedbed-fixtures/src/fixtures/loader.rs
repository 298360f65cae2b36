//! Fixture loading.
//!
//! [`LoadContext`] runs rows against one transaction, deciding per row
//! between a generated-key insert, a plain insert, an update, or nothing.
//! [`FixtureLoader`] is the batch front-end: it parses documents, opens the
//! transaction, and commits or rolls back once for the whole batch.

use std::collections::BTreeMap;
use std::path::Path;

use seedbed_backends::{DatabaseBackend, FixtureValue, TransactionExecutor};

use super::{
	Dialect, Driver, FixtureData, FixtureFormat, FixtureParser, KeyRegistry, LoadOptions,
	RowCompiler, RowSpec, Statement,
};
use crate::error::{FixtureError, FixtureResult, RowError};

/// Column whose explicit writes move the backing sequence.
const SEQUENCE_COLUMN: &str = "id";

/// Statistics of a finished load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResult {
	/// Rows processed.
	pub records_loaded: usize,

	/// Rows written by INSERT, generated keys included.
	pub inserted: usize,

	/// Rows written by UPDATE.
	pub updated: usize,

	/// Rows already present with nothing to update.
	pub unchanged: usize,

	/// Keys generated by the batch, by logical name.
	pub generated_keys: BTreeMap<String, FixtureValue>,
}

/// What happened to a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
	/// Inserted with a database-assigned key.
	Generated,
	/// No row matched the primary key; inserted.
	Inserted,
	/// A row matched; updated.
	Updated,
	/// A row matched and there was nothing to update.
	Unchanged,
}

/// State of one load batch: the transaction, the key registry and the
/// statement dialect.
///
/// Created once per batch and shared by every document of that batch, so a
/// reference in a later document resolves keys generated by an earlier one.
pub struct LoadContext {
	tx: Box<dyn TransactionExecutor>,
	registry: KeyRegistry,
	dialect: &'static dyn Dialect,
	options: LoadOptions,
	result: LoadResult,
}

impl LoadContext {
	/// Wraps an open transaction.
	///
	/// `driver` selects the dialect; `options.driver` is not consulted here.
	pub fn new(tx: Box<dyn TransactionExecutor>, driver: Driver, options: LoadOptions) -> Self {
		Self {
			tx,
			registry: KeyRegistry::new(),
			dialect: driver.dialect(),
			options,
			result: LoadResult::default(),
		}
	}

	/// Keys generated so far.
	pub fn registry(&self) -> &KeyRegistry {
		&self.registry
	}

	/// Loads every row of a document, in order.
	///
	/// Stops at the first failing row; the transaction is left open for the
	/// caller to roll back.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::RowProcessing`] with the 1-based index of the
	/// failing row within `data`.
	pub async fn load_document(&mut self, data: &FixtureData) -> FixtureResult<()> {
		tracing::debug!(
			source = data.source.as_deref().unwrap_or("<memory>"),
			rows = data.len(),
			driver = %self.dialect.driver(),
			"loading fixture document"
		);

		for (idx, spec) in data.iter().enumerate() {
			let row = idx + 1;
			let outcome = self
				.load_row(spec)
				.await
				.map_err(|source| FixtureError::row(row, source))?;
			tracing::debug!(row, table = %spec.table, ?outcome, "row loaded");

			self.result.records_loaded += 1;
			match outcome {
				RowOutcome::Generated | RowOutcome::Inserted => self.result.inserted += 1,
				RowOutcome::Updated => self.result.updated += 1,
				RowOutcome::Unchanged => self.result.unchanged += 1,
			}
		}
		Ok(())
	}

	/// Loads a single row.
	pub async fn load_row(&mut self, spec: &RowSpec) -> Result<RowOutcome, RowError> {
		let compiler = RowCompiler::new(self.dialect, self.options.set_updated_at_on_insert);
		let row = compiler.compile(spec);

		if let Some(key) = row.generated_key() {
			let statement = compiler.generated_insert(&row, &self.registry)?;
			self.dump(&statement);

			let value = if self.dialect.supports_returning_clause() {
				self.tx
					.query_scalar(&statement.sql, statement.params)
					.await?
			} else {
				self.tx
					.execute(&statement.sql, statement.params)
					.await?
					.last_insert_id
					.map(FixtureValue::Int)
					.unwrap_or(FixtureValue::Null)
			};
			if value.is_null() {
				return Err(RowError::MissingGeneratedKey(key.to_string()));
			}

			self.registry.set(key, value);
			return Ok(RowOutcome::Generated);
		}

		row.resolve_references(&self.registry)?;
		let check = compiler.existence_check(&row, &self.registry)?;
		self.dump(&check);
		let count = i64::try_from(self.tx.query_scalar(&check.sql, check.params).await?)?;

		if count == 0 {
			let statement = compiler.insert(&row, &self.registry)?;
			self.dump(&statement);
			self.tx.execute(&statement.sql, statement.params).await?;

			if row.first_insert_column() == Some(SEQUENCE_COLUMN) {
				self.dialect
					.resync_sequence(&mut *self.tx, &row.table, SEQUENCE_COLUMN)
					.await?;
			}
			Ok(RowOutcome::Inserted)
		} else if !row.update.is_empty() {
			let statement = compiler.update(&row, &self.registry)?;
			self.dump(&statement);
			self.tx.execute(&statement.sql, statement.params).await?;

			if row.first_update_column() == Some(SEQUENCE_COLUMN) {
				self.dialect
					.resync_sequence(&mut *self.tx, &row.table, SEQUENCE_COLUMN)
					.await?;
			}
			Ok(RowOutcome::Updated)
		} else {
			Ok(RowOutcome::Unchanged)
		}
	}

	fn dump(&self, statement: &Statement) {
		if self.options.dump_sql {
			tracing::info!(
				target: "seedbed::sql",
				sql = %statement.sql,
				params = ?statement.params,
				"SQL"
			);
		}
	}

	fn finish(self) -> (Box<dyn TransactionExecutor>, LoadResult) {
		let mut result = self.result;
		result.generated_keys = self.registry.into_keys();
		(self.tx, result)
	}

	/// Hands the transaction back without committing, for callers that
	/// embed a load into their own transaction.
	pub fn into_inner(self) -> (Box<dyn TransactionExecutor>, LoadResult) {
		self.finish()
	}

	/// Commits the batch.
	pub async fn commit(self) -> FixtureResult<LoadResult> {
		let (tx, result) = self.finish();
		tx.commit().await.map_err(FixtureError::Transaction)?;
		tracing::debug!(
			rows = result.records_loaded,
			inserted = result.inserted,
			updated = result.updated,
			"fixture batch committed"
		);
		Ok(result)
	}

	/// Rolls the batch back.
	pub async fn rollback(self) -> FixtureResult<()> {
		let (tx, _) = self.finish();
		tx.rollback().await.map_err(FixtureError::Transaction)
	}
}

/// Loads fixture documents into a database, one transaction per call.
///
/// # Example
///
/// ```ignore
/// use seedbed_fixtures::fixtures::{FixtureLoader, LoadOptions};
///
/// let backend = seedbed_backends::connect("sqlite::memory:").await?;
/// let loader = FixtureLoader::with_options(LoadOptions::new().with_dump_sql(false));
/// let result = loader.load_file(backend.as_ref(), "fixtures/users.yaml").await?;
/// println!("Loaded {} records", result.records_loaded);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureLoader {
	options: LoadOptions,
	parser: FixtureParser,
}

impl FixtureLoader {
	/// Creates a loader with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a loader with the given options.
	pub fn with_options(options: LoadOptions) -> Self {
		Self {
			options,
			parser: FixtureParser::new(),
		}
	}

	/// Returns the loader options.
	pub fn options(&self) -> &LoadOptions {
		&self.options
	}

	/// Loads a single in-memory document.
	pub async fn load_str(
		&self,
		backend: &dyn DatabaseBackend,
		content: &str,
		format: FixtureFormat,
	) -> FixtureResult<LoadResult> {
		let data = self.parser.parse_string(content, format)?;
		self.load_documents(backend, std::slice::from_ref(&data))
			.await
	}

	/// Loads a single fixture file.
	pub async fn load_file(
		&self,
		backend: &dyn DatabaseBackend,
		path: impl AsRef<Path>,
	) -> FixtureResult<LoadResult> {
		let data = self.parser.parse_file(path.as_ref())?;
		self.load_documents(backend, std::slice::from_ref(&data))
			.await
	}

	/// Loads several files as one batch.
	///
	/// Every file is parsed before the transaction opens. Rows of later files
	/// may reference keys generated by earlier ones.
	pub async fn load_files<P: AsRef<Path>>(
		&self,
		backend: &dyn DatabaseBackend,
		paths: &[P],
	) -> FixtureResult<LoadResult> {
		let documents = paths
			.iter()
			.map(|path| self.parser.parse_file(path.as_ref()))
			.collect::<FixtureResult<Vec<_>>>()?;
		self.load_documents(backend, &documents).await
	}

	/// Loads parsed documents as one batch.
	///
	/// On failure the transaction is rolled back and the original error is
	/// returned; a failing rollback is only logged.
	pub async fn load_documents(
		&self,
		backend: &dyn DatabaseBackend,
		documents: &[FixtureData],
	) -> FixtureResult<LoadResult> {
		let driver = self
			.options
			.driver
			.unwrap_or_else(|| Driver::from(backend.database_type()));
		let tx = backend.begin().await.map_err(FixtureError::Transaction)?;
		let mut context = LoadContext::new(tx, driver, self.options.clone());

		for data in documents {
			if let Err(error) = context.load_document(data).await {
				tracing::debug!(
					source = data.source.as_deref().unwrap_or("<memory>"),
					%error,
					"fixture batch failed, rolling back"
				);
				if let Err(rollback_error) = context.rollback().await {
					tracing::warn!(error = %rollback_error, "rollback failed");
				}
				return Err(error);
			}
		}

		context.commit().await
	}
}
