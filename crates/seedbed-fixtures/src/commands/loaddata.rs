//! loaddata command implementation.
//!
//! This command loads fixture files into the database as one batch.

use std::path::PathBuf;

use seedbed_backends::DatabaseBackend;

use crate::error::{FixtureError, FixtureResult};
use crate::fixtures::{Driver, FixtureLoader, LoadOptions, LoadResult};

/// Arguments for the loaddata command.
#[derive(Debug, Clone, Default)]
pub struct LoadDataArgs {
	/// Fixture file paths to load.
	pub fixture_paths: Vec<PathBuf>,
}

/// Options for the loaddata command.
#[derive(Debug, Clone, Default)]
pub struct LoadDataOptions {
	/// Loader options for the batch.
	pub load_options: LoadOptions,

	/// Verbosity level.
	pub verbosity: u8,
}

impl LoadDataOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the loader options.
	pub fn with_load_options(mut self, options: LoadOptions) -> Self {
		self.load_options = options;
		self
	}

	/// Forces the statement dialect.
	pub fn with_driver(mut self, driver: Driver) -> Self {
		self.load_options.driver = Some(driver);
		self
	}

	/// Sets whether statements are logged.
	pub fn with_dump_sql(mut self, dump_sql: bool) -> Self {
		self.load_options.dump_sql = dump_sql;
		self
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// The loaddata command for loading fixtures into the database.
///
/// # Example
///
/// ```ignore
/// let backend = seedbed_backends::connect("sqlite://app.db").await?;
/// let command = LoadDataCommand::new();
/// let args = LoadDataArgs {
///     fixture_paths: vec![PathBuf::from("fixtures/users.yaml")],
/// };
/// let options = LoadDataOptions::new().with_verbosity(1);
/// let result = command.execute(backend.as_ref(), args, options).await?;
/// println!("Loaded {} records", result.records_loaded);
/// ```
#[derive(Debug, Default)]
pub struct LoadDataCommand;

impl LoadDataCommand {
	/// Creates a new loaddata command.
	pub fn new() -> Self {
		Self
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"loaddata"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Installs the named fixture(s) in the database"
	}

	/// Executes the loaddata command.
	///
	/// All files are loaded in one transaction, in the order given.
	pub async fn execute(
		&self,
		backend: &dyn DatabaseBackend,
		args: LoadDataArgs,
		options: LoadDataOptions,
	) -> FixtureResult<LoadResult> {
		if args.fixture_paths.is_empty() {
			return Err(FixtureError::Validation {
				field: "fixture_paths".to_string(),
				message: "At least one fixture file must be specified".to_string(),
			});
		}

		for path in &args.fixture_paths {
			if !path.exists() {
				return Err(FixtureError::File {
					path: path.clone(),
					source: std::io::Error::new(
						std::io::ErrorKind::NotFound,
						"fixture file does not exist",
					),
				});
			}
		}

		let loader = FixtureLoader::with_options(options.load_options);
		let result = loader.load_files(backend, &args.fixture_paths).await?;

		if options.verbosity > 0 {
			self.print_result(&result);
		}

		Ok(result)
	}

	fn print_result(&self, result: &LoadResult) {
		println!("Installed {} object(s)", result.records_loaded);
		if result.updated > 0 || result.unchanged > 0 {
			println!(
				"  {} inserted, {} updated, {} unchanged",
				result.inserted, result.updated, result.unchanged
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use seedbed_backends::SqliteBackend;
	use std::io::Write;
	use tempfile::NamedTempFile;

	async fn backend() -> SqliteBackend {
		let backend = SqliteBackend::connect("sqlite::memory:").await.unwrap();
		sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
			.execute(backend.pool())
			.await
			.unwrap();
		backend
	}

	#[rstest]
	fn test_command_metadata() {
		let cmd = LoadDataCommand::new();
		assert_eq!(cmd.name(), "loaddata");
		assert!(!cmd.description().is_empty());
	}

	#[rstest]
	fn test_options_builder() {
		let options = LoadDataOptions::new()
			.with_driver(Driver::Postgres)
			.with_dump_sql(false)
			.with_verbosity(2);

		assert_eq!(options.load_options.driver, Some(Driver::Postgres));
		assert!(!options.load_options.dump_sql);
		assert_eq!(options.verbosity, 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_execute_empty_paths() {
		let backend = backend().await;
		let cmd = LoadDataCommand::new();

		let result = cmd
			.execute(&backend, LoadDataArgs::default(), LoadDataOptions::new())
			.await;
		assert!(matches!(result, Err(FixtureError::Validation { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_execute_nonexistent_file() {
		let backend = backend().await;
		let cmd = LoadDataCommand::new();
		let args = LoadDataArgs {
			fixture_paths: vec![PathBuf::from("/nonexistent/fixture.json")],
		};

		let result = cmd.execute(&backend, args, LoadDataOptions::new()).await;
		assert!(matches!(result, Err(FixtureError::File { .. })));
	}

	#[rstest]
	#[tokio::test]
	async fn test_execute_with_fixture() {
		let backend = backend().await;
		let mut file = NamedTempFile::with_suffix(".json").unwrap();
		writeln!(
			file,
			r#"[{{"table": "users", "pk": {{"id": 1}}, "fields": {{"name": "admin"}}}}]"#
		)
		.unwrap();

		let cmd = LoadDataCommand::new();
		let args = LoadDataArgs {
			fixture_paths: vec![file.path().to_path_buf()],
		};

		let result = cmd
			.execute(&backend, args, LoadDataOptions::new())
			.await
			.unwrap();
		assert_eq!(result.records_loaded, 1);
		assert_eq!(result.inserted, 1);
	}
}
