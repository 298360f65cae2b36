//! Error types for fixture loading.
//!
//! [`FixtureError`] is the single terminal failure returned by every load
//! entry point. Failures tied to one row are wrapped in
//! [`FixtureError::RowProcessing`] together with the row's 1-based index.

use std::path::PathBuf;

use seedbed_backends::DatabaseError;
use thiserror::Error;

/// Errors that can occur while loading a fixture batch.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// The fixture document is malformed. Raised before any SQL runs.
	#[error("Invalid fixture document: {0}")]
	Deserialization(String),

	/// A fixture file could not be read.
	#[error("Error loading file {}: {source}", path.display())]
	File {
		/// Path of the file that failed.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},

	/// The file extension does not name a supported fixture format.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// A row failed to compile or execute.
	#[error("Error loading row {row}: {source}")]
	RowProcessing {
		/// 1-based index of the row within its document.
		row: usize,
		/// What went wrong with the row.
		#[source]
		source: RowError,
	},

	/// Opening or finishing the batch transaction failed.
	#[error("Transaction error: {0}")]
	Transaction(#[source] DatabaseError),

	/// Invalid loader configuration.
	#[error("Invalid configuration: {0}")]
	Config(String),

	/// A command was invoked with invalid arguments.
	#[error("Validation error: {field}: {message}")]
	Validation {
		/// Argument that failed validation.
		field: String,
		/// Validation error message.
		message: String,
	},
}

impl FixtureError {
	/// Wraps a row failure with its 1-based row index.
	pub fn row(row: usize, source: impl Into<RowError>) -> Self {
		Self::RowProcessing {
			row,
			source: source.into(),
		}
	}

	/// Returns the 1-based row index for row failures.
	pub fn row_index(&self) -> Option<usize> {
		match self {
			Self::RowProcessing { row, .. } => Some(*row),
			_ => None,
		}
	}
}

/// Causes of a single row failing.
#[derive(Debug, Error)]
pub enum RowError {
	/// A statement, scalar read or sequence fix-up failed in the database.
	#[error(transparent)]
	Database(#[from] DatabaseError),

	/// `PK_REFERENCE(name)` was used before any row generated `name`.
	#[error("primary key reference `{0}` is not defined by an earlier row")]
	UnresolvedKey(String),

	/// `PK_GENERATE(name)` appeared in a primary key with more than one column.
	#[error("generated primary key `{0}` must be the only primary key column")]
	GeneratedKeyInCompositeKey(String),

	/// The engine did not report the key assigned by a generated insert.
	#[error("database did not return a generated key for `{0}`")]
	MissingGeneratedKey(String),
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
