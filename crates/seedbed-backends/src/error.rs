//! Error types for database backends.

use thiserror::Error;

/// Errors raised by a database backend or one of its transactions.
#[derive(Debug, Error)]
pub enum DatabaseError {
	/// The underlying driver reported an error.
	#[error("Database driver error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// A value could not be converted to the requested type.
	#[error("Type error: {0}")]
	TypeError(String),

	/// The transaction was used after it had been committed or rolled back.
	#[error("Transaction error: {0}")]
	TransactionError(String),

	/// A scalar query returned no row.
	#[error("Query returned no rows: {0}")]
	NoRows(String),

	/// The connection URL does not name a supported backend.
	#[error("Unsupported database URL: {0}")]
	UnsupportedUrl(String),
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
