//! URL-based backend selection.

use std::sync::Arc;

use crate::{
	backend::DatabaseBackend,
	error::{DatabaseError, Result},
	types::DatabaseType,
};

/// Determines the engine family from a connection URL scheme.
///
/// # Examples
///
/// ```
/// use seedbed_backends::{DatabaseType, connection::database_type_from_url};
///
/// assert_eq!(
/// 	database_type_from_url("postgres://localhost/app").unwrap(),
/// 	DatabaseType::Postgres
/// );
/// assert_eq!(
/// 	database_type_from_url("sqlite::memory:").unwrap(),
/// 	DatabaseType::Sqlite
/// );
/// assert!(database_type_from_url("redis://localhost").is_err());
/// ```
pub fn database_type_from_url(url: &str) -> Result<DatabaseType> {
	let scheme = url.split(':').next().unwrap_or_default().to_lowercase();
	match scheme.as_str() {
		"postgres" | "postgresql" => Ok(DatabaseType::Postgres),
		"mysql" | "mariadb" => Ok(DatabaseType::Mysql),
		"sqlite" => Ok(DatabaseType::Sqlite),
		_ => Err(DatabaseError::UnsupportedUrl(url.to_string())),
	}
}

/// Connects to the database named by `url` and returns it as a backend.
///
/// The backend is picked from the URL scheme. Engines whose cargo feature is
/// disabled are reported as unsupported.
pub async fn connect(url: &str) -> Result<Arc<dyn DatabaseBackend>> {
	let database_type = database_type_from_url(url)?;
	tracing::debug!(%database_type, "connecting fixture backend");

	match database_type {
		#[cfg(feature = "postgres")]
		DatabaseType::Postgres => Ok(Arc::new(
			crate::drivers::postgres::PostgresBackend::connect(url).await?,
		)),
		#[cfg(feature = "mysql")]
		DatabaseType::Mysql => Ok(Arc::new(
			crate::drivers::mysql::MySqlBackend::connect(url).await?,
		)),
		#[cfg(feature = "sqlite")]
		DatabaseType::Sqlite => Ok(Arc::new(
			crate::drivers::sqlite::SqliteBackend::connect(url).await?,
		)),
		#[allow(unreachable_patterns)]
		_ => Err(DatabaseError::UnsupportedUrl(url.to_string())),
	}
}
