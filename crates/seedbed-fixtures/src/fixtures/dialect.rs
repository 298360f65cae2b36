//! SQL dialect strategies.
//!
//! Everything engine-specific the loader needs sits behind [`Dialect`]:
//! identifier quoting, placeholder syntax, how generated keys come back, and
//! the sequence fix-up after explicit key writes. Supporting another engine
//! means adding a strategy here; the loader does not branch on engines.

use async_trait::async_trait;
use serde::Deserialize;
use seedbed_backends::{DatabaseError, DatabaseType, FixtureValue, TransactionExecutor};
use std::fmt;
use std::str::FromStr;

/// Target engine family, selecting the [`Dialect`] used to build statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
	/// ANSI quoting, `?` placeholders, last-insert-id key retrieval (SQLite and friends).
	#[default]
	Generic,
	/// `$n` placeholders, `RETURNING`, serial sequence resynchronization.
	Postgres,
	/// Back-tick quoting, `?` placeholders, `LAST_INSERT_ID()` key retrieval.
	Mysql,
}

impl Driver {
	/// Returns the statement-building strategy for this driver.
	pub fn dialect(self) -> &'static dyn Dialect {
		static GENERIC: GenericDialect = GenericDialect;
		static POSTGRES: PostgresDialect = PostgresDialect;
		static MYSQL: MySqlDialect = MySqlDialect;

		match self {
			Driver::Generic => &GENERIC,
			Driver::Postgres => &POSTGRES,
			Driver::Mysql => &MYSQL,
		}
	}
}

impl From<DatabaseType> for Driver {
	fn from(database_type: DatabaseType) -> Self {
		match database_type {
			DatabaseType::Postgres => Driver::Postgres,
			DatabaseType::Mysql => Driver::Mysql,
			DatabaseType::Sqlite => Driver::Generic,
		}
	}
}

impl FromStr for Driver {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"generic" | "sqlite" => Ok(Driver::Generic),
			"postgres" | "postgresql" => Ok(Driver::Postgres),
			"mysql" | "mariadb" => Ok(Driver::Mysql),
			other => Err(format!(
				"unknown driver '{}' (expected generic, postgres or mysql)",
				other
			)),
		}
	}
}

impl fmt::Display for Driver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Driver::Generic => write!(f, "generic"),
			Driver::Postgres => write!(f, "postgres"),
			Driver::Mysql => write!(f, "mysql"),
		}
	}
}

/// Engine-specific pieces of statement generation.
#[async_trait]
pub trait Dialect: Send + Sync + fmt::Debug {
	/// The driver this strategy implements.
	fn driver(&self) -> Driver;

	/// Quotes an identifier, doubling embedded quote characters.
	fn quote_identifier(&self, ident: &str) -> String {
		format!("\"{}\"", ident.replace('"', "\"\""))
	}

	/// Placeholder for the 1-based positional argument `index`.
	fn placeholder(&self, index: usize) -> String;

	/// Whether a generated key is read back with `INSERT ... RETURNING`
	/// instead of the last-insert-id side channel.
	fn supports_returning_clause(&self) -> bool {
		false
	}

	/// Tail of an INSERT that names no columns.
	fn empty_insert_clause(&self) -> &'static str {
		"DEFAULT VALUES"
	}

	/// Moves the sequence behind `table.column` past the highest stored value
	/// after an explicit write. A no-op for engines without sequences.
	async fn resync_sequence(
		&self,
		tx: &mut dyn TransactionExecutor,
		table: &str,
		column: &str,
	) -> Result<(), DatabaseError> {
		let _ = (tx, table, column);
		Ok(())
	}
}

/// ANSI dialect used for SQLite and other engines without sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
	fn driver(&self) -> Driver {
		Driver::Generic
	}

	fn placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}
}

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

#[async_trait]
impl Dialect for PostgresDialect {
	fn driver(&self) -> Driver {
		Driver::Postgres
	}

	fn placeholder(&self, index: usize) -> String {
		format!("${}", index)
	}

	fn supports_returning_clause(&self) -> bool {
		true
	}

	async fn resync_sequence(
		&self,
		tx: &mut dyn TransactionExecutor,
		table: &str,
		column: &str,
	) -> Result<(), DatabaseError> {
		let sequence = tx
			.query_scalar(
				"SELECT pg_get_serial_sequence($1, $2)",
				vec![table.into(), column.into()],
			)
			.await?;

		let sequence = match sequence {
			// Identity columns without an owned sequence, or no default at all.
			FixtureValue::Null => {
				tracing::debug!(table, column, "no serial sequence to resynchronize");
				return Ok(());
			}
			FixtureValue::String(name) => name,
			other => {
				return Err(DatabaseError::TypeError(format!(
					"Unexpected sequence name {:?}",
					other
				)));
			}
		};

		let sql = format!(
			"SELECT pg_catalog.setval($1, (SELECT MAX({}) FROM {}))",
			self.quote_identifier(column),
			self.quote_identifier(table),
		);
		tracing::debug!(%sequence, table, column, "resynchronizing sequence");
		tx.execute(&sql, vec![FixtureValue::String(sequence)]).await?;
		Ok(())
	}
}

/// MySQL / MariaDB dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
	fn driver(&self) -> Driver {
		Driver::Mysql
	}

	fn quote_identifier(&self, ident: &str) -> String {
		format!("`{}`", ident.replace('`', "``"))
	}

	fn placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}

	fn empty_insert_clause(&self) -> &'static str {
		"() VALUES()"
	}
}
