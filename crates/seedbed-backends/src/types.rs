//! Common type definitions for database abstraction

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DatabaseError;

/// Database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
	Postgres,
	Mysql,
	Sqlite,
}

impl fmt::Display for DatabaseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DatabaseType::Postgres => write!(f, "postgres"),
			DatabaseType::Mysql => write!(f, "mysql"),
			DatabaseType::Sqlite => write!(f, "sqlite"),
		}
	}
}

/// Scalar value bound to a positional statement argument or read back
/// from a scalar query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FixtureValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Timestamp(chrono::DateTime<chrono::Utc>),
}

impl FixtureValue {
	pub fn is_null(&self) -> bool {
		matches!(self, FixtureValue::Null)
	}
}

impl fmt::Display for FixtureValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FixtureValue::Null => write!(f, "NULL"),
			FixtureValue::Bool(b) => write!(f, "{}", b),
			FixtureValue::Int(i) => write!(f, "{}", i),
			FixtureValue::Float(v) => write!(f, "{}", v),
			FixtureValue::String(s) => write!(f, "{:?}", s),
			FixtureValue::Timestamp(dt) => write!(f, "{}", dt.to_rfc3339()),
		}
	}
}

impl From<&str> for FixtureValue {
	fn from(s: &str) -> Self {
		FixtureValue::String(s.to_string())
	}
}

impl From<String> for FixtureValue {
	fn from(s: String) -> Self {
		FixtureValue::String(s)
	}
}

impl From<i64> for FixtureValue {
	fn from(i: i64) -> Self {
		FixtureValue::Int(i)
	}
}

impl From<i32> for FixtureValue {
	fn from(i: i32) -> Self {
		FixtureValue::Int(i as i64)
	}
}

impl From<f64> for FixtureValue {
	fn from(f: f64) -> Self {
		FixtureValue::Float(f)
	}
}

impl From<bool> for FixtureValue {
	fn from(b: bool) -> Self {
		FixtureValue::Bool(b)
	}
}

impl From<chrono::DateTime<chrono::Utc>> for FixtureValue {
	fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
		FixtureValue::Timestamp(dt)
	}
}

impl TryFrom<FixtureValue> for i64 {
	type Error = DatabaseError;

	fn try_from(value: FixtureValue) -> std::result::Result<Self, Self::Error> {
		match value {
			FixtureValue::Int(i) => Ok(i),
			_ => Err(DatabaseError::TypeError(format!(
				"Cannot convert {:?} to i64",
				value
			))),
		}
	}
}

impl TryFrom<FixtureValue> for String {
	type Error = DatabaseError;

	fn try_from(value: FixtureValue) -> std::result::Result<Self, Self::Error> {
		match value {
			FixtureValue::String(s) => Ok(s),
			_ => Err(DatabaseError::TypeError(format!(
				"Cannot convert {:?} to String",
				value
			))),
		}
	}
}

/// Outcome of a statement executed through [`crate::TransactionExecutor::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryResult {
	pub rows_affected: u64,
	/// Key assigned by the last auto-increment insert on engines that expose
	/// it after execution. Always `None` on PostgreSQL.
	pub last_insert_id: Option<i64>,
}
