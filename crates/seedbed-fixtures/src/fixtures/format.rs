//! Fixture format definitions.
//!
//! This module defines the row description documents are deserialized into,
//! and the value markers a row may carry instead of a literal.

use serde::{Deserialize, Deserializer};
use seedbed_backends::FixtureValue;
use std::collections::BTreeMap;
use std::path::Path;

const INSERT_NOW: &str = "ON_INSERT_NOW()";
const UPDATE_NOW: &str = "ON_UPDATE_NOW()";
const GENERATE_PREFIX: &str = "PK_GENERATE(";
const REFERENCE_PREFIX: &str = "PK_REFERENCE(";
const MARKER_SUFFIX: &str = ")";

/// A column value as written in a fixture document.
///
/// Markers are recognized once, when the document is parsed. A string that
/// only resembles a marker (for example `PK_GENERATE(uid` without the closing
/// parenthesis) stays a [`ValueMarker::Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueMarker {
	/// Value bound as-is.
	Literal(FixtureValue),
	/// `ON_INSERT_NOW()`: current time, written on INSERT only.
	InsertNow,
	/// `ON_UPDATE_NOW()`: current time, written on UPDATE (and on INSERT when
	/// `set_updated_at_on_insert` is enabled).
	UpdateNow,
	/// `PK_GENERATE(name)`: key assigned by the database and recorded as `name`.
	GenerateKey(String),
	/// `PK_REFERENCE(name)`: key generated by an earlier row under `name`.
	ReferenceKey(String),
}

impl ValueMarker {
	/// Classifies a string value.
	///
	/// # Example
	///
	/// ```
	/// # use seedbed_fixtures::fixtures::ValueMarker;
	/// assert_eq!(
	///     ValueMarker::parse("PK_GENERATE( user_id )"),
	///     ValueMarker::GenerateKey("user_id".to_string())
	/// );
	/// assert_eq!(ValueMarker::parse("ON_INSERT_NOW()"), ValueMarker::InsertNow);
	/// assert_eq!(
	///     ValueMarker::parse("PK_REFERENCE(user_id"),
	///     ValueMarker::Literal("PK_REFERENCE(user_id".into())
	/// );
	/// ```
	pub fn parse(text: &str) -> Self {
		if text == INSERT_NOW {
			return Self::InsertNow;
		}
		if text == UPDATE_NOW {
			return Self::UpdateNow;
		}
		if let Some(name) = marker_argument(text, GENERATE_PREFIX) {
			return Self::GenerateKey(name);
		}
		if let Some(name) = marker_argument(text, REFERENCE_PREFIX) {
			return Self::ReferenceKey(name);
		}
		Self::Literal(FixtureValue::String(text.to_string()))
	}

	/// Converts a deserialized document value.
	///
	/// Sequences and mappings are kept as their JSON text.
	pub fn from_json(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::String(s) => Self::parse(&s),
			other => Self::Literal(json_to_fixture_value(other)),
		}
	}

	/// The marker's document spelling, bound literally where the marker has
	/// no meaning (timestamp markers in a primary key, generators in fields).
	pub fn as_literal(&self) -> FixtureValue {
		match self {
			Self::Literal(value) => value.clone(),
			Self::InsertNow => FixtureValue::from(INSERT_NOW),
			Self::UpdateNow => FixtureValue::from(UPDATE_NOW),
			Self::GenerateKey(name) => {
				FixtureValue::String(format!("{GENERATE_PREFIX}{name}{MARKER_SUFFIX}"))
			}
			Self::ReferenceKey(name) => {
				FixtureValue::String(format!("{REFERENCE_PREFIX}{name}{MARKER_SUFFIX}"))
			}
		}
	}
}

impl From<FixtureValue> for ValueMarker {
	fn from(value: FixtureValue) -> Self {
		Self::Literal(value)
	}
}

impl<'de> Deserialize<'de> for ValueMarker {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		serde_json::Value::deserialize(deserializer).map(Self::from_json)
	}
}

fn marker_argument(text: &str, prefix: &str) -> Option<String> {
	text.strip_prefix(prefix)
		.and_then(|rest| rest.strip_suffix(MARKER_SUFFIX))
		.map(|name| name.trim().to_string())
}

fn json_to_fixture_value(value: serde_json::Value) -> FixtureValue {
	match value {
		serde_json::Value::Null => FixtureValue::Null,
		serde_json::Value::Bool(b) => FixtureValue::Bool(b),
		serde_json::Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				FixtureValue::Int(i)
			} else if let Some(f) = n.as_f64() {
				FixtureValue::Float(f)
			} else {
				FixtureValue::String(n.to_string())
			}
		}
		serde_json::Value::String(s) => FixtureValue::String(s),
		nested => FixtureValue::String(nested.to_string()),
	}
}

/// A single row of a fixture document.
///
/// Columns are kept in `BTreeMap`s so iteration, and therefore generated SQL
/// and argument order, is lexicographic by column name.
///
/// # Example
///
/// ```yaml
/// - table: users
///   pk:
///     id: PK_GENERATE(alice)
///   fields:
///     name: Alice
///     created_at: ON_INSERT_NOW()
/// - table: posts
///   pk:
///     id: 1
///   fields:
///     author_id: PK_REFERENCE(alice)
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowSpec {
	/// Target table name.
	pub table: String,

	/// Primary key columns. At least one entry.
	pub pk: BTreeMap<String, ValueMarker>,

	/// Remaining columns.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub fields: BTreeMap<String, ValueMarker>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, ValueMarker>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<BTreeMap<String, ValueMarker>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RowSpec {
	/// Creates a row for `table` with no columns.
	pub fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			pk: BTreeMap::new(),
			fields: BTreeMap::new(),
		}
	}

	/// Adds a primary key column.
	pub fn with_pk(mut self, column: impl Into<String>, value: impl Into<ValueMarker>) -> Self {
		self.pk.insert(column.into(), value.into());
		self
	}

	/// Adds a field column.
	pub fn with_field(mut self, column: impl Into<String>, value: impl Into<ValueMarker>) -> Self {
		self.fields.insert(column.into(), value.into());
		self
	}
}

impl From<&str> for ValueMarker {
	fn from(text: &str) -> Self {
		Self::parse(text)
	}
}

impl From<i64> for ValueMarker {
	fn from(i: i64) -> Self {
		Self::Literal(FixtureValue::Int(i))
	}
}

impl From<i32> for ValueMarker {
	fn from(i: i32) -> Self {
		Self::Literal(FixtureValue::Int(i as i64))
	}
}

impl From<bool> for ValueMarker {
	fn from(b: bool) -> Self {
		Self::Literal(FixtureValue::Bool(b))
	}
}

/// Supported fixture file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FixtureFormat {
	/// JSON format.
	Json,

	/// YAML format (default, requires `yaml` feature).
	#[default]
	Yaml,
}

impl FixtureFormat {
	/// Determines the fixture format from a file extension.
	///
	/// # Example
	///
	/// ```
	/// # use seedbed_fixtures::fixtures::FixtureFormat;
	/// assert_eq!(FixtureFormat::from_extension("json"), Some(FixtureFormat::Json));
	/// assert_eq!(FixtureFormat::from_extension("yml"), Some(FixtureFormat::Yaml));
	/// assert_eq!(FixtureFormat::from_extension("xml"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the fixture format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}
}

impl std::fmt::Display for FixtureFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}

/// Parsed fixture document: rows in document order.
#[derive(Debug, Clone)]
pub struct FixtureData {
	/// Rows in document order.
	pub records: Vec<RowSpec>,

	/// Format the data was parsed from.
	pub format: FixtureFormat,

	/// Optional source file path.
	pub source: Option<String>,
}

impl FixtureData {
	/// Creates fixture data from a vector of rows.
	pub fn from_records(records: Vec<RowSpec>, format: FixtureFormat) -> Self {
		Self {
			records,
			format,
			source: None,
		}
	}

	/// Sets the source file path.
	pub fn with_source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}

	/// Returns the number of rows.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns true if there are no rows.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Returns an iterator over the rows.
	pub fn iter(&self) -> impl Iterator<Item = &RowSpec> {
		self.records.iter()
	}
}

impl<'a> IntoIterator for &'a FixtureData {
	type Item = &'a RowSpec;
	type IntoIter = std::slice::Iter<'a, RowSpec>;

	fn into_iter(self) -> Self::IntoIter {
		self.records.iter()
	}
}
