//! Fixture parsing functionality.
//!
//! This module handles parsing of fixture documents in YAML and JSON formats.

use std::path::Path;

use super::{FixtureData, FixtureFormat, RowSpec};
use crate::error::{FixtureError, FixtureResult};

/// Parser for fixture documents.
///
/// Supports both YAML and JSON formats (YAML requires the `yaml` feature).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureParser;

impl FixtureParser {
	/// Creates a new fixture parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses a fixture file from the given path.
	///
	/// The format is automatically detected from the file extension.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file extension is not recognized
	/// - The file cannot be read
	/// - The file content is invalid
	pub fn parse_file(&self, path: &Path) -> FixtureResult<FixtureData> {
		let format = FixtureFormat::from_path(path).ok_or_else(|| {
			FixtureError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|source| FixtureError::File {
			path: path.to_path_buf(),
			source,
		})?;

		let data = self
			.parse_string(&content, format)
			.map_err(|e| match e {
				FixtureError::Deserialization(message) => {
					FixtureError::Deserialization(format!("{}: {}", path.display(), message))
				}
				other => other,
			})?;
		Ok(data.with_source(path.display().to_string()))
	}

	/// Parses fixture data from a string.
	///
	/// Accepts either a sequence of rows or a single row.
	pub fn parse_string(&self, content: &str, format: FixtureFormat) -> FixtureResult<FixtureData> {
		let records = match format {
			FixtureFormat::Json => self.parse_json(content)?,
			FixtureFormat::Yaml => self.parse_yaml(content)?,
		};

		Ok(FixtureData::from_records(records, format))
	}

	/// Parses JSON fixture content.
	fn parse_json(&self, content: &str) -> FixtureResult<Vec<RowSpec>> {
		let value: serde_json::Value = serde_json::from_str(content)
			.map_err(|e| FixtureError::Deserialization(e.to_string()))?;

		match value {
			serde_json::Value::Array(arr) => {
				let mut records = Vec::with_capacity(arr.len());
				for (idx, item) in arr.into_iter().enumerate() {
					let record: RowSpec = serde_json::from_value(item).map_err(|e| {
						FixtureError::Deserialization(format!(
							"Invalid record at index {}: {}",
							idx, e
						))
					})?;
					self.validate_record(idx, &record)?;
					records.push(record);
				}
				Ok(records)
			}
			serde_json::Value::Object(_) => {
				let record: RowSpec = serde_json::from_value(value)
					.map_err(|e| FixtureError::Deserialization(e.to_string()))?;
				self.validate_record(0, &record)?;
				Ok(vec![record])
			}
			_ => Err(FixtureError::Deserialization(
				"Expected array or object".to_string(),
			)),
		}
	}

	/// Parses YAML fixture content.
	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> FixtureResult<Vec<RowSpec>> {
		let value: serde_yaml::Value = serde_yaml::from_str(content)
			.map_err(|e| FixtureError::Deserialization(e.to_string()))?;

		match value {
			serde_yaml::Value::Sequence(seq) => {
				let mut records = Vec::with_capacity(seq.len());
				for (idx, item) in seq.into_iter().enumerate() {
					let record: RowSpec = serde_yaml::from_value(item).map_err(|e| {
						FixtureError::Deserialization(format!(
							"Invalid record at index {}: {}",
							idx, e
						))
					})?;
					self.validate_record(idx, &record)?;
					records.push(record);
				}
				Ok(records)
			}
			serde_yaml::Value::Mapping(_) => {
				let record: RowSpec = serde_yaml::from_value(value)
					.map_err(|e| FixtureError::Deserialization(e.to_string()))?;
				self.validate_record(0, &record)?;
				Ok(vec![record])
			}
			// An empty document loads nothing.
			serde_yaml::Value::Null => Ok(Vec::new()),
			_ => Err(FixtureError::Deserialization(
				"Expected sequence or mapping".to_string(),
			)),
		}
	}

	/// Stub for YAML parsing when the feature is not enabled.
	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> FixtureResult<Vec<RowSpec>> {
		Err(FixtureError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}

	/// Validates a row description.
	fn validate_record(&self, idx: usize, record: &RowSpec) -> FixtureResult<()> {
		if record.table.trim().is_empty() {
			return Err(FixtureError::Deserialization(format!(
				"Invalid record at index {}: table name must not be empty",
				idx
			)));
		}

		if record.pk.is_empty() {
			return Err(FixtureError::Deserialization(format!(
				"Invalid record at index {}: table '{}' needs at least one primary key column",
				idx, record.table
			)));
		}

		Ok(())
	}
}
