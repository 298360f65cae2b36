//! Loader configuration.

use std::path::Path;

use serde::Deserialize;

use super::Driver;
use crate::error::{FixtureError, FixtureResult};

/// Options for one load call.
///
/// Options are passed explicitly to every batch, so concurrent batches with
/// different settings do not interfere.
///
/// They can also be read from the `[fixtures]` table of a TOML file:
///
/// ```toml
/// [fixtures]
/// dump_sql = false
/// set_updated_at_on_insert = true
/// driver = "postgres"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
	/// Log every statement and its arguments before it runs.
	pub dump_sql: bool,

	/// Also write `ON_UPDATE_NOW()` columns on INSERT.
	pub set_updated_at_on_insert: bool,

	/// Statement dialect. Derived from the backend when unset.
	pub driver: Option<Driver>,
}

impl Default for LoadOptions {
	fn default() -> Self {
		Self {
			dump_sql: true,
			set_updated_at_on_insert: false,
			driver: None,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
	#[serde(default)]
	fixtures: LoadOptions,
}

impl LoadOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets whether statements are logged.
	pub fn with_dump_sql(mut self, dump_sql: bool) -> Self {
		self.dump_sql = dump_sql;
		self
	}

	/// Sets whether update timestamps are also written on INSERT.
	pub fn with_set_updated_at_on_insert(mut self, enabled: bool) -> Self {
		self.set_updated_at_on_insert = enabled;
		self
	}

	/// Forces the statement dialect.
	pub fn with_driver(mut self, driver: Driver) -> Self {
		self.driver = Some(driver);
		self
	}

	/// Reads options from the `[fixtures]` table of a TOML document.
	///
	/// A document without that table yields the defaults.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Config`] for malformed TOML or unknown keys.
	pub fn from_toml_str(content: &str) -> FixtureResult<Self> {
		let config: ConfigFile =
			toml::from_str(content).map_err(|e| FixtureError::Config(e.to_string()))?;
		Ok(config.fixtures)
	}

	/// Reads options from a TOML file.
	pub fn from_toml_file(path: &Path) -> FixtureResult<Self> {
		let content = std::fs::read_to_string(path).map_err(|source| FixtureError::File {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let options = LoadOptions::default();
		assert!(options.dump_sql);
		assert!(!options.set_updated_at_on_insert);
		assert_eq!(options.driver, None);
	}

	#[rstest]
	fn test_builder() {
		let options = LoadOptions::new()
			.with_dump_sql(false)
			.with_set_updated_at_on_insert(true)
			.with_driver(Driver::Postgres);

		assert!(!options.dump_sql);
		assert!(options.set_updated_at_on_insert);
		assert_eq!(options.driver, Some(Driver::Postgres));
	}

	#[rstest]
	fn test_from_toml_str() {
		let options = LoadOptions::from_toml_str(
			r#"
[database]
url = "postgres://localhost/app"

[fixtures]
dump_sql = false
driver = "mysql"
"#,
		)
		.unwrap();

		assert!(!options.dump_sql);
		assert!(!options.set_updated_at_on_insert);
		assert_eq!(options.driver, Some(Driver::Mysql));
	}

	#[rstest]
	fn test_from_toml_str_without_table() {
		let options = LoadOptions::from_toml_str("").unwrap();
		assert_eq!(options, LoadOptions::default());
	}

	#[rstest]
	#[case("[fixtures]\ndriver = \"oracle\"")]
	#[case("[fixtures]\nverbose = true")]
	#[case("[fixtures")]
	fn test_from_toml_str_rejects_invalid(#[case] content: &str) {
		let result = LoadOptions::from_toml_str(content);
		assert!(matches!(result, Err(FixtureError::Config(_))));
	}
}
