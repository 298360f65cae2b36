//! Key resolution registry.
//!
//! Maps the logical names of `PK_GENERATE(name)` markers to the keys the
//! database assigned, so later rows can bind them through
//! `PK_REFERENCE(name)`. One registry lives for exactly one load batch.

use std::collections::BTreeMap;

use seedbed_backends::FixtureValue;

use crate::error::RowError;

/// Generated keys of the current batch, by logical name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyRegistry {
	keys: BTreeMap<String, FixtureValue>,
}

impl KeyRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the key generated under `name`.
	///
	/// Writing a name twice keeps the last value.
	pub fn set(&mut self, name: impl Into<String>, value: FixtureValue) {
		let name = name.into();
		if let Some(previous) = self.keys.get(&name) {
			tracing::warn!(key = %name, %previous, "generated key name reused; keeping the latest value");
		}
		self.keys.insert(name, value);
	}

	/// Looks up the key generated under `name`.
	///
	/// # Errors
	///
	/// Returns [`RowError::UnresolvedKey`] when no earlier row generated `name`.
	pub fn get(&self, name: &str) -> Result<&FixtureValue, RowError> {
		self.keys
			.get(name)
			.ok_or_else(|| RowError::UnresolvedKey(name.to_string()))
	}

	/// Checks whether `name` has been generated.
	pub fn contains(&self, name: &str) -> bool {
		self.keys.contains_key(name)
	}

	/// Returns the number of generated keys.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Returns true if no key has been generated yet.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Consumes the registry, returning the generated keys.
	pub fn into_keys(self) -> BTreeMap<String, FixtureValue> {
		self.keys
	}
}
