//! Row compiler.
//!
//! Turns a [`RowSpec`] into ordered primary-key, insert and update column
//! lists ([`CompiledRow`]) and builds the statements the loader runs for it.
//!
//! Column order is lexicographic within the primary key and within the
//! fields; an INSERT lists the primary key first. Placeholders are numbered
//! in the same order the arguments are returned, including WHERE clauses that
//! continue the count of a preceding SET clause.

use chrono::Utc;
use seedbed_backends::FixtureValue;

use super::{Dialect, KeyRegistry, RowSpec, ValueMarker};
use crate::error::RowError;

/// A compiled column value, resolved against the [`KeyRegistry`] when a
/// statement is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
	/// Bound as-is.
	Literal(FixtureValue),
	/// Key generated by an earlier row.
	Reference(String),
	/// Key the database assigns on insert.
	Generate(String),
}

/// One column of a compiled row.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledColumn {
	/// Column name as written in the document.
	pub name: String,
	/// Column name quoted for the target dialect.
	pub quoted: String,
	/// Value to bind.
	pub value: ColumnValue,
}

/// Statement text plus positional arguments in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
	/// SQL text.
	pub sql: String,
	/// Arguments, one per placeholder.
	pub params: Vec<FixtureValue>,
}

/// The column lists derived from one [`RowSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRow {
	/// Table name as written in the document.
	pub table: String,
	/// Table name quoted for the target dialect.
	pub quoted_table: String,
	/// Primary key columns, sorted by name.
	pub primary_key: Vec<CompiledColumn>,
	/// Field columns written by an INSERT, sorted by name.
	pub insert: Vec<CompiledColumn>,
	/// Field columns written by an UPDATE, sorted by name.
	pub update: Vec<CompiledColumn>,
}

impl CompiledRow {
	/// Returns the generator name when the primary key is a single
	/// `PK_GENERATE(name)` column.
	pub fn generated_key(&self) -> Option<&str> {
		match self.primary_key.as_slice() {
			[
				CompiledColumn {
					value: ColumnValue::Generate(name),
					..
				},
			] => Some(name),
			_ => None,
		}
	}

	/// Quoted primary key column names.
	pub fn pk_columns(&self) -> Vec<&str> {
		self.primary_key.iter().map(|c| c.quoted.as_str()).collect()
	}

	/// Quoted primary key columns followed by quoted insert columns.
	pub fn pk_and_insert_columns(&self) -> Vec<&str> {
		self.primary_key
			.iter()
			.chain(&self.insert)
			.map(|c| c.quoted.as_str())
			.collect()
	}

	/// Quoted update column names.
	pub fn update_columns(&self) -> Vec<&str> {
		self.update.iter().map(|c| c.quoted.as_str()).collect()
	}

	/// Resolves the primary key values for an existence check or WHERE clause.
	pub fn pk_values(&self, registry: &KeyRegistry) -> Result<Vec<FixtureValue>, RowError> {
		resolve(&self.primary_key, registry)
	}

	/// Checks that every key reference of the row resolves.
	///
	/// Run before any statement of a row that is not a generated-key insert,
	/// so a forward reference fails without touching the database.
	pub fn resolve_references(&self, registry: &KeyRegistry) -> Result<(), RowError> {
		for columns in [&self.primary_key, &self.insert, &self.update] {
			resolve(columns, registry)?;
		}
		Ok(())
	}

	/// Name of the first column of an INSERT over primary key and fields.
	pub fn first_insert_column(&self) -> Option<&str> {
		self.primary_key
			.iter()
			.chain(&self.insert)
			.next()
			.map(|c| c.name.as_str())
	}

	/// Name of the first column of an UPDATE.
	pub fn first_update_column(&self) -> Option<&str> {
		self.update.first().map(|c| c.name.as_str())
	}
}

fn resolve(columns: &[CompiledColumn], registry: &KeyRegistry) -> Result<Vec<FixtureValue>, RowError> {
	columns
		.iter()
		.map(|column| match &column.value {
			ColumnValue::Literal(value) => Ok(value.clone()),
			ColumnValue::Reference(name) => registry.get(name).cloned(),
			ColumnValue::Generate(name) => Err(RowError::GeneratedKeyInCompositeKey(name.clone())),
		})
		.collect()
}

/// Compiles rows and builds their statements for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct RowCompiler<'a> {
	dialect: &'a dyn Dialect,
	set_updated_at_on_insert: bool,
}

impl<'a> RowCompiler<'a> {
	/// Creates a compiler for `dialect`.
	///
	/// With `set_updated_at_on_insert`, `ON_UPDATE_NOW()` columns are also
	/// written by INSERT statements.
	pub fn new(dialect: &'a dyn Dialect, set_updated_at_on_insert: bool) -> Self {
		Self {
			dialect,
			set_updated_at_on_insert,
		}
	}

	/// The dialect statements are built for.
	pub fn dialect(&self) -> &'a dyn Dialect {
		self.dialect
	}

	/// Compiles a row description.
	///
	/// Timestamp markers capture the current time here; the INSERT and
	/// UPDATE copies of an `ON_UPDATE_NOW()` column are captured separately.
	pub fn compile(&self, spec: &RowSpec) -> CompiledRow {
		let primary_key = spec
			.pk
			.iter()
			.map(|(name, marker)| {
				let value = match marker {
					ValueMarker::GenerateKey(key) => ColumnValue::Generate(key.clone()),
					ValueMarker::ReferenceKey(key) => ColumnValue::Reference(key.clone()),
					other => ColumnValue::Literal(other.as_literal()),
				};
				self.column(name, value)
			})
			.collect();

		let mut insert = Vec::with_capacity(spec.fields.len());
		let mut update = Vec::with_capacity(spec.fields.len());
		for (name, marker) in &spec.fields {
			match marker {
				ValueMarker::InsertNow => {
					insert.push(self.column(name, now()));
				}
				ValueMarker::UpdateNow => {
					update.push(self.column(name, now()));
					if self.set_updated_at_on_insert {
						insert.push(self.column(name, now()));
					}
				}
				ValueMarker::ReferenceKey(key) => {
					let value = ColumnValue::Reference(key.clone());
					insert.push(self.column(name, value.clone()));
					update.push(self.column(name, value));
				}
				other => {
					let value = ColumnValue::Literal(other.as_literal());
					insert.push(self.column(name, value.clone()));
					update.push(self.column(name, value));
				}
			}
		}

		CompiledRow {
			table: spec.table.clone(),
			quoted_table: self.dialect.quote_identifier(&spec.table),
			primary_key,
			insert,
			update,
		}
	}

	fn column(&self, name: &str, value: ColumnValue) -> CompiledColumn {
		CompiledColumn {
			name: name.to_string(),
			quoted: self.dialect.quote_identifier(name),
			value,
		}
	}

	fn placeholders(&self, count: usize) -> String {
		(1..=count)
			.map(|i| self.dialect.placeholder(i))
			.collect::<Vec<_>>()
			.join(", ")
	}

	fn assignments(&self, columns: &[&str], offset: usize) -> Vec<String> {
		columns
			.iter()
			.enumerate()
			.map(|(i, column)| format!("{} = {}", column, self.dialect.placeholder(offset + i + 1)))
			.collect()
	}

	/// `WHERE` condition over the primary key, numbering placeholders from `offset + 1`.
	pub fn where_clause(&self, row: &CompiledRow, offset: usize) -> String {
		self.assignments(&row.pk_columns(), offset).join(" AND ")
	}

	/// INSERT for a row whose primary key the database generates.
	///
	/// The primary key is left out of the column list. With a dialect that
	/// supports it, the statement returns the generated key.
	pub fn generated_insert(
		&self,
		row: &CompiledRow,
		registry: &KeyRegistry,
	) -> Result<Statement, RowError> {
		let columns: Vec<&str> = row.insert.iter().map(|c| c.quoted.as_str()).collect();
		let mut sql = if columns.is_empty() {
			format!(
				"INSERT INTO {} {}",
				row.quoted_table,
				self.dialect.empty_insert_clause()
			)
		} else {
			format!(
				"INSERT INTO {}({}) VALUES({})",
				row.quoted_table,
				columns.join(", "),
				self.placeholders(columns.len())
			)
		};
		if self.dialect.supports_returning_clause()
			&& let Some(pk) = row.primary_key.first()
		{
			sql.push_str(" RETURNING ");
			sql.push_str(&pk.name);
		}

		Ok(Statement {
			sql,
			params: resolve(&row.insert, registry)?,
		})
	}

	/// `SELECT COUNT(*)` of rows matching the primary key.
	pub fn existence_check(
		&self,
		row: &CompiledRow,
		registry: &KeyRegistry,
	) -> Result<Statement, RowError> {
		Ok(Statement {
			sql: format!(
				"SELECT COUNT(*) FROM {} WHERE {}",
				row.quoted_table,
				self.where_clause(row, 0)
			),
			params: row.pk_values(registry)?,
		})
	}

	/// INSERT over the primary key columns followed by the insert columns.
	pub fn insert(&self, row: &CompiledRow, registry: &KeyRegistry) -> Result<Statement, RowError> {
		let columns = row.pk_and_insert_columns();
		let mut params = row.pk_values(registry)?;
		params.extend(resolve(&row.insert, registry)?);

		Ok(Statement {
			sql: format!(
				"INSERT INTO {}({}) VALUES({})",
				row.quoted_table,
				columns.join(", "),
				self.placeholders(columns.len())
			),
			params,
		})
	}

	/// UPDATE of the update columns; arguments are the update values followed
	/// by the primary key values.
	pub fn update(&self, row: &CompiledRow, registry: &KeyRegistry) -> Result<Statement, RowError> {
		let update_columns = row.update_columns();
		let mut params = resolve(&row.update, registry)?;
		params.extend(row.pk_values(registry)?);

		Ok(Statement {
			sql: format!(
				"UPDATE {} SET {} WHERE {}",
				row.quoted_table,
				self.assignments(&update_columns, 0).join(", "),
				self.where_clause(row, update_columns.len())
			),
			params,
		})
	}
}

fn now() -> ColumnValue {
	ColumnValue::Literal(FixtureValue::Timestamp(Utc::now()))
}
