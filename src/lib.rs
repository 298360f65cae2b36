//! # seedbed
//!
//! Declarative fixture loading for relational databases.
//!
//! seedbed loads rows described in YAML or JSON documents into PostgreSQL,
//! MySQL or SQLite. Each row names a table, its primary key and its fields.
//! Rows that do not exist yet are inserted, existing rows are updated, and a
//! row may reference a primary key the database generated for an earlier row.
//! A batch of documents runs in one transaction and is rolled back on any
//! failure.
//!
//! ## Feature Flags
//!
//! - `postgres`, `mysql`, `sqlite` - Database backends (all enabled by default)
//! - `yaml` - YAML fixture documents (enabled by default; JSON is always available)
//! - `full` - All features enabled
//!
//! ## Quick Start
//!
//! ```ignore
//! use seedbed::prelude::*;
//!
//! let backend = seedbed::connect("sqlite://app.db").await?;
//! let loader = FixtureLoader::with_options(LoadOptions::new().with_dump_sql(false));
//! let result = loader
//! 	.load_files(backend.as_ref(), &["fixtures/users.yaml", "fixtures/posts.yaml"])
//! 	.await?;
//! println!("Installed {} object(s)", result.records_loaded);
//! ```
//!
//! ## Crates
//!
//! - [`backends`] - Database backends, transactions and the bound value type
//! - [`fixtures`] - Fixture documents, row compilation and loading

pub use seedbed_backends as backends;
pub use seedbed_fixtures as fixtures;

pub use seedbed_backends::{
	DatabaseBackend, DatabaseError, DatabaseType, FixtureValue, QueryResult, TransactionExecutor,
	connect,
};
pub use seedbed_fixtures::{
	Driver, FixtureData, FixtureError, FixtureFormat, FixtureLoader, FixtureParser, FixtureResult,
	LoadOptions, LoadResult, RowError, RowSpec, ValueMarker,
};

pub mod prelude {
	//! Convenience re-exports for common usage.

	pub use seedbed_backends::{DatabaseBackend, FixtureValue, TransactionExecutor, connect};
	pub use seedbed_fixtures::prelude::*;
}
