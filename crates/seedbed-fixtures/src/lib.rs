//! Declarative fixture loading for relational databases.
//!
//! Fixture documents describe rows by table, primary key and fields. Loading
//! a document inserts rows that do not exist yet, updates rows that do, and
//! lets rows reference primary keys the database generated for earlier rows.
//! A batch runs in a single transaction and is rolled back on any failure.
//!
//! # Features
//!
//! - `json` - JSON fixture format support (enabled by default)
//! - `yaml` - YAML fixture format support (enabled by default)
//! - `full` - All features enabled
//!
//! # Quick Start
//!
//! Create a fixture file (`fixtures/blog.yaml`):
//!
//! ```yaml
//! - table: users
//!   pk:
//!     id: PK_GENERATE(alice)
//!   fields:
//!     name: Alice
//!     created_at: ON_INSERT_NOW()
//!     updated_at: ON_UPDATE_NOW()
//! - table: posts
//!   pk:
//!     id: 1
//!   fields:
//!     author_id: PK_REFERENCE(alice)
//!     title: Hello
//! ```
//!
//! Load it:
//!
//! ```ignore
//! use seedbed_fixtures::prelude::*;
//!
//! let backend = seedbed_backends::connect("postgres://localhost/app").await?;
//! let loader = FixtureLoader::new();
//! let result = loader.load_file(backend.as_ref(), "fixtures/blog.yaml").await?;
//! println!("Loaded {} records", result.records_loaded);
//! ```
//!
//! # Value markers
//!
//! | Marker | Meaning |
//! |--------|---------|
//! | `ON_INSERT_NOW()` | current time, written on INSERT only |
//! | `ON_UPDATE_NOW()` | current time, written on UPDATE (and INSERT with `set_updated_at_on_insert`) |
//! | `PK_GENERATE(name)` | single-column key assigned by the database, recorded as `name` |
//! | `PK_REFERENCE(name)` | key recorded as `name` by an earlier row of the batch |
//!
//! # Architecture
//!
//! - [`FixtureParser`](fixtures::FixtureParser) - Parse fixture documents
//! - [`RowCompiler`](fixtures::RowCompiler) - Column lists and statements per row
//! - [`Dialect`](fixtures::Dialect) - Quoting, placeholders, key retrieval, sequence fix-up
//! - [`KeyRegistry`](fixtures::KeyRegistry) - Generated keys of a batch
//! - [`FixtureLoader`](fixtures::FixtureLoader) - Transactional batch loading
//! - [`LoadDataCommand`](commands::LoadDataCommand) - The `loaddata` command

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
pub mod error;
pub mod fixtures;
pub mod prelude;

// Re-export commonly used types at crate root
pub use error::{FixtureError, FixtureResult, RowError};
pub use fixtures::{
	Driver, FixtureData, FixtureFormat, FixtureLoader, FixtureParser, LoadOptions, LoadResult,
	RowSpec, ValueMarker,
};
