//! Fixture system.
//!
//! - [`format`]: row descriptions and value markers
//! - [`parser`]: JSON/YAML documents into [`FixtureData`]
//! - [`compiler`]: rows into column lists and statements
//! - [`dialect`]: engine-specific statement pieces
//! - [`registry`]: generated keys of the current batch
//! - [`loader`]: transactional loading

pub mod compiler;
pub mod dialect;
pub mod format;
pub mod loader;
pub mod options;
pub mod parser;
pub mod registry;

pub use compiler::{ColumnValue, CompiledColumn, CompiledRow, RowCompiler, Statement};
pub use dialect::{Dialect, Driver, GenericDialect, MySqlDialect, PostgresDialect};
pub use format::{FixtureData, FixtureFormat, RowSpec, ValueMarker};
pub use loader::{FixtureLoader, LoadContext, LoadResult, RowOutcome};
pub use options::LoadOptions;
pub use parser::FixtureParser;
pub use registry::KeyRegistry;
