//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use seedbed_fixtures::prelude::*;
//! ```

// Error types
pub use crate::error::{FixtureError, FixtureResult, RowError};

// Fixture types
pub use crate::fixtures::{
	Dialect, Driver, FixtureData, FixtureFormat, FixtureLoader, FixtureParser, KeyRegistry,
	LoadContext, LoadOptions, LoadResult, RowCompiler, RowSpec, ValueMarker,
};

// Command types
pub use crate::commands::{LoadDataArgs, LoadDataCommand, LoadDataOptions};
