//! Management commands.

pub mod loaddata;

pub use loaddata::{LoadDataArgs, LoadDataCommand, LoadDataOptions};
