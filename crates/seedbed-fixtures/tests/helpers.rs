//! Test helpers for seedbed-fixtures tests.
//!
//! This module provides a recording database double and shared fixture
//! documents.

#[path = "helpers/recording.rs"]
pub mod recording;
