//! Utility functions for string formatting.

pub mod format;

pub use format::{pluralize, truncate_string};
