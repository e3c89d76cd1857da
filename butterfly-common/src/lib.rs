//! Common utilities for the butterfly-osm multi-level routing crates

pub mod error;

pub use error::{Error, Result};
