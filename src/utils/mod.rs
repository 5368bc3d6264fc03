//! Utility modules for browser and network operations.
//!
//! Provides:
//! - [`console`] - Browser console logging
//! - [`fetch_json`], [`post`] - Network requests with timeout

pub mod console;
mod fetch;

pub use fetch::{RaceResult, fetch_json, post, race_with_timeout};
