//! # moodmix Common Library
//!
//! Shared code for the moodmix service:
//! - App record persistence (SQLite)
//! - Configuration loading (TOML + provider credential resolution)
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
