//! # linkshelf-core
//!
//! Core types, traits, and abstractions for the linkshelf bookmark manager.
//!
//! This crate provides the domain models and repository trait definitions
//! that the storage and HTTP crates depend on.

pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
