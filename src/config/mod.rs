//! Configuration module for the packer policy
//!
//! Provides types and parsing for `spritegroup.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
