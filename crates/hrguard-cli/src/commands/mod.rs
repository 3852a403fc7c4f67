//! CLI command implementations.

pub mod check;
pub mod config;
pub mod matrix;
pub mod roles;
pub mod version;
