//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod anonymize;
pub mod init;
pub mod list;
pub mod validate;
