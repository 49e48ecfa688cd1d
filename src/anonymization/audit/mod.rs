//! Audit logging module
//!
//! Records every completed anonymization request with hashed originals.

pub mod logger;

pub use logger::AuditLogger;
