//! Shikshak Sarthi Common Library
//!
//! Shared code for the appraisal service including:
//! - Database models, the `Store` trait and its backends
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Form reconciliation, field schema and mapping
//! - Simulated analysis and scraping, rule-based PBAS insights
//! - Mail, printable reports, metrics

pub mod analysis;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod fields;
pub mod insights;
pub mod mail;
pub mod metrics;
pub mod reconcile;
pub mod report;
pub mod scholar;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{MemoryStore, Repository, Store};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
