//! Shared utilities and common types for the CampusNest client
//!
//! This crate provides common functionality used across all client modules:
//! - Configuration types (environment, API endpoints, logging)
//! - The error body shape returned by the marketplace API
//! - Utility functions (credential masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{ApiConfig, AppConfig, ConfigError, Environment, LogFormat, LoggingConfig};
pub use errors::{error_codes, ErrorResponse};
pub use utils::mask_token;
