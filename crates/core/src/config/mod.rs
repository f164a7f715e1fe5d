//! Configuration loading and management.
//!
//! Settings come from `.analysis-dashboard/config.toml` with the API base URL
//! overridable through the `ANALYSIS_API_BASE_URL` environment variable.

pub mod error;
pub mod loader;
pub mod models;
