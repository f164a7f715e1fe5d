//! # ad-protocol
//!
//! Data models shared by every analysis-dashboard crate.
//!
//! This crate defines:
//! - The wire format of the analysis backend (trigger response, progress
//!   events, history listing)
//! - Report artifacts (sections, metrics) and their rendered content parts
//! - Dashboard configuration read from `config.toml`
//! - The Op/Event protocol between the TUI and the core
//!
//! ## Modules
//!
//! - [`agent_models`]: Agent identities and their animated status
//! - [`analysis_models`]: Backend request/response payloads
//! - [`config_models`]: Global configuration from config.toml
//! - [`event_models`]: Progress events received over the event stream
//! - [`report_models`]: Report documents, sections and rendered parts
//! - [`ipc`]: Operations and Events for Core-TUI communication
//!
//! This crate has no dependencies on other analysis-dashboard crates.

pub mod agent_models;
pub mod analysis_models;
pub mod config_models;
pub mod event_models;
pub mod ipc;
pub mod report_models;

// Re-export all public types for convenience
pub use agent_models::*;
pub use analysis_models::*;
pub use config_models::*;
pub use event_models::*;
pub use ipc::*;
pub use report_models::*;
