//! # ad-core
//!
//! Data loading, session state and workflow run control for the analysis
//! dashboard.
//!
//! This crate provides:
//! - Configuration loading from the `.analysis-dashboard/` directory
//! - A two-tier artifact loader (backend first, bundled copies second)
//! - Session flags that gate the report pages
//! - The backend client and the workflow run controller
//! - Report assembly and markdown table extraction
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`loader`]: Artifact sources and the fallback chain
//! - [`session`]: Durable and session-scoped flags
//! - [`api`]: Backend client and progress stream decoding
//! - [`workflow`]: Run state, choreography and the run controller
//! - [`render`]: Report pages and content parts
//! - [`service`]: `Op` to `Event` loop used by the front ends

pub mod api;
pub mod config;
pub mod loader;
pub mod render;
pub mod service;
pub mod session;
pub mod workflow;

pub use service::DashboardService;
