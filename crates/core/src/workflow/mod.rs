//! Workflow run control.
//!
//! - [`run`]: the run state and its transition rules
//! - [`choreography`]: the fixed animation timeline
//! - [`controller`]: async driver tying the backend stream and the timeline
//!   to the run state

pub mod choreography;
pub mod controller;
pub mod run;

pub use controller::RunController;
pub use run::{EventOutcome, RunSnapshot, RunState};
