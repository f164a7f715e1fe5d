//! Common test utilities shared by the integration tests.
//!
//! - Fixtures (sample events and artifacts)
//! - Event assertions
//! - A scripted backend
//! - A local HTTP responder

pub mod assertions;
pub mod fake_api;
pub mod fixtures;
pub mod http_stub;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fake_api::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use http_stub::*;
