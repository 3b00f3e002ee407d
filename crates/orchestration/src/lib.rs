//! # galaxy-orchestration
//!
//! The inter-service call layer: one-shot calls with timeout and retry,
//! concurrent fan-out with in-order aggregation, sibling calls, and
//! liveness probes. Every public operation returns a result value; no
//! expected runtime condition escapes as a fault.

pub mod dispatcher;
pub mod executor;
pub mod health;
pub mod orchestrator;
pub mod sibling;

pub use dispatcher::{BatchDispatcher, CallRequest};
pub use executor::RequestExecutor;
pub use health::{derive_health_url, HealthMonitor};
pub use orchestrator::Orchestrator;
pub use sibling::SiblingCaller;
