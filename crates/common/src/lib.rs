//! # galaxy-common
//!
//! Shared types and constants for the galaxy service template:
//! - role and identity types
//! - call options / result envelopes
//! - the static feature registry

pub mod constants;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use registry::*;
pub use types::*;

// Re-export error types
pub use galaxy_errors::{GalaxyError, GalaxyResult};
