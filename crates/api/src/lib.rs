//! # galaxy-api
//!
//! HTTP surface for core and feature instances. The router exposed here
//! only renders results produced by the orchestration layer; no handler
//! raises an error for an expected runtime condition.
//!
//! ```ignore
//! let app = create_routes(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod handlers;
pub mod response;
pub mod routes;

pub use response::ApiResponse;
pub use routes::{create_routes, AppState, InstanceInfo};
