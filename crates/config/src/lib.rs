//! # galaxy-config
//!
//! Configuration loading for core and feature instances. The loader runs
//! once at process start; the resulting [`Registry`] is passed by reference
//! into the orchestration components and never re-read mid-call.

pub mod models;

pub use models::{
    AppConfig, AuthConfig, FeatureEntry, InstanceConfig, LoggingConfig, ServerConfig,
};
