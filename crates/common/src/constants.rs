//! System-wide constant definitions.

/// System name
pub const SYSTEM_NAME: &str = "galaxy";

/// System version
pub const SYSTEM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-attempt timeout for inter-service calls (milliseconds)
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;

/// Default number of attempts per call (no retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Fixed timeout for health probes (milliseconds)
pub const HEALTH_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Value of the `calledFrom` field stamped on orchestrated payloads
pub const CORE_CALLER_TAG: &str = "galaxy-core";

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/galaxy.toml";
