//! Shared type definitions for the inter-service call layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::constants::{DEFAULT_CALL_TIMEOUT_MS, DEFAULT_MAX_ATTEMPTS};

/// Feature identifier type
pub type FeatureId = String;

/// Arbitrary JSON payload type
pub type Payload = serde_json::Value;

/// Liveness map produced by health probes, one entry per probed feature
pub type HealthStatus = HashMap<FeatureId, bool>;

/// Role of the running instance.
///
/// A static, read-only property decided by configuration at startup and
/// injected into the components that need it. Never looked up globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The hub instance, allowed to orchestrate fan-out calls
    Core,
    /// A satellite instance, allowed to call declared siblings
    Feature,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Feature => write!(f, "feature"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = galaxy_errors::GalaxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "core" => Ok(Self::Core),
            "feature" => Ok(Self::Feature),
            _ => Err(galaxy_errors::GalaxyError::Configuration(format!(
                "Invalid role: {s}"
            ))),
        }
    }
}

/// Per-call knobs for the request executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallOptions {
    /// Extra request headers
    pub headers: HashMap<String, String>,
    /// Per-attempt timeout in milliseconds, must be > 0
    pub timeout_ms: u64,
    /// Total number of attempts, must be >= 1
    pub max_attempts: u32,
    /// Attach the configured bearer token to the request
    pub include_auth: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            include_auth: false,
        }
    }
}

/// `_metadata` object injected into outbound payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMetadata {
    pub caller_type: Role,
    pub timestamp: DateTime<Utc>,
}

/// `_caller` object injected into sibling-call payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CallerIdentity {
    pub fn sibling(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: "sibling".to_string(),
        }
    }
}

/// Who is making an outbound call; selects the envelope tag.
#[derive(Debug, Clone)]
pub enum CallOrigin {
    /// A core or feature instance calling on its own behalf (`_metadata` tag)
    Service(Role),
    /// A feature calling a declared sibling (`_caller` tag)
    Sibling { id: String, name: String },
}

/// Normalized outcome of one logical call.
///
/// Invariant: `success == true` iff `data` is present and `error` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CallResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    pub fn error_with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Success/failure counters for one orchestration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Aggregated outcome of a core fan-out call.
///
/// Invariants: `success == (summary.successful > 0)` and
/// `summary.total == results.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub success: bool,
    pub results: HashMap<FeatureId, CallResult>,
    pub summary: OrchestrationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrchestrationResult {
    /// Builds the aggregate from per-feature results, computing the summary.
    pub fn from_results(results: HashMap<FeatureId, CallResult>) -> Self {
        let total = results.len();
        let successful = results.values().filter(|r| r.success).count();
        let failed = total - successful;

        Self {
            success: successful > 0,
            results,
            summary: OrchestrationSummary {
                total,
                successful,
                failed,
            },
            error: None,
        }
    }

    /// An orchestration that never reached the network (role violation,
    /// empty resolution).
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: HashMap::new(),
            summary: OrchestrationSummary::default(),
            error: Some(error.into()),
        }
    }
}
