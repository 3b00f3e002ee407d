//! One logical call to one endpoint: envelope construction, timeout,
//! retry with exponential backoff, and outcome normalization.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use galaxy_common::{CallMetadata, CallOptions, CallOrigin, CallResult, CallerIdentity};

/// Structured error body a remote SHOULD return on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Executes single logical calls against feature endpoints.
///
/// Every outcome is normalized into a [`CallResult`]; the executor never
/// returns an `Err` and never panics. Only transport-level failures
/// (connection errors, timeouts) are retried; a non-2xx response is a
/// final answer from the remote.
pub struct RequestExecutor {
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl RequestExecutor {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_token: None,
        }
    }

    /// Executor that can attach a bearer token when a call sets
    /// `include_auth`. Without a configured token the flag is a no-op.
    pub fn with_auth_token(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_token: token,
        }
    }

    /// Performs one logical call: POST the enveloped payload, bounded by
    /// `options.timeout_ms` per attempt, retrying transport failures with
    /// `2^attempt` seconds of backoff up to `options.max_attempts`.
    pub async fn execute(
        &self,
        endpoint: &Url,
        payload: Value,
        options: &CallOptions,
        origin: &CallOrigin,
    ) -> CallResult {
        let body = build_envelope(payload, origin);
        let timeout = Duration::from_millis(options.timeout_ms);
        let max_attempts = options.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            let mut request = self
                .client
                .post(endpoint.clone())
                .timeout(timeout)
                .json(&body);
            for (key, value) in &options.headers {
                request = request.header(key, value);
            }
            if options.include_auth {
                if let Some(token) = &self.auth_token {
                    request = request.bearer_auth(token);
                }
            }

            debug!(endpoint = %endpoint, attempt, "Sending API request");

            match request.send().await {
                Ok(response) => return consume_response(response).await,
                Err(e) => {
                    if attempt + 1 < max_attempts {
                        let delay = Duration::from_secs(2u64.saturating_pow(attempt));
                        warn!(
                            endpoint = %endpoint,
                            attempt,
                            "Request failed: {e}. Retrying in {}s",
                            delay.as_secs()
                        );
                        sleep(delay).await;
                        attempt += 1;
                    } else if e.is_timeout() {
                        return CallResult::error("Request timeout");
                    } else {
                        return CallResult::error(e.to_string());
                    }
                }
            }
        }
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

async fn consume_response(response: reqwest::Response) -> CallResult {
    let status = response.status();

    if status.is_success() {
        return match response.json::<Value>().await {
            Ok(data) => CallResult::ok(data),
            Err(e) => CallResult::error(format!("Failed to parse response body: {e}")),
        };
    }

    // The remote explicitly rejected the request; report without retrying.
    match response.json::<ErrorBody>().await {
        Ok(body) => CallResult {
            success: false,
            data: None,
            error: Some(body.error.unwrap_or_else(|| {
                format!("API request failed with status {}", status.as_u16())
            })),
            message: body.message,
        },
        Err(_) => CallResult::error(format!(
            "API request failed with status {}",
            status.as_u16()
        )),
    }
}

/// Merges the caller payload with the envelope tag selected by `origin`:
/// `_metadata` for calls made on the instance's own behalf, `_caller` for
/// sibling calls. Non-object payloads are nested under a `payload` key so
/// the tag always has an object to live in.
pub fn build_envelope(payload: Value, origin: &CallOrigin) -> Value {
    let mut body = match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("payload".to_string(), other);
            map
        }
    };

    match origin {
        CallOrigin::Service(role) => {
            let metadata = CallMetadata {
                caller_type: *role,
                timestamp: Utc::now(),
            };
            body.insert("_metadata".to_string(), json!(metadata));
        }
        CallOrigin::Sibling { id, name } => {
            body.insert(
                "_caller".to_string(),
                json!(CallerIdentity::sibling(id.clone(), name.clone())),
            );
        }
    }

    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::Role;

    #[test]
    fn test_envelope_merges_object_payload() {
        let envelope = build_envelope(
            json!({"question": "ping"}),
            &CallOrigin::Service(Role::Core),
        );
        assert_eq!(envelope["question"], "ping");
        assert_eq!(envelope["_metadata"]["callerType"], "core");
        assert!(envelope["_metadata"]["timestamp"].is_string());
        assert!(envelope.get("_caller").is_none());
    }

    #[test]
    fn test_envelope_feature_caller_type() {
        let envelope = build_envelope(json!({}), &CallOrigin::Service(Role::Feature));
        assert_eq!(envelope["_metadata"]["callerType"], "feature");
    }

    #[test]
    fn test_envelope_sibling_tag() {
        let origin = CallOrigin::Sibling {
            id: "billing".to_string(),
            name: "Billing".to_string(),
        };
        let envelope = build_envelope(json!({"amount": 10}), &origin);
        assert_eq!(envelope["amount"], 10);
        assert_eq!(envelope["_caller"]["id"], "billing");
        assert_eq!(envelope["_caller"]["name"], "Billing");
        assert_eq!(envelope["_caller"]["type"], "sibling");
        assert!(envelope.get("_metadata").is_none());
    }

    #[test]
    fn test_envelope_wraps_non_object_payload() {
        let envelope = build_envelope(json!([1, 2, 3]), &CallOrigin::Service(Role::Core));
        assert_eq!(envelope["payload"], json!([1, 2, 3]));
        assert!(envelope["_metadata"].is_object());
    }

    #[test]
    fn test_envelope_null_payload() {
        let envelope = build_envelope(Value::Null, &CallOrigin::Service(Role::Core));
        let object = envelope.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("_metadata"));
    }
}
