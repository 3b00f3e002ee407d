//! Concurrent fan-out of independent calls with in-order aggregation.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use url::Url;

use galaxy_common::{CallOptions, CallOrigin, CallResult};

use crate::executor::RequestExecutor;

/// One member of a batch.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub endpoint: Url,
    pub payload: Value,
    pub options: CallOptions,
    pub origin: CallOrigin,
}

/// Runs a set of independent executor calls concurrently.
///
/// Results come back positionally: output index `i` is the outcome of
/// input request `i`, no matter which call finishes first. A failure in
/// one slot never cancels or affects the others.
#[derive(Clone)]
pub struct BatchDispatcher {
    executor: Arc<RequestExecutor>,
}

impl BatchDispatcher {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    pub async fn dispatch_all(&self, requests: Vec<CallRequest>) -> Vec<CallResult> {
        let calls = requests.into_iter().map(|request| {
            let executor = Arc::clone(&self.executor);
            async move {
                executor
                    .execute(
                        &request.endpoint,
                        request.payload,
                        &request.options,
                        &request.origin,
                    )
                    .await
            }
        });

        join_all(calls).await
    }
}
