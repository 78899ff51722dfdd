//! # Request Instrumentation
//!
//! Decorator around any [`Transport`] that reports the lifecycle of every
//! call: start (progress reset + busy), download progress, and completion
//! (timing, busy cleared). It has no endpoint-specific knowledge.
//!
//! ```text
//! CatalogClient ──► InstrumentedTransport ──► HttpTransport ──► catalog
//!                          │
//!                          ▼
//!                 RequestObserver(s)  (progress bar, cursor, SSE)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, Method, ProgressFn, Transport, TransferProgress};

/// Lifecycle phase of an instrumented call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEventKind {
    /// Call is about to be sent
    Started { method: Method, path: String },
    /// Bytes arrived; `percent` is 100 when the size is unknown
    Progress { percent: u8 },
    /// Call completed with a success status
    Finished { status: u16, elapsed_ms: u64 },
    /// Call failed; the error is propagated to the caller unchanged
    Failed { error: String, elapsed_ms: u64 },
}

/// An event emitted by the instrumentation layer
#[derive(Debug, Clone, Serialize)]
pub struct RequestEvent {
    pub request_id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: RequestEventKind,
}

/// Receives instrumentation events
pub trait RequestObserver: Send + Sync {
    fn on_event(&self, event: &RequestEvent);
}

/// Percent shown for a progress notification.
///
/// Unknown (or zero) totals are reported as 100.
pub fn progress_percent(progress: TransferProgress) -> u8 {
    match progress.total {
        Some(total) if total > 0 => {
            let percent = (progress.loaded as f64 / total as f64 * 100.0).round();
            percent.clamp(0.0, 100.0) as u8
        }
        _ => 100,
    }
}

/// Wraps a transport with timing, progress and busy reporting
pub struct InstrumentedTransport<T> {
    inner: T,
    observers: Vec<Arc<dyn RequestObserver>>,
    next_id: AtomicU64,
}

impl<T: Transport> InstrumentedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            observers: Vec::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register an additional observer
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    fn emit(&self, request_id: u64, kind: RequestEventKind) {
        let event = RequestEvent {
            request_id,
            timestamp: Utc::now(),
            kind,
        };
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

#[async_trait]
impl<T: Transport> Transport for InstrumentedTransport<T> {
    async fn send(
        &self,
        request: ApiRequest,
        on_progress: &ProgressFn<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let method = request.method;
        let path = request.path.clone();

        tracing::info!(request_id, %method, path = %path, "Request started");
        let start = Instant::now();
        self.emit(request_id, RequestEventKind::Started { method, path });

        let report = |progress: TransferProgress| {
            let percent = progress_percent(progress);
            tracing::trace!(
                request_id,
                loaded = progress.loaded,
                total = ?progress.total,
                percent,
                "Download progress"
            );
            self.emit(request_id, RequestEventKind::Progress { percent });
            on_progress(progress);
        };

        let result = self.inner.send(request, &report).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                tracing::info!(request_id, elapsed_ms, "Response received in {}ms", elapsed_ms);
                self.emit(
                    request_id,
                    RequestEventKind::Finished {
                        status: response.status,
                        elapsed_ms,
                    },
                );
            }
            Err(e) => {
                tracing::error!(request_id, elapsed_ms, error = %e, "Request failed");
                self.emit(
                    request_id,
                    RequestEventKind::Failed {
                        error: e.to_string(),
                        elapsed_ms,
                    },
                );
            }
        }

        result
    }
}
