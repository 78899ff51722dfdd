//! # HTTP API
//!
//! JSON surface over the browser: the same actions a page would trigger,
//! plus an SSE stream of request events for the progress bar.

pub mod events;
pub mod favourites;
pub mod view;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use utoipa::ToSchema;

use whiskers_core::api::{ApiError, RequestEvent, RequestObserver};
use whiskers_core::ui::SurfaceSnapshot;
use whiskers_core::{Browser, BrowserError, ViewOutcome};

/// Application state
pub struct AppState {
    pub browser: Browser,
    pub event_tx: broadcast::Sender<RequestEvent>,
}

pub type SharedState = Arc<AppState>;

/// Forwards instrumentation events to SSE subscribers
pub struct BroadcastObserver {
    tx: broadcast::Sender<RequestEvent>,
}

impl BroadcastObserver {
    pub fn new(tx: broadcast::Sender<RequestEvent>) -> Self {
        Self { tx }
    }
}

impl RequestObserver for BroadcastObserver {
    fn on_event(&self, event: &RequestEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event.clone());
    }
}

#[derive(Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ViewResponse {
    /// Present when the request updated the view
    #[schema(value_type = Option<Object>)]
    pub outcome: Option<ViewOutcome>,
    #[schema(value_type = Object)]
    pub view: SurfaceSnapshot,
}

impl ViewResponse {
    pub fn new(state: &AppState, outcome: Option<ViewOutcome>) -> Self {
        Self {
            outcome,
            view: state.browser.surface().snapshot(),
        }
    }
}

/// Browser failure mapped onto an HTTP status
pub struct ApiFailure(pub BrowserError);

impl From<BrowserError> for ApiFailure {
    fn from(err: BrowserError) -> Self {
        Self(err)
    }
}

impl ApiFailure {
    fn status(&self) -> StatusCode {
        match &self.0 {
            BrowserError::Api(ApiError::NotFound { .. }) => StatusCode::NOT_FOUND,
            BrowserError::Api(_) => StatusCode::BAD_GATEWAY,
            BrowserError::InvalidItem(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        let body = ApiResponse {
            success: false,
            message: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whiskers_core::carousel::InvalidItem;

    #[test]
    fn test_failure_status_codes() {
        let not_found = ApiFailure(BrowserError::Api(ApiError::NotFound {
            resource: "DELETE /favourites/1".to_string(),
        }));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let network = ApiFailure(BrowserError::Api(ApiError::Network("timeout".to_string())));
        assert_eq!(network.status(), StatusCode::BAD_GATEWAY);

        let invalid = ApiFailure(BrowserError::InvalidItem(InvalidItem::EmptySource));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
