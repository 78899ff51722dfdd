//! # Favourites API

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use whiskers_core::ui::SurfaceSnapshot;
use whiskers_core::ToggleAction;

use super::{ApiFailure, ApiResponse, SharedState};

#[derive(Serialize, ToSchema)]
pub struct ToggleResponse {
    /// `created` or `deleted`
    #[schema(value_type = String)]
    action: ToggleAction,
    favourite_id: String,
    #[schema(value_type = Object)]
    view: SurfaceSnapshot,
}

pub fn favourite_routes() -> Router<SharedState> {
    Router::new().route("/:image_id/toggle", post(toggle_favourite))
}

/// Heart click: create or delete the favourite for an image
#[utoipa::path(
    post,
    path = "/api/v1/favourites/{image_id}/toggle",
    tag = "favourites",
    params(
        ("image_id" = String, Path, description = "Catalog image id")
    ),
    responses(
        (status = 200, description = "Favourite toggled", body = ToggleResponse),
        (status = 404, description = "Favourite vanished between list and delete", body = ApiResponse),
        (status = 502, description = "Catalog unavailable", body = ApiResponse)
    )
)]
pub async fn toggle_favourite(
    State(state): State<SharedState>,
    Path(image_id): Path<String>,
) -> Result<Json<ToggleResponse>, ApiFailure> {
    let outcome = state.browser.toggle_favourite(&image_id).await?;
    Ok(Json(ToggleResponse {
        action: outcome.action,
        favourite_id: outcome.favourite_id,
        view: state.browser.surface().snapshot(),
    }))
}
