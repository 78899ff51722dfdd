//! # View API
//!
//! Breed selection, favourites view and carousel navigation.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ApiFailure, ApiResponse, SharedState, ViewResponse};

#[derive(Serialize, ToSchema)]
pub struct BreedOptionResponse {
    value: String,
    label: String,
}

#[derive(Serialize, ToSchema)]
pub struct BreedListResponse {
    options: Vec<BreedOptionResponse>,
    selected: Option<String>,
}

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_view))
        .route("/initial", post(initial_load))
        .route("/breeds/:breed_id", post(select_breed))
        .route("/favourites", post(load_favourites))
}

pub fn carousel_routes() -> Router<SharedState> {
    Router::new()
        .route("/next", post(next_item))
        .route("/previous", post(previous_item))
}

/// Current surface
#[utoipa::path(
    get,
    path = "/api/v1/view",
    tag = "view",
    responses(
        (status = 200, description = "Current surface", body = ViewResponse)
    )
)]
pub async fn get_view(State(state): State<SharedState>) -> Json<ViewResponse> {
    Json(ViewResponse::new(&state, None))
}

/// Breed select options
#[utoipa::path(
    get,
    path = "/api/v1/breeds",
    tag = "view",
    responses(
        (status = 200, description = "Breed select options", body = BreedListResponse)
    )
)]
pub async fn list_breeds(State(state): State<SharedState>) -> Json<BreedListResponse> {
    let select = state.browser.surface().breed_select();
    Json(BreedListResponse {
        options: select
            .options
            .into_iter()
            .map(|option| BreedOptionResponse {
                value: option.value,
                label: option.label,
            })
            .collect(),
        selected: select.selected,
    })
}

/// Load breeds and show the first one
#[utoipa::path(
    post,
    path = "/api/v1/view/initial",
    tag = "view",
    responses(
        (status = 200, description = "View updated", body = ViewResponse),
        (status = 502, description = "Catalog unavailable", body = ApiResponse)
    )
)]
pub async fn initial_load(
    State(state): State<SharedState>,
) -> Result<Json<ViewResponse>, ApiFailure> {
    let outcome = state.browser.initial_load().await?;
    Ok(Json(ViewResponse::new(&state, Some(outcome))))
}

/// Show one breed
#[utoipa::path(
    post,
    path = "/api/v1/view/breeds/{breed_id}",
    tag = "view",
    params(
        ("breed_id" = String, Path, description = "Breed id, e.g. abys")
    ),
    responses(
        (status = 200, description = "View updated", body = ViewResponse),
        (status = 502, description = "Catalog unavailable", body = ApiResponse)
    )
)]
pub async fn select_breed(
    State(state): State<SharedState>,
    Path(breed_id): Path<String>,
) -> Result<Json<ViewResponse>, ApiFailure> {
    let outcome = state.browser.select_breed(&breed_id).await?;
    Ok(Json(ViewResponse::new(&state, Some(outcome))))
}

/// Show every favourite
#[utoipa::path(
    post,
    path = "/api/v1/view/favourites",
    tag = "view",
    responses(
        (status = 200, description = "View updated", body = ViewResponse),
        (status = 502, description = "Catalog unavailable", body = ApiResponse)
    )
)]
pub async fn load_favourites(
    State(state): State<SharedState>,
) -> Result<Json<ViewResponse>, ApiFailure> {
    let outcome = state.browser.load_favourites().await?;
    Ok(Json(ViewResponse::new(&state, Some(outcome))))
}

#[utoipa::path(
    post,
    path = "/api/v1/carousel/next",
    tag = "carousel",
    responses(
        (status = 200, description = "Carousel moved", body = ViewResponse)
    )
)]
pub async fn next_item(State(state): State<SharedState>) -> Json<ViewResponse> {
    state.browser.next_item();
    Json(ViewResponse::new(&state, None))
}

#[utoipa::path(
    post,
    path = "/api/v1/carousel/previous",
    tag = "carousel",
    responses(
        (status = 200, description = "Carousel moved", body = ViewResponse)
    )
)]
pub async fn previous_item(State(state): State<SharedState>) -> Json<ViewResponse> {
    state.browser.previous_item();
    Json(ViewResponse::new(&state, None))
}
