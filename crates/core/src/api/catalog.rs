//! # Catalog Client
//!
//! Typed calls against the cat catalog: breeds, images and the raw
//! favourite endpoints. Every call goes through the shared transport, so
//! instrumentation applies uniformly.

use std::sync::Arc;

use super::error::ApiError;
use super::models::{Breed, CreatedFavourite, Favourite, Image, NewFavourite};
use super::transport::{no_progress, ApiRequest, Transport};

#[derive(Clone)]
pub struct CatalogClient {
    transport: Arc<dyn Transport>,
}

impl CatalogClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET /breeds`. An empty list is a valid result.
    pub async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError> {
        self.transport
            .send(ApiRequest::get("/breeds"), &no_progress)
            .await?
            .json()
    }

    /// `GET /images/search?breed_ids={id}&limit={n}`, truncated to `limit`
    pub async fn list_images_for_breed(
        &self,
        breed_id: &str,
        limit: usize,
    ) -> Result<Vec<Image>, ApiError> {
        let request = ApiRequest::get("/images/search")
            .with_query("breed_ids", breed_id)
            .with_query("limit", limit);

        let mut images: Vec<Image> = self.transport.send(request, &no_progress).await?.json()?;
        images.truncate(limit);
        tracing::debug!(breed_id, count = images.len(), "Fetched breed images");
        Ok(images)
    }

    /// `GET /images/{id}`
    pub async fn get_image(&self, image_id: &str) -> Result<Image, ApiError> {
        let path = format!("/images/{}", urlencoding::encode(image_id));
        self.transport
            .send(ApiRequest::get(path), &no_progress)
            .await?
            .json()
    }

    /// `GET /favourites`, the full list in server order
    pub async fn list_favourites(&self) -> Result<Vec<Favourite>, ApiError> {
        self.transport
            .send(ApiRequest::get("/favourites"), &no_progress)
            .await?
            .json()
    }

    /// `POST /favourites`, returning the server-assigned favourite id
    pub async fn create_favourite(&self, image_id: &str) -> Result<String, ApiError> {
        let body = serde_json::to_value(NewFavourite {
            image_id: image_id.to_string(),
        })
        .map_err(|e| ApiError::Decode {
            resource: "POST /favourites".to_string(),
            message: e.to_string(),
        })?;

        let created: CreatedFavourite = self
            .transport
            .send(ApiRequest::post("/favourites", body), &no_progress)
            .await?
            .json()?;
        Ok(created.id)
    }

    /// `DELETE /favourites/{id}`. Any 2xx counts as success; the body is ignored.
    pub async fn delete_favourite(&self, favourite_id: &str) -> Result<(), ApiError> {
        let path = format!("/favourites/{}", urlencoding::encode(favourite_id));
        self.transport
            .send(ApiRequest::delete(path), &no_progress)
            .await?;
        Ok(())
    }
}
