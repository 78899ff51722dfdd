//! In-memory stand-in for the cat catalog, used by unit tests.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::error::ApiError;
use super::models::{Breed, Favourite, FavouriteImage, Image};
use super::transport::{ApiRequest, ApiResponse, Method, ProgressFn, Transport, TransferProgress};

#[derive(Default)]
struct FakeState {
    breeds: Vec<Breed>,
    images: Vec<Image>,
    favourites: Vec<Favourite>,
    next_favourite_id: u64,
    failures: HashSet<String>,
    holds: HashMap<String, Arc<Notify>>,
    strip_embedded: bool,
    requests: Vec<ApiRequest>,
}

/// Scripted catalog with a live favourites store
#[derive(Default)]
pub struct FakeCatApi {
    state: Mutex<FakeState>,
}

impl FakeCatApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().unwrap().next_favourite_id = 100;
        api
    }

    pub fn with_breed(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().breeds.push(Breed::new(id, name));
        self
    }

    /// Register a breed plus `count` images tagged with it
    pub fn with_breed_images(self, id: &str, name: &str, count: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let breed = Breed::new(id, name);
            state.breeds.push(breed.clone());
            for n in 0..count {
                state.images.push(Image {
                    id: format!("{}-{}", id, n),
                    url: format!("https://cdn.example/{}-{}.jpg", id, n),
                    breeds: vec![breed.clone()],
                });
            }
        }
        self
    }

    /// Register one image tagged with an already registered breed
    pub fn with_breed_image(self, breed_id: &str, image_id: &str, url: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let breeds = state
                .breeds
                .iter()
                .filter(|b| b.id == breed_id)
                .cloned()
                .collect();
            state.images.push(Image {
                id: image_id.to_string(),
                url: url.to_string(),
                breeds,
            });
        }
        self
    }

    /// Register an image with no breed metadata
    pub fn with_image(self, id: &str, url: &str) -> Self {
        self.state.lock().unwrap().images.push(Image {
            id: id.to_string(),
            url: url.to_string(),
            breeds: vec![],
        });
        self
    }

    /// Seed a favourite directly, bypassing the API
    pub fn with_favourite(self, favourite_id: &str, image_id: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.favourites.push(Favourite {
                id: favourite_id.to_string(),
                image_id: image_id.to_string(),
                image: None,
            });
        }
        self
    }

    /// List favourites without their embedded image urls
    pub fn without_embedded_images(self) -> Self {
        self.state.lock().unwrap().strip_embedded = true;
        self
    }

    /// Fail the next request whose path matches with a network error
    pub fn fail_next(&self, path: &str) {
        self.state.lock().unwrap().failures.insert(path.to_string());
    }

    /// Park the next request matching `key` (a path or a `breed_ids` value)
    /// until the returned handle is notified.
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .holds
            .insert(key.to_string(), notify.clone());
        notify
    }

    pub fn favourites(&self) -> Vec<Favourite> {
        self.state.lock().unwrap().favourites.clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    fn route(&self, request: &ApiRequest) -> Result<serde_json::Value, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state.failures.remove(&request.path) {
            return Err(ApiError::Network(format!("{} unreachable", request.path)));
        }

        let not_found = || ApiError::NotFound {
            resource: request.resource(),
        };
        let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();

        match (request.method, segments.as_slice()) {
            (Method::Get, ["breeds"]) => Ok(json!(state.breeds)),
            (Method::Get, ["images", "search"]) => {
                let breed_id = request.query_value("breed_ids").unwrap_or_default();
                let limit = request
                    .query_value("limit")
                    .and_then(|l| l.parse::<usize>().ok())
                    .unwrap_or(1);
                let images: Vec<&Image> = state
                    .images
                    .iter()
                    .filter(|img| img.breeds.iter().any(|b| b.id == breed_id))
                    .take(limit)
                    .collect();
                Ok(json!(images))
            }
            (Method::Get, ["images", id]) => state
                .images
                .iter()
                .find(|img| img.id == *id)
                .map(|img| json!(img))
                .ok_or_else(not_found),
            (Method::Get, ["favourites"]) => {
                let listed: Vec<Favourite> = state
                    .favourites
                    .iter()
                    .map(|fav| {
                        let mut fav = fav.clone();
                        if !state.strip_embedded {
                            if let Some(img) = state.images.iter().find(|i| i.id == fav.image_id) {
                                fav.image = Some(FavouriteImage {
                                    id: Some(img.id.clone()),
                                    url: Some(img.url.clone()),
                                });
                            }
                        }
                        fav
                    })
                    .collect();
                Ok(json!(listed))
            }
            (Method::Post, ["favourites"]) => {
                let image_id = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("image_id"))
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| ApiError::Status {
                        status: 400,
                        resource: request.resource(),
                        body: "image_id required".to_string(),
                    })?
                    .to_string();
                state.next_favourite_id += 1;
                let id = state.next_favourite_id;
                state.favourites.push(Favourite {
                    id: id.to_string(),
                    image_id,
                    image: None,
                });
                Ok(json!({ "message": "SUCCESS", "id": id }))
            }
            (Method::Delete, ["favourites", id]) => {
                let index = state
                    .favourites
                    .iter()
                    .position(|fav| fav.id == *id)
                    .ok_or_else(not_found)?;
                state.favourites.remove(index);
                Ok(json!({ "message": "SUCCESS" }))
            }
            _ => Err(not_found()),
        }
    }

    fn take_hold(&self, request: &ApiRequest) -> Option<Arc<Notify>> {
        let mut state = self.state.lock().unwrap();
        if let Some(notify) = state.holds.remove(&request.path) {
            return Some(notify);
        }
        request
            .query_value("breed_ids")
            .and_then(|breed_id| state.holds.remove(breed_id))
    }
}

#[async_trait]
impl Transport for FakeCatApi {
    async fn send(
        &self,
        request: ApiRequest,
        on_progress: &ProgressFn<'_>,
    ) -> Result<ApiResponse, ApiError> {
        // Let concurrently polled callers interleave between calls
        tokio::task::yield_now().await;
        if let Some(notify) = self.take_hold(&request) {
            notify.notified().await;
        }

        let value = self.route(&request)?;
        let body = serde_json::to_vec(&value).unwrap();
        on_progress(TransferProgress {
            loaded: body.len() as u64,
            total: Some(body.len() as u64),
        });

        Ok(ApiResponse {
            status: 200,
            resource: request.resource(),
            body,
        })
    }
}
