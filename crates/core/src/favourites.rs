//! # Favourite Toggle Service
//!
//! Reconciles a heart click with the server's favourite list using a
//! read-then-write sequence:
//!
//! 1. list every favourite
//! 2. first entry with a matching `image_id` wins
//! 3. found: delete that record; not found: create one
//!
//! The sequence is not atomic on the server, so toggles on the same image
//! id are queued behind a per-id async mutex. Toggles on different images
//! still run concurrently.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::api::{ApiError, CatalogClient};
use crate::carousel::{create_item, CarouselItem, FAVOURITE_ALT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Created,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub action: ToggleAction,
    pub favourite_id: String,
}

impl ToggleOutcome {
    /// Whether the image is a favourite after the toggle
    pub fn is_favourite(&self) -> bool {
        self.action == ToggleAction::Created
    }
}

type InFlightMap = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

pub struct FavouriteService {
    catalog: CatalogClient,
    in_flight: InFlightMap,
}

/// Registration of one toggle in the in-flight map. The entry is removed
/// when the last registered toggle for the id drops its guard.
struct InFlight<'a> {
    map: &'a InFlightMap,
    image_id: String,
    lock: Arc<AsyncMutex<()>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        // map + this guard
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.image_id);
        }
    }
}

impl FavouriteService {
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    fn enter(&self, image_id: &str) -> InFlight<'_> {
        let mut map = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        let lock = map
            .entry(image_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        InFlight {
            map: &self.in_flight,
            image_id: image_id.to_string(),
            lock,
        }
    }

    /// Flip the favourite state of `image_id` on the server
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, image_id: &str) -> Result<ToggleOutcome, ApiError> {
        let in_flight = self.enter(image_id);
        let _turn = in_flight.lock.lock().await;

        let favourites = self.catalog.list_favourites().await?;
        let existing = favourites.iter().find(|fav| fav.image_id == image_id);

        let outcome = match existing {
            Some(fav) => {
                self.catalog.delete_favourite(&fav.id).await?;
                ToggleOutcome {
                    action: ToggleAction::Deleted,
                    favourite_id: fav.id.clone(),
                }
            }
            None => ToggleOutcome {
                action: ToggleAction::Created,
                favourite_id: self.catalog.create_favourite(image_id).await?,
            },
        };

        tracing::info!(
            action = ?outcome.action,
            favourite_id = %outcome.favourite_id,
            "Favourite toggled"
        );
        Ok(outcome)
    }

    /// One carousel item per favourite, in server order.
    ///
    /// Favourites without an embedded url cost one extra image fetch each;
    /// entries that still cannot be resolved are skipped.
    pub async fn list_favourites_view(&self) -> Result<Vec<CarouselItem>, ApiError> {
        let favourites = self.catalog.list_favourites().await?;
        let mut items = Vec::with_capacity(favourites.len());

        for fav in &favourites {
            let src = match fav.embedded_url() {
                Some(url) => url.to_string(),
                None => match self.catalog.get_image(&fav.image_id).await {
                    Ok(image) => image.url,
                    Err(e) => {
                        tracing::warn!(image_id = %fav.image_id, error = %e, "Skipping unresolvable favourite");
                        continue;
                    }
                },
            };

            match create_item(src, FAVOURITE_ALT, fav.image_id.as_str()) {
                Ok(item) => items.push(item.with_favourite(true)),
                Err(e) => {
                    tracing::warn!(image_id = %fav.image_id, error = %e, "Skipping favourite without image");
                }
            }
        }

        Ok(items)
    }

    #[cfg(test)]
    fn in_flight_count(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }
}
