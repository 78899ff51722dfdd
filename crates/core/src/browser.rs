//! # Browser
//!
//! Drives the surface from user actions: initial load, breed change,
//! favourites view and heart clicks.
//!
//! Every view update takes a new generation before it fetches. A response
//! that arrives after a newer view began is discarded, so a slow breed
//! fetch can never overwrite a faster, later one.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, CatalogClient, HttpTransport, InstrumentedTransport, RequestObserver, Transport};
use crate::carousel::{breed_alt, create_item, CarouselItem, InvalidItem};
use crate::config::WhiskersConfig;
use crate::favourites::{FavouriteService, ToggleOutcome};
use crate::ui::{BreedInfo, InfoPanel, Surface, FAVOURITES_HEADING, NO_FAVOURITES_MESSAGE, NO_IMAGES_MESSAGE};

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    InvalidItem(#[from] InvalidItem),
}

/// What a view update did to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ViewOutcome {
    /// Carousel now holds `items` entries
    Shown { items: usize },
    /// An empty-state message is shown
    Empty,
    /// A newer view started while this one was loading; nothing changed
    Stale,
}

pub struct Browser {
    catalog: CatalogClient,
    favourites: FavouriteService,
    surface: Arc<Surface>,
    generation: AtomicU64,
    image_limit: usize,
}

impl Browser {
    pub fn new(transport: Arc<dyn Transport>, surface: Arc<Surface>, image_limit: usize) -> Self {
        let catalog = CatalogClient::new(transport);
        Self {
            favourites: FavouriteService::new(catalog.clone()),
            catalog,
            surface,
            generation: AtomicU64::new(0),
            image_limit,
        }
    }

    /// Browser against the real catalog. The surface's activity indicator is
    /// always registered; `observers` are added after it.
    pub fn connect(
        config: &WhiskersConfig,
        observers: Vec<Arc<dyn RequestObserver>>,
    ) -> Result<Self, ApiError> {
        let surface = Arc::new(Surface::new());
        let mut transport =
            InstrumentedTransport::new(HttpTransport::new(config)?).with_observer(surface.activity());
        for observer in observers {
            transport = transport.with_observer(observer);
        }

        Ok(Self::new(Arc::new(transport), surface, config.image_limit))
    }

    pub fn surface(&self) -> &Arc<Surface> {
        &self.surface
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    fn begin_view(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Fill the breed select and show the first breed
    pub async fn initial_load(&self) -> Result<ViewOutcome, BrowserError> {
        let breeds = self.catalog.list_breeds().await?;
        self.surface.set_breed_options(&breeds);
        tracing::info!(count = breeds.len(), "Breeds loaded");

        match breeds.first() {
            Some(first) => self.select_breed(&first.id).await,
            None => Ok(ViewOutcome::Empty),
        }
    }

    /// Show the images and info of one breed
    #[tracing::instrument(skip(self))]
    pub async fn select_breed(&self, breed_id: &str) -> Result<ViewOutcome, BrowserError> {
        let generation = self.begin_view();
        self.surface.select_breed(breed_id);

        let images = self
            .catalog
            .list_images_for_breed(breed_id, self.image_limit)
            .await?;
        if !self.is_current(generation) {
            tracing::debug!(generation, "Discarding stale breed images");
            return Ok(ViewOutcome::Stale);
        }

        // The first image's breed describes the whole view
        let breed = images.first().and_then(|image| image.primary_breed());
        let alt = breed_alt(breed.map(|b| b.name.as_str()));
        let items: Vec<CarouselItem> = images
            .iter()
            .filter_map(|image| {
                match create_item(image.url.as_str(), alt.as_str(), image.id.as_str()) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        tracing::warn!(image_id = %image.id, error = %e, "Skipping unusable image");
                        None
                    }
                }
            })
            .collect();

        if items.is_empty() {
            self.surface.show_message(NO_IMAGES_MESSAGE);
            return Ok(ViewOutcome::Empty);
        }

        let info = InfoPanel::Breed(BreedInfo::from_breed(breed));
        let shown = self.surface.show_items(info, items);
        Ok(ViewOutcome::Shown { items: shown })
    }

    /// Show every favourite
    pub async fn load_favourites(&self) -> Result<ViewOutcome, BrowserError> {
        let generation = self.begin_view();

        let items = self.favourites.list_favourites_view().await?;
        if !self.is_current(generation) {
            tracing::debug!(generation, "Discarding stale favourites view");
            return Ok(ViewOutcome::Stale);
        }

        if items.is_empty() {
            self.surface.show_message(NO_FAVOURITES_MESSAGE);
            return Ok(ViewOutcome::Empty);
        }

        let shown = self
            .surface
            .show_items(InfoPanel::Heading(FAVOURITES_HEADING.to_string()), items);
        Ok(ViewOutcome::Shown { items: shown })
    }

    /// Heart click: toggle on the server, then refresh the item's heart
    pub async fn toggle_favourite(&self, image_id: &str) -> Result<ToggleOutcome, BrowserError> {
        let outcome = self.favourites.toggle(image_id).await?;
        self.surface
            .with_carousel(|carousel| carousel.set_favourite(image_id, outcome.is_favourite()));
        Ok(outcome)
    }

    pub fn next_item(&self) -> Option<CarouselItem> {
        self.surface.with_carousel(|carousel| carousel.next().cloned())
    }

    pub fn previous_item(&self) -> Option<CarouselItem> {
        self.surface
            .with_carousel(|carousel| carousel.previous().cloned())
    }
}
