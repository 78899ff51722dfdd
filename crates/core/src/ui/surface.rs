//! # Surface
//!
//! Explicit handle on everything the user sees: breed select, info panel,
//! carousel and the busy indicator. Components receive this handle instead
//! of reaching for globals, so the controller runs without a real display.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use super::activity::{ActivityIndicator, Cursor};
use super::info::InfoPanel;
use crate::api::Breed;
use crate::carousel::{Carousel, CarouselItem, CarouselState};

/// One entry of the breed select control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreedOption {
    pub value: String,
    pub label: String,
}

impl From<&Breed> for BreedOption {
    fn from(breed: &Breed) -> Self {
        Self {
            value: breed.id.clone(),
            label: breed.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreedSelect {
    pub options: Vec<BreedOption>,
    pub selected: Option<String>,
}

/// Serializable copy of the whole surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub breed_select: BreedSelect,
    pub info: InfoPanel,
    pub carousel: CarouselState,
    pub progress_width: String,
    pub cursor: Cursor,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Default)]
pub struct Surface {
    carousel: Mutex<Carousel>,
    info: Mutex<InfoPanel>,
    breed_select: Mutex<BreedSelect>,
    activity: Arc<ActivityIndicator>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The indicator to register with the instrumentation layer
    pub fn activity(&self) -> Arc<ActivityIndicator> {
        self.activity.clone()
    }

    pub fn set_breed_options(&self, breeds: &[Breed]) {
        let mut select = lock(&self.breed_select);
        select.options = breeds.iter().map(BreedOption::from).collect();
        select.selected = None;
    }

    pub fn select_breed(&self, breed_id: &str) {
        lock(&self.breed_select).selected = Some(breed_id.to_string());
    }

    pub fn selected_breed(&self) -> Option<String> {
        lock(&self.breed_select).selected.clone()
    }

    pub fn breed_select(&self) -> BreedSelect {
        lock(&self.breed_select).clone()
    }

    pub fn info(&self) -> InfoPanel {
        lock(&self.info).clone()
    }

    /// Clear info and carousel
    pub fn clear(&self) {
        *lock(&self.info) = InfoPanel::Empty;
        lock(&self.carousel).clear();
    }

    /// Replace the current view with an empty-state message
    pub fn show_message(&self, message: &str) {
        self.clear();
        *lock(&self.info) = InfoPanel::Message(message.to_string());
    }

    /// Replace the current view: clear, render info, append in order, start
    pub fn show_items(&self, info: InfoPanel, items: Vec<CarouselItem>) -> usize {
        self.clear();
        *lock(&self.info) = info;

        let mut carousel = lock(&self.carousel);
        for item in items {
            carousel.append(item);
        }
        carousel.start();
        carousel.len()
    }

    /// Run `f` against the carousel
    pub fn with_carousel<R>(&self, f: impl FnOnce(&mut Carousel) -> R) -> R {
        let mut carousel = lock(&self.carousel);
        f(&mut *carousel)
    }

    pub fn carousel_state(&self) -> CarouselState {
        lock(&self.carousel).state()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            breed_select: self.breed_select(),
            info: self.info(),
            carousel: self.carousel_state(),
            progress_width: self.activity.width(),
            cursor: self.activity.cursor(),
        }
    }
}
