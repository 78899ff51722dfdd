//! # Carousel Controller
//!
//! Owns the displayed items and the display lifecycle.
//!
//! ```text
//! Empty ──append──► Populating ──start──► Started
//!   ▲                                        │
//!   └──────────────── clear ─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use super::item::CarouselItem;

/// Lifecycle phase of the carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselPhase {
    #[default]
    Empty,
    Populating,
    Started,
}

/// Serializable view of the carousel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarouselState {
    pub items: Vec<CarouselItem>,
    pub phase: CarouselPhase,
    pub active: usize,
}

#[derive(Debug, Default)]
pub struct Carousel {
    items: Vec<CarouselItem>,
    phase: CarouselPhase,
    active: usize,
}

impl Carousel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every displayed item. Safe to call when already empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.active = 0;
        self.phase = CarouselPhase::Empty;
    }

    /// Add an item at the end of the display order
    pub fn append(&mut self, item: CarouselItem) {
        self.items.push(item);
        if self.phase == CarouselPhase::Empty {
            self.phase = CarouselPhase::Populating;
        }
    }

    /// Enable navigation over the current items. Zero items is valid.
    pub fn start(&mut self) {
        self.phase = CarouselPhase::Started;
        if self.active >= self.items.len() {
            self.active = 0;
        }
        tracing::debug!(items = self.items.len(), "Carousel started");
    }

    /// Move to the next item, wrapping around
    pub fn next(&mut self) -> Option<&CarouselItem> {
        if !self.can_navigate() {
            return None;
        }
        self.active = (self.active + 1) % self.items.len();
        self.active_item()
    }

    /// Move to the previous item, wrapping around
    pub fn previous(&mut self) -> Option<&CarouselItem> {
        if !self.can_navigate() {
            return None;
        }
        self.active = (self.active + self.items.len() - 1) % self.items.len();
        self.active_item()
    }

    fn can_navigate(&self) -> bool {
        self.phase == CarouselPhase::Started && !self.items.is_empty()
    }

    pub fn active_item(&self) -> Option<&CarouselItem> {
        if self.phase != CarouselPhase::Started {
            return None;
        }
        self.items.get(self.active)
    }

    /// Refresh the heart state of every item showing `image_id`
    pub fn set_favourite(&mut self, image_id: &str, favourite: bool) -> usize {
        let mut touched = 0;
        for item in self.items.iter_mut().filter(|i| i.image_id == image_id) {
            item.favourite = favourite;
            touched += 1;
        }
        touched
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase == CarouselPhase::Started
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            items: self.items.clone(),
            phase: self.phase,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::item::create_item;

    fn item(id: &str) -> CarouselItem {
        create_item(format!("https://cdn/{}.jpg", id), "Cat image", id).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let mut carousel = Carousel::new();
        assert_eq!(carousel.phase(), CarouselPhase::Empty);

        carousel.append(item("a"));
        carousel.append(item("b"));
        assert_eq!(carousel.phase(), CarouselPhase::Populating);
        assert!(carousel.active_item().is_none());

        carousel.start();
        assert!(carousel.is_started());
        assert_eq!(carousel.active_item().unwrap().image_id, "a");

        carousel.clear();
        assert_eq!(carousel.phase(), CarouselPhase::Empty);
        assert!(carousel.is_empty());
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let mut carousel = Carousel::new();
        for id in ["x", "y", "z"] {
            carousel.append(item(id));
        }
        let ids: Vec<&str> = carousel.items().iter().map(|i| i.image_id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_start_with_no_items() {
        let mut carousel = Carousel::new();
        carousel.clear();
        carousel.clear();
        carousel.start();

        assert!(carousel.is_started());
        assert!(carousel.is_empty());
        assert!(carousel.active_item().is_none());
        assert!(carousel.next().is_none());
        assert!(carousel.previous().is_none());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut carousel = Carousel::new();
        for id in ["a", "b", "c"] {
            carousel.append(item(id));
        }
        assert!(carousel.next().is_none());

        carousel.start();
        assert_eq!(carousel.next().unwrap().image_id, "b");
        assert_eq!(carousel.next().unwrap().image_id, "c");
        assert_eq!(carousel.next().unwrap().image_id, "a");
        assert_eq!(carousel.previous().unwrap().image_id, "c");
    }

    #[test]
    fn test_clear_resets_active() {
        let mut carousel = Carousel::new();
        carousel.append(item("a"));
        carousel.append(item("b"));
        carousel.start();
        carousel.next();

        carousel.clear();
        carousel.append(item("c"));
        carousel.start();
        assert_eq!(carousel.state().active, 0);
        assert_eq!(carousel.active_item().unwrap().image_id, "c");
    }

    #[test]
    fn test_append_after_start_stays_started() {
        let mut carousel = Carousel::new();
        carousel.start();
        carousel.append(item("late"));
        assert!(carousel.is_started());
        assert_eq!(carousel.active_item().unwrap().image_id, "late");
    }

    #[test]
    fn test_set_favourite() {
        let mut carousel = Carousel::new();
        carousel.append(item("a"));
        carousel.append(item("b"));

        assert_eq!(carousel.set_favourite("a", true), 1);
        assert!(carousel.items()[0].favourite);
        assert!(!carousel.items()[1].favourite);
        assert_eq!(carousel.set_favourite("missing", true), 0);
    }
}
