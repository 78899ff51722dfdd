//! # Carousel
//!
//! The ordered, replaceable set of currently displayed image items.

pub mod controller;
pub mod item;

pub use controller::{Carousel, CarouselPhase, CarouselState};
pub use item::{breed_alt, create_item, CarouselItem, InvalidItem, FAVOURITE_ALT};
