//! # Carousel Items
//!
//! Display-ready units built from a (src, alt, image id) triple.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alt text for favourites view items
pub const FAVOURITE_ALT: &str = "Favourite cat";

/// Alt text when an image carries no breed metadata
pub const FALLBACK_ALT: &str = "Cat image";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidItem {
    #[error("carousel item needs a non-empty image source")]
    EmptySource,
    #[error("carousel item needs an image id")]
    EmptyImageId,
}

/// One displayed image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarouselItem {
    pub image_id: String,
    pub src: String,
    pub alt: String,
    /// Heart state, refreshed from toggle outcomes
    #[serde(default)]
    pub favourite: bool,
}

impl CarouselItem {
    pub fn with_favourite(mut self, favourite: bool) -> Self {
        self.favourite = favourite;
        self
    }
}

/// Build an item. Pure; nothing is displayed until it is appended.
pub fn create_item(
    src: impl Into<String>,
    alt: impl Into<String>,
    image_id: impl Into<String>,
) -> Result<CarouselItem, InvalidItem> {
    let src = src.into();
    if src.trim().is_empty() {
        return Err(InvalidItem::EmptySource);
    }
    let image_id = image_id.into();
    if image_id.trim().is_empty() {
        return Err(InvalidItem::EmptyImageId);
    }

    Ok(CarouselItem {
        image_id,
        src,
        alt: alt.into(),
        favourite: false,
    })
}

/// Alt text for an image of the given breed
pub fn breed_alt(breed_name: Option<&str>) -> String {
    match breed_name {
        Some(name) if !name.is_empty() => format!("{} cat", name),
        _ => FALLBACK_ALT.to_string(),
    }
}
