//! # Catalog Models
//!
//! Wire types returned by the cat catalog API. These are immutable
//! snapshots; nothing here is mutated locally after decoding.

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata record describing a cat breed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Breed {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperament: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_url: Option<String>,
}

impl Breed {
    /// Minimal breed with only id and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            origin: None,
            temperament: None,
            wikipedia_url: None,
        }
    }
}

/// A catalog image with its embedded breed metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub breeds: Vec<Breed>,
}

impl Image {
    /// The breed describing this image, if the catalog attached one
    pub fn primary_breed(&self) -> Option<&Breed> {
        self.breeds.first()
    }
}

/// Image reference embedded in a favourite record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavouriteImage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Server-side record linking a user's preference to one image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favourite {
    /// Favourite record id (distinct from the image id)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<FavouriteImage>,
}

impl Favourite {
    /// Embedded image url, ignoring empty placeholders
    pub fn embedded_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|image| image.url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }
}

/// Body returned by `POST /favourites`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedFavourite {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Body sent to `POST /favourites`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFavourite {
    pub image_id: String,
}

/// The catalog hands out numeric favourite ids; keep them as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
