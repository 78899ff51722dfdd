//! # Information Panel
//!
//! What the info section shows for the current view.

use serde::{Deserialize, Serialize};

use crate::api::Breed;

pub const NO_IMAGES_MESSAGE: &str = "No images available for this breed.";
pub const NO_FAVOURITES_MESSAGE: &str =
    "No favourites yet. Click the heart on an image to add one!";
pub const FAVOURITES_HEADING: &str = "Your favourites";

/// Breed details with display fallbacks already applied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreedInfo {
    pub name: String,
    pub description: String,
    pub origin: String,
    pub temperament: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikipedia_url: Option<String>,
}

impl BreedInfo {
    pub fn from_breed(breed: Option<&Breed>) -> Self {
        let field = |value: Option<&String>, fallback: &str| {
            value
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            name: field(breed.map(|b| &b.name), "Unknown breed"),
            description: field(
                breed.and_then(|b| b.description.as_ref()),
                "No description available.",
            ),
            origin: field(breed.and_then(|b| b.origin.as_ref()), "N/A"),
            temperament: field(breed.and_then(|b| b.temperament.as_ref()), "N/A"),
            wikipedia_url: breed
                .and_then(|b| b.wikipedia_url.clone())
                .filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum InfoPanel {
    #[default]
    Empty,
    Breed(BreedInfo),
    Heading(String),
    /// Empty-state text, distinct from errors
    Message(String),
}

impl InfoPanel {
    /// Plain-text rendering, one line per element
    pub fn render_text(&self) -> String {
        match self {
            InfoPanel::Empty => String::new(),
            InfoPanel::Heading(text) | InfoPanel::Message(text) => text.clone(),
            InfoPanel::Breed(info) => {
                let mut lines = vec![
                    info.name.clone(),
                    info.description.clone(),
                    format!("Origin: {}", info.origin),
                    format!("Temperament: {}", info.temperament),
                ];
                if let Some(url) = &info.wikipedia_url {
                    lines.push(format!("Wikipedia: {}", url));
                }
                lines.join("\n")
            }
        }
    }

    /// Title line, when there is one
    pub fn title(&self) -> Option<&str> {
        match self {
            InfoPanel::Breed(info) => Some(&info.name),
            InfoPanel::Heading(text) => Some(text),
            _ => None,
        }
    }
}
