//! # Whiskers Core
//!
//! The "Brain" of Whiskers - a cat catalog browser. Contains the catalog
//! client, the favourite toggle protocol, the carousel state machine and
//! the request instrumentation wrapped around every network call.
//!
//! ## Architecture
//!
//! - `api/` - Transport, instrumentation, catalog client and wire models
//! - `carousel/` - Item factory and carousel controller
//! - `favourites` - Read-then-write favourite toggling
//! - `ui/` - The surface handle: breed select, info panel, busy indicator
//! - `browser` - View updates driven by user actions
//! - `config` - Catalog connection settings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use whiskers_core::{Browser, WhiskersConfig};
//!
//! let config = WhiskersConfig::load()?;
//! let browser = Browser::connect(&config, vec![])?;
//! browser.initial_load().await?;
//! println!("{}", browser.surface().info().render_text());
//! ```

pub mod api;
pub mod browser;
pub mod carousel;
pub mod config;
pub mod favourites;
pub mod ui;

pub use browser::{Browser, BrowserError, ViewOutcome};
pub use config::WhiskersConfig;
pub use favourites::{FavouriteService, ToggleAction, ToggleOutcome};
