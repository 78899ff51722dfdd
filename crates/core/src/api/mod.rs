//! # Catalog API
//!
//! Everything that talks to the remote cat catalog.
//!
//! ## Modules
//!
//! - `transport` - The generic call capability and its reqwest implementation
//! - `instrument` - Timing, progress and busy reporting around any transport
//! - `catalog` - Typed breed, image and favourite endpoints
//! - `models` - Wire types
//! - `error` - Error taxonomy

pub mod catalog;
pub mod error;
pub mod instrument;
pub mod models;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use catalog::CatalogClient;
pub use error::ApiError;
pub use instrument::{InstrumentedTransport, RequestEvent, RequestEventKind, RequestObserver};
pub use models::{Breed, Favourite, Image};
pub use transport::{no_progress, ApiRequest, ApiResponse, HttpTransport, Method, ProgressFn, Transport, TransferProgress};
