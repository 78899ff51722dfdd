pub mod activity;
pub mod info;
pub mod surface;

pub use activity::{ActivityIndicator, Cursor};
pub use info::{BreedInfo, InfoPanel, FAVOURITES_HEADING, NO_FAVOURITES_MESSAGE, NO_IMAGES_MESSAGE};
pub use surface::{BreedOption, BreedSelect, Surface, SurfaceSnapshot};
