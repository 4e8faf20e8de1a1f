//! Image management page: selection over the image grid and the bulk
//! move/delete dialogs.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{GalleryEffect, CARD_FADE_DELAY, EMPTY_GRID_RELOAD_DELAY};
pub use msg::{GalleryMsg, ImageCard};
pub use state::{delete_phrase_matches, is_valid_new_folder_name, GalleryState, DELETE_PHRASE};
pub use update::update;
pub use view_model::{CardView, DialogView, GalleryViewModel, MoveField};
