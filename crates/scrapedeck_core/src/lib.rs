//! ScrapeDeck core: pure state machines for the bulk-search and image
//! management pages, plus the backend's wire types.
//!
//! Nothing in here performs I/O. Each page is driven by an `update`
//! function that consumes a message and returns the effects the caller must
//! execute; results come back as further messages.
pub mod gallery;
mod notice;
pub mod protocol;
pub mod search;
mod table;

pub use notice::{Notice, NoticeKind};
pub use table::{
    is_valid_destination, parse_images_per_class, FieldError, RowField, RowId, SearchRow,
    SearchTable, TableError, ValidationReport, DEFAULT_IMAGES_PER_CLASS, MAX_IMAGES_PER_CLASS,
    MIN_IMAGES_PER_CLASS,
};
