//! Bulk-search page: entry table, job submission, progress polling and the
//! log stream.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{SearchEffect, StreamErrorPolicy};
pub use msg::SearchMsg;
pub use state::{PollState, SearchSettings, SearchState};
pub use update::update;
pub use view_model::{LogLine, ProgressMode, RowView, SearchViewModel, Section};
