use std::time::Duration;

use crate::notice::Notice;
use crate::protocol::{DeleteRequest, MoveRequest};

pub const CARD_FADE_DELAY: Duration = Duration::from_millis(300);
pub const EMPTY_GRID_RELOAD_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEffect {
    LoadFolders { current: String },
    MoveImages(MoveRequest),
    DeleteImages(DeleteRequest),
    /// Answer with `GalleryMsg::CardsFaded(paths)` once `delay` has passed.
    ScheduleCardRemoval { paths: Vec<String>, delay: Duration },
    /// The grid is empty; the whole view should be reloaded after `delay`.
    ReloadView { delay: Duration },
    Notify(Notice),
}
