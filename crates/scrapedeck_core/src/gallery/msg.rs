use crate::protocol::{DeleteResponse, FoldersResponse, MoveResponse};

/// One image tile on the management grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    pub filename: String,
    pub relative_path: String,
}

impl ImageCard {
    pub fn new(filename: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            relative_path: relative_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryMsg {
    /// Page became active for `folder` with the grid it shows.
    PageLoaded {
        folder: String,
        images: Vec<ImageCard>,
    },
    FoldersLoaded(Result<FoldersResponse, String>),
    /// A card's checkbox was set to `checked`.
    CheckboxSet { path: String, checked: bool },
    /// Click anywhere on a card: flips its checkbox.
    CardClicked(String),
    SelectAllClicked,
    DeselectAllClicked,
    MoveClicked,
    DeleteClicked,
    DestinationSelected(String),
    CreateNewToggled(bool),
    NewFolderNameChanged(String),
    ConfirmMoveClicked,
    MoveCompleted(Result<MoveResponse, String>),
    DeleteConfirmationChanged(String),
    ConfirmDeleteClicked,
    DeleteCompleted(Result<DeleteResponse, String>),
    DialogDismissed,
    /// The fade-out of these cards has finished.
    CardsFaded(Vec<String>),
    NoOp,
}
