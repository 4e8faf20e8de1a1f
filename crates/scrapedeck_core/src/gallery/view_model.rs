#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveField {
    Destination,
    NewFolderName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub filename: String,
    pub relative_path: String,
    pub selected: bool,
    pub fading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogView {
    Move {
        image_count: usize,
        destination: String,
        destination_enabled: bool,
        create_new: bool,
        new_folder_name: String,
        error: Option<(MoveField, &'static str)>,
        confirm_enabled: bool,
        confirm_label: &'static str,
    },
    Delete {
        image_count: usize,
        confirmation: String,
        show_error: bool,
        confirm_enabled: bool,
        confirm_label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryViewModel {
    pub folder: String,
    pub cards: Vec<CardView>,
    pub total_label: String,
    pub selected_count: usize,
    pub selected_label: String,
    pub bulk_bar_visible: bool,
    pub move_enabled: bool,
    pub delete_enabled: bool,
    pub folders: Vec<String>,
    pub dialog: Option<DialogView>,
    pub reload_pending: bool,
    pub dirty: bool,
}
