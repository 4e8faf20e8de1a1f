use crate::table::{RowField, RowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Form,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    #[default]
    Pending,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: String,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: RowId,
    pub keyword: String,
    pub class_name: String,
    pub destination_folder: String,
    pub invalid: Vec<RowField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub section: Section,
    pub rows: Vec<RowView>,
    pub images_per_class: String,
    pub images_per_class_error: Option<&'static str>,
    pub destination_folder: String,
    pub start_enabled: bool,
    pub start_label: &'static str,
    pub progress_text: String,
    pub status_text: String,
    pub progress_mode: ProgressMode,
    pub spinner_visible: bool,
    pub completion_visible: bool,
    pub connection_lost: bool,
    /// Lines live on the state; see `SearchState::log_lines`.
    pub log_count: usize,
    pub log_placeholder: Option<&'static str>,
    pub logs_visible: bool,
    pub log_actions_enabled: bool,
    pub dirty: bool,
}
