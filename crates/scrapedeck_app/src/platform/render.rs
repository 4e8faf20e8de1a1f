//! Turns view models into terminal lines.
//!
//! The renderer remembers what it already printed, so each call only yields
//! what changed since the previous one.

use chrono::Local;
use scrapedeck_core::gallery::{DialogView, GalleryViewModel};
use scrapedeck_core::search::{LogLine, SearchViewModel, Section};
use scrapedeck_core::{Notice, NoticeKind, RowField};

#[derive(Debug, Default)]
struct SearchMarks {
    errors: Vec<String>,
    submitting: bool,
    progress: Option<String>,
    connection_lost: bool,
    completed: bool,
    printed_logs: usize,
}

#[derive(Debug, Default)]
struct GalleryMarks {
    summary: Option<String>,
    folders: Vec<String>,
    dialog_error: Option<String>,
    reload_pending: bool,
}

#[derive(Debug, Default)]
pub struct Renderer {
    search: SearchMarks,
    gallery: GalleryMarks,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `logs` is the state's full log list; only the part past what was
    /// already printed is read.
    pub fn search_lines(&mut self, view: &SearchViewModel, logs: &[LogLine]) -> Vec<String> {
        let marks = &mut self.search;
        let mut lines = Vec::new();

        let errors = validation_messages(view);
        if errors != marks.errors {
            lines.extend(errors.iter().cloned());
            marks.errors = errors;
        }

        let submitting = !view.start_enabled;
        if submitting && !marks.submitting {
            lines.push(view.start_label.to_string());
        }
        marks.submitting = submitting;

        if view.section == Section::Form {
            // Back on the form: the next job starts from a clean slate.
            marks.progress = None;
            marks.connection_lost = false;
            marks.completed = false;
            marks.printed_logs = 0;
            return lines;
        }

        if marks.progress.as_deref() != Some(view.progress_text.as_str()) {
            lines.push(format!("Progress: {}", view.progress_text));
            marks.progress = Some(view.progress_text.clone());
        }

        if view.connection_lost != marks.connection_lost {
            lines.push(if view.connection_lost {
                "Lost contact with the backend, still retrying...".to_string()
            } else {
                "Backend reachable again.".to_string()
            });
            marks.connection_lost = view.connection_lost;
        }

        let log_count = view.log_count.min(logs.len());
        if log_count < marks.printed_logs {
            marks.printed_logs = 0;
            if let Some(placeholder) = view.log_placeholder {
                lines.push(placeholder.to_string());
            }
        }
        for line in &logs[marks.printed_logs..log_count] {
            lines.push(format!("  {}", line.formatted));
        }
        marks.printed_logs = log_count;

        if view.completion_visible && !marks.completed {
            lines.push("Bulk scraping finished.".to_string());
        }
        marks.completed = view.completion_visible;

        lines
    }

    pub fn gallery_lines(&mut self, view: &GalleryViewModel) -> Vec<String> {
        let marks = &mut self.gallery;
        let mut lines = Vec::new();

        let summary = format!(
            "{}: {}, {}",
            view.folder, view.total_label, view.selected_label
        );
        if marks.summary.as_ref() != Some(&summary) {
            lines.push(summary.clone());
            marks.summary = Some(summary);
        }

        if view.folders != marks.folders {
            if !view.folders.is_empty() {
                lines.push(format!("Other folders: {}", view.folders.join(", ")));
            }
            marks.folders = view.folders.clone();
        }

        let dialog_error = match &view.dialog {
            Some(DialogView::Move {
                error: Some((_, message)),
                ..
            }) => Some(message.to_string()),
            Some(DialogView::Delete {
                show_error: true, ..
            }) => Some("Please type DELETE to confirm.".to_string()),
            _ => None,
        };
        if dialog_error != marks.dialog_error {
            lines.extend(dialog_error.clone());
            marks.dialog_error = dialog_error;
        }

        if view.reload_pending && !marks.reload_pending {
            lines.push(format!("No images left in {}.", view.folder));
        }
        marks.reload_pending = view.reload_pending;

        lines
    }
}

pub fn notice_line(notice: &Notice) -> String {
    let label = match notice.kind {
        NoticeKind::Info => "info",
        NoticeKind::Success => "ok",
        NoticeKind::Warning => "warning",
        NoticeKind::Error => "error",
    };
    format!(
        "[{}] {}: {}",
        Local::now().format("%H:%M:%S"),
        label,
        notice.message
    )
}

fn validation_messages(view: &SearchViewModel) -> Vec<String> {
    let mut messages: Vec<String> = view
        .rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| {
            row.invalid
                .iter()
                .map(move |field| format!("Entry {}: {}", index + 1, field_message(*field)))
        })
        .collect();
    if let Some(error) = view.images_per_class_error {
        messages.push(format!("Images per class: {error}"));
    }
    messages
}

fn field_message(field: RowField) -> &'static str {
    match field {
        RowField::Keyword => "keyword is required",
        RowField::ClassName => "class name is required",
        RowField::DestinationFolder => {
            "destination folder may only contain letters, numbers, spaces, _ - / and \\"
        }
    }
}
