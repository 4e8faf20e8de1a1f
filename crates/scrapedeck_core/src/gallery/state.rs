use std::collections::BTreeSet;

use deck_logging::{deck_debug, deck_warn};

use super::msg::ImageCard;
use super::view_model::{CardView, DialogView, GalleryViewModel, MoveField};
use crate::protocol::{DeleteRequest, MoveRequest};

/// Phrase the user must type before a bulk delete is allowed.
pub const DELETE_PHRASE: &str = "DELETE";

pub fn delete_phrase_matches(input: &str) -> bool {
    input.eq_ignore_ascii_case(DELETE_PHRASE)
}

pub fn is_valid_new_folder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CardState {
    card: ImageCard,
    fading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct MoveDialog {
    pub(crate) destination: String,
    pub(crate) create_new: bool,
    pub(crate) new_folder_name: String,
    pub(crate) error: Option<(MoveField, &'static str)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DeleteDialog {
    pub(crate) confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Dialog {
    Move(MoveDialog),
    Delete(DeleteDialog),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryState {
    folder: String,
    cards: Vec<CardState>,
    selection: BTreeSet<String>,
    available_folders: Vec<String>,
    dialog: Option<Dialog>,
    pending_move: Option<MoveRequest>,
    pending_delete: Option<DeleteRequest>,
    reload_pending: bool,
    dirty: bool,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn available_folders(&self) -> &[String] {
        &self.available_folders
    }

    pub fn pending_move(&self) -> Option<&MoveRequest> {
        self.pending_move.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&DeleteRequest> {
        self.pending_delete.as_ref()
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> GalleryViewModel {
        let selected_count = self.selection.len();
        let cards = self
            .cards
            .iter()
            .map(|state| CardView {
                filename: state.card.filename.clone(),
                relative_path: state.card.relative_path.clone(),
                selected: self.selection.contains(&state.card.relative_path),
                fading: state.fading,
            })
            .collect();

        let dialog = self.dialog.as_ref().map(|dialog| match dialog {
            Dialog::Move(dialog) => DialogView::Move {
                image_count: selected_count,
                destination: dialog.destination.clone(),
                destination_enabled: !dialog.create_new,
                create_new: dialog.create_new,
                new_folder_name: dialog.new_folder_name.clone(),
                error: dialog.error,
                confirm_enabled: self.pending_move.is_none(),
                confirm_label: if self.pending_move.is_some() {
                    "Moving..."
                } else {
                    "Move Images"
                },
            },
            Dialog::Delete(dialog) => DialogView::Delete {
                image_count: selected_count,
                confirmation: dialog.confirmation.clone(),
                show_error: !dialog.confirmation.is_empty()
                    && !delete_phrase_matches(&dialog.confirmation),
                confirm_enabled: self.pending_delete.is_none()
                    && delete_phrase_matches(&dialog.confirmation),
                confirm_label: if self.pending_delete.is_some() {
                    "Deleting..."
                } else {
                    "Delete Images"
                },
            },
        });

        GalleryViewModel {
            folder: self.folder.clone(),
            cards,
            total_label: format!("{} images", self.cards.len()),
            selected_count,
            selected_label: format!(
                "{} image{} selected",
                selected_count,
                if selected_count == 1 { "" } else { "s" }
            ),
            bulk_bar_visible: selected_count > 0,
            move_enabled: selected_count > 0,
            delete_enabled: selected_count > 0,
            folders: self.available_folders.clone(),
            dialog,
            reload_pending: self.reload_pending,
            dirty: self.dirty,
        }
    }

    pub(crate) fn load_page(&mut self, folder: String, images: Vec<ImageCard>) {
        *self = Self {
            folder,
            cards: images
                .into_iter()
                .map(|card| CardState { card, fading: false })
                .collect(),
            dirty: true,
            ..Self::default()
        };
    }

    pub(crate) fn set_available_folders(&mut self, folders: Vec<String>) {
        self.available_folders = folders;
        self.dirty = true;
    }

    fn selectable(&self, path: &str) -> bool {
        self.cards
            .iter()
            .any(|state| state.card.relative_path == path && !state.fading)
    }

    /// Sets one card's checkbox. Setting it to the value it already has is a
    /// no-op.
    pub(crate) fn set_checked(&mut self, path: &str, checked: bool) {
        if !self.selectable(path) {
            deck_warn!("Ignoring selection change for unknown image {}", path);
            return;
        }
        let changed = if checked {
            self.selection.insert(path.to_string())
        } else {
            self.selection.remove(path)
        };
        if changed {
            deck_debug!("Selection now holds {} images", self.selection.len());
            self.dirty = true;
        }
    }

    pub(crate) fn toggle(&mut self, path: &str) {
        let checked = !self.selection.contains(path);
        self.set_checked(path, checked);
    }

    pub(crate) fn select_all(&mut self) {
        let paths: Vec<String> = self
            .cards
            .iter()
            .filter(|state| !state.fading)
            .map(|state| state.card.relative_path.clone())
            .collect();
        for path in paths {
            self.set_checked(&path, true);
        }
    }

    pub(crate) fn deselect_all(&mut self) {
        let paths: Vec<String> = self.selection.iter().cloned().collect();
        for path in paths {
            self.set_checked(&path, false);
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
        self.dirty = true;
    }

    pub(crate) fn open_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
        self.dirty = true;
    }

    pub(crate) fn close_dialog(&mut self) {
        if self.dialog.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn move_dialog_mut(&mut self) -> Option<&mut MoveDialog> {
        match self.dialog.as_mut() {
            Some(Dialog::Move(dialog)) => {
                self.dirty = true;
                Some(dialog)
            }
            _ => None,
        }
    }

    pub(crate) fn delete_dialog_mut(&mut self) -> Option<&mut DeleteDialog> {
        match self.dialog.as_mut() {
            Some(Dialog::Delete(dialog)) => {
                self.dirty = true;
                Some(dialog)
            }
            _ => None,
        }
    }

    pub(crate) fn is_move_dialog_open(&self) -> bool {
        matches!(self.dialog, Some(Dialog::Move(_)))
    }

    pub(crate) fn is_delete_dialog_open(&self) -> bool {
        matches!(self.dialog, Some(Dialog::Delete(_)))
    }

    pub(crate) fn set_pending_move(&mut self, request: Option<MoveRequest>) -> Option<MoveRequest> {
        self.dirty = true;
        std::mem::replace(&mut self.pending_move, request)
    }

    pub(crate) fn set_pending_delete(
        &mut self,
        request: Option<DeleteRequest>,
    ) -> Option<DeleteRequest> {
        self.dirty = true;
        std::mem::replace(&mut self.pending_delete, request)
    }

    /// Starts the fade-out of `paths`; returns the ones that are on the grid.
    pub(crate) fn begin_fade(&mut self, paths: &[String]) -> Vec<String> {
        let mut fading = Vec::with_capacity(paths.len());
        for state in &mut self.cards {
            if paths.contains(&state.card.relative_path) && !state.fading {
                state.fading = true;
                fading.push(state.card.relative_path.clone());
            }
        }
        self.dirty = true;
        fading
    }

    /// Drops faded cards. Returns true when this empties the grid for the
    /// first time.
    pub(crate) fn remove_cards(&mut self, paths: &[String]) -> bool {
        let before = self.cards.len();
        self.cards
            .retain(|state| !(state.fading && paths.contains(&state.card.relative_path)));
        if self.cards.len() != before {
            self.dirty = true;
        }
        if before > 0 && self.cards.is_empty() && !self.reload_pending {
            self.reload_pending = true;
            return true;
        }
        false
    }
}
