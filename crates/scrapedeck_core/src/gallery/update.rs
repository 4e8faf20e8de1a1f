use deck_logging::{deck_error, deck_info, deck_warn};

use super::effect::{CARD_FADE_DELAY, EMPTY_GRID_RELOAD_DELAY};
use super::state::{
    delete_phrase_matches, is_valid_new_folder_name, DeleteDialog, Dialog, MoveDialog,
};
use super::view_model::MoveField;
use super::{GalleryEffect, GalleryMsg, GalleryState};
use crate::notice::Notice;
use crate::protocol::{DeleteRequest, DeleteResponse, MoveRequest, MoveResponse, STATUS_SUCCESS};

const NO_SELECTION: &str = "No images selected";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: GalleryState, msg: GalleryMsg) -> (GalleryState, Vec<GalleryEffect>) {
    let effects = match msg {
        GalleryMsg::PageLoaded { folder, images } => {
            deck_info!("Image management loaded for {} ({} images)", folder, images.len());
            state.load_page(folder, images);
            vec![load_folders(&state)]
        }
        GalleryMsg::FoldersLoaded(Ok(response)) => {
            if response.status == STATUS_SUCCESS {
                state.set_available_folders(response.folders);
            } else {
                deck_error!(
                    "Failed to load folders: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
            }
            Vec::new()
        }
        GalleryMsg::FoldersLoaded(Err(err)) => {
            deck_error!("Error loading folders: {}", err);
            Vec::new()
        }
        GalleryMsg::CheckboxSet { path, checked } => {
            state.set_checked(&path, checked);
            Vec::new()
        }
        GalleryMsg::CardClicked(path) => {
            state.toggle(&path);
            Vec::new()
        }
        GalleryMsg::SelectAllClicked => {
            state.select_all();
            Vec::new()
        }
        GalleryMsg::DeselectAllClicked => {
            state.deselect_all();
            Vec::new()
        }
        GalleryMsg::MoveClicked => open_if_selected(&mut state, Dialog::Move(MoveDialog::default())),
        GalleryMsg::DeleteClicked => {
            open_if_selected(&mut state, Dialog::Delete(DeleteDialog::default()))
        }
        GalleryMsg::DestinationSelected(folder) => {
            if let Some(dialog) = state.move_dialog_mut() {
                if !dialog.create_new {
                    dialog.destination = folder;
                    dialog.error = None;
                }
            }
            Vec::new()
        }
        GalleryMsg::CreateNewToggled(create_new) => {
            if let Some(dialog) = state.move_dialog_mut() {
                dialog.create_new = create_new;
                dialog.error = None;
                if create_new {
                    dialog.destination.clear();
                } else {
                    dialog.new_folder_name.clear();
                }
            }
            Vec::new()
        }
        GalleryMsg::NewFolderNameChanged(name) => {
            if let Some(dialog) = state.move_dialog_mut() {
                dialog.new_folder_name = name;
                dialog.error = None;
            }
            Vec::new()
        }
        GalleryMsg::ConfirmMoveClicked => confirm_move(&mut state),
        GalleryMsg::MoveCompleted(result) => move_completed(&mut state, result),
        GalleryMsg::DeleteConfirmationChanged(text) => {
            if let Some(dialog) = state.delete_dialog_mut() {
                dialog.confirmation = text;
            }
            Vec::new()
        }
        GalleryMsg::ConfirmDeleteClicked => confirm_delete(&mut state),
        GalleryMsg::DeleteCompleted(result) => delete_completed(&mut state, result),
        GalleryMsg::DialogDismissed => {
            state.close_dialog();
            Vec::new()
        }
        GalleryMsg::CardsFaded(paths) => {
            if state.remove_cards(&paths) {
                deck_info!("No images left in {}, reloading view", state.folder());
                vec![GalleryEffect::ReloadView {
                    delay: EMPTY_GRID_RELOAD_DELAY,
                }]
            } else {
                Vec::new()
            }
        }
        GalleryMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn load_folders(state: &GalleryState) -> GalleryEffect {
    GalleryEffect::LoadFolders {
        current: state.folder().to_string(),
    }
}

fn open_if_selected(state: &mut GalleryState, dialog: Dialog) -> Vec<GalleryEffect> {
    if state.selection().is_empty() {
        return vec![GalleryEffect::Notify(Notice::warning(NO_SELECTION))];
    }
    state.open_dialog(dialog);
    Vec::new()
}

fn confirm_move(state: &mut GalleryState) -> Vec<GalleryEffect> {
    if !state.is_move_dialog_open() || state.pending_move().is_some() {
        return Vec::new();
    }
    if state.selection().is_empty() {
        return vec![GalleryEffect::Notify(Notice::warning(NO_SELECTION))];
    }

    let images: Vec<String> = state.selection().iter().cloned().collect();
    let source_folder = state.folder().to_string();
    let Some(dialog) = state.move_dialog_mut() else {
        return Vec::new();
    };

    let destination = if dialog.create_new {
        let name = dialog.new_folder_name.trim().to_string();
        if name.is_empty() {
            dialog.error = Some((MoveField::NewFolderName, "Please enter a folder name"));
            return Vec::new();
        }
        if !is_valid_new_folder_name(&name) {
            dialog.error = Some((
                MoveField::NewFolderName,
                "Folder name can only contain letters, numbers, spaces, hyphens, and underscores",
            ));
            return Vec::new();
        }
        name
    } else {
        if dialog.destination.is_empty() {
            dialog.error = Some((MoveField::Destination, "Please select a destination folder"));
            return Vec::new();
        }
        dialog.destination.clone()
    };
    dialog.error = None;

    let request = MoveRequest {
        images,
        destination_folder: destination,
        source_folder,
        create_new: dialog.create_new,
    };
    deck_info!(
        "Moving {} images from {} to {}",
        request.images.len(),
        request.source_folder,
        request.destination_folder
    );
    state.set_pending_move(Some(request.clone()));
    vec![GalleryEffect::MoveImages(request)]
}

fn move_completed(
    state: &mut GalleryState,
    result: Result<MoveResponse, String>,
) -> Vec<GalleryEffect> {
    let Some(request) = state.set_pending_move(None) else {
        deck_warn!("Move response arrived with no move pending");
        return Vec::new();
    };

    match result {
        Ok(response) if response.status == STATUS_SUCCESS => {
            let mut effects = vec![GalleryEffect::Notify(Notice::success(format!(
                "Successfully moved {} images to {}",
                response.moved_count, request.destination_folder
            )))];
            effects.extend(finish_bulk_action(state, &request.images));
            if state.is_move_dialog_open() {
                state.close_dialog();
            }
            // Picks up a freshly created destination folder.
            effects.push(load_folders(state));
            effects
        }
        Ok(response) => vec![GalleryEffect::Notify(Notice::error(format!(
            "Failed to move images: {}",
            response.message.as_deref().unwrap_or("unknown error")
        )))],
        Err(err) => {
            deck_error!("Move request failed: {}", err);
            vec![GalleryEffect::Notify(Notice::error(
                "Failed to move images. Please try again.",
            ))]
        }
    }
}

fn confirm_delete(state: &mut GalleryState) -> Vec<GalleryEffect> {
    if state.pending_delete().is_some() {
        return Vec::new();
    }
    let Some(dialog) = state.delete_dialog_mut() else {
        return Vec::new();
    };
    if !delete_phrase_matches(&dialog.confirmation) {
        return Vec::new();
    }
    if state.selection().is_empty() {
        return vec![GalleryEffect::Notify(Notice::warning(NO_SELECTION))];
    }

    let request = DeleteRequest {
        images: state.selection().iter().cloned().collect(),
        folder: state.folder().to_string(),
    };
    deck_info!("Deleting {} images from {}", request.images.len(), request.folder);
    state.set_pending_delete(Some(request.clone()));
    vec![GalleryEffect::DeleteImages(request)]
}

fn delete_completed(
    state: &mut GalleryState,
    result: Result<DeleteResponse, String>,
) -> Vec<GalleryEffect> {
    let Some(request) = state.set_pending_delete(None) else {
        deck_warn!("Delete response arrived with no delete pending");
        return Vec::new();
    };

    match result {
        Ok(response) if response.status == STATUS_SUCCESS => {
            let mut effects = vec![GalleryEffect::Notify(Notice::success(format!(
                "Successfully deleted {} images",
                response.deleted_count
            )))];
            effects.extend(finish_bulk_action(state, &request.images));
            if state.is_delete_dialog_open() {
                state.close_dialog();
            }
            effects
        }
        Ok(response) => vec![GalleryEffect::Notify(Notice::error(format!(
            "Failed to delete images: {}",
            response.message.as_deref().unwrap_or("unknown error")
        )))],
        Err(err) => {
            deck_error!("Delete request failed: {}", err);
            vec![GalleryEffect::Notify(Notice::error(
                "Failed to delete images. Please try again.",
            ))]
        }
    }
}

/// Fades out the affected cards and empties the selection.
fn finish_bulk_action(state: &mut GalleryState, images: &[String]) -> Option<GalleryEffect> {
    let paths = state.begin_fade(images);
    state.clear_selection();
    (!paths.is_empty()).then_some(GalleryEffect::ScheduleCardRemoval {
        paths,
        delay: CARD_FADE_DELAY,
    })
}
