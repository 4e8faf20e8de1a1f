use std::sync::Once;

use pretty_assertions::assert_eq;
use scrapedeck_core::gallery::{
    update, DialogView, GalleryEffect, GalleryMsg, GalleryState, ImageCard, MoveField,
    CARD_FADE_DELAY, EMPTY_GRID_RELOAD_DELAY,
};
use scrapedeck_core::protocol::{DeleteRequest, DeleteResponse, MoveRequest, MoveResponse};
use scrapedeck_core::{Notice, NoticeKind};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(deck_logging::initialize_for_tests);
}

const PATHS: [&str; 4] = ["cats/a.jpg", "cats/b.jpg", "cats/c.jpg", "cats/d.jpg"];

fn with_selection(selected: &[&str]) -> GalleryState {
    let images = PATHS
        .iter()
        .map(|path| ImageCard::new(&path[5..], *path))
        .collect();
    let (mut state, _) = update(
        GalleryState::new(),
        GalleryMsg::PageLoaded {
            folder: "cats".into(),
            images,
        },
    );
    for path in selected {
        state = update(
            state,
            GalleryMsg::CheckboxSet {
                path: path.to_string(),
                checked: true,
            },
        )
        .0;
    }
    state
}

fn moved(count: u32) -> GalleryMsg {
    GalleryMsg::MoveCompleted(Ok(MoveResponse {
        status: "success".into(),
        moved_count: count,
        message: None,
    }))
}

#[test]
fn delete_phrase_is_case_insensitive() {
    init_logging();
    let (state, _) = update(with_selection(&["cats/a.jpg"]), GalleryMsg::DeleteClicked);

    let (state, _) = update(state, GalleryMsg::DeleteConfirmationChanged("delet".into()));
    match state.view().dialog {
        Some(DialogView::Delete {
            confirm_enabled,
            show_error,
            ..
        }) => {
            assert!(!confirm_enabled);
            assert!(show_error);
        }
        other => panic!("unexpected dialog {other:?}"),
    }
    let (state, effects) = update(state, GalleryMsg::ConfirmDeleteClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, GalleryMsg::DeleteConfirmationChanged("delete".into()));
    match state.view().dialog {
        Some(DialogView::Delete {
            confirm_enabled,
            show_error,
            image_count,
            ..
        }) => {
            assert!(confirm_enabled);
            assert!(!show_error);
            assert_eq!(image_count, 1);
        }
        other => panic!("unexpected dialog {other:?}"),
    }
}

#[test]
fn move_success_removes_exactly_the_moved_cards() {
    init_logging();
    let selected = ["cats/a.jpg", "cats/b.jpg", "cats/c.jpg"];
    let (state, _) = update(with_selection(&selected), GalleryMsg::MoveClicked);
    let (state, _) = update(state, GalleryMsg::DestinationSelected("dogs".into()));

    let (state, effects) = update(state, GalleryMsg::ConfirmMoveClicked);
    let expected_paths: Vec<String> = selected.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        effects,
        vec![GalleryEffect::MoveImages(MoveRequest {
            images: expected_paths.clone(),
            destination_folder: "dogs".into(),
            source_folder: "cats".into(),
            create_new: false,
        })]
    );
    match state.view().dialog {
        Some(DialogView::Move {
            confirm_enabled,
            confirm_label,
            ..
        }) => {
            assert!(!confirm_enabled);
            assert_eq!(confirm_label, "Moving...");
        }
        other => panic!("unexpected dialog {other:?}"),
    }
    // A second click while the request is out does nothing.
    let (state, effects) = update(state, GalleryMsg::ConfirmMoveClicked);
    assert!(effects.is_empty());

    let (state, effects) = update(state, moved(3));
    assert_eq!(
        effects,
        vec![
            GalleryEffect::Notify(Notice::success("Successfully moved 3 images to dogs")),
            GalleryEffect::ScheduleCardRemoval {
                paths: expected_paths.clone(),
                delay: CARD_FADE_DELAY,
            },
            GalleryEffect::LoadFolders {
                current: "cats".into()
            },
        ]
    );
    assert!(state.selection().is_empty());
    let view = state.view();
    assert!(view.dialog.is_none());
    assert!(!view.bulk_bar_visible);
    assert_eq!(view.cards.iter().filter(|c| c.fading).count(), 3);

    let (state, effects) = update(state, GalleryMsg::CardsFaded(expected_paths));
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].relative_path, "cats/d.jpg");
    assert_eq!(view.total_label, "1 images");
}

#[test]
fn move_to_new_folder_is_validated() {
    init_logging();
    let (state, _) = update(with_selection(&["cats/a.jpg"]), GalleryMsg::MoveClicked);
    let (state, effects) = update(state, GalleryMsg::ConfirmMoveClicked);
    assert!(effects.is_empty());
    assert!(matches!(
        state.view().dialog,
        Some(DialogView::Move {
            error: Some((MoveField::Destination, _)),
            ..
        })
    ));

    let (state, _) = update(state, GalleryMsg::DestinationSelected("dogs".into()));
    let (state, _) = update(state, GalleryMsg::CreateNewToggled(true));
    match state.view().dialog {
        Some(DialogView::Move {
            destination,
            destination_enabled,
            ..
        }) => {
            assert!(destination.is_empty());
            assert!(!destination_enabled);
        }
        other => panic!("unexpected dialog {other:?}"),
    }

    let (state, _) = update(state, GalleryMsg::NewFolderNameChanged("bad/name".into()));
    let (state, effects) = update(state, GalleryMsg::ConfirmMoveClicked);
    assert!(effects.is_empty());
    assert!(matches!(
        state.view().dialog,
        Some(DialogView::Move {
            error: Some((MoveField::NewFolderName, _)),
            ..
        })
    ));

    let (state, _) = update(state, GalleryMsg::NewFolderNameChanged(" big cats ".into()));
    let (_state, effects) = update(state, GalleryMsg::ConfirmMoveClicked);
    match effects.as_slice() {
        [GalleryEffect::MoveImages(request)] => {
            assert_eq!(request.destination_folder, "big cats");
            assert!(request.create_new);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn failed_move_keeps_cards_and_reenables_button() {
    init_logging();
    let (state, _) = update(with_selection(&["cats/a.jpg"]), GalleryMsg::MoveClicked);
    let (state, _) = update(state, GalleryMsg::DestinationSelected("dogs".into()));
    let (state, _) = update(state, GalleryMsg::ConfirmMoveClicked);

    let (state, effects) = update(
        state,
        GalleryMsg::MoveCompleted(Ok(MoveResponse {
            status: "error".into(),
            moved_count: 0,
            message: Some("Destination not writable".into()),
        })),
    );
    assert_eq!(
        effects,
        vec![GalleryEffect::Notify(Notice::error(
            "Failed to move images: Destination not writable"
        ))]
    );
    assert_eq!(state.selection().len(), 1);
    assert!(matches!(
        state.view().dialog,
        Some(DialogView::Move {
            confirm_enabled: true,
            ..
        })
    ));

    let (state, _) = update(state, GalleryMsg::ConfirmMoveClicked);
    let (state, effects) = update(state, GalleryMsg::MoveCompleted(Err("connection reset".into())));
    assert_eq!(
        effects,
        vec![GalleryEffect::Notify(Notice::error(
            "Failed to move images. Please try again."
        ))]
    );
    assert_eq!(state.card_count(), 4);
}

#[test]
fn deleting_everything_reloads_the_view() {
    init_logging();
    let (state, _) = update(with_selection(&PATHS), GalleryMsg::DeleteClicked);
    let (state, _) = update(state, GalleryMsg::DeleteConfirmationChanged("DELETE".into()));
    let (state, effects) = update(state, GalleryMsg::ConfirmDeleteClicked);
    let all: Vec<String> = PATHS.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        effects,
        vec![GalleryEffect::DeleteImages(DeleteRequest {
            images: all.clone(),
            folder: "cats".into(),
        })]
    );

    let (state, effects) = update(
        state,
        GalleryMsg::DeleteCompleted(Ok(DeleteResponse {
            status: "success".into(),
            deleted_count: 4,
            message: None,
        })),
    );
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], GalleryEffect::Notify(Notice::success("Successfully deleted 4 images")));
    assert!(state.view().dialog.is_none());

    let (state, effects) = update(state, GalleryMsg::CardsFaded(all.clone()));
    assert_eq!(
        effects,
        vec![GalleryEffect::ReloadView {
            delay: EMPTY_GRID_RELOAD_DELAY
        }]
    );
    assert!(state.view().reload_pending);

    let (_state, effects) = update(state, GalleryMsg::CardsFaded(all));
    assert!(effects.is_empty());
}

#[test]
fn delete_transport_failure_is_a_toast() {
    init_logging();
    let (state, _) = update(with_selection(&["cats/a.jpg"]), GalleryMsg::DeleteClicked);
    let (state, _) = update(state, GalleryMsg::DeleteConfirmationChanged("Delete".into()));
    let (state, _) = update(state, GalleryMsg::ConfirmDeleteClicked);
    assert!(state.pending_delete().is_some());

    let (state, effects) = update(state, GalleryMsg::DeleteCompleted(Err("timeout".into())));
    match effects.as_slice() {
        [GalleryEffect::Notify(notice)] => assert_eq!(notice.kind, NoticeKind::Error),
        other => panic!("unexpected effects {other:?}"),
    }
    assert!(state.pending_delete().is_none());
    assert_eq!(state.selection().len(), 1);
}

#[test]
fn dismissed_dialog_still_applies_late_success() {
    init_logging();
    let (state, _) = update(with_selection(&["cats/a.jpg"]), GalleryMsg::DeleteClicked);
    let (state, _) = update(state, GalleryMsg::DeleteConfirmationChanged("DELETE".into()));
    let (state, _) = update(state, GalleryMsg::ConfirmDeleteClicked);
    let (state, _) = update(state, GalleryMsg::DialogDismissed);

    let (state, effects) = update(
        state,
        GalleryMsg::DeleteCompleted(Ok(DeleteResponse {
            status: "success".into(),
            deleted_count: 1,
            message: None,
        })),
    );
    assert_eq!(effects.len(), 2);
    assert!(state.selection().is_empty());
}
