//! One function per subcommand, each scripting the page controllers the way
//! a user would click through them.

use std::path::PathBuf;
use std::process::ExitCode;

use deck_logging::{deck_info, deck_warn};
use scrapedeck_client::{ClientCommand, ClientEvent};
use scrapedeck_core::gallery::{GalleryMsg, ImageCard};
use scrapedeck_core::search::{PollState, SearchMsg};
use scrapedeck_core::RowField;

use super::app::App;
use super::effects::{AppMsg, EffectRunner};
use crate::cli::{ImagesAction, ImagesArgs, LogsAction, SearchArgs, WatchArgs};

pub fn search(app: &mut App, args: SearchArgs) -> ExitCode {
    for (index, entry) in args.entries.into_iter().enumerate() {
        if index > 0 {
            app.dispatch(AppMsg::Search(SearchMsg::AddRowClicked));
        }
        let Some(row) = app.search().table().rows().last().map(|row| row.id) else {
            break;
        };
        for (field, value) in [
            (RowField::Keyword, entry.keyword),
            (RowField::ClassName, entry.class_name),
            (RowField::DestinationFolder, entry.destination),
        ] {
            app.dispatch(AppMsg::Search(SearchMsg::RowEdited { row, field, value }));
        }
    }
    app.dispatch(AppMsg::Search(SearchMsg::ImagesPerClassChanged(
        args.images_per_class,
    )));
    app.dispatch(AppMsg::Search(SearchMsg::DestinationChanged(args.destination)));

    app.dispatch(AppMsg::Search(SearchMsg::StartClicked));
    if !app.search().is_submitting() {
        // Validation failed; the reasons are already on screen.
        return ExitCode::FAILURE;
    }
    app.run_until(|app| !app.search().is_submitting());
    if app.search().poll_state() == PollState::Idle {
        return ExitCode::FAILURE;
    }

    follow_job(app, args.save_logs)
}

pub fn watch(app: &mut App, args: WatchArgs) -> ExitCode {
    app.dispatch(AppMsg::Search(SearchMsg::PageLoaded));
    app.run_until(App::is_idle);
    if app.search().poll_state() == PollState::Idle {
        println!("No scraping job is running.");
        return ExitCode::SUCCESS;
    }
    follow_job(app, args.save_logs)
}

fn follow_job(app: &mut App, save_logs: Option<PathBuf>) -> ExitCode {
    app.run_until(|app| app.search().poll_state() == PollState::Completed);

    if let Some(dir) = save_logs {
        if app.search().view().log_actions_enabled {
            app.runner_mut().set_download_dir(dir);
            app.dispatch(AppMsg::Search(SearchMsg::DownloadLogsClicked));
            app.run_until(App::is_idle);
        } else {
            deck_warn!("Log stream never connected, not saving logs");
            eprintln!("The log stream never connected; use `scrapedeck logs download` instead.");
        }
    }

    app.dispatch(AppMsg::Search(SearchMsg::PageLeft));
    exit_code(app)
}

pub fn images(app: &mut App, args: ImagesArgs) -> ExitCode {
    let paths = match &args.action {
        ImagesAction::Move { images, .. } | ImagesAction::Delete { images, .. } => images.clone(),
    };
    let cards = paths
        .iter()
        .map(|path| {
            let filename = path.rsplit('/').next().unwrap_or(path.as_str());
            ImageCard::new(filename, path.clone())
        })
        .collect();

    app.dispatch(AppMsg::Gallery(GalleryMsg::PageLoaded {
        folder: args.folder.clone(),
        images: cards,
    }));
    for path in paths {
        app.dispatch(AppMsg::Gallery(GalleryMsg::CheckboxSet {
            path,
            checked: true,
        }));
    }
    // Lets the folder list arrive before the dialog opens.
    app.run_until(App::is_idle);

    match args.action {
        ImagesAction::Move { to, create, .. } => {
            app.dispatch(AppMsg::Gallery(GalleryMsg::MoveClicked));
            if create {
                app.dispatch(AppMsg::Gallery(GalleryMsg::CreateNewToggled(true)));
                app.dispatch(AppMsg::Gallery(GalleryMsg::NewFolderNameChanged(to)));
            } else {
                let folders = app.gallery().available_folders();
                if !folders.is_empty() && !folders.contains(&to) {
                    eprintln!("{to:?} is not an existing folder; pass --create to make it.");
                    return ExitCode::FAILURE;
                }
                app.dispatch(AppMsg::Gallery(GalleryMsg::DestinationSelected(to)));
            }
            app.dispatch(AppMsg::Gallery(GalleryMsg::ConfirmMoveClicked));
            if app.gallery().pending_move().is_none() {
                return ExitCode::FAILURE;
            }
        }
        ImagesAction::Delete { confirm, .. } => {
            app.dispatch(AppMsg::Gallery(GalleryMsg::DeleteClicked));
            app.dispatch(AppMsg::Gallery(GalleryMsg::DeleteConfirmationChanged(confirm)));
            app.dispatch(AppMsg::Gallery(GalleryMsg::ConfirmDeleteClicked));
            if app.gallery().pending_delete().is_none() {
                return ExitCode::FAILURE;
            }
        }
    }

    app.run_until(App::is_idle);
    exit_code(app)
}

/// Log maintenance needs no page controller; one request, one answer.
pub fn logs(runner: &mut EffectRunner, action: LogsAction) -> ExitCode {
    match action {
        LogsAction::Download { dir } => match runner.call(ClientCommand::DownloadLogs { dir }) {
            Some(ClientEvent::LogsDownloaded(Ok(path))) => {
                println!("Logs saved to {}", path.display());
                ExitCode::SUCCESS
            }
            Some(ClientEvent::LogsDownloaded(Err(err))) => {
                eprintln!("Failed to download logs: {err}");
                ExitCode::FAILURE
            }
            _ => ExitCode::FAILURE,
        },
        LogsAction::Clear { yes: false } => {
            eprintln!("This clears the backend's log for good; pass --yes to confirm.");
            ExitCode::FAILURE
        }
        LogsAction::Clear { yes: true } => match runner.call(ClientCommand::ClearLogs) {
            Some(ClientEvent::LogsCleared(Ok(response))) if response.is_success() => {
                deck_info!("Backend log cleared");
                println!("Logs cleared");
                ExitCode::SUCCESS
            }
            Some(ClientEvent::LogsCleared(Ok(response))) => {
                eprintln!(
                    "Error clearing logs: {}",
                    response.message.as_deref().unwrap_or("unknown error")
                );
                ExitCode::FAILURE
            }
            Some(ClientEvent::LogsCleared(Err(err))) => {
                eprintln!("Error clearing logs: {err}");
                ExitCode::FAILURE
            }
            _ => ExitCode::FAILURE,
        },
    }
}

fn exit_code(app: &App) -> ExitCode {
    if app.errors() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
