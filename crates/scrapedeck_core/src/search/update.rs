use deck_logging::{deck_debug, deck_error, deck_info, deck_warn};

use super::state::StreamOutcome;
use super::{SearchEffect, SearchMsg, SearchState};
use crate::notice::Notice;
use crate::table::parse_images_per_class;

const MISSING_ENTRIES: &str = "Please add at least one complete keyword/class name pair.";
const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SearchState, msg: SearchMsg) -> (SearchState, Vec<SearchEffect>) {
    let effects = match msg {
        SearchMsg::PageLoaded => vec![SearchEffect::CheckInitialStatus],
        SearchMsg::InitialStatusLoaded(Ok(status)) => {
            if status.is_running {
                deck_info!("Scraping already in progress, showing progress section");
                start_monitoring(&mut state)
            } else {
                Vec::new()
            }
        }
        SearchMsg::InitialStatusLoaded(Err(err)) => {
            deck_info!("Could not check initial scraping status: {}", err);
            Vec::new()
        }
        SearchMsg::AddRowClicked => {
            let id = state.table_mut().add_row();
            deck_debug!("Added row {}", id);
            Vec::new()
        }
        SearchMsg::DeleteRowClicked(row) => match state.table_mut().delete_row(row) {
            Ok(()) => {
                deck_debug!("Deleted row {}", row);
                Vec::new()
            }
            Err(err) => vec![SearchEffect::Notify(Notice::warning(err.to_string()))],
        },
        SearchMsg::RowEdited { row, field, value } => {
            if let Err(err) = state.table_mut().set_field(row, field, value) {
                deck_warn!("Edit dropped: {}", err);
            }
            Vec::new()
        }
        SearchMsg::ImagesPerClassChanged(value) => {
            state.set_images_per_class(value);
            Vec::new()
        }
        SearchMsg::DestinationChanged(value) => {
            state.set_destination_folder(value);
            Vec::new()
        }
        SearchMsg::StartClicked => start_clicked(&mut state),
        SearchMsg::SubmitCompleted(result) => submit_completed(&mut state, result),
        SearchMsg::StatusPolled(Ok(status)) => {
            if state.apply_status(&status) {
                vec![SearchEffect::StopPolling, SearchEffect::CloseLogStream]
            } else {
                Vec::new()
            }
        }
        SearchMsg::StatusPolled(Err(err)) => {
            state.record_poll_failure(&err);
            Vec::new()
        }
        SearchMsg::LogStreamOpened => {
            state.mark_stream_opened();
            Vec::new()
        }
        SearchMsg::LogPayload(payload) => stream_outcome(state.apply_stream_payload(&payload)),
        SearchMsg::LogStreamFailed(err) => {
            if state.is_stream_active() {
                stream_outcome(state.stream_error(err))
            } else {
                Vec::new()
            }
        }
        SearchMsg::ToggleLogsClicked => {
            state.toggle_logs();
            Vec::new()
        }
        SearchMsg::DownloadLogsClicked => {
            if state.log_actions_enabled() {
                vec![SearchEffect::DownloadLogs]
            } else {
                Vec::new()
            }
        }
        SearchMsg::ClearLogsConfirmed => {
            if state.log_actions_enabled() {
                vec![SearchEffect::ClearLogs]
            } else {
                Vec::new()
            }
        }
        SearchMsg::LogsCleared(Ok(response)) => {
            if response.is_success() {
                state.clear_log_lines();
            } else {
                deck_error!(
                    "Error clearing logs: {}",
                    response.message.as_deref().unwrap_or(UNKNOWN_ERROR)
                );
            }
            Vec::new()
        }
        SearchMsg::LogsCleared(Err(err)) => {
            deck_error!("Error clearing logs: {}", err);
            Vec::new()
        }
        SearchMsg::ResetClicked => {
            deck_info!("Resetting to form view");
            state.reset_to_form();
            vec![SearchEffect::CloseLogStream, SearchEffect::StopPolling]
        }
        SearchMsg::PageLeft => {
            state.deactivate();
            vec![SearchEffect::StopPolling, SearchEffect::CloseLogStream]
        }
        SearchMsg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_clicked(state: &mut SearchState) -> Vec<SearchEffect> {
    if state.is_submitting() || state.poll_state() != super::PollState::Idle {
        return Vec::new();
    }

    let report = state.table().validate(state.images_per_class());
    let missing_entries = report.missing_entries();
    let valid = report.is_valid();
    state.set_validation(report.field_errors, report.images_per_class_error);

    if !valid {
        deck_info!("Bulk search validation failed");
        return if missing_entries {
            vec![SearchEffect::Notify(Notice::warning(MISSING_ENTRIES))]
        } else {
            Vec::new()
        };
    }

    // validate() already accepted the value.
    let Some(images_per_class) = parse_images_per_class(state.images_per_class()) else {
        return Vec::new();
    };
    let request = state
        .table()
        .collect(images_per_class, state.destination_folder());
    deck_info!(
        "Submitting bulk search with {} entries, {} images per class",
        request.search_entries.len(),
        request.images_per_class
    );
    state.begin_submit();
    vec![SearchEffect::SubmitBulkSearch(request)]
}

fn submit_completed(
    state: &mut SearchState,
    result: Result<crate::protocol::SubmitResponse, String>,
) -> Vec<SearchEffect> {
    if !state.is_submitting() {
        deck_debug!("Ignoring submit response with no submission pending");
        return Vec::new();
    }

    match result {
        Ok(response) if response.is_success() => {
            deck_info!("Bulk search started successfully");
            start_monitoring(state)
        }
        Ok(response) if response.is_already_running() => {
            deck_info!("Scraping already in progress, showing progress section");
            start_monitoring(state)
        }
        Ok(response) => {
            let message = response.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            deck_warn!("Bulk search failed: {}", message);
            state.end_submit();
            vec![SearchEffect::Notify(Notice::error(format!("Error: {message}")))]
        }
        Err(err) => {
            deck_error!("Request failed: {}", err);
            state.end_submit();
            vec![SearchEffect::Notify(Notice::error(format!("Error: {err}")))]
        }
    }
}

fn start_monitoring(state: &mut SearchState) -> Vec<SearchEffect> {
    if !state.start_monitoring() {
        return Vec::new();
    }
    vec![
        SearchEffect::StartPolling {
            period: state.settings().poll_interval,
        },
        SearchEffect::OpenLogStream,
    ]
}

fn stream_outcome(outcome: StreamOutcome) -> Vec<SearchEffect> {
    match outcome {
        StreamOutcome::Appended | StreamOutcome::Ignored => Vec::new(),
        StreamOutcome::SurfaceError(message) => vec![SearchEffect::Notify(Notice::warning(
            format!("Log stream error: {message}"),
        ))],
    }
}
