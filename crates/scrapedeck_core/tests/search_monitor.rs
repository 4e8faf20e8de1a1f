use std::sync::Once;

use pretty_assertions::assert_eq;
use scrapedeck_core::protocol::{JobStatus, StatusResponse};
use scrapedeck_core::search::{
    update, LogLine, PollState, ProgressMode, SearchEffect, SearchMsg, SearchSettings,
    SearchState, Section, StreamErrorPolicy,
};
use scrapedeck_core::Notice;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(deck_logging::initialize_for_tests);
}

fn monitoring(settings: SearchSettings) -> SearchState {
    let (state, effects) = update(
        SearchState::new(settings),
        SearchMsg::InitialStatusLoaded(Ok(running("Initializing scraper..."))),
    );
    assert_eq!(effects.len(), 2);
    let (state, _) = update(state, SearchMsg::LogStreamOpened);
    state
}

fn running(progress: &str) -> JobStatus {
    JobStatus {
        is_running: true,
        progress: progress.to_string(),
    }
}

fn finished(progress: &str) -> JobStatus {
    JobStatus {
        is_running: false,
        progress: progress.to_string(),
    }
}

fn log_payload(level: &str, text: &str) -> SearchMsg {
    SearchMsg::LogPayload(format!(
        r#"{{"type":"log","level":"{level}","formatted":"{text}"}}"#
    ))
}

#[test]
fn completion_fires_exactly_once() {
    init_logging();
    let state = monitoring(SearchSettings::default());

    let (state, effects) = update(state, SearchMsg::StatusPolled(Ok(running("Downloading 3/10"))));
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.progress_mode, ProgressMode::Running);
    assert_eq!(view.progress_text, "Downloading 3/10");
    assert!(!view.completion_visible);

    let (state, effects) = update(
        state,
        SearchMsg::StatusPolled(Ok(finished("Completed! Downloaded 10 images."))),
    );
    assert_eq!(
        effects,
        vec![SearchEffect::StopPolling, SearchEffect::CloseLogStream]
    );
    assert_eq!(state.poll_state(), PollState::Completed);
    assert!(!state.is_stream_active());
    let view = state.view();
    assert!(view.completion_visible);
    assert!(!view.spinner_visible);
    assert_eq!(view.progress_mode, ProgressMode::Completed);
    assert_eq!(view.progress_text, "Completed!");
    assert_eq!(view.status_text, "Completed! Downloaded 10 images.");

    // A late tick that was already in flight changes nothing.
    let (state, effects) = update(state, SearchMsg::StatusPolled(Ok(finished("late"))));
    assert!(effects.is_empty());
    let (state, effects) = update(state, SearchMsg::StatusPolled(Ok(running("stale"))));
    assert!(effects.is_empty());
    assert_eq!(state.poll_state(), PollState::Completed);
    assert_eq!(state.view().progress_mode, ProgressMode::Completed);
}

#[test]
fn poll_failures_keep_polling_and_flag_lost_connection() {
    init_logging();
    let settings = SearchSettings {
        max_poll_failures: 3,
        ..SearchSettings::default()
    };
    let mut state = monitoring(settings);

    for attempt in 1..=3 {
        let (next, effects) = update(state, SearchMsg::StatusPolled(Err("timed out".into())));
        assert!(effects.is_empty());
        assert_eq!(next.poll_state(), PollState::Polling);
        assert_eq!(next.view().connection_lost, attempt >= 3);
        state = next;
    }

    let (state, _) = update(state, SearchMsg::StatusPolled(Ok(running("back"))));
    assert_eq!(state.consecutive_poll_failures(), 0);
    assert!(!state.view().connection_lost);
}

#[test]
fn log_lines_append_in_arrival_order_without_dedupe() {
    init_logging();
    let state = monitoring(SearchSettings::default());
    assert_eq!(state.view().log_placeholder, Some("Waiting for logs..."));
    assert!(state.view().log_actions_enabled);

    let (state, _) = update(state, log_payload("INFO", "second"));
    let (state, _) = update(state, log_payload("INFO", "first"));
    let (state, _) = update(state, log_payload("INFO", "first"));
    let (state, _) = update(state, log_payload("WARNING", "slow"));

    let texts: Vec<_> = state
        .log_lines()
        .iter()
        .map(|l| l.formatted.as_str())
        .collect();
    assert_eq!(texts, vec!["second", "first", "first", "slow"]);
    assert_eq!(
        state.log_lines()[3],
        LogLine {
            level: "WARNING".into(),
            formatted: "slow".into()
        }
    );
    let view = state.view();
    assert_eq!(view.log_count, 4);
    assert_eq!(view.log_placeholder, None);
}

#[test]
fn long_log_history_is_counted_not_copied_into_the_view() {
    init_logging();
    let mut state = monitoring(SearchSettings::default());
    for n in 0..5000 {
        let (next, _) = update(state, log_payload("INFO", &format!("line {n}")));
        state = next;
        if n % 1000 == 999 {
            assert!(state.consume_dirty());
            assert_eq!(state.view().log_count, n + 1);
        }
    }

    assert_eq!(state.log_lines().len(), 5000);
    assert_eq!(state.log_lines()[0].formatted, "line 0");
    assert_eq!(state.log_lines()[4999].formatted, "line 4999");
    assert_eq!(state.view().log_placeholder, None);
}

#[test]
fn malformed_and_control_payloads_do_not_stop_the_stream() {
    init_logging();
    let state = monitoring(SearchSettings::default());

    let (state, effects) = update(state, SearchMsg::LogPayload("{not json".into()));
    assert!(effects.is_empty());
    let (state, effects) = update(state, SearchMsg::LogPayload(r#"{"type":"complete"}"#.into()));
    assert!(effects.is_empty());
    assert_eq!(state.poll_state(), PollState::Polling);
    let (state, effects) = update(
        state,
        SearchMsg::LogPayload(r#"{"type":"error","message":"queue closed"}"#.into()),
    );
    assert!(effects.is_empty());

    let (state, _) = update(state, log_payload("INFO", "still here"));
    assert!(state.is_stream_active());
    assert_eq!(state.log_lines().len(), 1);
}

#[test]
fn surface_policy_turns_stream_errors_into_notices() {
    init_logging();
    let settings = SearchSettings {
        stream_error_policy: StreamErrorPolicy::Surface,
        ..SearchSettings::default()
    };
    let state = monitoring(settings);

    let (state, effects) = update(
        state,
        SearchMsg::LogPayload(r#"{"type":"error","message":"queue closed"}"#.into()),
    );
    assert_eq!(
        effects,
        vec![SearchEffect::Notify(Notice::warning(
            "Log stream error: queue closed"
        ))]
    );
    let (_state, effects) = update(state, SearchMsg::LogStreamFailed("reset by peer".into()));
    assert_eq!(effects.len(), 1);
}

#[test]
fn payloads_after_close_are_dropped() {
    init_logging();
    let state = monitoring(SearchSettings::default());
    let (state, _) = update(state, SearchMsg::StatusPolled(Ok(finished("done"))));
    let (state, _) = update(state, log_payload("INFO", "late"));
    assert!(state.log_lines().is_empty());
}

#[test]
fn log_panel_actions() {
    init_logging();
    let (state, effects) = update(SearchState::default(), SearchMsg::DownloadLogsClicked);
    assert!(effects.is_empty(), "buttons stay disabled before the stream opens");

    let state = monitoring(SearchSettings::default());
    let (state, _) = update(state, SearchMsg::ToggleLogsClicked);
    assert!(state.view().logs_visible);
    let (state, effects) = update(state, SearchMsg::DownloadLogsClicked);
    assert_eq!(effects, vec![SearchEffect::DownloadLogs]);

    let (state, _) = update(state, log_payload("INFO", "one"));
    let (state, effects) = update(state, SearchMsg::ClearLogsConfirmed);
    assert_eq!(effects, vec![SearchEffect::ClearLogs]);

    let (state, _) = update(
        state,
        SearchMsg::LogsCleared(Ok(StatusResponse {
            status: "error".into(),
            message: None,
        })),
    );
    assert_eq!(state.log_lines().len(), 1);

    let (state, _) = update(
        state,
        SearchMsg::LogsCleared(Ok(StatusResponse {
            status: "success".into(),
            message: None,
        })),
    );
    let view = state.view();
    assert_eq!(view.log_count, 0);
    assert_eq!(view.log_placeholder, Some("Logs cleared"));
}

#[test]
fn reset_returns_to_form_and_closes_resources() {
    init_logging();
    let state = monitoring(SearchSettings::default());
    let old_row = state.table().rows()[0].id;
    let (state, _) = update(state, log_payload("INFO", "one"));

    let (mut state, effects) = update(state, SearchMsg::ResetClicked);
    assert_eq!(
        effects,
        vec![SearchEffect::CloseLogStream, SearchEffect::StopPolling]
    );
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.section, Section::Form);
    assert_eq!(view.images_per_class, "100");
    assert_eq!(view.log_count, 0);
    assert!(!view.log_actions_enabled);
    assert_eq!(view.rows.len(), 1);
    assert!(view.rows[0].id > old_row);

    // A fresh session can be started again afterwards.
    let (state, effects) = update(
        state,
        SearchMsg::InitialStatusLoaded(Ok(running("again"))),
    );
    assert_eq!(effects.len(), 2);
    assert_eq!(state.poll_state(), PollState::Polling);
}

#[test]
fn leaving_the_page_tears_down_timer_and_stream() {
    init_logging();
    let state = monitoring(SearchSettings::default());
    let (state, effects) = update(state, SearchMsg::PageLeft);
    assert_eq!(
        effects,
        vec![SearchEffect::StopPolling, SearchEffect::CloseLogStream]
    );
    assert!(!state.is_stream_active());
}
