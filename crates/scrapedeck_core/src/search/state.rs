use std::time::Duration;

use deck_logging::{deck_debug, deck_error, deck_info, deck_warn};

use super::effect::StreamErrorPolicy;
use super::view_model::{LogLine, ProgressMode, RowView, SearchViewModel, Section};
use crate::protocol::{JobStatus, LogEvent};
use crate::table::{FieldError, RowField, SearchTable, DEFAULT_IMAGES_PER_CLASS};

const WAITING_FOR_LOGS: &str = "Waiting for logs...";
const LOGS_CLEARED: &str = "Logs cleared";
const INITIAL_PROGRESS: &str = "Initializing...";
const INITIAL_STATUS: &str = "Preparing to start bulk scraping...";
const COMPLETED_PROGRESS: &str = "Completed!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub poll_interval: Duration,
    /// Consecutive poll failures before the view reports a lost connection.
    pub max_poll_failures: u32,
    pub stream_error_policy: StreamErrorPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_poll_failures: 10,
            stream_error_policy: StreamErrorPolicy::default(),
        }
    }
}

/// Lifecycle of the job monitor. Only moves forward until a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    Completed,
}

/// What a single stream payload turned out to be.
pub(crate) enum StreamOutcome {
    Appended,
    Ignored,
    /// The stream reported an error and the policy wants it shown.
    SurfaceError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    settings: SearchSettings,
    table: SearchTable,
    images_per_class: String,
    destination_folder: String,
    field_errors: Vec<FieldError>,
    images_per_class_error: Option<&'static str>,
    submitting: bool,
    poll: PollState,
    progress_text: String,
    status_text: String,
    progress_mode: ProgressMode,
    consecutive_poll_failures: u32,
    stream_active: bool,
    log_lines: Vec<LogLine>,
    log_placeholder: &'static str,
    logs_visible: bool,
    log_actions_enabled: bool,
    dirty: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

impl SearchState {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            table: SearchTable::new(),
            images_per_class: DEFAULT_IMAGES_PER_CLASS.to_string(),
            destination_folder: String::new(),
            field_errors: Vec::new(),
            images_per_class_error: None,
            submitting: false,
            poll: PollState::Idle,
            progress_text: INITIAL_PROGRESS.to_string(),
            status_text: INITIAL_STATUS.to_string(),
            progress_mode: ProgressMode::Pending,
            consecutive_poll_failures: 0,
            stream_active: false,
            log_lines: Vec::new(),
            log_placeholder: WAITING_FOR_LOGS,
            logs_visible: false,
            log_actions_enabled: false,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn table(&self) -> &SearchTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut SearchTable {
        self.dirty = true;
        &mut self.table
    }

    pub fn poll_state(&self) -> PollState {
        self.poll
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_stream_active(&self) -> bool {
        self.stream_active
    }

    pub fn images_per_class(&self) -> &str {
        &self.images_per_class
    }

    pub fn destination_folder(&self) -> &str {
        &self.destination_folder
    }

    pub fn consecutive_poll_failures(&self) -> u32 {
        self.consecutive_poll_failures
    }

    pub fn connection_lost(&self) -> bool {
        self.consecutive_poll_failures >= self.settings.max_poll_failures
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> SearchViewModel {
        let rows = self
            .table
            .rows()
            .iter()
            .map(|row| RowView {
                id: row.id,
                keyword: row.keyword.clone(),
                class_name: row.class_name.clone(),
                destination_folder: row.destination_folder.clone(),
                invalid: self
                    .field_errors
                    .iter()
                    .filter(|error| error.row == row.id)
                    .map(|error| error.field)
                    .collect::<Vec<RowField>>(),
            })
            .collect();

        let section = match self.poll {
            PollState::Idle => Section::Form,
            PollState::Polling | PollState::Completed => Section::Progress,
        };

        SearchViewModel {
            section,
            rows,
            images_per_class: self.images_per_class.clone(),
            images_per_class_error: self.images_per_class_error,
            destination_folder: self.destination_folder.clone(),
            start_enabled: !self.submitting,
            start_label: if self.submitting {
                "Starting Bulk Search..."
            } else {
                "Start Bulk Search"
            },
            progress_text: self.progress_text.clone(),
            status_text: self.status_text.clone(),
            progress_mode: self.progress_mode,
            spinner_visible: self.poll == PollState::Polling,
            completion_visible: self.poll == PollState::Completed,
            connection_lost: self.connection_lost(),
            log_count: self.log_lines.len(),
            log_placeholder: self.log_lines.is_empty().then_some(self.log_placeholder),
            logs_visible: self.logs_visible,
            log_actions_enabled: self.log_actions_enabled,
            dirty: self.dirty,
        }
    }

    /// Every log line received since the stream opened or was last cleared.
    pub fn log_lines(&self) -> &[LogLine] {
        &self.log_lines
    }

    pub(crate) fn set_images_per_class(&mut self, value: String) {
        self.images_per_class = value;
        self.dirty = true;
    }

    pub(crate) fn set_destination_folder(&mut self, value: String) {
        self.destination_folder = value;
        self.dirty = true;
    }

    pub(crate) fn set_validation(
        &mut self,
        field_errors: Vec<FieldError>,
        images_per_class_error: Option<&'static str>,
    ) {
        self.field_errors = field_errors;
        self.images_per_class_error = images_per_class_error;
        self.dirty = true;
    }

    pub(crate) fn begin_submit(&mut self) {
        self.submitting = true;
        self.dirty = true;
    }

    pub(crate) fn end_submit(&mut self) {
        self.submitting = false;
        self.dirty = true;
    }

    /// Idle -> Polling. Returns false if monitoring was already under way.
    pub(crate) fn start_monitoring(&mut self) -> bool {
        if self.poll != PollState::Idle {
            return false;
        }
        deck_info!("Starting progress monitoring");
        self.poll = PollState::Polling;
        self.submitting = false;
        self.consecutive_poll_failures = 0;
        self.stream_active = true;
        self.dirty = true;
        true
    }

    /// Applies one status response. Returns true exactly once: on the
    /// response that completes the job.
    pub(crate) fn apply_status(&mut self, status: &JobStatus) -> bool {
        if self.poll != PollState::Polling {
            deck_debug!("Ignoring status response while {:?}", self.poll);
            return false;
        }

        if self.consecutive_poll_failures > 0 {
            deck_info!(
                "Status poll recovered after {} failures",
                self.consecutive_poll_failures
            );
        }
        self.consecutive_poll_failures = 0;
        self.dirty = true;

        if !status.progress.is_empty() {
            self.progress_text = status.progress.clone();
            self.status_text = status.progress.clone();
        }

        if status.is_running {
            self.progress_mode = ProgressMode::Running;
            return false;
        }

        deck_info!("Scraping completed, stopping progress monitoring");
        self.poll = PollState::Completed;
        self.progress_mode = ProgressMode::Completed;
        self.progress_text = COMPLETED_PROGRESS.to_string();
        self.stream_active = false;
        true
    }

    pub(crate) fn record_poll_failure(&mut self, error: &str) {
        if self.poll != PollState::Polling {
            return;
        }
        self.consecutive_poll_failures = self.consecutive_poll_failures.saturating_add(1);
        deck_warn!(
            "Error fetching progress ({} in a row): {}",
            self.consecutive_poll_failures,
            error
        );
        if self.consecutive_poll_failures == self.settings.max_poll_failures {
            deck_error!("Status endpoint unreachable, reporting connection lost");
            self.dirty = true;
        }
    }

    pub(crate) fn mark_stream_opened(&mut self) {
        if !self.stream_active {
            return;
        }
        deck_info!("Log stream connected");
        self.log_actions_enabled = true;
        self.dirty = true;
    }

    pub(crate) fn apply_stream_payload(&mut self, payload: &str) -> StreamOutcome {
        if !self.stream_active {
            deck_debug!("Dropping log payload received after the stream was closed");
            return StreamOutcome::Ignored;
        }

        match LogEvent::parse(payload) {
            Ok(LogEvent::Log { level, formatted }) => {
                self.log_lines.push(LogLine { level, formatted });
                self.dirty = true;
                StreamOutcome::Appended
            }
            Ok(LogEvent::Complete) => {
                deck_info!("Log streaming completed");
                StreamOutcome::Ignored
            }
            Ok(LogEvent::Error { message }) => self.stream_error(message),
            Err(err) => {
                deck_warn!("Error parsing log event: {}", err);
                StreamOutcome::Ignored
            }
        }
    }

    pub(crate) fn stream_error(&mut self, message: String) -> StreamOutcome {
        deck_error!("Log streaming error: {}", message);
        match self.settings.stream_error_policy {
            StreamErrorPolicy::SilentlyDegrade => StreamOutcome::Ignored,
            StreamErrorPolicy::Surface => StreamOutcome::SurfaceError(message),
        }
    }

    pub(crate) fn toggle_logs(&mut self) {
        self.logs_visible = !self.logs_visible;
        self.dirty = true;
    }

    pub(crate) fn log_actions_enabled(&self) -> bool {
        self.log_actions_enabled
    }

    pub(crate) fn clear_log_lines(&mut self) {
        self.log_lines.clear();
        self.log_placeholder = LOGS_CLEARED;
        self.dirty = true;
    }

    /// Puts everything back the way a fresh page shows it. Row ids keep
    /// counting.
    pub(crate) fn reset_to_form(&mut self) {
        self.table.reset();
        self.images_per_class = DEFAULT_IMAGES_PER_CLASS.to_string();
        self.destination_folder.clear();
        self.field_errors.clear();
        self.images_per_class_error = None;
        self.submitting = false;
        self.poll = PollState::Idle;
        self.progress_text = INITIAL_PROGRESS.to_string();
        self.status_text = INITIAL_STATUS.to_string();
        self.progress_mode = ProgressMode::Pending;
        self.consecutive_poll_failures = 0;
        self.stream_active = false;
        self.log_lines.clear();
        self.log_placeholder = WAITING_FOR_LOGS;
        self.logs_visible = false;
        self.log_actions_enabled = false;
        self.dirty = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.stream_active = false;
    }
}
