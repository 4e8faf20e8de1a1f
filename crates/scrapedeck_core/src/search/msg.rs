use crate::protocol::{JobStatus, StatusResponse, SubmitResponse};
use crate::table::{RowField, RowId};

/// Inputs to the bulk-search controller.
///
/// Results of client work arrive as `Result<_, String>` so the controller
/// never depends on the transport's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMsg {
    /// Page became active; triggers the one-off running-job check.
    PageLoaded,
    /// Answer to the page-load status check.
    InitialStatusLoaded(Result<JobStatus, String>),
    AddRowClicked,
    DeleteRowClicked(RowId),
    RowEdited {
        row: RowId,
        field: RowField,
        value: String,
    },
    ImagesPerClassChanged(String),
    DestinationChanged(String),
    StartClicked,
    SubmitCompleted(Result<SubmitResponse, String>),
    /// One tick of the status poller.
    StatusPolled(Result<JobStatus, String>),
    LogStreamOpened,
    /// Raw `data` payload of one push-stream message.
    LogPayload(String),
    LogStreamFailed(String),
    ToggleLogsClicked,
    DownloadLogsClicked,
    /// User confirmed the "clear all logs" prompt.
    ClearLogsConfirmed,
    LogsCleared(Result<StatusResponse, String>),
    /// "New search": back to the form.
    ResetClicked,
    /// Page is being torn down.
    PageLeft,
    NoOp,
}
