use std::fmt;
use std::path::PathBuf;

use scrapedeck_core::protocol::{
    DeleteResponse, FoldersResponse, JobStatus, MoveResponse, StatusResponse, SubmitResponse,
};

/// Results reported back by the client's background tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    InitialStatus(Result<JobStatus, ApiError>),
    StatusPolled(Result<JobStatus, ApiError>),
    SubmitCompleted(Result<SubmitResponse, ApiError>),
    LogStreamOpened,
    /// `data` payload of one server-sent event, not yet parsed.
    LogPayload(String),
    LogStreamFailed(ApiError),
    LogsCleared(Result<StatusResponse, ApiError>),
    LogsDownloaded(Result<PathBuf, ApiError>),
    FoldersLoaded(Result<FoldersResponse, ApiError>),
    MoveCompleted(Result<MoveResponse, ApiError>),
    DeleteCompleted(Result<DeleteResponse, ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            // Matches what the page shows for a rejected submit.
            FailureKind::HttpStatus(code) => write!(f, "HTTP error! status: {code}"),
            kind => write!(f, "{kind}: {}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
