//! JSON payloads exchanged with the scraping backend.
//!
//! Field names follow the backend's wire format exactly, which is why a few
//! of them are camelCase.

use serde::{Deserialize, Serialize};

/// Status string the backend uses for successful operations.
pub const STATUS_SUCCESS: &str = "success";

/// Marker in a submit error meaning another job already owns the backend.
pub const ALREADY_IN_PROGRESS: &str = "already in progress";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub keyword: String,
    #[serde(rename = "className")]
    pub class_name: String,
    #[serde(rename = "destinationFolder")]
    pub destination_folder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSearchRequest {
    pub search_entries: Vec<SearchEntry>,
    pub images_per_class: u32,
    pub destination_folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubmitResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// A rejection because a job is already running counts as a start.
    pub fn is_already_running(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|message| message.contains(ALREADY_IN_PROGRESS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobStatus {
    pub is_running: bool,
    #[serde(default)]
    pub progress: String,
}

/// One message from the log push stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogEvent {
    Log { level: String, formatted: String },
    Complete,
    Error {
        #[serde(default)]
        message: String,
    },
}

impl LogEvent {
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Generic `{status, message?}` reply, used by the log-clear endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoldersResponse {
    pub status: String,
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub images: Vec<String>,
    pub destination_folder: String,
    pub source_folder: String,
    pub create_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveResponse {
    pub status: String,
    #[serde(default)]
    pub moved_count: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub images: Vec<String>,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    #[serde(default)]
    pub deleted_count: u32,
    #[serde(default)]
    pub message: Option<String>,
}
