use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::protocol::BulkSearchRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    CheckInitialStatus,
    SubmitBulkSearch(BulkSearchRequest),
    StartPolling { period: Duration },
    StopPolling,
    OpenLogStream,
    CloseLogStream,
    ClearLogs,
    DownloadLogs,
    Notify(Notice),
}

/// What to do with `error` messages and failures of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StreamErrorPolicy {
    /// Log only; monitoring carries on as if nothing happened.
    #[default]
    SilentlyDegrade,
    /// Log and raise a warning notice.
    Surface,
}
