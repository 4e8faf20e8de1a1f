//! ScrapeDeck client: HTTP and push-stream I/O against the scraping backend,
//! and the background handle that executes controller effects.
mod api;
mod handle;
mod monitor;
mod persist;
mod sse;
mod types;

pub use api::{
    disposition_filename, ApiSettings, ByteStream, LogDownload, ReqwestApi, ScrapeApi,
    DELETE_PATH, FOLDERS_PATH, LOG_CLEAR_PATH, LOG_DOWNLOAD_PATH, LOG_STREAM_PATH, MOVE_PATH,
    REQUESTED_WITH, STATUS_PATH, SUBMIT_PATH,
};
pub use handle::{download_logs, ClientCommand, ClientHandle, DEFAULT_LOG_FILENAME};
pub use monitor::{run_log_stream, run_poller, ChannelEventSink, EventSink};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sse::SseDecoder;
pub use types::{ApiError, ClientEvent, FailureKind};
