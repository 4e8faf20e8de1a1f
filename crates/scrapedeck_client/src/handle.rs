use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::monitor::{run_log_stream, run_poller, ChannelEventSink, EventSink};
use crate::persist::AtomicFileWriter;
use crate::{ApiError, ApiSettings, ClientEvent, FailureKind, ReqwestApi, ScrapeApi};
use deck_logging::{deck_debug, deck_info};
use scrapedeck_core::protocol::{BulkSearchRequest, DeleteRequest, MoveRequest};

pub const DEFAULT_LOG_FILENAME: &str = "scraping_logs.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    CheckStatus,
    Submit(BulkSearchRequest),
    /// Replaces any running poller.
    StartPolling { period: Duration },
    StopPolling,
    /// Replaces any open log stream.
    OpenLogStream,
    CloseLogStream,
    ClearLogs,
    DownloadLogs { dir: PathBuf },
    LoadFolders { current: String },
    MoveImages(MoveRequest),
    DeleteImages(DeleteRequest),
}

/// Runs API work on a background runtime.
///
/// Commands go in through [`ClientHandle::send`], results come back as
/// [`ClientEvent`]s. The poller and the log stream are owned by the
/// background thread alone; at most one of each is alive at a time.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let retry = settings.stream_retry;
        let api = ReqwestApi::new(settings)?;
        Self::with_api(Arc::new(api), retry)
    }

    pub fn with_api(api: Arc<dyn ScrapeApi>, stream_retry: Duration) -> Result<Self, ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
        let sink = Arc::new(ChannelEventSink::new(event_tx));

        thread::spawn(move || {
            let mut poller: Option<CancellationToken> = None;
            let mut log_stream: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    ClientCommand::StartPolling { period } => {
                        cancel(&mut poller);
                        let token = CancellationToken::new();
                        poller = Some(token.clone());
                        let (api, sink) = (api.clone(), sink.clone());
                        runtime.spawn(async move {
                            run_poller(api.as_ref(), sink.as_ref(), period, token).await;
                        });
                    }
                    ClientCommand::StopPolling => cancel(&mut poller),
                    ClientCommand::OpenLogStream => {
                        cancel(&mut log_stream);
                        let token = CancellationToken::new();
                        log_stream = Some(token.clone());
                        let (api, sink) = (api.clone(), sink.clone());
                        runtime.spawn(async move {
                            run_log_stream(api.as_ref(), sink.as_ref(), stream_retry, token).await;
                        });
                    }
                    ClientCommand::CloseLogStream => cancel(&mut log_stream),
                    command => {
                        let (api, sink) = (api.clone(), sink.clone());
                        runtime.spawn(async move {
                            handle_request(api.as_ref(), sink.as_ref(), command).await;
                        });
                    }
                }
            }

            cancel(&mut poller);
            cancel(&mut log_stream);
            deck_debug!("Client thread exiting");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, command: ClientCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn cancel(slot: &mut Option<CancellationToken>) {
    if let Some(token) = slot.take() {
        token.cancel();
    }
}

async fn handle_request(api: &dyn ScrapeApi, sink: &dyn EventSink, command: ClientCommand) {
    let event = match command {
        ClientCommand::CheckStatus => ClientEvent::InitialStatus(api.job_status().await),
        ClientCommand::Submit(request) => {
            ClientEvent::SubmitCompleted(api.submit_bulk_search(&request).await)
        }
        ClientCommand::ClearLogs => ClientEvent::LogsCleared(api.clear_logs().await),
        ClientCommand::DownloadLogs { dir } => {
            ClientEvent::LogsDownloaded(download_logs(api, dir).await)
        }
        ClientCommand::LoadFolders { current } => {
            ClientEvent::FoldersLoaded(api.folders(&current).await)
        }
        ClientCommand::MoveImages(request) => {
            ClientEvent::MoveCompleted(api.move_images(&request).await)
        }
        ClientCommand::DeleteImages(request) => {
            ClientEvent::DeleteCompleted(api.delete_images(&request).await)
        }
        ClientCommand::StartPolling { .. }
        | ClientCommand::StopPolling
        | ClientCommand::OpenLogStream
        | ClientCommand::CloseLogStream => return,
    };
    sink.emit(event);
}

/// Fetches the log file and stores it in `dir`.
pub async fn download_logs(api: &dyn ScrapeApi, dir: PathBuf) -> Result<PathBuf, ApiError> {
    let download = api.download_logs().await?;
    let filename = download
        .filename
        .unwrap_or_else(|| DEFAULT_LOG_FILENAME.to_string());
    let bytes = download.bytes;

    let path = tokio::task::spawn_blocking(move || {
        AtomicFileWriter::new(dir).write(&filename, &bytes)
    })
    .await
    .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?
    .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;

    deck_info!("Saved logs to {:?}", path);
    Ok(path)
}
