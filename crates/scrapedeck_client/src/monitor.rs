//! Long-running job monitor tasks: the status poller and the log stream.
//!
//! Both run until their `CancellationToken` fires. Cancelling twice, or
//! after the task ended on its own, is harmless.

use std::sync::mpsc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::sse::SseDecoder;
use crate::{ClientEvent, ScrapeApi};
use deck_logging::{deck_debug, deck_info, deck_warn};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

#[derive(Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Shortest period the poller accepts; `interval` cannot tick at zero.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

/// Fetches the job status every `period` until cancelled.
///
/// The first fetch happens one period after the start. Failures are reported
/// and the next tick simply tries again. A period below [`MIN_POLL_PERIOD`]
/// is raised to it.
pub async fn run_poller(
    api: &dyn ScrapeApi,
    sink: &dyn EventSink,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period.max(MIN_POLL_PERIOD));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval() fires immediately once.
    interval.tick().await;

    loop {
        if cancel.run_until_cancelled(interval.tick()).await.is_none() {
            break;
        }
        let Some(result) = cancel.run_until_cancelled(api.job_status()).await else {
            break;
        };
        sink.emit(ClientEvent::StatusPolled(result));
    }
    deck_debug!("Status poller stopped");
}

/// Keeps the log stream open, reconnecting after `retry` whenever it drops,
/// until cancelled. Events missed while disconnected are not replayed.
pub async fn run_log_stream(
    api: &dyn ScrapeApi,
    sink: &dyn EventSink,
    retry: Duration,
    cancel: CancellationToken,
) {
    loop {
        match cancel.run_until_cancelled(api.log_stream()).await {
            None => break,
            Some(Ok(mut stream)) => {
                deck_info!("Log stream connected");
                sink.emit(ClientEvent::LogStreamOpened);
                let mut decoder = SseDecoder::new();
                loop {
                    match cancel.run_until_cancelled(stream.next()).await {
                        None => {
                            deck_debug!("Log stream closed");
                            return;
                        }
                        Some(None) => {
                            deck_info!("Log stream ended by server");
                            break;
                        }
                        Some(Some(Ok(chunk))) => {
                            for payload in decoder.push(&chunk) {
                                sink.emit(ClientEvent::LogPayload(payload));
                            }
                        }
                        Some(Some(Err(err))) => {
                            deck_warn!("Log stream error: {}", err);
                            sink.emit(ClientEvent::LogStreamFailed(err));
                            break;
                        }
                    }
                }
            }
            Some(Err(err)) => {
                deck_warn!("Could not open log stream: {}", err);
                sink.emit(ClientEvent::LogStreamFailed(err));
            }
        }

        if cancel
            .run_until_cancelled(tokio::time::sleep(retry))
            .await
            .is_none()
        {
            break;
        }
    }
    deck_debug!("Log stream closed");
}
