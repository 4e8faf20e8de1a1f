use std::path::PathBuf;
use std::time::{Duration, Instant};

use deck_logging::{deck_debug, deck_warn};
use scrapedeck_client::{ClientCommand, ClientEvent, ClientHandle};
use scrapedeck_core::gallery::{GalleryEffect, GalleryMsg};
use scrapedeck_core::search::{SearchEffect, SearchMsg};
use scrapedeck_core::Notice;

/// Longest a one-off [`EffectRunner::call`] waits for its answer.
const CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything the app loop can be asked to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    Search(SearchMsg),
    Gallery(GalleryMsg),
    /// Printed as-is; no controller needs to see it.
    Notice(Notice),
    /// The image grid ran empty and its delay has passed.
    ReloadView,
}

/// Turns controller effects into client commands and timers, and client
/// events back into messages.
pub struct EffectRunner {
    client: ClientHandle,
    download_dir: PathBuf,
    timers: Vec<(Instant, AppMsg)>,
    /// One-off requests sent but not yet answered.
    outstanding: usize,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            download_dir: PathBuf::from("."),
            timers: Vec::new(),
            outstanding: 0,
        }
    }

    pub fn set_download_dir(&mut self, dir: PathBuf) {
        self.download_dir = dir;
    }

    /// True when no request is in flight and no timer is pending. The
    /// poller and the log stream do not count.
    pub fn is_idle(&self) -> bool {
        self.outstanding == 0 && self.timers.is_empty()
    }

    /// Runs search effects; notices come back for immediate display.
    pub fn run_search(&mut self, effects: Vec<SearchEffect>) -> Vec<AppMsg> {
        let mut immediate = Vec::new();
        for effect in effects {
            deck_debug!("Search effect {:?}", effect);
            match effect {
                SearchEffect::CheckInitialStatus => self.request(ClientCommand::CheckStatus),
                SearchEffect::SubmitBulkSearch(request) => {
                    self.request(ClientCommand::Submit(request))
                }
                SearchEffect::StartPolling { period } => {
                    self.client.send(ClientCommand::StartPolling { period })
                }
                SearchEffect::StopPolling => self.client.send(ClientCommand::StopPolling),
                SearchEffect::OpenLogStream => self.client.send(ClientCommand::OpenLogStream),
                SearchEffect::CloseLogStream => self.client.send(ClientCommand::CloseLogStream),
                SearchEffect::ClearLogs => self.request(ClientCommand::ClearLogs),
                SearchEffect::DownloadLogs => self.request(ClientCommand::DownloadLogs {
                    dir: self.download_dir.clone(),
                }),
                SearchEffect::Notify(notice) => immediate.push(AppMsg::Notice(notice)),
            }
        }
        immediate
    }

    pub fn run_gallery(&mut self, effects: Vec<GalleryEffect>) -> Vec<AppMsg> {
        let mut immediate = Vec::new();
        for effect in effects {
            deck_debug!("Gallery effect {:?}", effect);
            match effect {
                GalleryEffect::LoadFolders { current } => {
                    self.request(ClientCommand::LoadFolders { current })
                }
                GalleryEffect::MoveImages(request) => {
                    self.request(ClientCommand::MoveImages(request))
                }
                GalleryEffect::DeleteImages(request) => {
                    self.request(ClientCommand::DeleteImages(request))
                }
                GalleryEffect::ScheduleCardRemoval { paths, delay } => self
                    .timers
                    .push((Instant::now() + delay, AppMsg::Gallery(GalleryMsg::CardsFaded(paths)))),
                GalleryEffect::ReloadView { delay } => {
                    self.timers.push((Instant::now() + delay, AppMsg::ReloadView))
                }
                GalleryEffect::Notify(notice) => immediate.push(AppMsg::Notice(notice)),
            }
        }
        immediate
    }

    /// Sends one request and blocks for its answer. Only for use when
    /// nothing else is in flight.
    pub fn call(&mut self, command: ClientCommand) -> Option<ClientEvent> {
        self.client.send(command);
        let event = self.client.recv_timeout(CALL_TIMEOUT);
        if event.is_none() {
            deck_warn!("No answer from the client within {:?}", CALL_TIMEOUT);
        }
        event
    }

    /// Waits up to `max_wait` for the next client result or due timer.
    pub fn next_msg(&mut self, max_wait: Duration) -> Option<AppMsg> {
        if let Some(msg) = self.take_due_timer() {
            return Some(msg);
        }
        let wait = self
            .timers
            .iter()
            .map(|(deadline, _)| deadline.saturating_duration_since(Instant::now()))
            .min()
            .map_or(max_wait, |until_timer| until_timer.min(max_wait));
        match self.client.recv_timeout(wait) {
            Some(event) => Some(self.translate(event)),
            None => self.take_due_timer(),
        }
    }

    fn request(&mut self, command: ClientCommand) {
        self.outstanding += 1;
        self.client.send(command);
    }

    fn answered(&mut self) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    fn take_due_timer(&mut self) -> Option<AppMsg> {
        let now = Instant::now();
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .min_by_key(|(_, (deadline, _))| *deadline)
            .map(|(index, _)| index)?;
        Some(self.timers.remove(index).1)
    }

    fn translate(&mut self, event: ClientEvent) -> AppMsg {
        match event {
            ClientEvent::InitialStatus(result) => {
                self.answered();
                AppMsg::Search(SearchMsg::InitialStatusLoaded(result.map_err(|e| e.to_string())))
            }
            ClientEvent::SubmitCompleted(result) => {
                self.answered();
                AppMsg::Search(SearchMsg::SubmitCompleted(result.map_err(|e| e.to_string())))
            }
            ClientEvent::StatusPolled(result) => {
                AppMsg::Search(SearchMsg::StatusPolled(result.map_err(|e| e.to_string())))
            }
            ClientEvent::LogStreamOpened => AppMsg::Search(SearchMsg::LogStreamOpened),
            ClientEvent::LogPayload(payload) => AppMsg::Search(SearchMsg::LogPayload(payload)),
            ClientEvent::LogStreamFailed(err) => {
                AppMsg::Search(SearchMsg::LogStreamFailed(err.to_string()))
            }
            ClientEvent::LogsCleared(result) => {
                self.answered();
                AppMsg::Search(SearchMsg::LogsCleared(result.map_err(|e| e.to_string())))
            }
            ClientEvent::LogsDownloaded(result) => {
                self.answered();
                AppMsg::Notice(match result {
                    Ok(path) => Notice::success(format!("Logs saved to {}", path.display())),
                    Err(err) => Notice::error(format!("Failed to download logs: {err}")),
                })
            }
            ClientEvent::FoldersLoaded(result) => {
                self.answered();
                AppMsg::Gallery(GalleryMsg::FoldersLoaded(result.map_err(|e| e.to_string())))
            }
            ClientEvent::MoveCompleted(result) => {
                self.answered();
                AppMsg::Gallery(GalleryMsg::MoveCompleted(result.map_err(|e| e.to_string())))
            }
            ClientEvent::DeleteCompleted(result) => {
                self.answered();
                AppMsg::Gallery(GalleryMsg::DeleteCompleted(result.map_err(|e| e.to_string())))
            }
        }
    }
}
