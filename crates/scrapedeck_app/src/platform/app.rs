use std::collections::VecDeque;
use std::time::Duration;

use deck_logging::deck_info;
use scrapedeck_core::gallery::{self, GalleryState};
use scrapedeck_core::search::{self, SearchSettings, SearchState};
use scrapedeck_core::NoticeKind;

use super::effects::{AppMsg, EffectRunner};
use super::render::{notice_line, Renderer};

/// Upper bound on one wait for client events, so timers stay on schedule.
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// Owns both page controllers and is the only place their state changes.
pub struct App {
    runner: EffectRunner,
    renderer: Renderer,
    search: SearchState,
    gallery: GalleryState,
    errors: usize,
}

impl App {
    pub fn new(runner: EffectRunner, settings: SearchSettings) -> Self {
        Self {
            runner,
            renderer: Renderer::new(),
            search: SearchState::new(settings),
            gallery: GalleryState::new(),
            errors: 0,
        }
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    pub fn runner_mut(&mut self) -> &mut EffectRunner {
        &mut self.runner
    }

    /// Number of error notices shown so far.
    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn is_idle(&self) -> bool {
        self.runner.is_idle()
    }

    /// Applies `msg` and everything it triggers synchronously, rendering
    /// after each step that changed something.
    pub fn dispatch(&mut self, msg: AppMsg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            match msg {
                AppMsg::Search(msg) => {
                    let state = std::mem::take(&mut self.search);
                    let (mut state, effects) = search::update(state, msg);
                    if state.consume_dirty() {
                        let lines = self.renderer.search_lines(&state.view(), state.log_lines());
                        print_lines(lines);
                    }
                    self.search = state;
                    queue.extend(self.runner.run_search(effects));
                }
                AppMsg::Gallery(msg) => {
                    let state = std::mem::take(&mut self.gallery);
                    let (mut state, effects) = gallery::update(state, msg);
                    if state.consume_dirty() {
                        print_lines(self.renderer.gallery_lines(&state.view()));
                    }
                    self.gallery = state;
                    queue.extend(self.runner.run_gallery(effects));
                }
                AppMsg::Notice(notice) => {
                    let line = notice_line(&notice);
                    match notice.kind {
                        NoticeKind::Error => {
                            self.errors += 1;
                            eprintln!("{line}");
                        }
                        NoticeKind::Warning => eprintln!("{line}"),
                        NoticeKind::Info | NoticeKind::Success => println!("{line}"),
                    }
                }
                AppMsg::ReloadView => {
                    deck_info!("Image grid for {} is empty", self.gallery.folder());
                }
            }
        }
    }

    /// Feeds client results and timers back in until `done` holds.
    pub fn run_until(&mut self, done: impl Fn(&App) -> bool) {
        while !done(self) {
            if let Some(msg) = self.runner.next_msg(IDLE_WAIT) {
                self.dispatch(msg);
            }
        }
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
