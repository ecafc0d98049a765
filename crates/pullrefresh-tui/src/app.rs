use std::time::Instant;

use pullrefresh_core::config::UiConfig;
use pullrefresh_core::{
    AppConfig, GestureEvent, IndicatorConfig, IndicatorFrame, Phase, PullController, RefreshAction,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::event::RefreshResult;
use crate::feed::DemoFeed;
use crate::input::{Action, DragTracker};
use crate::theme::Theme;

/// Application state
pub struct App {
    /// Pull-to-refresh controller mounted on the feed list
    pub controller: PullController<DemoFeed>,
    /// Shared view of the feed items
    pub feed: DemoFeed,
    pub indicator: IndicatorConfig,
    pub ui: UiConfig,
    pub theme: Theme,
    /// Index of the first visible feed item
    pub list_scroll: usize,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    pub drag: DragTracker,
    keyboard_pull: bool,
    started_at: Instant,
    host_tx: mpsc::UnboundedSender<RefreshResult>,
    host_rx: mpsc::UnboundedReceiver<RefreshResult>,
}

impl App {
    pub fn new(config: &AppConfig, theme: Theme) -> pullrefresh_core::Result<Self> {
        let feed = DemoFeed::new(&config.demo);
        let controller = PullController::new(config.pull.clone(), feed.clone())?;
        let (host_tx, host_rx) = mpsc::unbounded_channel();

        Ok(Self {
            controller,
            feed,
            indicator: config.indicator.clone(),
            ui: config.ui.clone(),
            theme,
            list_scroll: 0,
            should_quit: false,
            status_message: None,
            drag: DragTracker::new(config.ui.row_height),
            keyboard_pull: false,
            started_at: Instant::now(),
            host_tx,
            host_rx,
        })
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Whether the event loop should tick at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.controller.needs_update() || self.drag.is_dragging()
    }

    /// Frame of the indicator to draw this tick
    pub fn indicator_frame(&self) -> IndicatorFrame {
        self.controller.indicator(self.indicator.style)
    }

    /// Spinner frame index, advancing at roughly 12 frames per second
    pub fn spinner_index(&self) -> usize {
        (self.started_at.elapsed().as_millis() / 80) as usize
    }

    /// Terminal rows the content is pushed down by the pull
    pub fn pull_rows(&self) -> u16 {
        if self.ui.row_height <= 0.0 {
            return 0;
        }
        (self.controller.content_offset() / self.ui.row_height).round() as u16
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollUp => self.scroll_by(-1),
            Action::ScrollToTop => self.scroll_by(-(self.list_scroll as i64)),
            Action::PullStep => self.pull_step(),
            Action::ReleasePull => {
                if self.keyboard_pull {
                    self.keyboard_pull = false;
                    self.controller.handle(GestureEvent::Release);
                }
            }
            Action::CancelPull => {
                self.keyboard_pull = false;
                self.controller.handle(GestureEvent::Cancel);
            }
            Action::Gesture(event) => self.controller.handle(event),
            Action::ProgrammaticRefresh => self.start_programmatic_refresh(),
            Action::ToggleEnabled => {
                let enabled = !self.controller.is_enabled();
                self.controller.set_enabled(enabled);
                self.keyboard_pull = false;
                self.set_status(if enabled { "Pull to refresh enabled" } else { "Pull to refresh disabled" });
            }
            Action::None => {}
        }
    }

    /// Advance animations and collect finished refreshes
    pub fn on_tick(&mut self) {
        while let Ok(result) = self.host_rx.try_recv() {
            self.controller.set_refreshing(false);
            match result {
                RefreshResult::Success => {
                    self.set_status(format!("Refreshed: {} items", self.feed.len()));
                }
                RefreshResult::Failure { error } => {
                    self.set_status(format!("Refresh failed: {}", error));
                }
            }
        }

        if let Some(outcome) = self.controller.tick() {
            match outcome.result {
                Ok(()) => self.set_status(format!("Refreshed: {} items", self.feed.len())),
                Err(e) => self.set_status(format!("Refresh failed: {}", e)),
            }
        }
    }

    fn scroll_by(&mut self, delta: i64) {
        if self.controller.phase() != Phase::Idle || self.controller.session().is_some() {
            return;
        }
        let max = self.feed.len().saturating_sub(1) as i64;
        self.list_scroll = (self.list_scroll as i64 + delta).clamp(0, max) as usize;
        self.controller
            .set_scroll_offset(self.list_scroll as f64 * self.ui.row_height);
    }

    fn pull_step(&mut self) {
        if self.controller.session().is_none() {
            self.controller.handle(GestureEvent::Start);
            if self.controller.session().is_none() {
                debug!(phase = %self.controller.phase(), "Keyboard pull not started");
                return;
            }
            self.keyboard_pull = true;
        }
        self.controller.handle(GestureEvent::Move {
            delta: self.ui.key_pull_step,
        });
    }

    fn start_programmatic_refresh(&mut self) {
        if self.controller.is_refreshing() {
            self.set_status("Refresh already in progress...");
            return;
        }

        self.controller.set_refreshing(true);
        if !self.controller.is_refreshing() {
            // Keep the host flag in step with what the controller accepted
            self.controller.set_refreshing(false);
            self.set_status("Refresh unavailable while disabled");
            return;
        }
        self.set_status("Refreshing feed...");

        let feed = self.feed.clone();
        let tx = self.host_tx.clone();
        tokio::spawn(async move {
            let result = match feed.refresh().await {
                Ok(()) => RefreshResult::Success,
                Err(e) => RefreshResult::Failure { error: e.to_string() },
            };
            let _ = tx.send(result);
        });
    }
}
