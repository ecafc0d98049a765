//! Pull-to-refresh controller
//!
//! Owns the single pull session, the phase, the distance animation and the
//! refresh invoker for one mounted scroll container. Hosts feed it gesture
//! events and frame ticks; it never blocks on the refresh action.
//!
//! # `refreshing` reconciliation
//!
//! The host may also drive the indicator through [`PullController::set_refreshing`],
//! typically once per render. The latest value is reconciled on every call
//! and again when the controller is re-enabled:
//! - `true` enters `Refreshing` directly (skipping `Armed`) without invoking
//!   the refresh action; the host is refreshing on its own. Ignored while
//!   disabled.
//! - `false` leaves `Refreshing` only when no invocation of ours is in
//!   flight. Otherwise it is advisory: the invocation's own completion
//!   decides when `Settling` starts.

use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::animation::SettleAnimator;
use crate::config::{IndicatorStyle, PullConfig};
use crate::gesture::{GestureEvent, PullSession};
use crate::invoker::{RefreshAction, RefreshInvoker, RefreshOutcome, RefreshTicket};
use crate::phase::{Phase, ReleaseAction};
use crate::progress::{progress_for, IndicatorFrame, ProgressReporter};
use crate::Result;

/// Notifications emitted to an optional event channel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PullEvent {
    PhaseChanged { from: Phase, to: Phase },
    Progress { value: f64 },
    RefreshStarted { ticket: RefreshTicket },
    RefreshFinished { ticket: RefreshTicket, ok: bool },
}

pub struct PullController<A: RefreshAction> {
    config: PullConfig,
    enabled: bool,
    phase: Phase,
    session: Option<PullSession>,
    animator: SettleAnimator,
    distance: f64,
    scroll_offset: f64,
    external_refreshing: bool,
    invoker: RefreshInvoker<A>,
    reporter: ProgressReporter,
    event_tx: Option<mpsc::UnboundedSender<PullEvent>>,
}

impl<A: RefreshAction> PullController<A> {
    /// Mount a controller. Fails if the configuration is invalid.
    pub fn new(config: PullConfig, action: A) -> Result<Self> {
        Self::with_invoker(config, RefreshInvoker::new(action))
    }

    pub fn with_invoker(config: PullConfig, invoker: RefreshInvoker<A>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            enabled: config.enabled,
            config,
            phase: Phase::Idle,
            session: None,
            animator: SettleAnimator::new(),
            distance: 0.0,
            scroll_offset: 0.0,
            external_refreshing: false,
            invoker,
            reporter: ProgressReporter::new(),
            event_tx: None,
        })
    }

    /// Set the progress callback invoked on every progress change
    pub fn with_progress_callback(mut self, callback: impl FnMut(f64) + Send + 'static) -> Self {
        self.reporter = ProgressReporter::with_callback(callback);
        self
    }

    /// Set the event sender for host notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<PullEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current resistance-adjusted (and animated) pull distance
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// How far the host should translate its content
    #[inline]
    pub fn content_offset(&self) -> f64 {
        self.distance
    }

    pub fn progress(&self) -> f64 {
        progress_for(self.phase, self.distance, self.config.pull_threshold)
    }

    pub fn indicator(&self, style: IndicatorStyle) -> IndicatorFrame {
        IndicatorFrame::new(style, self.progress(), self.phase)
    }

    pub fn session(&self) -> Option<&PullSession> {
        self.session.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == Phase::Refreshing
    }

    pub fn live_ticket(&self) -> Option<RefreshTicket> {
        self.invoker.live_ticket()
    }

    /// Whether the host should keep ticking at animation frame rate
    pub fn needs_update(&self) -> bool {
        self.animator.is_animating() || self.phase == Phase::Refreshing
    }

    /// Report the content scroll position; pulls only start at the top (`<= 0`)
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    /// Handle a gesture event. Must run inside a tokio runtime, since an
    /// armed release spawns the refresh action.
    pub fn handle(&mut self, event: GestureEvent) {
        self.handle_at(event, Instant::now());
    }

    pub fn handle_at(&mut self, event: GestureEvent, now: Instant) {
        match event {
            GestureEvent::Start => self.on_start(),
            GestureEvent::Move { delta } => self.on_move(delta),
            GestureEvent::Release => self.on_end(false, now),
            GestureEvent::Cancel => self.on_end(true, now),
        }
        self.emit_progress();
    }

    fn on_start(&mut self) {
        if !self.enabled {
            debug!("Gesture ignored: controller disabled");
            return;
        }
        if !self.phase.accepts_gesture() {
            debug!(phase = %self.phase, "Gesture ignored while refresh in progress");
            return;
        }
        if self.session.is_some() {
            debug!("Duplicate gesture start ignored");
            return;
        }
        if self.scroll_offset > 0.0 {
            debug!(offset = self.scroll_offset, "Gesture ignored: content not at top");
            return;
        }

        let session = if self.animator.is_animating() || self.distance > 0.0 {
            // Catch the indicator mid-return
            self.animator.cancel();
            PullSession::resume(self.scroll_offset, self.distance, &self.config)
        } else {
            PullSession::new(self.scroll_offset)
        };
        self.session = Some(session);
    }

    fn on_move(&mut self, delta: f64) {
        if !self.enabled {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            debug!(delta, "Move without an active pull ignored");
            return;
        };

        let distance = session.apply_delta(delta, &self.config);
        self.distance = distance;
        self.animator.set(distance);

        let next = self.phase.after_move(distance, self.config.pull_threshold);
        if self.phase == Phase::Idle && next == Phase::Armed {
            self.transition(Phase::Pulling);
        }
        if next != self.phase {
            self.transition(next);
        }
    }

    fn on_end(&mut self, cancelled: bool, now: Instant) {
        if self.session.take().is_none() {
            debug!(cancelled, "Release without an active pull ignored");
            return;
        }

        let action = match self.phase.on_release() {
            ReleaseAction::Trigger if cancelled => ReleaseAction::SnapBack,
            action => action,
        };

        match action {
            ReleaseAction::Trigger => {
                self.transition(Phase::Refreshing);
                self.hold_at_threshold(now);
                match self.invoker.trigger() {
                    Some(ticket) => self.send_event(PullEvent::RefreshStarted { ticket }),
                    None => debug!("Refresh already in flight; waiting for it instead"),
                }
            }
            ReleaseAction::SnapBack => {
                if self.phase != Phase::Idle {
                    self.transition(Phase::Idle);
                }
                self.animate_distance(0.0, now);
            }
            ReleaseAction::Ignore => {}
        }
    }

    /// Enable or disable the controller. Disabling drops any pull and returns
    /// to `Idle` immediately; an in-flight refresh still runs to completion.
    /// Re-enabling picks up a host refresh that is still flagged.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.reconcile_external(Instant::now());
        } else {
            self.session = None;
            self.animator.reset();
            self.distance = 0.0;
            if self.phase != Phase::Idle {
                self.transition(Phase::Idle);
            }
        }
        self.emit_progress();
    }

    /// Apply the host's `refreshing` flag. See the module docs for precedence.
    pub fn set_refreshing(&mut self, refreshing: bool) {
        self.set_refreshing_at(refreshing, Instant::now());
    }

    pub fn set_refreshing_at(&mut self, refreshing: bool, now: Instant) {
        self.external_refreshing = refreshing;
        self.reconcile_external(now);
        self.emit_progress();
    }

    fn reconcile_external(&mut self, now: Instant) {
        if self.external_refreshing {
            if !self.enabled {
                debug!("External refresh flag ignored: controller disabled");
                return;
            }
            if self.phase == Phase::Refreshing {
                return;
            }
            self.session = None;
            self.transition(Phase::Refreshing);
            self.hold_at_threshold(now);
        } else if self.phase == Phase::Refreshing {
            if let Some(ticket) = self.invoker.live_ticket() {
                debug!(ticket = %ticket, "External refresh cleared while ours is pending; waiting for completion");
            } else {
                self.begin_settle(now);
            }
        }
    }

    /// Advance animations and pick up a finished refresh, if any.
    ///
    /// The returned outcome carries the action's result untouched.
    pub fn tick(&mut self) -> Option<RefreshOutcome<A::Error>> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<RefreshOutcome<A::Error>> {
        let outcome = self.invoker.try_complete();
        if let Some(ref outcome) = outcome {
            self.finish_refresh(outcome, now);
        }

        if self.animator.is_animating() {
            self.distance = self.animator.update_at(now);
            if !self.animator.is_animating() && self.phase == Phase::Settling {
                self.transition(Phase::Idle);
            }
        }
        self.emit_progress();
        outcome
    }

    /// Wait for the in-flight refresh to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<RefreshOutcome<A::Error>> {
        let outcome = self.invoker.complete().await?;
        self.finish_refresh(&outcome, Instant::now());
        self.emit_progress();
        Some(outcome)
    }

    /// Unmount: drop the pull and animations and return to rest
    pub fn reset(&mut self) {
        self.session = None;
        self.animator.reset();
        self.distance = 0.0;
        self.external_refreshing = false;
        if self.phase != Phase::Idle {
            self.transition(Phase::Idle);
        }
        self.emit_progress();
    }

    fn finish_refresh(&mut self, outcome: &RefreshOutcome<A::Error>, now: Instant) {
        self.send_event(PullEvent::RefreshFinished {
            ticket: outcome.ticket,
            ok: outcome.is_ok(),
        });
        // Our completion is authoritative, whatever the host flag says
        if self.phase == Phase::Refreshing {
            self.begin_settle(now);
        }
    }

    fn begin_settle(&mut self, now: Instant) {
        self.transition(Phase::Settling);
        self.animate_distance(0.0, now);
        if !self.animator.is_animating() {
            self.transition(Phase::Idle);
        }
    }

    fn hold_at_threshold(&mut self, now: Instant) {
        self.animate_distance(self.config.pull_threshold, now);
    }

    fn animate_distance(&mut self, target: f64, now: Instant) {
        self.animator.set(self.distance);
        self.animator
            .animate_to(target, self.config.animation_duration(), self.config.easing, now);
        self.distance = self.animator.current();
    }

    fn transition(&mut self, to: Phase) {
        let from = self.phase;
        debug_assert!(from.can_transition(to), "illegal transition {} -> {}", from, to);
        debug!(%from, %to, "Pull phase changed");
        self.phase = to;
        self.send_event(PullEvent::PhaseChanged { from, to });
    }

    fn emit_progress(&mut self) {
        let value = self.progress();
        if self.reporter.report(value) {
            self.send_event(PullEvent::Progress { value });
        }
    }

    fn send_event(&self, event: PullEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send pull event: receiver dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Probe {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Probe {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RefreshAction for Probe {
        type Error = String;

        async fn refresh(&self) -> std::result::Result<(), String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(1)).await;
            if self.fail {
                Err("network down".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn mount(probe: &Probe) -> PullController<Probe> {
        PullController::new(PullConfig::with_thresholds(150.0, 250.0), probe.clone()).unwrap()
    }

    fn pull(controller: &mut PullController<Probe>, deltas: &[f64]) {
        controller.handle(GestureEvent::Start);
        for &delta in deltas {
            controller.handle(GestureEvent::Move { delta });
        }
    }

    fn after_animations() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    fn recorded(controller: PullController<Probe>) -> (PullController<Probe>, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let controller = controller.with_progress_callback(move |p| sink.lock().unwrap().push(p));
        (controller, seen)
    }

    #[test]
    fn test_invalid_config_fails_to_mount() {
        let result = PullController::new(PullConfig::with_thresholds(0.0, 250.0), Probe::default());
        assert!(matches!(result, Err(Error::InvalidThreshold(_))));

        let result = PullController::new(PullConfig::with_thresholds(150.0, 100.0), Probe::default());
        assert!(matches!(result, Err(Error::InvalidMaxPull { .. })));
    }

    #[tokio::test]
    async fn test_distance_stays_in_bounds_for_any_deltas() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        controller.handle(GestureEvent::Start);

        // Deterministic pseudo-random walk with large swings in both directions
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..5000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let delta = (seed % 401) as f64 - 180.0;
            controller.handle(GestureEvent::Move { delta });
            let d = controller.distance();
            assert!((0.0..=250.0).contains(&d), "distance {} out of range", d);
            assert!((0.0..=1.0).contains(&controller.progress()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_armed_release_refreshes_once() {
        let probe = Probe::default();
        let (mut controller, seen) = recorded(mount(&probe));

        pull(&mut controller, &[50.0, 50.0, 50.0]);
        assert_eq!(controller.phase(), Phase::Armed);
        controller.handle(GestureEvent::Release);

        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(controller.progress(), 1.0);
        assert!(controller.live_ticket().is_some());

        // Further gestures are ignored while refreshing
        pull(&mut controller, &[200.0]);
        controller.handle(GestureEvent::Release);
        assert!(controller.session().is_none());
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(controller.progress(), 1.0);

        let outcome = controller.next_outcome().await.unwrap();
        assert!(outcome.is_ok());
        assert_eq!(probe.calls(), 1);
        assert_eq!(controller.phase(), Phase::Settling);
        assert_eq!(controller.progress(), 1.0);

        controller.tick_at(after_animations());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.distance(), 0.0);
        assert_eq!(controller.progress(), 0.0);

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![50.0 / 150.0, 100.0 / 150.0, 1.0, 0.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_exactly_at_threshold_triggers() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[150.0]);
        controller.handle(GestureEvent::Release);
        assert_eq!(controller.phase(), Phase::Refreshing);
        controller.next_outcome().await.unwrap();
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_just_below_threshold_never_refreshes() {
        let probe = Probe::default();
        let (mut controller, seen) = recorded(mount(&probe));
        pull(&mut controller, &[50.0, 50.0, 50.0 - 1e-6]);
        assert_eq!(controller.phase(), Phase::Pulling);
        controller.handle(GestureEvent::Release);

        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.live_ticket().is_none());
        assert!(controller.next_outcome().await.is_none());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(probe.calls(), 0);

        controller.tick_at(after_animations());
        assert_eq!(controller.distance(), 0.0);
        assert_eq!(*seen.lock().unwrap().last().unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_scenario_short_pull_animates_back() {
        let probe = Probe::default();
        let (mut controller, seen) = recorded(mount(&probe));
        pull(&mut controller, &[50.0, 50.0]);
        let released_at = Instant::now();
        controller.handle_at(GestureEvent::Release, released_at);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.needs_update());

        let duration = controller.config().animation_duration();
        controller.tick_at(released_at + duration / 2);
        let mid = controller.progress();
        assert!(mid > 0.0 && mid < 100.0 / 150.0, "mid-animation progress {}", mid);

        controller.tick_at(released_at + duration);
        assert_eq!(controller.progress(), 0.0);
        assert!(!controller.needs_update());
        assert_eq!(probe.calls(), 0);

        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).skip(2).all(|w| w[1] <= w[0]), "not decreasing: {:?}", seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_still_returns_to_idle() {
        let probe = Probe::failing();
        let mut controller = mount(&probe);
        pull(&mut controller, &[160.0]);
        controller.handle(GestureEvent::Release);

        let outcome = controller.next_outcome().await.unwrap();
        assert_eq!(outcome.result, Err("network down".to_string()));
        assert_eq!(controller.phase(), Phase::Settling);

        controller.tick_at(after_animations());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_host_picks_up_outcome_on_tick() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[150.0]);
        controller.handle(GestureEvent::Release);

        assert!(controller.tick().is_none());
        tokio::time::sleep(Duration::from_secs(2)).await;
        let outcome = controller.tick().expect("refresh should have finished");
        assert!(outcome.is_ok());
        assert_eq!(controller.phase(), Phase::Settling);
    }

    #[tokio::test]
    async fn test_progress_monotonic_while_pulling() {
        let probe = Probe::default();
        let (mut controller, seen) = recorded(mount(&probe));
        pull(&mut controller, &[10.0; 14]);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 14);
        assert!(seen.windows(2).all(|w| w[1] >= w[0]));
    }

    #[tokio::test]
    async fn test_disabled_controller_ignores_everything() {
        let probe = Probe::default();
        let mut config = PullConfig::with_thresholds(150.0, 250.0);
        config.enabled = false;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = PullController::new(config, probe.clone()).unwrap().with_event_sender(tx);

        pull(&mut controller, &[50.0, 100.0, 100.0]);
        controller.handle(GestureEvent::Release);
        controller.set_refreshing(true);

        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.distance(), 0.0);
        while let Ok(event) = rx.try_recv() {
            assert!(!matches!(event, PullEvent::PhaseChanged { .. }), "unexpected {:?}", event);
        }
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_disabling_mid_pull_returns_to_idle() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[170.0]);
        assert_eq!(controller.phase(), Phase::Armed);

        controller.set_enabled(false);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.distance(), 0.0);

        controller.handle(GestureEvent::Release);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_mid_refresh_keeps_idle_after_completion() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[150.0]);
        controller.handle(GestureEvent::Release);
        controller.set_enabled(false);
        assert_eq!(controller.phase(), Phase::Idle);

        let outcome = controller.next_outcome().await.unwrap();
        assert!(outcome.is_ok());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_release_while_ticket_live_does_not_invoke_again() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[150.0]);
        controller.handle(GestureEvent::Release);
        let first = controller.live_ticket();

        // Disable and re-enable to get back to Idle while the action runs
        controller.set_enabled(false);
        controller.set_enabled(true);
        pull(&mut controller, &[150.0]);
        controller.handle(GestureEvent::Release);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(controller.live_ticket(), first);

        controller.next_outcome().await.unwrap();
        assert_eq!(probe.calls(), 1);
        assert_eq!(controller.phase(), Phase::Settling);
    }

    #[tokio::test]
    async fn test_external_refreshing_enters_and_leaves() {
        let probe = Probe::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = mount(&probe).with_event_sender(tx);

        controller.set_refreshing(true);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(controller.progress(), 1.0);
        assert!(controller.live_ticket().is_none());

        // Indicator slides out to the threshold and holds there
        controller.tick_at(after_animations());
        assert_eq!(controller.distance(), 150.0);
        assert_eq!(controller.phase(), Phase::Refreshing);

        controller.set_refreshing(false);
        assert_eq!(controller.phase(), Phase::Settling);
        controller.tick_at(after_animations());
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(probe.calls(), 0);

        let mut phases = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let PullEvent::PhaseChanged { to, .. } = event {
                phases.push(to);
            }
        }
        assert_eq!(phases, vec![Phase::Refreshing, Phase::Settling, Phase::Idle]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_false_is_advisory_while_invocation_pending() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[150.0]);
        controller.handle(GestureEvent::Release);

        controller.set_refreshing(true);
        controller.set_refreshing(false);
        assert_eq!(controller.phase(), Phase::Refreshing);

        controller.next_outcome().await.unwrap();
        assert_eq!(controller.phase(), Phase::Settling);
    }

    #[tokio::test]
    async fn test_external_refresh_preempts_pull() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[60.0]);
        controller.set_refreshing(true);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert!(controller.session().is_none());

        controller.handle(GestureEvent::Release);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_flag_set_while_disabled_applies_on_enable() {
        let probe = Probe::default();
        let mut controller = mount(&probe);

        controller.set_enabled(false);
        controller.set_refreshing(true);
        assert_eq!(controller.phase(), Phase::Idle);

        controller.set_enabled(true);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(controller.progress(), 1.0);
        controller.set_refreshing(true);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_flag_survives_disable_and_enable() {
        let probe = Probe::default();
        let mut controller = mount(&probe);

        controller.set_refreshing(true);
        controller.set_enabled(false);
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.progress(), 0.0);

        controller.set_enabled(true);
        controller.set_refreshing(true);
        assert_eq!(controller.phase(), Phase::Refreshing);
        assert_eq!(controller.progress(), 1.0);

        controller.tick_at(after_animations());
        assert_eq!(controller.distance(), 150.0);
        controller.set_refreshing(false);
        assert_eq!(controller.phase(), Phase::Settling);
    }

    #[tokio::test]
    async fn test_repeated_refresh_flag_is_idempotent() {
        let probe = Probe::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = mount(&probe).with_event_sender(tx);

        for _ in 0..3 {
            controller.set_refreshing(true);
        }
        for _ in 0..3 {
            controller.set_refreshing(false);
        }

        let mut phases = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let PullEvent::PhaseChanged { to, .. } = event {
                phases.push(to);
            }
        }
        // Cleared before the indicator moved, so settling finishes at once
        assert_eq!(phases, vec![Phase::Refreshing, Phase::Settling, Phase::Idle]);
    }

    #[tokio::test]
    async fn test_gestures_rejected_until_settled() {
        let probe = Probe::default();
        let mut controller = mount(&probe);

        controller.set_refreshing(true);
        controller.tick_at(after_animations());
        let settle_start = Instant::now();
        controller.set_refreshing_at(false, settle_start);
        assert_eq!(controller.phase(), Phase::Settling);

        pull(&mut controller, &[200.0]);
        assert!(controller.session().is_none());
        controller.handle(GestureEvent::Release);
        assert_eq!(controller.phase(), Phase::Settling);
        assert_eq!(controller.progress(), 1.0);
        assert!(controller.live_ticket().is_none());

        controller.tick_at(settle_start + controller.config().animation_duration());
        assert_eq!(controller.phase(), Phase::Idle);
        pull(&mut controller, &[40.0]);
        assert_eq!(controller.phase(), Phase::Pulling);

        tokio::task::yield_now().await;
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_while_armed_does_not_refresh() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[200.0]);
        assert_eq!(controller.phase(), Phase::Armed);
        controller.handle(GestureEvent::Cancel);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.live_ticket().is_none());
    }

    #[tokio::test]
    async fn test_armed_drops_back_to_pulling() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[160.0, -30.0]);
        assert_eq!(controller.phase(), Phase::Pulling);
        controller.handle(GestureEvent::Release);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.live_ticket().is_none());
    }

    #[tokio::test]
    async fn test_gesture_below_top_is_ignored() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        controller.set_scroll_offset(40.0);
        pull(&mut controller, &[200.0]);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.session().is_none());
    }

    #[tokio::test]
    async fn test_unmatched_release_is_noop() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        controller.handle(GestureEvent::Release);
        controller.handle(GestureEvent::Move { delta: 80.0 });
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.distance(), 0.0);
    }

    #[tokio::test]
    async fn test_new_touch_catches_returning_indicator() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[100.0]);
        let released_at = Instant::now();
        controller.handle_at(GestureEvent::Release, released_at);
        controller.tick_at(released_at + controller.config().animation_duration() / 3);
        let caught = controller.distance();
        assert!(caught > 0.0 && caught < 100.0);

        controller.handle(GestureEvent::Start);
        controller.handle(GestureEvent::Move { delta: 10.0 });
        assert!((controller.distance() - (caught + 10.0)).abs() < 1e-9);
        assert_eq!(controller.phase(), Phase::Pulling);
    }

    #[tokio::test]
    async fn test_reset_returns_to_rest() {
        let probe = Probe::default();
        let mut controller = mount(&probe);
        pull(&mut controller, &[90.0]);
        controller.reset();
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.session().is_none());
        assert_eq!(controller.progress(), 0.0);
    }
}
