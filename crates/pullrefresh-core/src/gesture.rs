//! Gesture tracking: raw vertical drag deltas to a resistance-adjusted pull distance

use serde::{Deserialize, Serialize};

use crate::config::PullConfig;

/// Events produced by the platform gesture recognizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Finger down / drag began
    Start,
    /// Vertical movement in content units; positive pulls down
    Move { delta: f64 },
    /// Finger lifted
    Release,
    /// The recognizer abandoned the gesture (another recognizer took over)
    Cancel,
}

/// Transient per-gesture record.
///
/// Created when a gesture starts at the top of the content and dropped when
/// the gesture ends or the refresh it triggered completes.
#[derive(Debug, Clone, PartialEq)]
pub struct PullSession {
    /// Content scroll offset when the gesture began
    pub start_offset: f64,
    /// Accumulated raw drag, floored at zero
    pub raw_delta: f64,
    /// Resistance-adjusted distance, always within `[0, max_pull_distance]`
    pub current_distance: f64,
}

impl PullSession {
    pub fn new(start_offset: f64) -> Self {
        Self {
            start_offset,
            raw_delta: 0.0,
            current_distance: 0.0,
        }
    }

    /// Start a session that picks up from a distance already on screen
    /// (a new touch landing while the indicator is still returning to rest).
    pub fn resume(start_offset: f64, distance: f64, config: &PullConfig) -> Self {
        let distance = distance.clamp(0.0, config.max_pull_distance);
        Self {
            start_offset,
            raw_delta: unresist(distance, config.pull_threshold, config.max_pull_distance),
            current_distance: distance,
        }
    }

    /// Accumulate a drag delta and return the new pull distance
    pub fn apply_delta(&mut self, delta: f64, config: &PullConfig) -> f64 {
        if !delta.is_finite() {
            return self.current_distance;
        }
        self.raw_delta = (self.raw_delta + delta).max(0.0);
        self.current_distance = resist(self.raw_delta, config.pull_threshold, config.max_pull_distance);
        self.current_distance
    }
}

/// Map a raw drag distance to the on-screen pull distance.
///
/// Identity up to `threshold`; beyond it, an exponential approach toward
/// `max`: `T + (M - T) * (1 - e^(-(r - T) / (M - T)))`. The curve is
/// continuous with slope 1 at the threshold, strictly increasing, and never
/// exceeds `max`.
pub fn resist(raw: f64, threshold: f64, max: f64) -> f64 {
    let raw = raw.max(0.0);
    if raw <= threshold {
        return raw.min(max);
    }
    let span = max - threshold;
    if span <= 0.0 {
        return max;
    }
    let excess = raw - threshold;
    (threshold + span * (1.0 - (-excess / span).exp())).min(max)
}

/// Inverse of [`resist`], saturating just below `max`.
pub fn unresist(distance: f64, threshold: f64, max: f64) -> f64 {
    let distance = distance.max(0.0);
    let span = max - threshold;
    if distance <= threshold || span <= 0.0 {
        return distance;
    }
    let ratio = ((distance - threshold) / span).min(1.0 - 1e-9);
    threshold - span * (1.0 - ratio).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PullConfig {
        PullConfig::with_thresholds(150.0, 250.0)
    }

    #[test]
    fn test_identity_below_threshold() {
        assert_eq!(resist(0.0, 150.0, 250.0), 0.0);
        assert_eq!(resist(100.0, 150.0, 250.0), 100.0);
        assert_eq!(resist(150.0, 150.0, 250.0), 150.0);
    }

    #[test]
    fn test_curve_is_continuous_at_threshold() {
        let below = resist(150.0 - 1e-6, 150.0, 250.0);
        let above = resist(150.0 + 1e-6, 150.0, 250.0);
        assert!((above - below).abs() < 1e-5);
    }

    #[test]
    fn test_curve_is_monotonic_and_saturating() {
        let mut prev = 0.0;
        for i in 0..2000 {
            let d = resist(i as f64, 150.0, 250.0);
            assert!(d >= prev, "not monotonic at raw={}", i);
            assert!(d <= 250.0);
            prev = d;
        }
        assert!(resist(1e9, 150.0, 250.0) <= 250.0);
        assert!(resist(1000.0, 150.0, 250.0) > 240.0);
    }

    #[test]
    fn test_degenerate_span_clamps_to_max() {
        assert_eq!(resist(500.0, 100.0, 100.0), 100.0);
        assert_eq!(resist(50.0, 100.0, 100.0), 50.0);
    }

    #[test]
    fn test_unresist_inverts_resist() {
        for raw in [0.0, 75.0, 150.0, 180.0, 260.0, 400.0] {
            let d = resist(raw, 150.0, 250.0);
            assert!((unresist(d, 150.0, 250.0) - raw).abs() < 1e-6, "raw={}", raw);
        }
    }

    #[test]
    fn test_session_accumulates_deltas() {
        let config = config();
        let mut session = PullSession::new(0.0);
        assert_eq!(session.apply_delta(50.0, &config), 50.0);
        assert_eq!(session.apply_delta(50.0, &config), 100.0);
        assert_eq!(session.apply_delta(50.0, &config), 150.0);
    }

    #[test]
    fn test_upward_deltas_never_go_negative() {
        let config = config();
        let mut session = PullSession::new(0.0);
        session.apply_delta(40.0, &config);
        assert_eq!(session.apply_delta(-30.0, &config), 10.0);
        assert_eq!(session.apply_delta(-100.0, &config), 0.0);
        assert_eq!(session.raw_delta, 0.0);
        // Raw motion does not build up negative debt
        assert_eq!(session.apply_delta(20.0, &config), 20.0);
    }

    #[test]
    fn test_upward_delta_is_symmetric_past_threshold() {
        let config = config();
        let mut session = PullSession::new(0.0);
        let before = session.apply_delta(180.0, &config);
        session.apply_delta(60.0, &config);
        assert!((session.apply_delta(-60.0, &config) - before).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let config = config();
        let mut session = PullSession::new(0.0);
        session.apply_delta(30.0, &config);
        assert_eq!(session.apply_delta(f64::NAN, &config), 30.0);
        assert_eq!(session.apply_delta(f64::INFINITY, &config), 30.0);
    }

    #[test]
    fn test_resume_continues_from_distance() {
        let config = config();
        let mut session = PullSession::resume(0.0, 60.0, &config);
        assert_eq!(session.current_distance, 60.0);
        assert_eq!(session.apply_delta(10.0, &config), 70.0);
    }
}
