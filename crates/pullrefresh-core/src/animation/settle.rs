//! Settle animation controller
//!
//! Combines easing functions and timing utilities to move the pull distance
//! toward a resting target. Used for the release-below-threshold snap back,
//! the hold at the threshold while refreshing, and the final settle to rest.

use std::time::{Duration, Instant};

use super::timing::{is_complete_at, lerp, progress_at};
use crate::config::EasingType;

/// Active settle animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Distance animator
///
/// Call `animate_to()` to begin an animation, then `update_at()` each frame
/// to get the current interpolated distance.
#[derive(Debug, Clone, Default)]
pub struct SettleAnimator {
    animation: Option<ActiveAnimation>,
    current: f64,
}

impl SettleAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Current interpolated value (as of the last update)
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Final value once the active animation completes
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    /// Set the value immediately, cancelling any animation
    pub fn set(&mut self, value: f64) {
        self.animation = None;
        self.current = value;
    }

    /// Start animating from the current value to `target`
    ///
    /// Jumps immediately when the duration is zero, the easing is `None`, or
    /// the value is already at the target.
    pub fn animate_to(&mut self, target: f64, duration: Duration, easing: EasingType, now: Instant) {
        if duration.is_zero() || !easing.is_animated() || self.current == target {
            self.set(target);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration,
            easing,
        });
    }

    /// Advance the animation to `now` and return the current value
    pub fn update_at(&mut self, now: Instant) -> f64 {
        if let Some(ref anim) = self.animation {
            if is_complete_at(anim.start, anim.duration, now) {
                self.current = anim.to;
                self.animation = None;
            } else {
                let t = progress_at(anim.start, anim.duration, now);
                self.current = lerp(anim.from, anim.to, anim.easing.apply(t));
            }
        }
        self.current
    }

    /// Stop at the current value
    pub fn cancel(&mut self) {
        self.animation = None;
    }

    /// Reset to rest
    pub fn reset(&mut self) {
        self.set(0.0);
    }
}
