//! Threshold state machine rules
//!
//! `Idle → Pulling → Armed → Refreshing → Settling → Idle`, with
//! `Armed → Pulling` when the pull drops back below the threshold and
//! `Pulling → Idle` when released early. Any phase may fall to `Idle` when
//! the controller is disabled.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Pulling,
    Armed,
    Refreshing,
    Settling,
}

/// What a release does in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Enter `Refreshing` and invoke the refresh action
    Trigger,
    /// Return to `Idle`, animating the distance back to rest
    SnapBack,
    /// No session to end
    Ignore,
}

impl Phase {
    /// Whether a new gesture may start a session.
    ///
    /// Refreshing and Settling reject gestures so an in-flight refresh
    /// cannot be re-armed mid-animation.
    #[inline]
    pub fn accepts_gesture(self) -> bool {
        !matches!(self, Phase::Refreshing | Phase::Settling)
    }

    /// Whether the indicator is pinned to full progress
    #[inline]
    pub fn is_pinned(self) -> bool {
        matches!(self, Phase::Refreshing | Phase::Settling)
    }

    /// Phase after a move event left the pull at `distance`.
    ///
    /// The threshold comparison is inclusive.
    pub fn after_move(self, distance: f64, threshold: f64) -> Phase {
        match self {
            Phase::Idle if distance <= 0.0 => Phase::Idle,
            Phase::Idle | Phase::Pulling | Phase::Armed => {
                if distance >= threshold {
                    Phase::Armed
                } else {
                    Phase::Pulling
                }
            }
            busy => busy,
        }
    }

    pub fn on_release(self) -> ReleaseAction {
        match self {
            Phase::Armed => ReleaseAction::Trigger,
            Phase::Idle | Phase::Pulling => ReleaseAction::SnapBack,
            Phase::Refreshing | Phase::Settling => ReleaseAction::Ignore,
        }
    }

    /// Whether `self → to` is one of the allowed transitions
    pub fn can_transition(self, to: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, to),
            (Idle, Pulling)
                | (Pulling, Armed)
                | (Armed, Pulling)
                | (Armed, Refreshing)
                | (Pulling, Idle)
                | (Refreshing, Settling)
                | (Settling, Idle)
                // External `refreshing = true` skips Armed
                | (Idle, Refreshing)
                | (Pulling, Refreshing)
                // Gesture cancelled by the recognizer
                | (Armed, Idle)
                // Disabled
                | (Refreshing, Idle)
                | (Settling, Refreshing)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Pulling => "pulling",
            Phase::Armed => "armed",
            Phase::Refreshing => "refreshing",
            Phase::Settling => "settling",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
