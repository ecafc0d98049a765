//! Progress reporting: normalized pull progress and the indicator transform

use serde::Serialize;

use crate::config::IndicatorStyle;
use crate::phase::Phase;

/// Normalized progress for the indicator.
///
/// `distance / threshold` clamped to `[0, 1]` while pulling, pinned to 1
/// while refreshing or settling.
pub fn progress_for(phase: Phase, distance: f64, threshold: f64) -> f64 {
    if phase.is_pinned() {
        return 1.0;
    }
    if threshold <= 0.0 || !distance.is_finite() {
        return 0.0;
    }
    (distance / threshold).clamp(0.0, 1.0)
}

/// Transform applied to the built-in indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorTransform {
    /// Arrow rotation in degrees, 0 at rest and 180 once armed
    pub rotation_deg: f64,
    /// Indicator scale, growing from half size to full size
    pub scale: f64,
    pub opacity: f64,
    /// The indicator should run its busy animation
    pub spinning: bool,
}

impl IndicatorTransform {
    pub fn from_progress(progress: f64, phase: Phase) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        Self {
            rotation_deg: 180.0 * progress,
            scale: 0.5 + 0.5 * progress,
            opacity: progress,
            spinning: phase == Phase::Refreshing,
        }
    }
}

/// What the indicator renderer receives each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorFrame {
    Default(IndicatorTransform),
    /// Custom indicators get progress unmodified
    Custom { progress: f64, phase: Phase },
}

impl IndicatorFrame {
    pub fn new(style: IndicatorStyle, progress: f64, phase: Phase) -> Self {
        match style {
            IndicatorStyle::Default => IndicatorFrame::Default(IndicatorTransform::from_progress(progress, phase)),
            IndicatorStyle::Custom => IndicatorFrame::Custom { progress, phase },
        }
    }

    /// Whether anything should be drawn at all
    pub fn is_visible(&self) -> bool {
        match self {
            IndicatorFrame::Default(t) => t.opacity > 0.0,
            IndicatorFrame::Custom { progress, .. } => *progress > 0.0,
        }
    }
}

type ProgressCallback = Box<dyn FnMut(f64) + Send>;

/// Emits progress to the host only when it changes.
///
/// Starts at rest (0), so the first emission is the first nonzero value.
#[derive(Default)]
pub struct ProgressReporter {
    last: f64,
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: impl FnMut(f64) + Send + 'static) -> Self {
        Self {
            last: 0.0,
            callback: Some(Box::new(callback)),
        }
    }

    /// Last value reported
    pub fn current(&self) -> f64 {
        self.last
    }

    /// Report a new value; returns true if it differed from the previous one
    pub fn report(&mut self, progress: f64) -> bool {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        if self.last == progress {
            return false;
        }
        self.last = progress;
        if let Some(ref mut callback) = self.callback {
            callback(progress);
        }
        true
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("last", &self.last)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
