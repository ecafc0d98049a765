//! Easing curves for the settle animation

use crate::config::EasingType;

impl EasingType {
    /// Eased fraction of the way from start to target after fraction `t` of
    /// the duration has elapsed. `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            // Stays put until the end, then lands on the target
            EasingType::None => t.floor(),
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// `None` jumps straight to the target instead of animating
    #[inline]
    pub fn is_animated(&self) -> bool {
        !matches!(self, EasingType::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_decelerates_into_rest() {
        let cubic = EasingType::Cubic;
        assert_eq!(cubic.apply(0.0), 0.0);
        assert_eq!(cubic.apply(0.5), 0.875);
        assert_eq!(cubic.apply(1.0), 1.0);

        // Second half of the animation covers less ground than the first
        assert!(cubic.apply(1.0) - cubic.apply(0.5) < cubic.apply(0.5));
    }

    #[test]
    fn test_none_lands_only_at_end() {
        assert_eq!(EasingType::None.apply(0.99), 0.0);
        assert_eq!(EasingType::None.apply(1.0), 1.0);
        assert!(!EasingType::None.is_animated());
        assert!(EasingType::Linear.is_animated());
    }

    #[test]
    fn test_elapsed_fraction_is_clamped() {
        assert_eq!(EasingType::Linear.apply(-0.5), 0.0);
        assert_eq!(EasingType::Cubic.apply(3.0), 1.0);
    }
}
