//! Return-to-rest animation for the pull distance
//!
//! ## Pure layer
//! - `easing` - Easing curves mapping [0, 1] to [0, 1]
//! - `timing` - Progress and interpolation helpers
//!
//! ## Controller layer
//! - `settle` - Animates the pull distance toward a target over a fixed duration
//!
//! Time is always passed in explicitly so hosts can drive the animation from
//! their own frame clock and tests can step it deterministically.

pub mod easing;
pub mod settle;
pub mod timing;

pub use settle::SettleAnimator;
