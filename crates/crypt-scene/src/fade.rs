//! Fade timing for area transitions.
//!
//! Only the timing is modelled here. A renderer that wants a visible fade
//! reads [`FadeTimer::alpha`] (or the controller's `fade_alpha`) each frame.

use serde::{Deserialize, Serialize};

/// Maximum fade duration in seconds.
pub const MAX_FADE_DURATION: f32 = 10.0;

/// Curve applied to fade progress before it becomes an alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeEasing {
    /// Alpha follows progress directly.
    #[default]
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow finish.
    EaseOut,
    /// Hermite curve, slow at both ends.
    SmoothStep,
}

impl FadeEasing {
    /// Maps progress in `[0, 1]` onto the curve. Input outside the range is clamped.
    #[must_use]
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Direction of a fade half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeDirection {
    /// Screen going to covered.
    #[default]
    Out,
    /// Screen coming back.
    In,
}

/// Timer for one half of a transition fade.
#[derive(Debug, Clone, Default)]
pub struct FadeTimer {
    duration: f32,
    elapsed: f32,
    direction: FadeDirection,
    easing: FadeEasing,
}

impl FadeTimer {
    /// Creates an idle timer.
    #[must_use]
    pub fn new(easing: FadeEasing) -> Self {
        Self {
            easing,
            ..Default::default()
        }
    }

    /// Restarts the timer for a new half.
    ///
    /// A non-finite duration is treated as zero.
    pub fn start(&mut self, direction: FadeDirection, duration: f32) {
        self.direction = direction;
        self.duration = if duration.is_finite() {
            duration.clamp(0.0, MAX_FADE_DURATION)
        } else {
            0.0
        };
        self.elapsed = 0.0;
    }

    /// Advances the timer by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    /// Whether the configured time has fully elapsed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Seconds left in this half.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    /// Overlay opacity: rises during `Out`, falls during `In`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        let eased = self.easing.apply(self.progress());
        match self.direction {
            FadeDirection::Out => eased,
            FadeDirection::In => 1.0 - eased,
        }
    }

    /// Direction of the current half.
    #[must_use]
    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Duration of the current half.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
