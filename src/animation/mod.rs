mod animatable;
mod timing;
mod tween;
mod window;

pub use animatable::{Animatable, Interpolate};
pub use timing::TimingFunction;
pub use tween::Tween;
pub use window::Window;

use std::time::Duration;

/// Configuration for a fixed-duration, clock-driven animation
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Duration of the animation in milliseconds
    pub duration_ms: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
        }
    }

    /// Linear transition, the shape used by overlay cross-fades
    pub fn linear(duration_ms: f32) -> Self {
        Self::new(duration_ms, TimingFunction::Linear)
    }

    /// Duration as a `Duration`, for scheduling the completion callback
    pub fn as_duration(&self) -> Duration {
        Duration::from_micros((self.duration_ms.max(0.0) * 1000.0).round() as u64)
    }

    /// Eased progress after `elapsed`, in `[0, 1]`
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let t = (elapsed.as_secs_f64() * 1000.0 / self.duration_ms as f64).min(1.0);
        self.timing.evaluate(t as f32)
    }
}
