//! Timing functions (easing curves) for clock-driven animations.
//!
//! Overlay cross-fades run [`TimingFunction::Linear`]; the weather panel's
//! circular reveal defaults to [`TimingFunction::EaseInOut`].

/// Timing function that controls the animation curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts slow, speeds up, then slows down
    EaseInOut,
}

impl TimingFunction {
    /// Evaluate the timing function at time t (0.0 to 1.0)
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseInOut => ease_in_out(t),
        }
    }
}

// Easing functions

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}
