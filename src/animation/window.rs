//! Timing windows that stagger properties driven by one progress value.
//!
//! A window remaps the header progress `t` into a sub-interval before linear
//! interpolation. The thresholds are tuned constants, kept literal.

/// Remapping applied to the header progress before a field is interpolated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Window {
    /// `t` unchanged
    Linear,
    /// `clamp(2 * (t - 0.5), 0, 1)`: frozen for the first half
    LateStart,
    /// `clamp(2 * t, 0, 1)`: done by the halfway point
    EarlyFinish,
    /// `clamp((t - 0.7) / 0.3, 0, 1)`: frozen until 0.7
    Tail,
}

impl Window {
    pub const ALL: [Window; 4] = [
        Window::Linear,
        Window::LateStart,
        Window::EarlyFinish,
        Window::Tail,
    ];

    const LATE_START_AT: f32 = 0.5;
    const TAIL_START_AT: f32 = 0.7;
    const TAIL_SPAN: f32 = 0.3;

    /// Map header progress into this window's local progress
    pub fn remap(self, t: f32) -> f32 {
        match self {
            Window::Linear => t,
            Window::LateStart => (2.0 * (t - Self::LATE_START_AT)).clamp(0.0, 1.0),
            Window::EarlyFinish => (2.0 * t).clamp(0.0, 1.0),
            Window::Tail => ((t - Self::TAIL_START_AT) / Self::TAIL_SPAN).clamp(0.0, 1.0),
        }
    }
}
