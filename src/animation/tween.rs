use std::time::{Duration, Instant};

use super::{Animatable, Transition};

/// A single clock-driven animation from one value to another.
///
/// Unlike the header progress, a tween advances with time: the owner samples
/// it with the loop's current `Instant` on every tick.
#[derive(Clone, Debug)]
pub struct Tween<T: Animatable> {
    /// Value when the animation started
    from: T,
    /// Value the animation settles on
    to: T,
    /// Time when the animation started
    start: Instant,
    /// Transition configuration
    transition: Transition,
}

impl<T: Animatable> Tween<T> {
    pub fn new(from: T, to: T, start: Instant, transition: Transition) -> Self {
        Self {
            from,
            to,
            start,
            transition,
        }
    }

    /// Interpolated value at `now`
    pub fn value_at(&self, now: Instant) -> T {
        let t = self.transition.progress(self.elapsed(now));
        T::lerp(&self.from, &self.to, t)
    }

    /// Whether the animation has reached its target at `now`
    pub fn is_finished(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.transition.as_duration()
    }

    pub fn from(&self) -> &T {
        &self.from
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    /// Time at which the animation settles
    pub fn end_time(&self) -> Instant {
        self.start + self.transition.as_duration()
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }
}
