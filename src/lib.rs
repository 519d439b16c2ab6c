//! Collapsible notification-shade header.
//!
//! A single progress value in `[0, 1]` drives every animated property of the
//! header between two captured layouts, each property on its own timing
//! window. Overlay panels temporarily take over some of those properties and
//! run their own timed cross-fades.

extern crate self as shade_header;

pub mod animation;
pub mod capture;
pub mod config;
pub mod controller;
pub mod discrete;
pub mod engine;
pub mod header;
pub mod host;
pub mod jobs;
pub mod overlay;
pub mod sim;
pub mod snapshot;

pub use shade_header_macros::Interpolate;

pub mod prelude {
    pub use crate::animation::{Animatable, Interpolate, Transition, Tween, Window};
    pub use crate::config::{ConfigKey, ConfigSource, ConfigValue, HeaderConfig, MemoryConfig};
    pub use crate::engine::{AlphaChannels, ApplyMask, Endpoint, TransitionEngine};
    pub use crate::header::Header;
    pub use crate::host::{Direction, Element, LayoutParams, Rect, Reveal, ViewHost, Visibility};
    pub use crate::overlay::{HeaderEvent, OverlayContent, OverlayKind, OverlayPhase};
    pub use crate::sim::SimHost;
    pub use crate::snapshot::Snapshot;
}
