//! The view-host seam.
//!
//! The header never draws anything itself. It reads laid-out geometry from,
//! and pushes per-element properties to, a [`ViewHost`]. Elements are named
//! by the closed [`Element`] enum; the host resolves each one once and keeps
//! its own handle, so the core never looks anything up by string.

use crate::animation::Animatable;

/// Every element of the header the core reads or writes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    /// The header strip itself
    Header,
    /// Clock group (time + am/pm)
    Clock,
    /// Time text inside the clock group
    Time,
    DateGroup,
    DateCollapsed,
    DateExpanded,
    AlarmStatus,
    EmergencyCallsOnly,
    MultiUserSwitch,
    Avatar,
    /// System icons container (battery and friends)
    SystemIcons,
    BatteryLevel,
    DockBatteryLevel,
    SignalCluster,
    Settings,
    HaloButton,
    TaskManager,
    NetworkTraffic,
    WeatherContainer,
    WeatherLine1,
    WeatherLine2,
    WeatherImage,
    /// Full-width weather panel revealed over the header
    WeatherDetail,
    /// Title row shown while a detail panel or edit mode is active
    DetailHeader,
}

impl Element {
    pub const ALL: [Element; 24] = [
        Element::Header,
        Element::Clock,
        Element::Time,
        Element::DateGroup,
        Element::DateCollapsed,
        Element::DateExpanded,
        Element::AlarmStatus,
        Element::EmergencyCallsOnly,
        Element::MultiUserSwitch,
        Element::Avatar,
        Element::SystemIcons,
        Element::BatteryLevel,
        Element::DockBatteryLevel,
        Element::SignalCluster,
        Element::Settings,
        Element::HaloButton,
        Element::TaskManager,
        Element::NetworkTraffic,
        Element::WeatherContainer,
        Element::WeatherLine1,
        Element::WeatherLine2,
        Element::WeatherImage,
        Element::WeatherDetail,
        Element::DetailHeader,
    ];
}

/// Laid-out bounds of an element, in header-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Mirror horizontally inside a container of the given width
    pub fn mirrored(&self, container_width: f32) -> Self {
        Self {
            x: container_width - self.x - self.width,
            ..*self
        }
    }
}

/// Visibility of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    /// Occupies layout, renders nothing
    Invisible,
    /// Removed from layout
    Gone,
}

/// Layout direction reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Layout parameters changed by discrete (progress-independent) updates.
///
/// `None` leaves the corresponding parameter untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutParams {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub margin_end: Option<f32>,
    pub margin_bottom: Option<f32>,
    pub text_size: Option<f32>,
    /// Anchor this element to the start edge of another
    pub start_of: Option<Element>,
}

impl LayoutParams {
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn margin_end(mut self, margin: f32) -> Self {
        self.margin_end = Some(margin);
        self
    }

    pub fn margin_bottom(mut self, margin: f32) -> Self {
        self.margin_bottom = Some(margin);
        self
    }

    pub fn text_size(mut self, size: f32) -> Self {
        self.text_size = Some(size);
        self
    }

    pub fn start_of(mut self, anchor: Element) -> Self {
        self.start_of = Some(anchor);
        self
    }
}

/// Circular clip used to reveal the weather panel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reveal {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl Animatable for Reveal {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Reveal {
            center_x: f32::lerp(&from.center_x, &to.center_x, t),
            center_y: f32::lerp(&from.center_y, &to.center_y, t),
            radius: f32::lerp(&from.radius, &to.radius, t),
        }
    }
}

/// The view host the header drives.
///
/// Geometry getters report the *laid-out* bounds of an element: position
/// writes (`set_x`, translations) never feed back into `geometry`. Getters
/// return `None` for an element that is missing or detached; setters on such
/// an element must be silently ignored.
pub trait ViewHost {
    /// Laid-out bounds of an element
    fn geometry(&self, id: Element) -> Option<Rect>;

    /// Current visibility of an element
    fn visibility(&self, id: Element) -> Option<Visibility>;

    /// Current layout direction
    fn text_direction(&self) -> Direction;

    fn set_x(&mut self, id: Element, x: f32);
    fn set_y(&mut self, id: Element, y: f32);

    /// Uniform scale
    fn set_scale(&mut self, id: Element, scale: f32);

    /// Rotation in degrees
    fn set_rotation(&mut self, id: Element, degrees: f32);

    fn set_translation_x(&mut self, id: Element, dx: f32);
    fn set_translation_y(&mut self, id: Element, dy: f32);
    fn set_alpha(&mut self, id: Element, alpha: f32);
    fn set_visibility(&mut self, id: Element, visibility: Visibility);
    fn bring_to_front(&mut self, id: Element);
    fn set_clickable(&mut self, id: Element, clickable: bool);
    fn set_layout_params(&mut self, id: Element, params: LayoutParams);

    /// Keep a battery text element shown regardless of its own rules
    fn set_force_shown(&mut self, id: Element, forced: bool);

    /// Clip the header to the given height
    fn set_clip_height(&mut self, height: f32);

    fn set_reveal(&mut self, id: Element, reveal: Reveal);

    /// Ask for an asynchronous layout pass; the embedder reports it back
    /// through `Header::on_layout_pass`
    fn request_layout(&mut self);

    /// Run a layout pass synchronously
    fn layout(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn test_rect_mirrored() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let mirrored = rect.mirrored(100.0);
        assert_eq!(mirrored.left(), 60.0);
        assert_eq!(mirrored.right(), 90.0);
        assert_eq!(mirrored.mirrored(100.0), rect);
    }

    #[test]
    fn test_layout_params_builder() {
        let params = LayoutParams::default()
            .width(48.0)
            .margin_end(8.0)
            .start_of(Element::HaloButton);
        assert_eq!(params.width, Some(48.0));
        assert_eq!(params.margin_end, Some(8.0));
        assert_eq!(params.start_of, Some(Element::HaloButton));
        assert_eq!(params.height, None);
    }

    #[test]
    fn test_reveal_lerp() {
        let from = Reveal {
            center_x: 10.0,
            center_y: 20.0,
            radius: 0.0,
        };
        let to = Reveal {
            radius: 100.0,
            ..from
        };
        assert_eq!(Reveal::lerp(&from, &to, 0.5).radius, 50.0);
        assert_eq!(Reveal::lerp(&from, &to, 1.0), to);
    }
}
