//! Endpoint layout snapshots.

use crate::animation::{Interpolate as _, Window};
use shade_header_macros::Interpolate;

/// Every interpolatable header property at one moment.
///
/// Two long-lived snapshots hold the collapsed and expanded endpoints; a third
/// is recomputed from them whenever progress changes. Each field carries its
/// timing window; fields without one move linearly with progress.
#[derive(Debug, Clone, Copy, PartialEq, Interpolate)]
pub struct Snapshot {
    // Position / offset
    pub clock_y: f32,
    pub date_y: f32,
    pub weather_y: f32,
    pub avatar_x: f32,
    pub avatar_y: f32,
    /// Leading edge of the system icons for the current direction
    pub battery_x: f32,
    pub battery_y: f32,

    // Scale
    pub time_scale: f32,
    pub avatar_scale: f32,
    pub network_traffic_scale: f32,

    /// Degrees
    #[window(late_start)]
    pub settings_rotation: f32,

    // Translation offsets
    pub settings_translation: f32,
    pub halo_button_translation: f32,
    pub task_manager_translation: f32,

    // Opacity
    #[window(tail)]
    pub date_expanded_alpha: f32,
    #[window(tail)]
    pub date_collapsed_alpha: f32,
    #[window(late_start)]
    pub emergency_calls_only_alpha: f32,
    #[window(tail)]
    pub alarm_status_alpha: f32,
    #[window(tail)]
    pub battery_level_alpha: f32,
    #[window(tail)]
    pub task_manager_alpha: f32,
    #[window(tail)]
    pub settings_alpha: f32,
    #[window(tail)]
    pub halo_button_alpha: f32,
    #[window(early_finish)]
    pub signal_cluster_alpha: f32,
    #[window(tail)]
    pub weather_image_alpha: f32,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            clock_y: 0.0,
            date_y: 0.0,
            weather_y: 0.0,
            avatar_x: 0.0,
            avatar_y: 0.0,
            battery_x: 0.0,
            battery_y: 0.0,
            time_scale: 1.0,
            avatar_scale: 0.0,
            network_traffic_scale: 1.0,
            settings_rotation: 0.0,
            settings_translation: 0.0,
            halo_button_translation: 0.0,
            task_manager_translation: 0.0,
            date_expanded_alpha: 0.0,
            date_collapsed_alpha: 0.0,
            emergency_calls_only_alpha: 0.0,
            alarm_status_alpha: 0.0,
            battery_level_alpha: 0.0,
            task_manager_alpha: 0.0,
            settings_alpha: 0.0,
            halo_button_alpha: 0.0,
            signal_cluster_alpha: 0.0,
            weather_image_alpha: 0.0,
        }
    }
}

impl Snapshot {
    /// Opacity fields, each kept in `[0, 1]`
    pub const ALPHA_FIELDS: [&'static str; 10] = [
        "date_expanded_alpha",
        "date_collapsed_alpha",
        "emergency_calls_only_alpha",
        "alarm_status_alpha",
        "battery_level_alpha",
        "task_manager_alpha",
        "settings_alpha",
        "halo_button_alpha",
        "signal_cluster_alpha",
        "weather_image_alpha",
    ];

    /// Scale fields, each kept `>= 0`
    pub const SCALE_FIELDS: [&'static str; 3] =
        ["time_scale", "avatar_scale", "network_traffic_scale"];

    /// Blend two endpoints at progress `t`.
    ///
    /// `t` must already be in `[0, 1]`. At `t == 0` the result equals
    /// `collapsed` field-for-field, at `t == 1` it equals `expanded`.
    pub fn between(collapsed: &Snapshot, expanded: &Snapshot, t: f32) -> Snapshot {
        Snapshot::interpolate(collapsed, expanded, t)
    }

    /// Timing window a field is driven by
    pub fn window_of(name: &str) -> Option<Window> {
        Window::ALL
            .into_iter()
            .find(|window| Snapshot::fields_in(*window).contains(&name))
    }

    /// Whether every field holds the same bits as in `other`
    pub fn bit_identical(&self, other: &Snapshot) -> bool {
        Snapshot::FIELD_NAMES.iter().all(|name| {
            match (self.get(name), other.get(name)) {
                (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collapsed() -> Snapshot {
        Snapshot {
            settings_rotation: 90.0,
            emergency_calls_only_alpha: 0.0,
            signal_cluster_alpha: 1.0,
            battery_level_alpha: 0.0,
            clock_y: 100.0,
            ..Snapshot::default()
        }
    }

    fn expanded() -> Snapshot {
        Snapshot {
            settings_rotation: 0.0,
            emergency_calls_only_alpha: 1.0,
            signal_cluster_alpha: 0.0,
            battery_level_alpha: 1.0,
            clock_y: 300.0,
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_endpoints_exact() {
        let c = collapsed();
        let e = expanded();
        assert!(Snapshot::between(&c, &e, 0.0).bit_identical(&c));
        assert!(Snapshot::between(&c, &e, 1.0).bit_identical(&e));
    }

    #[test]
    fn test_linear_field() {
        let frame = Snapshot::between(&collapsed(), &expanded(), 0.25);
        assert!((frame.clock_y - 150.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_frozen_early() {
        let frame = Snapshot::between(&collapsed(), &expanded(), 0.3);
        assert_eq!(frame.settings_rotation, 90.0);
    }

    #[test]
    fn test_rotation_late() {
        let frame = Snapshot::between(&collapsed(), &expanded(), 0.8);
        assert!((frame.settings_rotation - 36.0).abs() < 1e-3);
    }

    #[test]
    fn test_tail_alpha() {
        let frame = Snapshot::between(&collapsed(), &expanded(), 0.75);
        assert!((frame.battery_level_alpha - 0.1667).abs() < 1e-3);
    }

    #[test]
    fn test_signal_cluster_done_by_half() {
        let frame = Snapshot::between(&collapsed(), &expanded(), 0.5);
        assert_eq!(frame.signal_cluster_alpha, 0.0);
        let frame = Snapshot::between(&collapsed(), &expanded(), 0.25);
        assert!((frame.signal_cluster_alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_window_assignment() {
        assert_eq!(Snapshot::window_of("settings_rotation"), Some(Window::LateStart));
        assert_eq!(
            Snapshot::window_of("emergency_calls_only_alpha"),
            Some(Window::LateStart)
        );
        assert_eq!(
            Snapshot::window_of("signal_cluster_alpha"),
            Some(Window::EarlyFinish)
        );
        assert_eq!(Snapshot::window_of("clock_y"), Some(Window::Linear));
        assert_eq!(Snapshot::fields_in(Window::Tail).len(), 8);
        assert_eq!(Snapshot::window_of("nope"), None);
    }

    #[test]
    fn test_every_alpha_field_is_windowed() {
        for name in Snapshot::ALPHA_FIELDS {
            assert_ne!(Snapshot::window_of(name), Some(Window::Linear), "{}", name);
        }
    }

    #[test]
    fn test_get_set_by_name() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.set("avatar_x", 12.5));
        assert_eq!(snapshot.get("avatar_x"), Some(12.5));
        assert!(!snapshot.set("missing", 1.0));
        assert_eq!(Snapshot::FIELD_NAMES.len(), 24);
    }
}
