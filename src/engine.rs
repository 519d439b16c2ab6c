//! Interpolation between the two endpoint snapshots and the apply step that
//! pushes a frame to the view host.

use bitflags::bitflags;

use crate::config::HeaderConfig;
use crate::host::{Direction, Element, ViewHost, Visibility};
use crate::snapshot::Snapshot;

bitflags! {
    /// Opacity channels of a frame. An overlay suspends the channels it owns
    /// while its own cross-fade is authoritative.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AlphaChannels: u16 {
        const DATE_EXPANDED        = 1 << 0;
        const DATE_COLLAPSED       = 1 << 1;
        const EMERGENCY_CALLS_ONLY = 1 << 2;
        const ALARM_STATUS         = 1 << 3;
        const BATTERY_LEVEL        = 1 << 4;
        const TASK_MANAGER         = 1 << 5;
        const SETTINGS             = 1 << 6;
        const HALO_BUTTON          = 1 << 7;
        const SIGNAL_CLUSTER       = 1 << 8;
        const WEATHER_IMAGE        = 1 << 9;
    }
}

/// One of the two discrete header states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Collapsed,
    Expanded,
}

impl Endpoint {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded {
            Endpoint::Expanded
        } else {
            Endpoint::Collapsed
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Endpoint::Expanded
    }

    pub fn flipped(self) -> Self {
        match self {
            Endpoint::Collapsed => Endpoint::Expanded,
            Endpoint::Expanded => Endpoint::Collapsed,
        }
    }
}

/// Discrete context for one `apply` call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyMask {
    /// Header is in the expanded state. While collapsed the time and network
    /// traffic text keep their natural scale.
    pub expanded: bool,
    /// Whether the signal cluster is pinned beside the system icons
    pub signal_cluster_detached: bool,
    /// Channels an overlay currently owns
    pub suspended: AlphaChannels,
}

impl ApplyMask {
    pub fn for_state(expanded: bool, suspended: AlphaChannels) -> Self {
        Self {
            expanded,
            signal_cluster_detached: expanded,
            suspended,
        }
    }
}

impl Default for ApplyMask {
    fn default() -> Self {
        Self::for_state(false, AlphaChannels::empty())
    }
}

/// Owns the endpoint snapshots and the current frame
#[derive(Debug, Clone, Default)]
pub struct TransitionEngine {
    collapsed: Snapshot,
    expanded: Snapshot,
    current: Snapshot,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure blend of two endpoints at `t`
    pub fn interpolate(collapsed: &Snapshot, expanded: &Snapshot, t: f32) -> Snapshot {
        Snapshot::between(collapsed, expanded, t)
    }

    /// Recompute the current frame for `t`, re-clamping it first
    pub fn update(&mut self, t: f32) -> &Snapshot {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.current = Self::interpolate(&self.collapsed, &self.expanded, t);
        &self.current
    }

    pub fn current_frame(&self) -> &Snapshot {
        &self.current
    }

    pub fn endpoint(&self, which: Endpoint) -> &Snapshot {
        match which {
            Endpoint::Collapsed => &self.collapsed,
            Endpoint::Expanded => &self.expanded,
        }
    }

    pub(crate) fn store(&mut self, which: Endpoint, snapshot: Snapshot) {
        match which {
            Endpoint::Collapsed => self.collapsed = snapshot,
            Endpoint::Expanded => self.expanded = snapshot,
        }
    }

    /// Forget everything captured; used on detach
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sample the host into a snapshot for `which`.
    ///
    /// Only meaningful while the host is laid out in that state. Fields whose
    /// elements are missing keep the value of the stored endpoint, and so do
    /// the `held` alpha channels, whose visibilities were not reset for the
    /// capture.
    pub fn capture_endpoint<H: ViewHost + ?Sized>(
        &self,
        which: Endpoint,
        host: &H,
        config: &HeaderConfig,
        held: AlphaChannels,
    ) -> Snapshot {
        let expanded = which.is_expanded();
        let mut s = *self.endpoint(which);

        s.time_scale = if expanded {
            1.0
        } else {
            config.clock_collapsed_scale()
        };
        s.avatar_scale = if expanded {
            1.0
        } else {
            config.avatar_collapsed_scale()
        };
        s.network_traffic_scale = if expanded { 1.0 } else { 0.0 };
        s.settings_rotation = if expanded { 0.0 } else { 90.0 };
        // The cluster moves to the header overlay while expanded
        s.signal_cluster_alpha = if expanded { 0.0 } else { 1.0 };

        if let Some(clock) = geometry(host, Element::Clock) {
            s.clock_y = clock.bottom();
            if let Some(line) = geometry(host, Element::WeatherLine1) {
                s.weather_y = clock.bottom() - line.height;
            }
        }
        if let Some(date) = geometry(host, Element::DateGroup) {
            s.date_y = date.top();
        }
        if let Some(avatar) = geometry(host, Element::Avatar) {
            s.avatar_x = avatar.left();
            s.avatar_y = avatar.top();
        }
        if let Some(icons) = geometry(host, Element::SystemIcons) {
            s.battery_x = match host.text_direction() {
                Direction::Ltr => icons.right(),
                Direction::Rtl => icons.left(),
            };
            s.battery_y = icons.top();
        }

        if expanded {
            s.settings_translation = 0.0;
            s.halo_button_translation = 0.0;
            s.task_manager_translation = 0.0;
        } else {
            if let Some(dx) = left_offset(host, Element::MultiUserSwitch, Element::Settings) {
                s.settings_translation = dx;
            }
            if let Some(dx) = left_offset(host, Element::Settings, Element::HaloButton) {
                s.halo_button_translation = dx;
            }
            if let Some(dx) = left_offset(host, Element::HaloButton, Element::TaskManager) {
                s.task_manager_translation = dx;
            }
        }

        let alphas: [(AlphaChannels, &mut f32, Element); 9] = [
            (
                AlphaChannels::EMERGENCY_CALLS_ONLY,
                &mut s.emergency_calls_only_alpha,
                Element::EmergencyCallsOnly,
            ),
            (AlphaChannels::ALARM_STATUS, &mut s.alarm_status_alpha, Element::AlarmStatus),
            (AlphaChannels::DATE_COLLAPSED, &mut s.date_collapsed_alpha, Element::DateCollapsed),
            (AlphaChannels::DATE_EXPANDED, &mut s.date_expanded_alpha, Element::DateExpanded),
            (AlphaChannels::BATTERY_LEVEL, &mut s.battery_level_alpha, Element::BatteryLevel),
            (AlphaChannels::SETTINGS, &mut s.settings_alpha, Element::Settings),
            (AlphaChannels::HALO_BUTTON, &mut s.halo_button_alpha, Element::HaloButton),
            (AlphaChannels::TASK_MANAGER, &mut s.task_manager_alpha, Element::TaskManager),
            (AlphaChannels::WEATHER_IMAGE, &mut s.weather_image_alpha, Element::WeatherImage),
        ];
        for (channel, field, id) in alphas {
            if held.contains(channel) {
                continue;
            }
            if let Some(alpha) = visibility_alpha(host, id) {
                *field = alpha;
            }
        }

        s
    }

    /// Push every field of `frame` to the host.
    ///
    /// Writing the same frame twice leaves the host unchanged.
    pub fn apply<H: ViewHost + ?Sized>(
        frame: &Snapshot,
        host: &mut H,
        direction: Direction,
        mask: ApplyMask,
    ) {
        let (time_scale, traffic_scale) = if mask.expanded {
            (frame.time_scale.max(0.0), frame.network_traffic_scale.max(0.0))
        } else {
            (1.0, 1.0)
        };
        host.set_scale(Element::Time, time_scale);
        if let Some(clock) = geometry(host, Element::Clock) {
            host.set_y(Element::Clock, frame.clock_y - clock.height);
        }
        host.set_y(Element::DateGroup, frame.date_y);
        host.set_y(Element::WeatherContainer, frame.weather_y);
        host.set_y(Element::AlarmStatus, frame.date_y);

        host.set_scale(Element::Avatar, frame.avatar_scale.max(0.0));
        host.set_x(Element::Avatar, frame.avatar_x);
        host.set_y(Element::Avatar, frame.avatar_y);
        host.set_scale(Element::NetworkTraffic, traffic_scale);

        if let Some(icons) = geometry(host, Element::SystemIcons) {
            let icons_x = match direction {
                Direction::Ltr => frame.battery_x - icons.width,
                Direction::Rtl => frame.battery_x,
            };
            host.set_x(Element::SystemIcons, icons_x);
            host.set_y(Element::SystemIcons, frame.battery_y);

            if mask.signal_cluster_detached {
                if let Some(cluster) = geometry(host, Element::SignalCluster) {
                    let cluster_x = match direction {
                        Direction::Ltr => icons_x - cluster.width,
                        Direction::Rtl => icons_x + icons.width,
                    };
                    host.set_x(Element::SignalCluster, cluster_x);
                    host.set_y(
                        Element::SignalCluster,
                        frame.battery_y + icons.height / 2.0 - cluster.height / 2.0,
                    );
                }
            } else {
                host.set_translation_x(Element::SignalCluster, 0.0);
                host.set_translation_y(Element::SignalCluster, 0.0);
            }

            let icons_dy = frame.battery_y - icons.top();
            for (id, dx) in [
                (Element::Settings, frame.settings_translation),
                (Element::HaloButton, frame.halo_button_translation),
                (Element::TaskManager, frame.task_manager_translation),
            ] {
                host.set_translation_y(id, icons_dy);
                host.set_translation_x(id, dx);
                host.set_rotation(id, frame.settings_rotation);
            }
        } else {
            log::trace!("system icons missing; skipping battery position");
        }

        for (channel, alpha, targets) in alpha_targets(frame) {
            if mask.suspended.contains(channel) {
                continue;
            }
            for &id in targets {
                apply_alpha(host, id, alpha);
            }
        }
    }

    /// Pin the alarm status to the trailing edge of the collapsed date
    pub fn place_alarm_status<H: ViewHost + ?Sized>(host: &mut H, direction: Direction) {
        let (Some(date), Some(alarm)) = (
            geometry(host, Element::DateCollapsed),
            geometry(host, Element::AlarmStatus),
        ) else {
            return;
        };
        let x = match direction {
            Direction::Ltr => date.right(),
            Direction::Rtl => date.left() - alarm.width,
        };
        host.set_x(Element::AlarmStatus, x);
    }
}

fn alpha_targets(frame: &Snapshot) -> [(AlphaChannels, f32, &'static [Element]); 10] {
    [
        (
            AlphaChannels::EMERGENCY_CALLS_ONLY,
            frame.emergency_calls_only_alpha,
            &[Element::EmergencyCallsOnly],
        ),
        (
            AlphaChannels::ALARM_STATUS,
            frame.alarm_status_alpha,
            &[Element::AlarmStatus],
        ),
        (
            AlphaChannels::WEATHER_IMAGE,
            frame.weather_image_alpha,
            &[Element::WeatherImage],
        ),
        (
            AlphaChannels::DATE_COLLAPSED,
            frame.date_collapsed_alpha,
            &[Element::DateCollapsed],
        ),
        (
            AlphaChannels::DATE_EXPANDED,
            frame.date_expanded_alpha,
            &[Element::DateExpanded],
        ),
        (
            AlphaChannels::BATTERY_LEVEL,
            frame.battery_level_alpha,
            &[Element::BatteryLevel, Element::DockBatteryLevel],
        ),
        (
            AlphaChannels::SETTINGS,
            frame.settings_alpha,
            &[Element::Settings, Element::WeatherLine1, Element::WeatherLine2],
        ),
        (
            AlphaChannels::TASK_MANAGER,
            frame.task_manager_alpha,
            &[Element::TaskManager],
        ),
        (
            AlphaChannels::HALO_BUTTON,
            frame.halo_button_alpha,
            &[Element::HaloButton],
        ),
        (
            AlphaChannels::SIGNAL_CLUSTER,
            frame.signal_cluster_alpha,
            &[Element::SignalCluster],
        ),
    ]
}

fn geometry<H: ViewHost + ?Sized>(host: &H, id: Element) -> Option<crate::host::Rect> {
    let rect = host.geometry(id);
    if rect.is_none() {
        log::trace!("{:?} missing; skipping its fields", id);
    }
    rect
}

fn left_offset<H: ViewHost + ?Sized>(host: &H, to: Element, from: Element) -> Option<f32> {
    Some(geometry(host, to)?.left() - geometry(host, from)?.left())
}

fn visibility_alpha<H: ViewHost + ?Sized>(host: &H, id: Element) -> Option<f32> {
    host.visibility(id).map(|visibility| match visibility {
        Visibility::Visible => 1.0,
        Visibility::Invisible | Visibility::Gone => 0.0,
    })
}

/// Zero alpha hides the element but keeps its space; removed elements stay removed.
fn apply_alpha<H: ViewHost + ?Sized>(host: &mut H, id: Element, alpha: f32) {
    match host.visibility(id) {
        None | Some(Visibility::Gone) => {}
        Some(_) => {
            let alpha = if alpha.is_nan() {
                0.0
            } else {
                alpha.clamp(0.0, 1.0)
            };
            if alpha == 0.0 {
                host.set_visibility(id, Visibility::Invisible);
            } else {
                host.set_visibility(id, Visibility::Visible);
                host.set_alpha(id, alpha);
            }
        }
    }
}
