//! Progress-independent layout.
//!
//! Everything here depends only on the expanded flag, the optional rows and
//! configuration: visibilities, click targets, layout parameters and the
//! baseline avatar scale. It is recomputed on every flip or structural change
//! and pushed to the host before the next layout pass.

use crate::config::HeaderConfig;
use crate::host::{Element, LayoutParams, ViewHost, Visibility};

/// Optional header rows reported by external providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderRows {
    pub alarm_showing: bool,
    pub emergency_calls_only: bool,
    /// Weather provider has usable data
    pub weather_valid: bool,
}

/// Discrete layout for one expanded state
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteLayout {
    /// Empty while the weather detail panel owns visibilities
    pub visibilities: Vec<(Element, Visibility)>,
    pub click_targets: Vec<(Element, bool)>,
    pub layout_params: Vec<(Element, LayoutParams)>,
    pub battery_text_forced: bool,
    pub avatar_scale: f32,
    /// Signal cluster is pinned beside the system icons
    pub signal_cluster_detached: bool,
}

impl DiscreteLayout {
    pub fn compute(
        expanded: bool,
        config: &HeaderConfig,
        rows: &HeaderRows,
        weather_detail_shown: bool,
    ) -> Self {
        let weather_header = config.show_weather_header;

        let mut visibilities = Vec::new();
        if !weather_detail_shown {
            let alarm_row = expanded && rows.alarm_showing;
            visibilities.extend([
                (Element::DateCollapsed, visible_or(alarm_row, Visibility::Invisible)),
                (Element::DateExpanded, visible_or(!alarm_row, Visibility::Invisible)),
                (Element::AlarmStatus, visible_or(alarm_row, Visibility::Invisible)),
                (Element::Settings, visible_or(expanded, Visibility::Invisible)),
                (Element::HaloButton, visible_or(expanded, Visibility::Invisible)),
                (
                    Element::WeatherContainer,
                    visible_or(expanded && config.show_weather, Visibility::Gone),
                ),
                (
                    Element::TaskManager,
                    visible_or(expanded && config.show_task_manager, Visibility::Gone),
                ),
                (
                    Element::EmergencyCallsOnly,
                    visible_or(expanded && rows.emergency_calls_only, Visibility::Gone),
                ),
                (Element::BatteryLevel, Visibility::Visible),
                (Element::DockBatteryLevel, Visibility::Visible),
                (
                    Element::WeatherImage,
                    visible_or(expanded && weather_header, Visibility::Invisible),
                ),
            ]);
        }

        let click_targets = vec![
            (Element::MultiUserSwitch, expanded),
            (Element::SystemIcons, expanded),
            (Element::AlarmStatus, rows.alarm_showing && !weather_detail_shown),
            (
                Element::WeatherImage,
                expanded && weather_header && !weather_detail_shown,
            ),
            (
                Element::WeatherDetail,
                expanded && weather_header && weather_detail_shown,
            ),
        ];

        let system_icons_anchor = if expanded && config.show_task_manager {
            Element::TaskManager
        } else if expanded {
            Element::HaloButton
        } else {
            Element::MultiUserSwitch
        };
        let pick = |collapsed: f32, expanded_value: f32| {
            if expanded {
                expanded_value
            } else {
                collapsed
            }
        };
        let layout_params = vec![
            (
                Element::Header,
                LayoutParams::default()
                    .height(pick(config.collapsed_height, config.expanded_height)),
            ),
            (
                Element::MultiUserSwitch,
                LayoutParams::default()
                    .width(pick(
                        config.multi_user_width_collapsed,
                        config.multi_user_width_expanded,
                    ))
                    .margin_end(pick(
                        config.multi_user_margin_collapsed,
                        config.multi_user_margin_expanded,
                    )),
            ),
            (
                Element::DateGroup,
                LayoutParams::default().margin_bottom(pick(
                    config.clock_margin_bottom_collapsed,
                    config.clock_margin_bottom_expanded,
                )),
            ),
            (
                Element::Time,
                LayoutParams::default()
                    .text_size(pick(config.clock_collapsed_size, config.clock_expanded_size)),
            ),
            (
                Element::SystemIcons,
                LayoutParams::default().start_of(system_icons_anchor),
            ),
        ];

        Self {
            visibilities,
            click_targets,
            layout_params,
            battery_text_forced: expanded && config.battery_text_expanded,
            avatar_scale: if expanded {
                1.0
            } else {
                config.avatar_collapsed_scale()
            },
            signal_cluster_detached: expanded,
        }
    }

    pub fn push_to<H: ViewHost + ?Sized>(&self, host: &mut H) {
        for &(id, params) in &self.layout_params {
            host.set_layout_params(id, params);
        }
        for &(id, visibility) in &self.visibilities {
            host.set_visibility(id, visibility);
        }
        if !self.visibilities.is_empty() {
            host.set_force_shown(Element::BatteryLevel, self.battery_text_forced);
            host.set_force_shown(Element::DockBatteryLevel, self.battery_text_forced);
        }
        for &(id, clickable) in &self.click_targets {
            host.set_clickable(id, clickable);
        }
        host.set_scale(Element::Avatar, self.avatar_scale);
        host.set_scale(Element::Time, 1.0);
    }

    pub fn visibility_of(&self, id: Element) -> Option<Visibility> {
        self.visibilities
            .iter()
            .find(|(element, _)| *element == id)
            .map(|&(_, visibility)| visibility)
    }

    pub fn is_clickable(&self, id: Element) -> Option<bool> {
        self.click_targets
            .iter()
            .find(|(element, _)| *element == id)
            .map(|&(_, clickable)| clickable)
    }

    pub fn params_of(&self, id: Element) -> Option<LayoutParams> {
        self.layout_params
            .iter()
            .find(|(element, _)| *element == id)
            .map(|&(_, params)| params)
    }
}

fn visible_or(visible: bool, otherwise: Visibility) -> Visibility {
    if visible {
        Visibility::Visible
    } else {
        otherwise
    }
}
