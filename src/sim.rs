//! In-memory view host.
//!
//! `SimHost` keeps one precomputed layout per header height and switches
//! between them when a layout pass runs, picking the one whose height matches
//! the height last requested through the header's layout params. Every write
//! is recorded per element so tests and the demo can inspect the result.

use std::collections::BTreeMap;

use crate::host::{Direction, Element, LayoutParams, Rect, Reveal, ViewHost, Visibility};

/// Everything written to one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale: f32,
    pub rotation: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub alpha: f32,
    pub visibility: Visibility,
    pub clickable: bool,
    pub force_shown: bool,
    pub layout: LayoutParams,
    pub reveal: Option<Reveal>,
    /// Bring-to-front order; higher is on top
    pub z: u32,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            scale: 1.0,
            rotation: 0.0,
            translation_x: 0.0,
            translation_y: 0.0,
            alpha: 1.0,
            visibility: Visibility::Visible,
            clickable: false,
            force_shown: false,
            layout: LayoutParams::default(),
            reveal: None,
            z: 0,
        }
    }
}

/// Laid-out bounds for one header height
#[derive(Debug, Clone, PartialEq)]
pub struct SimLayout {
    pub height: f32,
    pub rects: BTreeMap<Element, Rect>,
}

#[derive(Debug, Clone)]
pub struct SimHost {
    width: f32,
    direction: Direction,
    layouts: Vec<SimLayout>,
    /// Index into `layouts` of the last pass
    current: usize,
    states: BTreeMap<Element, ElementState>,
    clip_height: Option<f32>,
    layout_requests: usize,
    layout_passes: usize,
    writes: usize,
    next_z: u32,
}

impl SimHost {
    /// Host with the given layouts; the first one is current until a pass runs
    pub fn new(width: f32, layouts: Vec<SimLayout>) -> Self {
        let states = Element::ALL
            .into_iter()
            .map(|id| (id, ElementState::default()))
            .collect();
        Self {
            width,
            direction: Direction::Ltr,
            layouts,
            current: 0,
            states,
            clip_height: None,
            layout_requests: 0,
            layout_passes: 0,
            writes: 0,
            next_z: 0,
        }
    }

    /// A phone-sized header laid out for both heights
    pub fn standard(width: f32, collapsed_height: f32, expanded_height: f32) -> Self {
        Self::new(
            width,
            vec![
                standard_layout(width, collapsed_height, false),
                standard_layout(width, expanded_height, true),
            ],
        )
    }

    /// Same host laid out right-to-left
    pub fn mirrored(mut self) -> Self {
        let width = self.width;
        for layout in &mut self.layouts {
            for rect in layout.rects.values_mut() {
                *rect = rect.mirrored(width);
            }
        }
        self.direction = match self.direction {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        };
        self
    }

    /// Detach an element; it no longer reports geometry or accepts writes
    pub fn remove(&mut self, id: Element) {
        self.states.remove(&id);
        for layout in &mut self.layouts {
            layout.rects.remove(&id);
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn state(&self, id: Element) -> Option<&ElementState> {
        self.states.get(&id)
    }

    pub fn states(&self) -> BTreeMap<Element, ElementState> {
        self.states.clone()
    }

    /// Header height of the layout the last pass produced
    pub fn laid_out_height(&self) -> Option<f32> {
        self.layouts.get(self.current).map(|layout| layout.height)
    }

    pub fn clip_height(&self) -> Option<f32> {
        self.clip_height
    }

    pub fn layout_requests(&self) -> usize {
        self.layout_requests
    }

    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Number of property writes accepted so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn write(&mut self, id: Element, f: impl FnOnce(&mut ElementState)) {
        if let Some(state) = self.states.get_mut(&id) {
            f(state);
            self.writes += 1;
        }
    }
}

impl ViewHost for SimHost {
    fn geometry(&self, id: Element) -> Option<Rect> {
        self.states.get(&id)?;
        self.layouts.get(self.current)?.rects.get(&id).copied()
    }

    fn visibility(&self, id: Element) -> Option<Visibility> {
        self.states.get(&id).map(|state| state.visibility)
    }

    fn text_direction(&self) -> Direction {
        self.direction
    }

    fn set_x(&mut self, id: Element, x: f32) {
        self.write(id, |state| state.x = Some(x));
    }

    fn set_y(&mut self, id: Element, y: f32) {
        self.write(id, |state| state.y = Some(y));
    }

    fn set_scale(&mut self, id: Element, scale: f32) {
        self.write(id, |state| state.scale = scale);
    }

    fn set_rotation(&mut self, id: Element, degrees: f32) {
        self.write(id, |state| state.rotation = degrees);
    }

    fn set_translation_x(&mut self, id: Element, dx: f32) {
        self.write(id, |state| state.translation_x = dx);
    }

    fn set_translation_y(&mut self, id: Element, dy: f32) {
        self.write(id, |state| state.translation_y = dy);
    }

    fn set_alpha(&mut self, id: Element, alpha: f32) {
        self.write(id, |state| state.alpha = alpha);
    }

    fn set_visibility(&mut self, id: Element, visibility: Visibility) {
        self.write(id, |state| state.visibility = visibility);
    }

    fn bring_to_front(&mut self, id: Element) {
        if self.states.contains_key(&id) {
            self.next_z += 1;
            let z = self.next_z;
            self.write(id, |state| state.z = z);
        }
    }

    fn set_clickable(&mut self, id: Element, clickable: bool) {
        self.write(id, |state| state.clickable = clickable);
    }

    fn set_layout_params(&mut self, id: Element, params: LayoutParams) {
        self.write(id, |state| {
            let layout = &mut state.layout;
            layout.width = params.width.or(layout.width);
            layout.height = params.height.or(layout.height);
            layout.margin_end = params.margin_end.or(layout.margin_end);
            layout.margin_bottom = params.margin_bottom.or(layout.margin_bottom);
            layout.text_size = params.text_size.or(layout.text_size);
            layout.start_of = params.start_of.or(layout.start_of);
        });
    }

    fn set_force_shown(&mut self, id: Element, forced: bool) {
        self.write(id, |state| state.force_shown = forced);
    }

    fn set_clip_height(&mut self, height: f32) {
        self.clip_height = Some(height);
    }

    fn set_reveal(&mut self, id: Element, reveal: Reveal) {
        self.write(id, |state| state.reveal = Some(reveal));
    }

    fn request_layout(&mut self) {
        self.layout_requests += 1;
    }

    fn layout(&mut self) {
        self.layout_passes += 1;
        let Some(requested) = self
            .states
            .get(&Element::Header)
            .and_then(|state| state.layout.height)
        else {
            return;
        };
        let closest = self
            .layouts
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.height - requested)
                    .abs()
                    .total_cmp(&(b.height - requested).abs())
            })
            .map(|(index, _)| index);
        if let Some(index) = closest {
            self.current = index;
        }
    }
}

/// Bounds of a stock header: clock and date stacked on the start side, the
/// system icons and buttons on the end side.
pub fn standard_layout(width: f32, height: f32, expanded: bool) -> SimLayout {
    let (clock_height, button) = if expanded { (96.0, 48.0) } else { (64.0, 40.0) };
    let margin = 16.0;
    let end = width - margin;

    let clock = Rect::new(margin, height - 48.0 - clock_height, 240.0, clock_height);
    let date_group = Rect::new(margin, height - 44.0, 320.0, 32.0);

    let multi_user_width = if expanded { 64.0 } else { 48.0 };
    let multi_user = Rect::new(end - multi_user_width, 12.0, multi_user_width, 48.0);
    let avatar_size = if expanded { 48.0 } else { 36.0 };
    let avatar = Rect::new(
        multi_user.x + (multi_user.width - avatar_size) / 2.0,
        multi_user.y + (multi_user.height - avatar_size) / 2.0,
        avatar_size,
        avatar_size,
    );

    // Buttons sit in a row below the top bar when expanded, stacked under the
    // multi-user switch when collapsed.
    let row_y = if expanded { height - 44.0 - button } else { 12.0 };
    let settings = Rect::new(end - button, row_y, button, button);
    let halo = Rect::new(settings.x - button - 8.0, row_y, button, button);
    let task_manager = Rect::new(halo.x - button - 8.0, row_y, button, button);

    let icons_end = if expanded {
        end - multi_user_width - 8.0
    } else {
        multi_user.x - 8.0
    };
    let system_icons = Rect::new(icons_end - 160.0, 16.0, 160.0, 40.0);
    let signal_cluster = Rect::new(system_icons.x + 8.0, 20.0, 72.0, 32.0);
    let battery = Rect::new(system_icons.right() - 56.0, 20.0, 48.0, 32.0);

    let weather_line_1 = Rect::new(width / 2.0, clock.y + 8.0, 280.0, 24.0);
    let weather_line_2 = Rect::new(width / 2.0, clock.y + 36.0, 280.0, 20.0);

    let rects = BTreeMap::from([
        (Element::Header, Rect::new(0.0, 0.0, width, height)),
        (Element::Clock, clock),
        (Element::Time, Rect::new(clock.x, clock.y, 180.0, clock.height)),
        (Element::DateGroup, date_group),
        (Element::DateCollapsed, Rect::new(margin, date_group.y, 160.0, 32.0)),
        (Element::DateExpanded, Rect::new(margin, date_group.y, 300.0, 32.0)),
        (Element::AlarmStatus, Rect::new(margin + 168.0, date_group.y, 140.0, 32.0)),
        (Element::EmergencyCallsOnly, Rect::new(margin, 12.0, 320.0, 24.0)),
        (Element::MultiUserSwitch, multi_user),
        (Element::Avatar, avatar),
        (Element::SystemIcons, system_icons),
        (Element::BatteryLevel, battery),
        (Element::DockBatteryLevel, Rect::new(battery.x - 52.0, 20.0, 48.0, 32.0)),
        (Element::SignalCluster, signal_cluster),
        (Element::Settings, settings),
        (Element::HaloButton, halo),
        (Element::TaskManager, task_manager),
        (Element::NetworkTraffic, Rect::new(system_icons.x - 64.0, 20.0, 56.0, 32.0)),
        (
            Element::WeatherContainer,
            Rect::new(width / 2.0, clock.y, 300.0, 64.0),
        ),
        (Element::WeatherLine1, weather_line_1),
        (Element::WeatherLine2, weather_line_2),
        (
            Element::WeatherImage,
            Rect::new(width / 2.0 - 56.0, clock.y + 8.0, 48.0, 48.0),
        ),
        (Element::WeatherDetail, Rect::new(0.0, 0.0, width, height)),
        (Element::DetailHeader, Rect::new(margin, height - 56.0, width - 2.0 * margin, 48.0)),
    ]);

    SimLayout { height, rects }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_follows_requested_height() {
        let mut host = SimHost::standard(1080.0, 200.0, 500.0);
        host.layout();
        assert_eq!(host.laid_out_height(), Some(200.0));

        host.set_layout_params(Element::Header, LayoutParams::default().height(500.0));
        assert_eq!(host.laid_out_height(), Some(200.0));
        host.layout();
        assert_eq!(host.laid_out_height(), Some(500.0));
        assert_eq!(host.geometry(Element::Header).unwrap().height, 500.0);
    }

    #[test]
    fn test_position_writes_do_not_move_geometry() {
        let mut host = SimHost::standard(1080.0, 200.0, 500.0);
        let before = host.geometry(Element::Clock);
        host.set_y(Element::Clock, 3.0);
        assert_eq!(host.geometry(Element::Clock), before);
        assert_eq!(host.state(Element::Clock).unwrap().y, Some(3.0));
    }

    #[test]
    fn test_removed_element_ignores_writes() {
        let mut host = SimHost::standard(1080.0, 200.0, 500.0);
        host.remove(Element::HaloButton);
        let writes = host.writes();
        host.set_alpha(Element::HaloButton, 0.5);
        assert_eq!(host.writes(), writes);
        assert_eq!(host.geometry(Element::HaloButton), None);
        assert_eq!(host.visibility(Element::HaloButton), None);
    }

    #[test]
    fn test_mirrored_layout() {
        let ltr = SimHost::standard(1080.0, 200.0, 500.0);
        let rtl = SimHost::standard(1080.0, 200.0, 500.0).mirrored();
        let a = ltr.geometry(Element::SystemIcons).unwrap();
        let b = rtl.geometry(Element::SystemIcons).unwrap();
        assert_eq!(b.left(), 1080.0 - a.right());
        assert_eq!(rtl.text_direction(), Direction::Rtl);
    }

    #[test]
    fn test_layout_params_merge() {
        let mut host = SimHost::standard(1080.0, 200.0, 500.0);
        host.set_layout_params(Element::MultiUserSwitch, LayoutParams::default().width(48.0));
        host.set_layout_params(
            Element::MultiUserSwitch,
            LayoutParams::default().margin_end(8.0),
        );
        let layout = host.state(Element::MultiUserSwitch).unwrap().layout;
        assert_eq!(layout.width, Some(48.0));
        assert_eq!(layout.margin_end, Some(8.0));
    }
}
