//! Overlay panels shown over the header.
//!
//! At most one overlay is active. While it is, its cross-fade owns a fixed set
//! of alpha channels and the engine leaves them alone. Every transition runs
//! for a fixed duration and is finished by a scheduled job whose id is the
//! transition's completion token; starting another transition cancels the
//! previous token, so a superseded transition never reports completion.

use std::time::Instant;

use crate::animation::{TimingFunction, Transition, Tween};
use crate::engine::AlphaChannels;
use crate::host::{Element, Reveal, ViewHost, Visibility};
use crate::jobs::{JobId, JobType, Scheduler};

/// Channels every overlay kind takes over from the engine
pub const OWNED_CHANNELS: AlphaChannels = AlphaChannels::ALARM_STATUS
    .union(AlphaChannels::WEATHER_IMAGE)
    .union(AlphaChannels::DATE_COLLAPSED)
    .union(AlphaChannels::DATE_EXPANDED);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Titled detail panel, optionally with a toggle
    Detail,
    /// Weather panel revealed from the weather image
    WeatherDetail,
    /// Edit mode; a detail panel with fixed content
    Edit,
}

/// What a detail panel shows in its header row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayContent {
    pub title: String,
    /// `Some` when the panel carries a toggle
    pub toggle: Option<bool>,
}

impl OverlayContent {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            toggle: None,
        }
    }

    pub fn with_toggle(mut self, state: bool) -> Self {
        self.toggle = Some(state);
        self
    }

    pub fn edit() -> Self {
        Self::titled("Edit")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Normal,
    Entering,
    Shown,
    Exiting,
}

/// Outgoing notifications, drained by the embedder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEvent {
    OverlayEntered(OverlayKind),
    OverlayExited(OverlayKind),
    ToggleChanged(bool),
    EditDone,
    /// Weather image clicked without usable weather data
    WeatherSettingsRequested,
    WeatherRefreshRequested,
}

/// Everything an overlay transition touches outside the coordinator
pub struct OverlayEnv<'a, H: ViewHost + ?Sized> {
    pub host: &'a mut H,
    pub scheduler: &'a mut Scheduler,
    pub events: &'a mut Vec<HeaderEvent>,
    pub now: Instant,
    pub expanded: bool,
    pub alarm_showing: bool,
    pub weather_header: bool,
}

#[derive(Debug)]
struct Active {
    kind: OverlayKind,
    content: OverlayContent,
    phase: OverlayPhase,
}

#[derive(Debug)]
struct Running {
    token: JobId,
    fades: Vec<(Element, Tween<f32>)>,
    reveal: Option<Tween<Reveal>>,
}

impl Running {
    fn alpha_of(&self, id: Element, now: Instant) -> Option<f32> {
        self.fades
            .iter()
            .find(|(element, _)| *element == id)
            .map(|(_, tween)| tween.value_at(now))
    }
}

/// One fade of a transition: element, target alpha, start alpha when the
/// element is not already fading
#[derive(Debug, Clone, Copy)]
struct Fade {
    id: Element,
    to: f32,
    from: f32,
}

impl Fade {
    fn out(id: Element) -> Self {
        Self {
            id,
            to: 0.0,
            from: 1.0,
        }
    }

    fn into_view(id: Element) -> Self {
        Self {
            id,
            to: 1.0,
            from: 0.0,
        }
    }
}

#[derive(Debug)]
pub struct OverlayCoordinator {
    active: Option<Active>,
    queued: Option<(OverlayKind, OverlayContent)>,
    running: Option<Running>,
    editing: bool,
    cross_fade: Transition,
    reveal: Transition,
}

impl OverlayCoordinator {
    pub fn new(cross_fade_ms: f32, reveal_ms: f32) -> Self {
        Self {
            active: None,
            queued: None,
            running: None,
            editing: false,
            cross_fade: Transition::linear(cross_fade_ms),
            reveal: Transition::new(reveal_ms, TimingFunction::EaseInOut),
        }
    }

    /// New durations apply from the next transition on
    pub fn set_durations(&mut self, cross_fade_ms: f32, reveal_ms: f32) {
        self.cross_fade = Transition::linear(cross_fade_ms);
        self.reveal = Transition::new(reveal_ms, TimingFunction::EaseInOut);
    }

    pub fn phase(&self) -> OverlayPhase {
        self.active
            .as_ref()
            .map_or(OverlayPhase::Normal, |active| active.phase)
    }

    pub fn active_kind(&self) -> Option<OverlayKind> {
        self.active.as_ref().map(|active| active.kind)
    }

    pub fn content(&self) -> Option<&OverlayContent> {
        self.active.as_ref().map(|active| &active.content)
    }

    pub fn queued_kind(&self) -> Option<OverlayKind> {
        self.queued.as_ref().map(|(kind, _)| *kind)
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Completion token of the running transition
    pub fn pending_token(&self) -> Option<JobId> {
        self.running.as_ref().map(|running| running.token)
    }

    /// Alpha channels the engine must not write right now
    pub fn suspended_channels(&self) -> AlphaChannels {
        if self.active.is_some() {
            OWNED_CHANNELS
        } else {
            AlphaChannels::empty()
        }
    }

    /// Weather panel is on its way in or fully shown
    pub fn weather_detail_shown(&self) -> bool {
        matches!(
            self.active,
            Some(Active {
                kind: OverlayKind::WeatherDetail,
                phase: OverlayPhase::Entering | OverlayPhase::Shown,
                ..
            })
        )
    }

    /// Show `kind` with `content`, or dismiss it with `None`
    pub fn request<H: ViewHost + ?Sized>(
        &mut self,
        kind: OverlayKind,
        content: Option<OverlayContent>,
        env: &mut OverlayEnv<'_, H>,
    ) {
        match content {
            Some(content) => {
                if self.editing && kind != OverlayKind::Edit {
                    log::debug!("ignoring {:?} request while editing", kind);
                    return;
                }
                self.show(kind, content, env);
            }
            None => {
                if self.editing && kind != OverlayKind::Edit {
                    self.show(OverlayKind::Edit, OverlayContent::edit(), env);
                    return;
                }
                if self.queued_kind() == Some(kind) {
                    self.queued = None;
                }
                if self.active_kind() == Some(kind) && self.phase() != OverlayPhase::Exiting {
                    self.begin_exit(env);
                }
            }
        }
    }

    /// Enter or leave edit mode
    pub fn set_editing<H: ViewHost + ?Sized>(
        &mut self,
        editing: bool,
        env: &mut OverlayEnv<'_, H>,
    ) {
        if self.editing == editing {
            return;
        }
        self.editing = editing;
        log::debug!("editing: {}", editing);
        if editing {
            self.show(OverlayKind::Edit, OverlayContent::edit(), env);
        } else {
            self.request(OverlayKind::Edit, None, env);
        }
    }

    /// Interaction with the detail header row
    pub fn click_detail_header<H: ViewHost + ?Sized>(&mut self, env: &mut OverlayEnv<'_, H>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.phase == OverlayPhase::Exiting {
            return;
        }
        let kind = active.kind;
        match kind {
            OverlayKind::Edit => {
                env.events.push(HeaderEvent::EditDone);
                self.set_editing(false, env);
            }
            OverlayKind::Detail => {
                if let Some(state) = active.content.toggle.as_mut() {
                    *state = !*state;
                    env.events.push(HeaderEvent::ToggleChanged(*state));
                }
            }
            OverlayKind::WeatherDetail => {}
        }
    }

    /// Update a shown toggle from outside; never emits
    pub fn set_toggle_state(&mut self, state: bool) {
        if let Some(toggle) = self
            .active
            .as_mut()
            .and_then(|active| active.content.toggle.as_mut())
        {
            *toggle = state;
        }
    }

    /// Drop the weather panel without an exit animation
    pub fn dismiss_weather_detail<H: ViewHost + ?Sized>(
        &mut self,
        env: &mut OverlayEnv<'_, H>,
    ) -> bool {
        if self.active_kind() != Some(OverlayKind::WeatherDetail) {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };
        if let Some(running) = self.running.take() {
            env.scheduler.cancel(running.token);
        }
        restore_under_weather_detail(env);
        if env.alarm_showing {
            env.host.set_alpha(Element::AlarmStatus, 1.0);
        }
        env.host.set_reveal(
            Element::WeatherDetail,
            Reveal {
                radius: 0.0,
                ..weather_reveal_center(&*env.host)
            },
        );
        env.host.set_visibility(Element::WeatherDetail, Visibility::Invisible);
        env.host.set_alpha(Element::WeatherDetail, 1.0);
        log::debug!("weather detail dismissed");
        if active.phase != OverlayPhase::Entering {
            env.events.push(HeaderEvent::OverlayExited(OverlayKind::WeatherDetail));
        }
        self.start_queued(env);
        true
    }

    /// Write the running fades for `now`
    pub fn advance<H: ViewHost + ?Sized>(&self, now: Instant, host: &mut H) {
        let Some(running) = &self.running else {
            return;
        };
        for (id, tween) in &running.fades {
            host.set_alpha(*id, tween.value_at(now).clamp(0.0, 1.0));
        }
        if let Some(reveal) = &running.reveal {
            host.set_reveal(Element::WeatherDetail, reveal.value_at(now));
        }
    }

    /// Finish the transition owning `token`.
    ///
    /// Stale tokens are ignored. Returns true when engine-owned channels were
    /// handed back and the current frame should be re-applied.
    pub fn complete<H: ViewHost + ?Sized>(
        &mut self,
        token: JobId,
        env: &mut OverlayEnv<'_, H>,
    ) -> bool {
        if self.pending_token() != Some(token) {
            log::trace!("ignoring stale overlay token {:?}", token);
            return false;
        }
        let Some(running) = self.running.take() else {
            return false;
        };
        for (id, tween) in &running.fades {
            env.host.set_alpha(*id, *tween.target());
        }
        if let Some(reveal) = &running.reveal {
            env.host.set_reveal(Element::WeatherDetail, *reveal.target());
        }

        let Some(active) = self.active.as_mut() else {
            return false;
        };
        match active.phase {
            OverlayPhase::Entering => {
                active.phase = OverlayPhase::Shown;
                let kind = active.kind;
                let clickable = kind == OverlayKind::Edit || active.content.toggle.is_some();
                for (id, tween) in &running.fades {
                    if *tween.target() == 0.0 {
                        env.host.set_visibility(*id, Visibility::Invisible);
                    }
                }
                match kind {
                    OverlayKind::Detail | OverlayKind::Edit => {
                        env.host.set_clickable(Element::DetailHeader, clickable);
                    }
                    OverlayKind::WeatherDetail => {
                        for id in [Element::Clock, Element::DateGroup, Element::WeatherImage] {
                            env.host.set_visibility(id, Visibility::Invisible);
                        }
                    }
                }
                log::debug!("{:?} overlay shown", kind);
                env.events.push(HeaderEvent::OverlayEntered(kind));
                false
            }
            OverlayPhase::Exiting => {
                let kind = active.kind;
                self.active = None;
                match kind {
                    OverlayKind::Detail | OverlayKind::Edit => {
                        env.host.set_visibility(Element::DetailHeader, Visibility::Invisible);
                        env.host.set_clickable(Element::DetailHeader, false);
                    }
                    OverlayKind::WeatherDetail => {
                        env.host.set_visibility(Element::WeatherDetail, Visibility::Invisible);
                        env.host.set_alpha(Element::WeatherDetail, 1.0);
                    }
                }
                log::debug!("{:?} overlay hidden", kind);
                env.events.push(HeaderEvent::OverlayExited(kind));
                self.start_queued(env);
                true
            }
            OverlayPhase::Normal | OverlayPhase::Shown => false,
        }
    }

    /// Forget every overlay without touching the host
    pub fn reset(&mut self) {
        self.active = None;
        self.queued = None;
        self.running = None;
        self.editing = false;
    }

    fn show<H: ViewHost + ?Sized>(
        &mut self,
        kind: OverlayKind,
        content: OverlayContent,
        env: &mut OverlayEnv<'_, H>,
    ) {
        if kind == OverlayKind::WeatherDetail && !(env.expanded && env.weather_header) {
            log::debug!("weather detail needs an expanded header with weather enabled");
            return;
        }
        let Some(active) = self.active.as_mut() else {
            self.queued = None;
            self.begin_enter(kind, content, env);
            return;
        };

        if active.kind == kind {
            self.queued = None;
            active.content = content;
            if active.phase == OverlayPhase::Exiting {
                active.phase = OverlayPhase::Entering;
                log::debug!("{:?} overlay re-entering", kind);
                self.run_enter(kind, env);
            }
            return;
        }

        log::debug!("{:?} overlay queued behind {:?}", kind, active.kind);
        self.queued = Some((kind, content));
        if active.phase != OverlayPhase::Exiting {
            self.begin_exit(env);
        }
    }

    fn start_queued<H: ViewHost + ?Sized>(&mut self, env: &mut OverlayEnv<'_, H>) {
        if let Some((kind, content)) = self.queued.take() {
            self.show(kind, content, env);
        }
    }

    fn begin_enter<H: ViewHost + ?Sized>(
        &mut self,
        kind: OverlayKind,
        content: OverlayContent,
        env: &mut OverlayEnv<'_, H>,
    ) {
        log::debug!("{:?} overlay entering", kind);
        self.active = Some(Active {
            kind,
            content,
            phase: OverlayPhase::Entering,
        });
        self.run_enter(kind, env);
    }

    fn run_enter<H: ViewHost + ?Sized>(&mut self, kind: OverlayKind, env: &mut OverlayEnv<'_, H>) {
        match kind {
            OverlayKind::Detail | OverlayKind::Edit => {
                env.host.bring_to_front(Element::DetailHeader);
                env.host.set_visibility(Element::DetailHeader, Visibility::Visible);
                let mut fades = vec![
                    Fade::into_view(Element::DetailHeader),
                    Fade::out(Element::Clock),
                    Fade::out(Element::DateGroup),
                ];
                fades.extend(self.header_row_fades(env, false));
                self.run(&fades, None, env);
            }
            OverlayKind::WeatherDetail => {
                env.host.bring_to_front(Element::WeatherDetail);
                env.host.set_visibility(Element::WeatherDetail, Visibility::Visible);
                env.host.set_alpha(Element::WeatherDetail, 1.0);
                let center = weather_reveal_center(&*env.host);
                let width = env
                    .host
                    .geometry(Element::Header)
                    .map_or(0.0, |header| header.width);
                let fades: Vec<Fade> = if env.alarm_showing {
                    vec![Fade::out(Element::AlarmStatus)]
                } else {
                    Vec::new()
                };
                self.run(
                    &fades,
                    Some((
                        Reveal {
                            radius: 0.0,
                            ..center
                        },
                        Reveal {
                            radius: width,
                            ..center
                        },
                    )),
                    env,
                );
            }
        }
    }

    fn begin_exit<H: ViewHost + ?Sized>(&mut self, env: &mut OverlayEnv<'_, H>) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.phase = OverlayPhase::Exiting;
        let kind = active.kind;
        log::debug!("{:?} overlay exiting", kind);

        match kind {
            OverlayKind::Detail | OverlayKind::Edit => {
                env.host.set_clickable(Element::DetailHeader, false);
                let mut fades = vec![
                    Fade::out(Element::DetailHeader),
                    Fade::into_view(Element::Clock),
                    Fade::into_view(Element::DateGroup),
                ];
                fades.extend(self.header_row_fades(env, true));
                for fade in &fades[1..] {
                    env.host.set_visibility(fade.id, Visibility::Visible);
                }
                self.run(&fades, None, env);
            }
            OverlayKind::WeatherDetail => {
                restore_under_weather_detail(env);
                let fades: Vec<Fade> = if env.alarm_showing {
                    env.host.set_visibility(Element::AlarmStatus, Visibility::Visible);
                    vec![Fade::into_view(Element::AlarmStatus)]
                } else {
                    Vec::new()
                };
                let center = weather_reveal_center(&*env.host);
                let width = env
                    .host
                    .geometry(Element::Header)
                    .map_or(0.0, |header| header.width);
                self.run(
                    &fades,
                    Some((
                        Reveal {
                            radius: width,
                            ..center
                        },
                        Reveal {
                            radius: 0.0,
                            ..center
                        },
                    )),
                    env,
                );
            }
        }
    }

    /// Weather image and alarm rows hidden by a detail panel while expanded
    fn header_row_fades<H: ViewHost + ?Sized>(
        &self,
        env: &OverlayEnv<'_, H>,
        restoring: bool,
    ) -> Vec<Fade> {
        let mut rows = Vec::new();
        if env.expanded && env.weather_header {
            rows.push(Element::WeatherImage);
        }
        if env.expanded && env.alarm_showing {
            rows.push(Element::AlarmStatus);
        }
        rows.into_iter()
            .map(|id| {
                if restoring {
                    Fade::into_view(id)
                } else {
                    Fade::out(id)
                }
            })
            .collect()
    }

    /// Replace the running transition, continuing any fade already in flight
    /// from its current value
    fn run<H: ViewHost + ?Sized>(
        &mut self,
        fades: &[Fade],
        reveal: Option<(Reveal, Reveal)>,
        env: &mut OverlayEnv<'_, H>,
    ) {
        let now = env.now;
        let previous = self.running.take();
        if let Some(previous) = &previous {
            env.scheduler.cancel(previous.token);
        }

        let fades: Vec<(Element, Tween<f32>)> = fades
            .iter()
            .map(|fade| {
                let from = previous
                    .as_ref()
                    .and_then(|running| running.alpha_of(fade.id, now))
                    .unwrap_or(fade.from);
                (
                    fade.id,
                    Tween::new(from, fade.to, now, self.cross_fade.clone()),
                )
            })
            .collect();
        let reveal = reveal.map(|(from, to)| {
            let from = previous
                .as_ref()
                .and_then(|running| running.reveal.as_ref())
                .map_or(from, |tween| tween.value_at(now));
            Tween::new(from, to, now, self.reveal.clone())
        });

        for (id, tween) in &fades {
            env.host.set_alpha(*id, *tween.from());
        }
        if let Some(reveal) = &reveal {
            env.host.set_reveal(Element::WeatherDetail, *reveal.from());
        }

        let due = fades
            .iter()
            .map(|(_, tween)| tween.end_time())
            .chain(reveal.iter().map(|tween| tween.end_time()))
            .max()
            .unwrap_or(now);
        let token = env.scheduler.schedule(due, JobType::FinishOverlayTransition);
        self.running = Some(Running {
            token,
            fades,
            reveal,
        });
    }
}

fn weather_reveal_center<H: ViewHost + ?Sized>(host: &H) -> Reveal {
    host.geometry(Element::WeatherImage)
        .map(|image| Reveal {
            center_x: image.x + image.width / 2.0,
            center_y: image.y + image.height / 2.0,
            radius: 0.0,
        })
        .unwrap_or_default()
}

fn restore_under_weather_detail<H: ViewHost + ?Sized>(env: &mut OverlayEnv<'_, H>) {
    env.host.set_visibility(Element::Clock, Visibility::Visible);
    env.host.set_visibility(Element::DateGroup, Visibility::Visible);
    if env.expanded && env.weather_header {
        env.host.set_visibility(Element::WeatherImage, Visibility::Visible);
    }
}
