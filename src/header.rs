//! The header facade.
//!
//! [`Header`] owns the engine, the capture state, the expansion controller,
//! the overlay coordinator and the job scheduler, plus the injected view host
//! and configuration source. The embedding view drives it with state changes,
//! layout-pass notifications and a periodic `tick`.

use std::time::{Duration, Instant};

use crate::capture::{CaptureOutcome, LayoutCapture};
use crate::config::{ConfigSource, HeaderConfig};
use crate::controller::{ExpansionController, ProgressUpdate};
use crate::discrete::{DiscreteLayout, HeaderRows};
use crate::engine::{AlphaChannels, ApplyMask, Endpoint, TransitionEngine};
use crate::host::{Direction, ViewHost};
use crate::jobs::{JobId, JobType, Scheduler};
use crate::overlay::{
    HeaderEvent, OverlayContent, OverlayCoordinator, OverlayEnv, OverlayKind, OverlayPhase,
};
use crate::snapshot::Snapshot;

pub struct Header<H: ViewHost, C: ConfigSource> {
    host: H,
    config_source: C,
    config: HeaderConfig,
    engine: TransitionEngine,
    capture: LayoutCapture,
    controller: ExpansionController,
    overlay: OverlayCoordinator,
    scheduler: Scheduler,
    rows: HeaderRows,
    events: Vec<HeaderEvent>,
    direction: Direction,
    /// Last time handed in by `attach` or `tick`; `None` while detached
    now: Option<Instant>,
    refresh_job: Option<JobId>,
}

impl<H: ViewHost, C: ConfigSource> Header<H, C> {
    pub fn new(host: H, config_source: C) -> Self {
        let config = HeaderConfig::load(&config_source);
        Self {
            direction: host.text_direction(),
            host,
            config_source,
            controller: ExpansionController::new(config.collapsed_height, config.expanded_height),
            overlay: OverlayCoordinator::new(config.cross_fade_ms, config.reveal_ms),
            config,
            engine: TransitionEngine::new(),
            capture: LayoutCapture::new(),
            scheduler: Scheduler::new(),
            rows: HeaderRows::default(),
            events: Vec::new(),
            now: None,
            refresh_job: None,
        }
    }

    // Lifecycle

    /// Start driving the host. Both endpoints are captured right away, so
    /// any progress applied afterwards blends two real layouts; nothing is
    /// applied before this.
    pub fn attach(&mut self, now: Instant) {
        if self.is_attached() {
            return;
        }
        self.now = Some(now);
        self.direction = self.host.text_direction();
        self.controller.reset();
        log::debug!("header attached");
        self.refresh_endpoints();
    }

    /// Stop driving the host and drop every captured value
    pub fn detach(&mut self) {
        if !self.is_attached() {
            return;
        }
        self.now = None;
        self.engine.reset();
        self.capture.clear();
        self.overlay.reset();
        self.scheduler.clear();
        self.controller.reset();
        self.refresh_job = None;
        log::debug!("header detached");
    }

    pub fn is_attached(&self) -> bool {
        self.now.is_some()
    }

    // Expansion

    pub fn set_expanded(&mut self, expanded: bool) {
        if !self.controller.set_expanded(expanded) {
            return;
        }
        if !self.is_attached() {
            return;
        }
        if !expanded {
            self.with_overlay(|overlay, env| {
                overlay.request(OverlayKind::Detail, None, env);
                overlay.dismiss_weather_detail(env);
            });
        }
        self.structural_change();
    }

    pub fn set_progress(&mut self, t: f32) {
        let ProgressUpdate::Moved { t, height } = self.controller.set_progress(t) else {
            return;
        };
        if !self.is_attached() {
            return;
        }
        log::trace!("progress {} height {}", t, height);
        self.host.set_clip_height(height);
        self.with_overlay(|overlay, env| overlay.dismiss_weather_detail(env));
        if !self.capture.is_pending() {
            self.engine.update(t);
            self.apply_current();
        }
    }

    /// Geometry of the current state may have changed (optional rows,
    /// direction, resources)
    pub fn notify_structural_change(&mut self) {
        if self.is_attached() {
            self.structural_change();
        }
    }

    // Overlays

    pub fn request_overlay(&mut self, kind: OverlayKind, content: Option<OverlayContent>) {
        self.with_overlay(|overlay, env| overlay.request(kind, content, env));
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.with_overlay(|overlay, env| overlay.set_editing(editing, env));
    }

    pub fn click_detail_header(&mut self) {
        self.with_overlay(|overlay, env| overlay.click_detail_header(env));
    }

    pub fn set_toggle_state(&mut self, state: bool) {
        self.overlay.set_toggle_state(state);
    }

    /// Open the weather panel, or ask for weather settings when there is no
    /// data to show
    pub fn click_weather_image(&mut self) {
        if !self.is_attached() {
            return;
        }
        if !self.rows.weather_valid {
            self.events.push(HeaderEvent::WeatherSettingsRequested);
            return;
        }
        self.request_overlay(OverlayKind::WeatherDetail, Some(OverlayContent::default()));
    }

    pub fn click_weather_detail(&mut self) {
        self.request_overlay(OverlayKind::WeatherDetail, None);
    }

    // Optional rows

    pub fn set_alarm_showing(&mut self, showing: bool) {
        if self.rows.alarm_showing != showing {
            self.rows.alarm_showing = showing;
            self.row_changed();
        }
    }

    pub fn set_emergency_calls_only(&mut self, show: bool) {
        if self.rows.emergency_calls_only != show {
            self.rows.emergency_calls_only = show;
            self.row_changed();
        }
    }

    pub fn set_weather_valid(&mut self, valid: bool) {
        self.rows.weather_valid = valid;
    }

    /// Schedule a weather refresh after the configured delay
    pub fn notify_screen_on(&mut self) {
        let Some(now) = self.now else {
            return;
        };
        if !self.config.show_weather_header {
            return;
        }
        if let Some(previous) = self.refresh_job.take() {
            self.scheduler.cancel(previous);
        }
        let delay = Duration::from_micros(
            (self.config.weather_refresh_delay_ms * 1000.0).round() as u64,
        );
        self.refresh_job = Some(self.scheduler.schedule(now + delay, JobType::RefreshWeather));
    }

    // Layout

    /// Layout-pass notification from the embedder
    pub fn on_layout_pass(&mut self) {
        if !self.is_attached() {
            return;
        }
        let direction = self.host.text_direction();
        if direction != self.direction {
            log::debug!("text direction changed to {:?}", direction);
            self.direction = direction;
            self.structural_change();
        }

        let current = self.current_endpoint();
        let held = self.held_channels();
        let outcome = self.capture.on_layout_pass(
            current,
            self.controller.progress(),
            &mut self.engine,
            &mut self.host,
            &self.config,
            held,
        );
        match outcome {
            CaptureOutcome::Captured(_) => self.apply_current(),
            CaptureOutcome::Retargeted(_) => self.push_discrete(),
            CaptureOutcome::Idle => {}
        }
        TransitionEngine::place_alarm_status(&mut self.host, self.direction);
    }

    /// Run a synchronous layout pass on the host and handle it
    pub fn run_layout_pass(&mut self) {
        self.host.layout();
        self.on_layout_pass();
    }

    /// Re-capture both endpoints, laying the host out in the other state
    /// first and restoring the current one last
    pub fn refresh_endpoints(&mut self) {
        if !self.is_attached() {
            return;
        }
        let current = self.current_endpoint();
        let held = self.held_channels();
        for which in [current.flipped(), current] {
            self.discrete_for(which.is_expanded()).push_to(&mut self.host);
            self.host.layout();
            let snapshot = self
                .engine
                .capture_endpoint(which, &self.host, &self.config, held);
            self.engine.store(which, snapshot);
        }
        self.capture.clear();
        self.engine.update(self.controller.progress());
        self.apply_current();
        TransitionEngine::place_alarm_status(&mut self.host, self.direction);
        log::debug!("both endpoints refreshed");
    }

    // Loop

    /// Reload configuration and recapture the current state. The capture on
    /// the next layout pass applies the current progress.
    pub fn on_config_changed(&mut self) {
        self.config = HeaderConfig::load(&self.config_source);
        self.controller
            .set_heights(self.config.collapsed_height, self.config.expanded_height);
        self.overlay
            .set_durations(self.config.cross_fade_ms, self.config.reveal_ms);
        log::debug!("configuration reloaded");
        if !self.is_attached() {
            return;
        }
        self.structural_change();
    }

    /// Advance time: poll configuration, step the overlay fades, then run
    /// every job that came due
    pub fn tick(&mut self, now: Instant) {
        if !self.is_attached() {
            return;
        }
        self.now = Some(now);

        if !self.config_source.take_changes().is_empty() {
            self.on_config_changed();
        }

        self.overlay.advance(now, &mut self.host);

        for job in self.scheduler.drain_due(now) {
            match job.job_type {
                JobType::FinishOverlayTransition => {
                    self.with_overlay(|overlay, env| overlay.complete(job.id, env));
                }
                JobType::RefreshWeather => {
                    if self.refresh_job == Some(job.id) {
                        self.refresh_job = None;
                        self.events.push(HeaderEvent::WeatherRefreshRequested);
                    }
                }
            }
        }
    }

    /// Earliest time the next `tick` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    // Accessors

    pub fn current_frame(&self) -> &Snapshot {
        self.engine.current_frame()
    }

    pub fn endpoint(&self, which: Endpoint) -> &Snapshot {
        self.engine.endpoint(which)
    }

    /// Drain outgoing events
    pub fn take_events(&mut self) -> Vec<HeaderEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config_source_mut(&mut self) -> &mut C {
        &mut self.config_source
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn is_expanded(&self) -> bool {
        self.controller.is_expanded()
    }

    pub fn progress(&self) -> f32 {
        self.controller.progress()
    }

    pub fn applied_height(&self) -> Option<f32> {
        self.controller.last_applied_height()
    }

    pub fn is_capture_pending(&self) -> bool {
        self.capture.is_pending()
    }

    pub fn overlay_phase(&self) -> OverlayPhase {
        self.overlay.phase()
    }

    pub fn overlay_kind(&self) -> Option<OverlayKind> {
        self.overlay.active_kind()
    }

    pub fn overlay_content(&self) -> Option<&OverlayContent> {
        self.overlay.content()
    }

    pub fn is_editing(&self) -> bool {
        self.overlay.is_editing()
    }

    // Internals

    fn current_endpoint(&self) -> Endpoint {
        Endpoint::from_expanded(self.controller.is_expanded())
    }

    fn discrete_for(&self, expanded: bool) -> DiscreteLayout {
        DiscreteLayout::compute(
            expanded,
            &self.config,
            &self.rows,
            self.overlay.weather_detail_shown(),
        )
    }

    /// Alpha channels a capture must not read back from the host. The
    /// discrete visibilities are not pushed while the weather panel is shown,
    /// so every element still carries whatever the last frame wrote.
    fn held_channels(&self) -> AlphaChannels {
        if self.overlay.weather_detail_shown() {
            AlphaChannels::all()
        } else {
            AlphaChannels::empty()
        }
    }

    fn push_discrete(&mut self) {
        self.discrete_for(self.controller.is_expanded())
            .push_to(&mut self.host);
    }

    /// Push the discrete layout and recapture the current state after the
    /// next layout pass
    fn structural_change(&mut self) {
        self.push_discrete();
        self.capture.request(self.current_endpoint());
        self.host.request_layout();
    }

    fn row_changed(&mut self) {
        if self.is_attached() && !self.overlay.weather_detail_shown() {
            self.structural_change();
        }
    }

    fn apply_current(&mut self) {
        if !self.is_attached() {
            return;
        }
        let mask = ApplyMask::for_state(
            self.controller.is_expanded(),
            self.overlay.suspended_channels(),
        );
        TransitionEngine::apply(
            self.engine.current_frame(),
            &mut self.host,
            self.direction,
            mask,
        );
    }

    /// Run an overlay operation, then resync whatever it changed: the
    /// discrete layout when the weather panel came or went, the engine
    /// frame when the overlay released its channels.
    fn with_overlay<R>(
        &mut self,
        f: impl FnOnce(&mut OverlayCoordinator, &mut OverlayEnv<'_, H>) -> R,
    ) -> Option<R> {
        let now = self.now?;
        let weather_before = self.overlay.weather_detail_shown();
        let suspended_before = self.overlay.suspended_channels();

        let mut env = OverlayEnv {
            host: &mut self.host,
            scheduler: &mut self.scheduler,
            events: &mut self.events,
            now,
            expanded: self.controller.is_expanded(),
            alarm_showing: self.rows.alarm_showing,
            weather_header: self.config.show_weather_header,
        };
        let result = f(&mut self.overlay, &mut env);

        if self.overlay.weather_detail_shown() != weather_before {
            self.push_discrete();
        }
        if !suspended_before.is_empty() && self.overlay.suspended_channels().is_empty() {
            self.apply_current();
        }
        Some(result)
    }
}
