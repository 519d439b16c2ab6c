//! Endpoint recapture driven by layout passes.
//!
//! A capture is requested whenever the laid-out geometry of the current state
//! may have changed. The next layout pass samples the host into the endpoint
//! for the state it is actually laid out in.

use crate::config::HeaderConfig;
use crate::engine::{AlphaChannels, Endpoint, TransitionEngine};
use crate::host::ViewHost;

/// Whether an endpoint needs to be re-sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingCapture {
    #[default]
    Clean,
    Requested(Endpoint),
}

/// Result of handling one layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Nothing was pending
    Idle,
    /// The endpoint was stored and the current frame recomputed
    Captured(Endpoint),
    /// The discrete state moved on; another pass was requested for it
    Retargeted(Endpoint),
}

#[derive(Debug, Clone, Default)]
pub struct LayoutCapture {
    pending: PendingCapture,
}

impl LayoutCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `which` for capture on the next layout pass
    pub fn request(&mut self, which: Endpoint) {
        self.pending = PendingCapture::Requested(which);
    }

    pub fn is_pending(&self) -> bool {
        self.pending != PendingCapture::Clean
    }

    pub fn pending(&self) -> PendingCapture {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = PendingCapture::Clean;
    }

    /// Handle a layout pass for a host laid out in `current`.
    ///
    /// On capture the engine frame is recomputed for `progress`; the caller
    /// applies it. A request for a state the host is no longer in is never
    /// satisfied with its geometry. `held` channels keep their stored alpha.
    pub fn on_layout_pass<H: ViewHost + ?Sized>(
        &mut self,
        current: Endpoint,
        progress: f32,
        engine: &mut TransitionEngine,
        host: &mut H,
        config: &HeaderConfig,
        held: AlphaChannels,
    ) -> CaptureOutcome {
        let PendingCapture::Requested(which) = self.pending else {
            return CaptureOutcome::Idle;
        };

        if which != current {
            log::debug!("capture for {:?} retargeted to {:?}", which, current);
            self.pending = PendingCapture::Requested(current);
            host.request_layout();
            return CaptureOutcome::Retargeted(current);
        }

        let snapshot = engine.capture_endpoint(which, &*host, config, held);
        engine.store(which, snapshot);
        self.pending = PendingCapture::Clean;
        engine.update(progress);
        log::debug!("captured {:?} endpoint", which);
        CaptureOutcome::Captured(which)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Element;
    use crate::sim::SimHost;

    fn host() -> SimHost {
        let mut host = SimHost::standard(1080.0, 200.0, 500.0);
        host.layout();
        host
    }

    #[test]
    fn test_idle_without_request() {
        let mut host = host();
        let mut capture = LayoutCapture::new();
        let mut engine = TransitionEngine::new();
        let outcome = capture.on_layout_pass(
            Endpoint::Collapsed,
            0.0,
            &mut engine,
            &mut host,
            &HeaderConfig::default(),
            AlphaChannels::empty(),
        );
        assert_eq!(outcome, CaptureOutcome::Idle);
    }

    #[test]
    fn test_capture_stores_and_clears() {
        let mut host = host();
        let mut capture = LayoutCapture::new();
        let mut engine = TransitionEngine::new();
        capture.request(Endpoint::Collapsed);
        assert!(capture.is_pending());

        let outcome = capture.on_layout_pass(
            Endpoint::Collapsed,
            0.0,
            &mut engine,
            &mut host,
            &HeaderConfig::default(),
            AlphaChannels::empty(),
        );
        assert_eq!(outcome, CaptureOutcome::Captured(Endpoint::Collapsed));
        assert!(!capture.is_pending());

        let clock = host.geometry(Element::Clock).unwrap();
        assert_eq!(engine.endpoint(Endpoint::Collapsed).clock_y, clock.bottom());
        assert_eq!(engine.current_frame().clock_y, clock.bottom());
    }

    #[test]
    fn test_mismatch_retargets_without_storing() {
        let mut host = host();
        let mut capture = LayoutCapture::new();
        let mut engine = TransitionEngine::new();
        capture.request(Endpoint::Expanded);
        let requests = host.layout_requests();

        let outcome = capture.on_layout_pass(
            Endpoint::Collapsed,
            0.0,
            &mut engine,
            &mut host,
            &HeaderConfig::default(),
            AlphaChannels::empty(),
        );
        assert_eq!(outcome, CaptureOutcome::Retargeted(Endpoint::Collapsed));
        assert_eq!(capture.pending(), PendingCapture::Requested(Endpoint::Collapsed));
        assert_eq!(host.layout_requests(), requests + 1);
        assert_eq!(engine.endpoint(Endpoint::Expanded).clock_y, 0.0);
        assert_eq!(engine.endpoint(Endpoint::Collapsed).clock_y, 0.0);
    }
}
