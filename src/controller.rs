//! Expanded flag and continuous progress.

/// What a progress change did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressUpdate {
    /// The applied height did not change
    Unchanged,
    /// The header moved to `height`
    Moved { t: f32, height: f32 },
}

/// Owns the discrete expanded flag and the progress between the two heights
#[derive(Debug, Clone)]
pub struct ExpansionController {
    expanded: bool,
    progress: f32,
    last_applied_height: Option<f32>,
    collapsed_height: f32,
    expanded_height: f32,
}

impl ExpansionController {
    pub fn new(collapsed_height: f32, expanded_height: f32) -> Self {
        Self {
            expanded: false,
            progress: 0.0,
            last_applied_height: None,
            collapsed_height,
            expanded_height,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn last_applied_height(&self) -> Option<f32> {
        self.last_applied_height
    }

    pub fn heights(&self) -> (f32, f32) {
        (self.collapsed_height, self.expanded_height)
    }

    /// Flip the discrete state. Returns false when nothing changed.
    pub fn set_expanded(&mut self, expanded: bool) -> bool {
        if self.expanded == expanded {
            return false;
        }
        self.expanded = expanded;
        if !expanded {
            self.progress = 0.0;
        }
        log::debug!("header expanded: {}", expanded);
        true
    }

    /// Move the header to progress `t`, re-clamped into `[0, 1]`
    pub fn set_progress(&mut self, t: f32) -> ProgressUpdate {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        self.progress = t;

        let (low, high) = self.ordered_heights();
        let height = (self.collapsed_height
            + t * (self.expanded_height - self.collapsed_height))
            .clamp(low, high);
        if self.last_applied_height == Some(height) {
            return ProgressUpdate::Unchanged;
        }
        self.last_applied_height = Some(height);
        ProgressUpdate::Moved { t, height }
    }

    /// Replace the endpoint heights; the next progress change always applies
    pub fn set_heights(&mut self, collapsed_height: f32, expanded_height: f32) {
        self.collapsed_height = collapsed_height;
        self.expanded_height = expanded_height;
        self.last_applied_height = None;
    }

    /// Forget the last applied height
    pub fn reset(&mut self) {
        self.last_applied_height = None;
    }

    fn ordered_heights(&self) -> (f32, f32) {
        if self.collapsed_height <= self.expanded_height {
            (self.collapsed_height, self.expanded_height)
        } else {
            (self.expanded_height, self.collapsed_height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_height() {
        let mut controller = ExpansionController::new(200.0, 500.0);
        assert_eq!(
            controller.set_progress(0.3),
            ProgressUpdate::Moved {
                t: 0.3,
                height: 290.0
            }
        );
    }

    #[test]
    fn test_duplicate_height_is_noop() {
        let mut controller = ExpansionController::new(200.0, 500.0);
        controller.set_progress(0.5);
        assert_eq!(controller.set_progress(0.5), ProgressUpdate::Unchanged);
    }

    #[test]
    fn test_progress_clamped() {
        let mut controller = ExpansionController::new(200.0, 500.0);
        assert_eq!(
            controller.set_progress(1.5),
            ProgressUpdate::Moved {
                t: 1.0,
                height: 500.0
            }
        );
        assert_eq!(
            controller.set_progress(f32::NAN),
            ProgressUpdate::Moved {
                t: 0.0,
                height: 200.0
            }
        );
        assert_eq!(controller.progress(), 0.0);
    }

    #[test]
    fn test_collapse_resets_progress() {
        let mut controller = ExpansionController::new(200.0, 500.0);
        assert!(controller.set_expanded(true));
        assert!(!controller.set_expanded(true));
        controller.set_progress(0.6);
        assert!(controller.set_expanded(false));
        assert_eq!(controller.progress(), 0.0);
    }

    #[test]
    fn test_zero_range() {
        let mut controller = ExpansionController::new(300.0, 300.0);
        assert_eq!(
            controller.set_progress(0.2),
            ProgressUpdate::Moved {
                t: 0.2,
                height: 300.0
            }
        );
        assert_eq!(controller.set_progress(0.9), ProgressUpdate::Unchanged);
    }

    #[test]
    fn test_set_heights_forgets_last() {
        let mut controller = ExpansionController::new(200.0, 500.0);
        controller.set_progress(0.5);
        controller.set_heights(200.0, 500.0);
        assert!(matches!(
            controller.set_progress(0.5),
            ProgressUpdate::Moved { .. }
        ));
    }
}
