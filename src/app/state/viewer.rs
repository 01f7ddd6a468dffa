use super::constants::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::geometry::LensPosition;
use std::time::Instant;

/// Interactive viewer model: the one authoritative current page plus the
/// zoom, magnifier, and chrome-visibility knobs every input channel
/// converges on.
pub struct ViewerState {
    pub(in crate::app) current_page: usize,
    pub(in crate::app) total_pages: usize,
    pub(in crate::app) zoom: f32,
    pub(in crate::app) magnifier_active: bool,
    pub(in crate::app) magnifier_zoom: f32,
    pub(in crate::app) magnifier_position: LensPosition,
    /// Page index the lens is currently sampling from.
    pub(in crate::app) lens_page: usize,
    pub(in crate::app) thumbnails_visible: bool,
    pub(in crate::app) navigation_visible: bool,
    pub(in crate::app) last_pointer_activity: Option<Instant>,
    pub(in crate::app) pointer: Option<(f32, f32)>,
    pub(in crate::app) page_input: String,
}

impl ViewerState {
    pub(in crate::app) fn new(total_pages: usize, start_page: usize, magnifier_zoom: f32) -> Self {
        let current_page = if total_pages == 0 {
            0
        } else {
            start_page.min(total_pages - 1)
        };
        ViewerState {
            current_page,
            total_pages,
            zoom: DEFAULT_ZOOM,
            magnifier_active: false,
            magnifier_zoom,
            magnifier_position: LensPosition::INACTIVE,
            lens_page: current_page,
            thumbnails_visible: false,
            navigation_visible: true,
            last_pointer_activity: None,
            pointer: None,
            page_input: (current_page + 1).to_string(),
        }
    }

    pub(in crate::app) fn in_range(&self, index: usize) -> bool {
        index < self.total_pages
    }

    pub(in crate::app) fn zoom_step(&mut self, steps: i32) {
        self.zoom = step_zoom(self.zoom, steps);
    }

    pub(in crate::app) fn zoom_reset(&mut self) {
        self.zoom = DEFAULT_ZOOM;
    }

    pub(in crate::app) fn clear_lens(&mut self) {
        self.magnifier_position = LensPosition::INACTIVE;
    }
}

/// Apply a number of zoom steps, rounding to the step grid and clamping to
/// the allowed range. Repeated steps at a boundary are idempotent.
pub(in crate::app) fn step_zoom(zoom: f32, steps: i32) -> f32 {
    let stepped = zoom + steps as f32 * ZOOM_STEP;
    let rounded = (stepped / ZOOM_STEP).round() * ZOOM_STEP;
    rounded.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_steps_walk_the_quarter_grid() {
        assert_eq!(step_zoom(1.0, 1), 1.25);
        assert_eq!(step_zoom(1.0, -1), 0.75);
        assert_eq!(step_zoom(0.75, -1), 0.5);
    }

    #[test]
    fn zoom_is_idempotent_at_the_boundaries() {
        assert_eq!(step_zoom(3.0, 1), 3.0);
        assert_eq!(step_zoom(3.0, 2), 3.0);
        assert_eq!(step_zoom(0.5, -1), 0.5);
        assert_eq!(step_zoom(0.5, -3), 0.5);
    }

    #[test]
    fn off_grid_zoom_snaps_to_the_nearest_step() {
        assert_eq!(step_zoom(1.1, 1), 1.25);
        assert_eq!(step_zoom(1.1, -1), 0.75);
    }

    #[test]
    fn start_page_is_clamped_to_document() {
        let state = ViewerState::new(5, 9, 2.0);
        assert_eq!(state.current_page, 4);
        let empty = ViewerState::new(0, 3, 2.0);
        assert_eq!(empty.current_page, 0);
    }
}
