use super::super::state::App;
use super::Effect;
use crate::geometry::{self, LensPosition, PageRect};
use std::time::{Duration, Instant};
use tracing::debug;

impl App {
    /// Every pointer movement feeds two consumers: the navigation
    /// auto-hide timer, and (while the magnifier is on) the coordinate
    /// mapper that positions the lens.
    pub(super) fn handle_pointer_moved(&mut self, x: f32, y: f32) {
        self.viewer.pointer = Some((x, y));
        self.viewer.navigation_visible = true;
        self.viewer.last_pointer_activity = Some(Instant::now());
        if self.viewer.magnifier_active {
            self.update_lens(x, y);
        }
    }

    pub(super) fn handle_pointer_left(&mut self) {
        self.viewer.pointer = None;
        self.viewer.navigation_visible = false;
        self.viewer.last_pointer_activity = None;
        self.viewer.clear_lens();
    }

    /// A press on the page area turns the page by halves, unless the
    /// magnifier is active (inspecting detail must not flip) or pointer
    /// flipping is configured off.
    pub(super) fn handle_surface_pressed(&mut self, effects: &mut Vec<Effect>) {
        if self.viewer.magnifier_active || !self.config.pointer_flip {
            return;
        }
        let Some((x, _)) = self.viewer.pointer else {
            return;
        };
        if x < self.viewer_area.0 / 2.0 {
            self.handle_flip_prev(effects);
        } else {
            self.handle_flip_next(effects);
        }
    }

    pub(super) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if crate::take_sigint_requested() {
            effects.push(Effect::QuitSafely);
            return;
        }
        if self.viewer.navigation_visible {
            let expired = self
                .viewer
                .last_pointer_activity
                .map(|last| {
                    now.saturating_duration_since(last)
                        >= Duration::from_secs_f32(self.config.nav_hide_delay_secs)
                })
                .unwrap_or(false);
            if expired {
                debug!("Hiding navigation after inactivity");
                self.viewer.navigation_visible = false;
            }
        }
    }

    /// Map the pointer onto the hovered page image. The engine keeps
    /// adjacent pages mounted, so the mapper picks the rect that actually
    /// contains the pointer and falls back to the first one; a pointer
    /// outside every page resets the lens to the inactive sentinel.
    fn update_lens(&mut self, x: f32, y: f32) {
        let pages = self.displayed_pages();
        if pages.is_empty() {
            self.viewer.clear_lens();
            return;
        }
        let rects: Vec<PageRect> = pages.iter().map(|(_, rect)| *rect).collect();
        let position = rects.iter().position(|rect| rect.contains(x, y));
        let (rect, page) = match position {
            Some(found) => (rects[found], pages[found].0),
            None => match geometry::hovered_rect(&rects, x, y) {
                Some(first) => (*first, pages[0].0),
                None => {
                    self.viewer.clear_lens();
                    return;
                }
            },
        };

        match geometry::relative_within(&rect, x, y) {
            Some((rel_x, rel_y)) => {
                self.viewer.magnifier_position = LensPosition {
                    rel_x,
                    rel_y,
                    abs_x: x,
                    abs_y: y,
                    active: true,
                };
                self.viewer.lens_page = page;
            }
            None => self.viewer.clear_lens(),
        }
    }
}
