use super::super::state::App;
use super::Effect;
use crate::config::ThemeMode;
use tracing::{debug, info};

impl App {
    pub(super) fn handle_zoom_in(&mut self) {
        self.viewer.zoom_step(1);
        debug!(zoom = self.viewer.zoom, "Zoomed in");
    }

    pub(super) fn handle_zoom_out(&mut self) {
        self.viewer.zoom_step(-1);
        debug!(zoom = self.viewer.zoom, "Zoomed out");
    }

    pub(super) fn handle_zoom_reset(&mut self) {
        self.viewer.zoom_reset();
        debug!("Zoom reset");
    }

    pub(super) fn handle_toggle_magnifier(&mut self) {
        self.viewer.magnifier_active = !self.viewer.magnifier_active;
        if !self.viewer.magnifier_active {
            // No stale lens may survive the toggle.
            self.viewer.clear_lens();
        }
        info!(
            active = self.viewer.magnifier_active,
            visible_percent = crate::geometry::lens_visible_fraction(self.viewer.magnifier_zoom),
            "Magnifier toggled"
        );
    }

    pub(super) fn handle_toggle_thumbnails(&mut self, effects: &mut Vec<Effect>) {
        self.viewer.thumbnails_visible = !self.viewer.thumbnails_visible;
        if self.viewer.thumbnails_visible {
            effects.push(Effect::PrefetchImages { all: true });
        }
    }

    pub(super) fn handle_toggle_theme(&mut self) {
        self.config.theme = match self.config.theme {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        };
    }
}
