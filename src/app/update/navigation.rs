use super::super::messages::Message;
use super::super::state::App;
use super::Effect;
use tracing::debug;

/// Where a flip request originated. External requests (keyboard, thumbnail
/// clicks, page input, pointer presses) drive the engine and let its flip
/// event reconcile state; internal ones (the engine's own flip events)
/// only commit state. Keeping the two channels apart is what prevents a
/// flip feedback loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Origin {
    External,
    Internal,
}

impl App {
    /// Step forward through the engine's own next/prev API. A no-op on the
    /// last page.
    pub(super) fn handle_flip_next(&mut self, effects: &mut Vec<Effect>) {
        if self.viewer.current_page + 1 >= self.viewer.total_pages {
            return;
        }
        effects.push(Effect::EngineFlipNext);
    }

    pub(super) fn handle_flip_prev(&mut self, effects: &mut Vec<Effect>) {
        if self.viewer.current_page == 0 {
            return;
        }
        effects.push(Effect::EngineFlipPrev);
    }

    pub(super) fn handle_flip_to_index(&mut self, index: usize, effects: &mut Vec<Effect>) {
        self.request_flip(index, Origin::External, effects);
    }

    pub(super) fn handle_engine_flipped(&mut self, index: usize, effects: &mut Vec<Effect>) {
        self.request_flip(index, Origin::Internal, effects);
    }

    pub(super) fn handle_page_input_changed(&mut self, value: String) {
        self.viewer.page_input = value;
    }

    /// Commit the typed page number. Anything that does not parse to a
    /// page inside [1, total] is rejected and the input reverts to the
    /// current page.
    pub(super) fn handle_page_input_committed(&mut self, effects: &mut Vec<Effect>) {
        match self.viewer.page_input.trim().parse::<usize>() {
            Ok(number) if number >= 1 && self.viewer.in_range(number - 1) => {
                self.request_flip(number - 1, Origin::External, effects);
            }
            _ => {
                debug!(input = %self.viewer.page_input, "Rejected page input");
                self.viewer.page_input = (self.viewer.current_page + 1).to_string();
            }
        }
    }

    fn request_flip(&mut self, target: usize, origin: Origin, effects: &mut Vec<Effect>) {
        if !self.viewer.in_range(target) {
            debug!(
                index = target,
                total = self.viewer.total_pages,
                "Ignoring out-of-range flip"
            );
            return;
        }
        match origin {
            Origin::External => {
                // The engine flips and its event reconciles state; the
                // degraded path inside the effect commits directly.
                effects.push(Effect::EngineFlipTo(target));
            }
            Origin::Internal => {
                if self.commit_page(target) {
                    effects.push(Effect::SaveBookmark);
                    effects.push(Effect::PrefetchImages { all: false });
                }
            }
        }
    }
}
