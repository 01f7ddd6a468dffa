use super::super::Effect;
use super::super::super::messages::Message;
use super::super::super::state::App;
use crate::engine::EngineHandle;
use crate::engine::loader::LibraryLoadState;
use iced::widget::image::Handle;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::EngineLoadRequested => self.handle_engine_load_requested(&mut effects),
            Message::EngineReady { handle } => self.handle_engine_ready(handle, &mut effects),
            Message::EngineLoadFailed { reason } => self.handle_engine_load_failed(reason),
            Message::EngineLoadCancelled => {
                debug!("Engine load cancelled during teardown");
            }
            Message::RetryEngineLoad => self.handle_retry_engine_load(&mut effects),
            Message::EngineFlipped(index) => self.handle_engine_flipped(index, &mut effects),
            Message::FlipNext => self.handle_flip_next(&mut effects),
            Message::FlipPrev => self.handle_flip_prev(&mut effects),
            Message::FlipToIndex(index) => self.handle_flip_to_index(index, &mut effects),
            Message::ThumbnailClicked(index) => self.handle_flip_to_index(index, &mut effects),
            Message::PageInputChanged(value) => self.handle_page_input_changed(value),
            Message::PageInputCommitted => self.handle_page_input_committed(&mut effects),
            Message::ZoomIn => self.handle_zoom_in(),
            Message::ZoomOut => self.handle_zoom_out(),
            Message::ZoomReset => self.handle_zoom_reset(),
            Message::ToggleMagnifier => self.handle_toggle_magnifier(),
            Message::ToggleThumbnails => self.handle_toggle_thumbnails(&mut effects),
            Message::ToggleTheme => self.handle_toggle_theme(),
            Message::PointerMoved { x, y } => self.handle_pointer_moved(x, y),
            Message::PointerLeft => self.handle_pointer_left(),
            Message::SurfacePressed => self.handle_surface_pressed(&mut effects),
            Message::PageImageLoaded { index, bytes } => {
                self.handle_page_image_loaded(index, bytes)
            }
            Message::WindowResized { width, height } => {
                self.viewer_area = (width, height);
            }
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::DownloadRequested => effects.push(Effect::OpenDownload),
            Message::Tick(now) => self.handle_tick(now, &mut effects),
        }

        effects
    }

    fn handle_engine_load_requested(&mut self, effects: &mut Vec<Effect>) {
        if self.document_error.is_some() || self.image_urls.is_empty() {
            warn!("Refusing to load the engine without a complete document");
            return;
        }
        if self.engine.load.is_terminal() || self.engine.load_requested {
            return;
        }
        self.engine.load_requested = true;
        effects.push(Effect::LoadEngine);
    }

    fn handle_engine_ready(&mut self, handle: EngineHandle, effects: &mut Vec<Effect>) {
        if self.engine.load.is_terminal() {
            debug!("Ignoring engine readiness after a terminal load state");
            return;
        }
        info!(engine = handle.name(), "Rendering engine ready");
        self.engine.load = LibraryLoadState::Ready;
        self.engine.handle = Some(handle);
        effects.push(Effect::BuildSurface);
    }

    fn handle_engine_load_failed(&mut self, reason: String) {
        if self.engine.load.is_terminal() {
            debug!("Ignoring engine failure after a terminal load state");
            return;
        }
        warn!(%reason, "Rendering engine unavailable");
        self.engine.load = LibraryLoadState::Failed(reason);
    }

    fn handle_retry_engine_load(&mut self, effects: &mut Vec<Effect>) {
        if !matches!(self.engine.load, LibraryLoadState::Failed(_)) {
            return;
        }
        info!("Retrying rendering engine load on user request");
        self.engine.load = LibraryLoadState::Pending;
        self.engine.handle = None;
        effects.push(Effect::LoadEngine);
    }

    fn handle_page_image_loaded(&mut self, index: usize, bytes: Option<Vec<u8>>) {
        let handle = bytes.map(Handle::from_bytes);
        self.images.store(index, handle);
    }
}
