mod constants;
mod engine;
mod viewer;

use crate::cache;
use crate::config::{AppConfig, ThemeMode};
use crate::document::{self, Document};
use crate::engine::surface::{SurfaceLayout, SurfaceTuning};
use crate::geometry::{self, Orientation, PageRect};
use crate::link::DocumentLocator;
use crate::media;
use iced::Task;
use iced::widget::image::Handle;
use tracing::{info, warn};

use super::messages::Message;

pub(crate) use constants::*;
pub(in crate::app) use engine::EngineState;
pub(in crate::app) use viewer::ViewerState;

/// Core application state composed of sub-models.
pub struct App {
    pub(super) document: Document,
    /// Why the document cannot be displayed, when it cannot.
    pub(super) document_error: Option<String>,
    pub(super) image_urls: Vec<String>,
    pub(super) images: ImageStore,
    pub(super) viewer: ViewerState,
    pub(super) engine: EngineState,
    pub(super) config: AppConfig,
    pub(super) locator: DocumentLocator,
    pub(super) share_link: String,
    pub(super) viewer_area: (f32, f32),
}

/// Fetched page images, index-aligned with the page list.
pub(in crate::app) struct ImageStore {
    handles: Vec<Option<Handle>>,
    pending: Vec<bool>,
}

impl ImageStore {
    fn new(len: usize) -> Self {
        ImageStore {
            handles: vec![None; len],
            pending: vec![false; len],
        }
    }

    pub(in crate::app) fn get(&self, index: usize) -> Option<&Handle> {
        self.handles.get(index).and_then(Option::as_ref)
    }

    pub(in crate::app) fn needs_fetch(&self, index: usize) -> bool {
        matches!(self.handles.get(index), Some(None)) && !self.pending.get(index).copied().unwrap_or(true)
    }

    pub(in crate::app) fn mark_pending(&mut self, index: usize) {
        if let Some(slot) = self.pending.get_mut(index) {
            *slot = true;
        }
    }

    pub(in crate::app) fn store(&mut self, index: usize, handle: Option<Handle>) {
        if let Some(slot) = self.pending.get_mut(index) {
            *slot = false;
        }
        if let Some(slot) = self.handles.get_mut(index) {
            *slot = handle;
        }
    }
}

impl App {
    pub(super) fn bootstrap(
        document: Document,
        mut config: AppConfig,
        locator: DocumentLocator,
        start_page: usize,
    ) -> (App, Task<Message>) {
        clamp_config(&mut config);

        let document_error = document.validate().err().map(|err| err.to_string());
        let image_urls = if document_error.is_none() {
            let media_base = document::media_base_for(&locator.source, &config.media_base_url);
            media::resolve_image_urls(&document, &media_base)
        } else {
            Vec::new()
        };

        let total_pages = document.page_count();
        let viewer = ViewerState::new(total_pages, start_page, config.magnifier_zoom);
        let share_link = locator.link_for_page(viewer.current_page + 1);
        let viewer_area = (config.window_width, config.window_height);

        let app = App {
            images: ImageStore::new(image_urls.len()),
            image_urls,
            document,
            document_error: document_error.clone(),
            viewer,
            engine: EngineState::new(),
            config,
            locator,
            share_link,
            viewer_area,
        };

        let init_task = match document_error {
            None if !app.image_urls.is_empty() => {
                info!(
                    slug = %app.document.slug,
                    pages = app.viewer.total_pages,
                    start_page = app.viewer.current_page + 1,
                    "Initialized viewer state"
                );
                Task::done(Message::EngineLoadRequested)
            }
            None => {
                warn!(slug = %app.document.slug, "Document resolved to no page images");
                Task::none()
            }
            Some(reason) => {
                warn!(slug = %app.document.slug, %reason, "Document data is incomplete");
                Task::none()
            }
        };

        (app, init_task)
    }

    pub(super) fn theme_mode(&self) -> ThemeMode {
        self.config.theme
    }

    /// Record a committed flip: page index, the page-number input mirror,
    /// and the share link all move together so every channel observes the
    /// same authoritative state.
    pub(super) fn commit_page(&mut self, index: usize) -> bool {
        if !self.viewer.in_range(index) {
            return false;
        }
        let changed = self.viewer.current_page != index;
        self.viewer.current_page = index;
        self.viewer.page_input = (index + 1).to_string();
        self.share_link = self.locator.link_for_page(index + 1);
        if changed {
            info!(page = index + 1, link = %self.share_link, "Navigated to page");
        }
        changed
    }

    pub(super) fn persist_bookmark(&self) {
        cache::save_bookmark(&self.locator.source, self.viewer.current_page);
    }

    pub(super) fn page_layout(&self) -> Option<SurfaceLayout> {
        self.document
            .first_page_size()
            .map(|(w, h)| SurfaceLayout::from_first_page(w, h))
    }

    /// The pages currently on screen with their display rectangles:
    /// portrait books show one page, landscape books a spread (the cover
    /// opens alone when configured).
    pub(super) fn displayed_pages(&self) -> Vec<(usize, PageRect)> {
        let Some(layout) = self.page_layout() else {
            return Vec::new();
        };
        let (area_w, area_h) = self.viewer_area;
        let current = self.viewer.current_page;
        let single = |page: usize| {
            let rects = geometry::display_rects(
                area_w,
                area_h,
                layout.width,
                layout.height,
                Orientation::Portrait,
                self.viewer.zoom,
            );
            rects.first().map(|rect| vec![(page, *rect)]).unwrap_or_default()
        };

        match layout.orientation {
            Orientation::Portrait => single(current),
            Orientation::Landscape => {
                let left = match spread_left(current, self.config.show_cover) {
                    Some(left) => left,
                    None => return single(current),
                };
                let rects = geometry::display_rects(
                    area_w,
                    area_h,
                    layout.width,
                    layout.height,
                    Orientation::Landscape,
                    self.viewer.zoom,
                );
                let mut pages = Vec::new();
                for (offset, rect) in rects.into_iter().enumerate() {
                    let page = left + offset;
                    if self.viewer.in_range(page) {
                        pages.push((page, rect));
                    }
                }
                pages
            }
        }
    }

    pub(super) fn surface_tuning(&self) -> SurfaceTuning {
        SurfaceTuning {
            show_cover: self.config.show_cover,
            max_shadow_opacity: self.config.max_shadow_opacity,
            flip_duration_ms: self.config.flip_duration_ms,
            use_pointer_events: self.config.pointer_flip,
            swipe_distance: self.config.swipe_distance,
        }
    }

    pub(super) fn download_url(&self) -> Option<String> {
        if !self.document.can_download {
            return None;
        }
        let media_base = document::media_base_for(&self.locator.source, &self.config.media_base_url);
        Some(media::normalize_scheme(&format!(
            "{}/projects/{}/download.pdf",
            media_base.trim_end_matches('/'),
            self.document.slug
        )))
    }
}

/// Left page of the spread containing `current`. `None` means the page
/// opens alone (the cover).
fn spread_left(current: usize, show_cover: bool) -> Option<usize> {
    if show_cover {
        if current == 0 {
            None
        } else if current % 2 == 1 {
            Some(current)
        } else {
            Some(current - 1)
        }
    } else {
        Some(current - current % 2)
    }
}

pub(crate) fn clamp_config(config: &mut AppConfig) {
    config.window_width = config.window_width.clamp(320.0, 7680.0);
    config.window_height = config.window_height.clamp(240.0, 4320.0);
    config.window_pos_x = config.window_pos_x.filter(|v| v.is_finite());
    config.window_pos_y = config.window_pos_y.filter(|v| v.is_finite());
    config.magnifier_zoom = config
        .magnifier_zoom
        .clamp(MIN_MAGNIFIER_ZOOM, MAX_MAGNIFIER_ZOOM);
    config.lens_diameter = config.lens_diameter.clamp(MIN_LENS_DIAMETER, MAX_LENS_DIAMETER);
    config.nav_hide_delay_secs = config.nav_hide_delay_secs.clamp(0.5, 30.0);
    config.engine_load_timeout_secs = config.engine_load_timeout_secs.clamp(1.0, 60.0);
    config.engine_settle_delay_ms = config.engine_settle_delay_ms.min(2_000);
    config.flip_duration_ms = config.flip_duration_ms.clamp(100, 5_000);
    config.max_shadow_opacity = config.max_shadow_opacity.clamp(0.0, 1.0);
    config.swipe_distance = config.swipe_distance.clamp(5.0, 200.0);
    config.prefetch_radius = config.prefetch_radius.min(16);
    if config.engine_sources.is_empty() {
        config.engine_sources = vec!["builtin".to_string()];
    }
}
