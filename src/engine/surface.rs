//! The flipbook surface: the host the engine instance is attached to.
//!
//! A surface is built once per (engine ready, non-empty page list)
//! combination. Its geometry derives from the first page's aspect ratio,
//! clamped to the configured bounds; wide pages open as a two-page spread,
//! tall pages as a single portrait page. The engine does not support
//! changing the page count in place, so any change to the page list or the
//! layout inputs destroys the surface and builds a fresh one. Destruction
//! happens exactly once; `Drop` is the backstop for unmount paths that
//! never reach an explicit teardown.

use super::{EngineConfig, EngineError, EngineHandle, FlipEngine, SizeMode};
use crate::geometry::Orientation;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Base display width of a single page before clamping.
pub const BASE_PAGE_WIDTH: f32 = 800.0;
pub const MIN_PAGE_WIDTH: f32 = 400.0;
pub const MAX_PAGE_WIDTH: f32 = 1200.0;
pub const MIN_PAGE_HEIGHT: f32 = 300.0;
pub const MAX_PAGE_HEIGHT: f32 = 900.0;

/// Display geometry derived from the first page of the book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub width: f32,
    pub height: f32,
    pub orientation: Orientation,
}

impl SurfaceLayout {
    /// Compute the page display size from the first page's pixel size. The
    /// aspect ratio is preserved where the clamps allow it; the orientation
    /// follows the ratio (tall pages render one-up).
    pub fn from_first_page(width_px: u32, height_px: u32) -> SurfaceLayout {
        let aspect = if height_px == 0 {
            4.0 / 3.0
        } else {
            width_px as f32 / height_px as f32
        };
        let orientation = if aspect < 1.0 {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };

        let mut width = BASE_PAGE_WIDTH;
        let mut height = (width / aspect).round();
        if height < MIN_PAGE_HEIGHT || height > MAX_PAGE_HEIGHT {
            height = height.clamp(MIN_PAGE_HEIGHT, MAX_PAGE_HEIGHT);
            width = (height * aspect).round();
        }
        width = width.clamp(MIN_PAGE_WIDTH, MAX_PAGE_WIDTH);

        SurfaceLayout {
            width,
            height,
            orientation,
        }
    }
}

/// Animation and input tuning forwarded to the engine, sourced from the
/// app configuration.
#[derive(Debug, Clone)]
pub struct SurfaceTuning {
    pub show_cover: bool,
    pub max_shadow_opacity: f32,
    pub flip_duration_ms: u64,
    pub use_pointer_events: bool,
    pub swipe_distance: f32,
}

pub struct FlipbookSurface {
    engine: Box<dyn FlipEngine>,
    engine_name: String,
    layout: SurfaceLayout,
    page_count: usize,
    flips: Arc<Mutex<VecDeque<usize>>>,
    destroyed: bool,
}

impl FlipbookSurface {
    /// Construct the engine, load the page list, and attach the flip
    /// listener. The listener is always installed fresh here, which is
    /// what keeps a rebuilt surface from double-subscribing.
    pub fn build(
        handle: &EngineHandle,
        urls: &[String],
        first_page_px: (u32, u32),
        start_page: usize,
        tuning: &SurfaceTuning,
    ) -> Result<FlipbookSurface, EngineError> {
        if urls.is_empty() {
            return Err(EngineError::NoPages);
        }
        let layout = SurfaceLayout::from_first_page(first_page_px.0, first_page_px.1);
        let config = EngineConfig {
            width: layout.width,
            height: layout.height,
            min_width: MIN_PAGE_WIDTH,
            max_width: MAX_PAGE_WIDTH,
            min_height: MIN_PAGE_HEIGHT,
            max_height: MAX_PAGE_HEIGHT,
            show_cover: tuning.show_cover,
            max_shadow_opacity: tuning.max_shadow_opacity,
            flip_duration_ms: tuning.flip_duration_ms,
            orientation: layout.orientation,
            start_page: start_page.min(urls.len() - 1),
            size_mode: SizeMode::Stretch,
            use_pointer_events: tuning.use_pointer_events,
            swipe_distance: tuning.swipe_distance,
        };

        let mut engine = handle.construct(config);
        engine.load_pages(urls)?;

        let flips = Arc::new(Mutex::new(VecDeque::new()));
        let sink = flips.clone();
        engine.set_flip_listener(Some(Box::new(move |index| {
            if let Ok(mut queue) = sink.lock() {
                queue.push_back(index);
            }
        })))?;

        info!(
            engine = handle.name(),
            pages = urls.len(),
            width = layout.width,
            height = layout.height,
            orientation = ?layout.orientation,
            "Flipbook surface built"
        );

        Ok(FlipbookSurface {
            engine,
            engine_name: handle.name().to_string(),
            layout,
            page_count: urls.len(),
            flips,
            destroyed: false,
        })
    }

    /// True when the page list or layout inputs no longer match what this
    /// surface was built with, i.e. it must be rebuilt.
    pub fn is_stale(&self, urls: &[String], first_page_px: (u32, u32)) -> bool {
        self.page_count != urls.len()
            || self.layout != SurfaceLayout::from_first_page(first_page_px.0, first_page_px.1)
    }

    pub fn flip_to(&mut self, index: usize) -> Result<(), EngineError> {
        self.guard()?;
        self.engine.flip_to(index)
    }

    pub fn flip_next(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.engine.flip_next()
    }

    pub fn flip_prev(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        self.engine.flip_prev()
    }

    pub fn current_page(&self) -> usize {
        self.engine.current_page()
    }

    /// Pull all flip events emitted since the last drain, oldest first.
    pub fn drain_flips(&self) -> Vec<usize> {
        match self.flips.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Tear the engine down. Idempotent; the second call is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Err(err) = self.engine.set_flip_listener(None) {
            debug!(%err, "Listener already detached during teardown");
        }
        self.engine.destroy();
        info!(engine = %self.engine_name, "Flipbook surface destroyed");
    }

    fn guard(&self) -> Result<(), EngineError> {
        if self.destroyed {
            warn!("Call into a destroyed surface ignored");
            Err(EngineError::Destroyed)
        } else {
            Ok(())
        }
    }
}

impl Drop for FlipbookSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{RecordingProbes, recording_handle};
    use std::sync::atomic::Ordering;

    fn tuning() -> SurfaceTuning {
        SurfaceTuning {
            show_cover: true,
            max_shadow_opacity: 0.5,
            flip_duration_ms: 1000,
            use_pointer_events: true,
            swipe_distance: 30.0,
        }
    }

    fn urls(count: usize) -> Vec<String> {
        (1..=count).map(|n| format!("page-{n:03}.jpg")).collect()
    }

    #[test]
    fn landscape_first_page_keeps_base_width() {
        let layout = SurfaceLayout::from_first_page(800, 600);
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert!((layout.width - 800.0).abs() < f32::EPSILON);
        assert!((layout.height - 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn tall_page_opens_portrait_within_height_clamp() {
        let layout = SurfaceLayout::from_first_page(600, 1200);
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert!(layout.height <= MAX_PAGE_HEIGHT);
        assert!(layout.width >= MIN_PAGE_WIDTH);
    }

    #[test]
    fn extreme_aspect_stays_within_bounds() {
        for (w, h) in [(4000, 100), (100, 4000), (0, 0), (800, 0)] {
            let layout = SurfaceLayout::from_first_page(w, h);
            assert!(layout.width >= MIN_PAGE_WIDTH && layout.width <= MAX_PAGE_WIDTH);
            assert!(layout.height >= MIN_PAGE_HEIGHT && layout.height <= MAX_PAGE_HEIGHT);
        }
    }

    #[test]
    fn empty_page_list_refuses_to_build() {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, false);
        let result = FlipbookSurface::build(&handle, &[], (800, 600), 0, &tuning());
        assert!(matches!(result, Err(EngineError::NoPages)));
    }

    #[test]
    fn flip_events_are_drained_in_order() {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, false);
        let mut surface =
            FlipbookSurface::build(&handle, &urls(5), (800, 600), 0, &tuning()).unwrap();

        surface.flip_to(2).unwrap();
        surface.flip_next().unwrap();
        assert_eq!(surface.drain_flips(), vec![2, 3]);
        assert!(surface.drain_flips().is_empty());
    }

    #[test]
    fn destroy_is_idempotent_and_drop_backstops() {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, false);
        let mut surface =
            FlipbookSurface::build(&handle, &urls(3), (800, 600), 0, &tuning()).unwrap();

        surface.destroy();
        surface.destroy();
        assert_eq!(surface.flip_to(1), Err(EngineError::Destroyed));
        drop(surface);
        assert_eq!(probes.destroy_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_without_explicit_destroy_tears_down_once() {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, false);
        {
            let _surface =
                FlipbookSurface::build(&handle, &urls(3), (800, 600), 0, &tuning()).unwrap();
        }
        assert_eq!(probes.destroy_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rebuild_attaches_exactly_one_listener_per_surface() {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, false);
        let surface =
            FlipbookSurface::build(&handle, &urls(3), (800, 600), 0, &tuning()).unwrap();
        drop(surface);
        let _rebuilt =
            FlipbookSurface::build(&handle, &urls(4), (800, 600), 0, &tuning()).unwrap();
        // One attach per build; the rebuild replaced rather than stacked.
        assert_eq!(probes.listener_sets.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn staleness_tracks_page_count_and_layout() {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, false);
        let surface =
            FlipbookSurface::build(&handle, &urls(3), (800, 600), 0, &tuning()).unwrap();
        assert!(!surface.is_stale(&urls(3), (800, 600)));
        assert!(surface.is_stale(&urls(4), (800, 600)));
        assert!(surface.is_stale(&urls(3), (600, 1200)));
    }
}
