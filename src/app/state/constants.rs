use iced::widget::text_input::Id as InputId;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Limits and defaults for viewer controls.
pub(crate) const MIN_ZOOM: f32 = 0.5;
pub(crate) const MAX_ZOOM: f32 = 3.0;
pub(crate) const ZOOM_STEP: f32 = 0.25;
pub(crate) const DEFAULT_ZOOM: f32 = 1.0;
pub(crate) const MIN_MAGNIFIER_ZOOM: f32 = 1.0;
pub(crate) const MAX_MAGNIFIER_ZOOM: f32 = 8.0;
pub(crate) const MIN_LENS_DIAMETER: f32 = 80.0;
pub(crate) const MAX_LENS_DIAMETER: f32 = 400.0;
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Settling pause before the programmatic flip to the locator's page.
pub(crate) const INITIAL_FLIP_DELAY: Duration = Duration::from_millis(100);
pub(crate) const THUMBNAIL_HEIGHT: f32 = 96.0;
pub(crate) const NAV_BAR_CLEARANCE: f32 = 88.0;
pub(crate) static PAGE_INPUT_ID: Lazy<InputId> = Lazy::new(|| InputId::new("page-input"));
