use crate::engine::EngineHandle;
use iced::keyboard::{Key, Modifiers};
use std::time::Instant;

/// Messages emitted by the UI and the async runtime.
#[derive(Debug, Clone)]
pub enum Message {
    EngineLoadRequested,
    EngineReady {
        handle: EngineHandle,
    },
    EngineLoadFailed {
        reason: String,
    },
    EngineLoadCancelled,
    RetryEngineLoad,
    /// The engine finished a flip; carries the new 0-based index. This is
    /// the internally-driven channel that reconciles state after external
    /// requests, so handling it never calls back into the engine.
    EngineFlipped(usize),
    FlipNext,
    FlipPrev,
    FlipToIndex(usize),
    ThumbnailClicked(usize),
    PageInputChanged(String),
    PageInputCommitted,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ToggleMagnifier,
    ToggleThumbnails,
    ToggleTheme,
    PointerMoved {
        x: f32,
        y: f32,
    },
    PointerLeft,
    SurfacePressed,
    PageImageLoaded {
        index: usize,
        bytes: Option<Vec<u8>>,
    },
    WindowResized {
        width: f32,
        height: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    DownloadRequested,
    Tick(Instant),
}
