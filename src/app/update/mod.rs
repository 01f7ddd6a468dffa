mod appearance;
mod core;
mod navigation;
mod pointer;

/// Describes work that must be performed outside the pure reducer.
pub(super) enum Effect {
    /// Start the multi-source engine load.
    LoadEngine,
    /// Construct the flipbook surface from the ready engine handle.
    BuildSurface,
    /// Drive the engine to the given page (externally-originated flip).
    EngineFlipTo(usize),
    /// Step the engine through its own next/prev API.
    EngineFlipNext,
    EngineFlipPrev,
    PrefetchImages {
        all: bool,
    },
    SaveBookmark,
    OpenDownload,
    QuitSafely,
}
