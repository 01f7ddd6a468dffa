use crate::engine::EngineHandle;
use crate::engine::loader::{CancelFlag, LibraryLoadState};
use crate::engine::surface::FlipbookSurface;

/// Rendering-engine side of the app state: load progress, the typed
/// constructor handle once a source is ready, and the live surface.
pub struct EngineState {
    pub(in crate::app) load: LibraryLoadState,
    pub(in crate::app) handle: Option<EngineHandle>,
    pub(in crate::app) surface: Option<FlipbookSurface>,
    /// Cancel flag of the in-flight load, cleared on teardown so a late
    /// completion never lands on a disposed app.
    pub(in crate::app) cancel: Option<CancelFlag>,
    pub(in crate::app) load_requested: bool,
}

impl EngineState {
    pub(in crate::app) fn new() -> Self {
        EngineState {
            load: LibraryLoadState::Pending,
            handle: None,
            surface: None,
            cancel: None,
            load_requested: false,
        }
    }
}
