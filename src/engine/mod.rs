//! The page-flip rendering engine boundary.
//!
//! The engine owns the page-turn animation; the viewer only orchestrates
//! it. Engines are obtained through [`loader::EngineLoader`], which probes
//! an ordered list of sources and returns a typed [`EngineHandle`] once one
//! is ready, so nothing in the app ever pokes at ambient global state. All
//! calls into an engine return `Result` so a capability mismatch between
//! the viewer and a loaded engine degrades into a logged fallback instead
//! of a crash.

pub mod builtin;
pub mod loader;
pub mod surface;

use crate::geometry::Orientation;
use std::fmt;
use std::sync::Arc;

/// Callback invoked by the engine whenever a flip lands on a new page. The
/// argument is the new 0-based page index.
pub type FlipListener = Box<dyn FnMut(usize) + Send>;

/// How the engine fits its canvas into the host area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    Fixed,
    #[default]
    Stretch,
}

/// Construction parameters handed to an engine, mirroring what the
/// animation library needs up front: geometry, animation tuning, and input
/// behavior. Engines do not support changing the page count afterwards;
/// the surface is rebuilt instead.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub show_cover: bool,
    pub max_shadow_opacity: f32,
    pub flip_duration_ms: u64,
    pub orientation: Orientation,
    pub start_page: usize,
    pub size_mode: SizeMode,
    pub use_pointer_events: bool,
    pub swipe_distance: f32,
}

/// Errors surfaced at the engine seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine does not implement the requested operation; the caller
    /// falls back to direct state mutation.
    Unsupported(&'static str),
    /// The engine instance was already destroyed.
    Destroyed,
    /// A flip target outside the loaded page range.
    OutOfRange { index: usize, total: usize },
    /// The surface cannot be built without at least one page.
    NoPages,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Unsupported(op) => write!(f, "engine does not support `{op}`"),
            EngineError::Destroyed => write!(f, "engine instance was already destroyed"),
            EngineError::OutOfRange { index, total } => {
                write!(f, "flip target {index} outside loaded range 0..{total}")
            }
            EngineError::NoPages => write!(f, "cannot build a surface without pages"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Operations every page-flip engine exposes. Events are delivered through
/// the registered listener; registering a new listener always detaches the
/// previous one.
pub trait FlipEngine: Send {
    fn load_pages(&mut self, urls: &[String]) -> Result<(), EngineError>;
    fn flip_to(&mut self, index: usize) -> Result<(), EngineError>;
    fn flip_next(&mut self) -> Result<(), EngineError>;
    fn flip_prev(&mut self) -> Result<(), EngineError>;
    fn set_flip_listener(&mut self, listener: Option<FlipListener>) -> Result<(), EngineError>;
    fn current_page(&self) -> usize;
    /// Tear down canvases and listeners. Must be safe to call once; further
    /// operations return [`EngineError::Destroyed`].
    fn destroy(&mut self);
}

/// Factory for engine instances, as registered by a loader source.
pub type EngineConstructor = Arc<dyn Fn(EngineConfig) -> Box<dyn FlipEngine> + Send + Sync>;

/// Typed handle to a ready engine constructor, produced by the loader once
/// a source has been probed successfully.
#[derive(Clone)]
pub struct EngineHandle {
    name: String,
    constructor: EngineConstructor,
}

impl EngineHandle {
    pub fn new(name: impl Into<String>, constructor: EngineConstructor) -> Self {
        EngineHandle {
            name: name.into(),
            constructor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn construct(&self, config: EngineConfig) -> Box<dyn FlipEngine> {
        (self.constructor)(config)
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording engine used by unit tests across the crate.

    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) struct RecordingEngine {
        pub total: usize,
        pub current: usize,
        pub listener: Option<FlipListener>,
        pub destroyed: bool,
        pub reject_flips: bool,
        pub log: Arc<Mutex<Vec<String>>>,
        pub destroy_count: Arc<AtomicUsize>,
        pub listener_sets: Arc<AtomicUsize>,
    }

    impl RecordingEngine {
        fn record(&self, entry: String) {
            if let Ok(mut log) = self.log.lock() {
                log.push(entry);
            }
        }
    }

    impl FlipEngine for RecordingEngine {
        fn load_pages(&mut self, urls: &[String]) -> Result<(), EngineError> {
            if self.destroyed {
                return Err(EngineError::Destroyed);
            }
            self.total = urls.len();
            self.record(format!("load_pages:{}", urls.len()));
            Ok(())
        }

        fn flip_to(&mut self, index: usize) -> Result<(), EngineError> {
            if self.destroyed {
                return Err(EngineError::Destroyed);
            }
            if self.reject_flips {
                return Err(EngineError::Unsupported("flip"));
            }
            if index >= self.total {
                return Err(EngineError::OutOfRange {
                    index,
                    total: self.total,
                });
            }
            self.record(format!("flip_to:{index}"));
            if index != self.current {
                self.current = index;
                if let Some(listener) = self.listener.as_mut() {
                    listener(index);
                }
            }
            Ok(())
        }

        fn flip_next(&mut self) -> Result<(), EngineError> {
            if self.current + 1 < self.total {
                self.flip_to(self.current + 1)
            } else {
                Ok(())
            }
        }

        fn flip_prev(&mut self) -> Result<(), EngineError> {
            if self.current > 0 {
                self.flip_to(self.current - 1)
            } else {
                Ok(())
            }
        }

        fn set_flip_listener(&mut self, listener: Option<FlipListener>) -> Result<(), EngineError> {
            if self.destroyed {
                return Err(EngineError::Destroyed);
            }
            if listener.is_some() {
                self.listener_sets.fetch_add(1, Ordering::SeqCst);
            }
            self.listener = listener;
            Ok(())
        }

        fn current_page(&self) -> usize {
            self.current
        }

        fn destroy(&mut self) {
            if !self.destroyed {
                self.destroyed = true;
                self.listener = None;
                self.destroy_count.fetch_add(1, Ordering::SeqCst);
                self.record("destroy".to_string());
            }
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct RecordingProbes {
        pub log: Arc<Mutex<Vec<String>>>,
        pub destroy_count: Arc<AtomicUsize>,
        pub listener_sets: Arc<AtomicUsize>,
    }

    pub(crate) fn recording_handle(probes: &RecordingProbes, reject_flips: bool) -> EngineHandle {
        let log = probes.log.clone();
        let destroy_count = probes.destroy_count.clone();
        let listener_sets = probes.listener_sets.clone();
        EngineHandle::new(
            "recording",
            Arc::new(move |config: EngineConfig| {
                Box::new(RecordingEngine {
                    total: 0,
                    current: config.start_page,
                    listener: None,
                    destroyed: false,
                    reject_flips,
                    log: log.clone(),
                    destroy_count: destroy_count.clone(),
                    listener_sets: listener_sets.clone(),
                }) as Box<dyn FlipEngine>
            }),
        )
    }
}
