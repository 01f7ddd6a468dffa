//! The bundled page-flip engine.
//!
//! This is the always-available last-resort source: a plain state-tracking
//! engine that owns the current page, honors the configured bounds, and
//! emits flip events. The animation itself is delegated to the renderer;
//! what matters at this seam is that the bookkeeping and event contract
//! match what external engines provide.

use super::loader::{EngineSource, ProviderRegistry};
use super::{EngineConfig, EngineError, FlipEngine, FlipListener};
use std::sync::Arc;
use tracing::debug;

/// Source registering the bundled engine. It registers under the
/// historical `page_flip` name on purpose, so the loader's probe and
/// canonical-name normalization are exercised on every start.
pub struct BuiltinSource;

impl EngineSource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin"
    }

    fn load(&mut self, registry: &mut ProviderRegistry) -> Result<(), String> {
        registry.register(
            "page_flip",
            Arc::new(|config: EngineConfig| {
                Box::new(PageCurlEngine::new(config)) as Box<dyn FlipEngine>
            }),
        );
        Ok(())
    }
}

/// Bundled engine instance.
pub struct PageCurlEngine {
    config: EngineConfig,
    pages: Vec<String>,
    current: usize,
    listener: Option<FlipListener>,
    destroyed: bool,
}

impl PageCurlEngine {
    fn new(config: EngineConfig) -> Self {
        let current = config.start_page;
        PageCurlEngine {
            config,
            pages: Vec::new(),
            current,
            listener: None,
            destroyed: false,
        }
    }

    fn guard(&self) -> Result<(), EngineError> {
        if self.destroyed {
            Err(EngineError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn emit(&mut self, index: usize) {
        if let Some(listener) = self.listener.as_mut() {
            listener(index);
        }
    }
}

impl FlipEngine for PageCurlEngine {
    fn load_pages(&mut self, urls: &[String]) -> Result<(), EngineError> {
        self.guard()?;
        self.pages = urls.to_vec();
        self.current = self.current.min(self.pages.len().saturating_sub(1));
        debug!(pages = self.pages.len(), start = self.current, "Engine pages loaded");
        Ok(())
    }

    fn flip_to(&mut self, index: usize) -> Result<(), EngineError> {
        self.guard()?;
        if index >= self.pages.len() {
            return Err(EngineError::OutOfRange {
                index,
                total: self.pages.len(),
            });
        }
        if index != self.current {
            self.current = index;
            self.emit(index);
        }
        Ok(())
    }

    fn flip_next(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        if self.current + 1 < self.pages.len() {
            self.flip_to(self.current + 1)
        } else {
            Ok(())
        }
    }

    fn flip_prev(&mut self) -> Result<(), EngineError> {
        self.guard()?;
        if self.current > 0 {
            self.flip_to(self.current - 1)
        } else {
            Ok(())
        }
    }

    fn set_flip_listener(&mut self, listener: Option<FlipListener>) -> Result<(), EngineError> {
        self.guard()?;
        // Replacing always detaches the previous listener, so a rebuilt
        // surface never double-subscribes.
        self.listener = listener;
        Ok(())
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.listener = None;
        self.pages.clear();
        debug!(flip_duration_ms = self.config.flip_duration_ms, "Engine destroyed");
    }
}
