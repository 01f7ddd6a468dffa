//! Multi-source engine discovery with bounded wait.
//!
//! Candidate sources are tried in order. A source that loads gets a short
//! settle delay (registration may happen a beat after load), then the
//! provider registry is probed for a constructor under the well-known
//! names. A hit is normalized under the canonical name and the loader
//! reports Ready; a miss unwinds whatever the source registered and the
//! next candidate is tried. Exhausting the list, or the global timeout,
//! yields Failed with a diagnostic the UI can show. Ready and Failed are
//! terminal.

use super::{EngineConstructor, EngineHandle};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Canonical registry name a ready constructor is normalized under.
pub const CANONICAL_ENGINE_NAME: &str = "flip_engine";

/// Registration names probed after a source loads, covering the spellings
/// engines have historically registered themselves with.
const PROBE_NAMES: [&str; 5] = [
    CANONICAL_ENGINE_NAME,
    "page_flip",
    "pageflip",
    "PageFlip",
    "st_page_flip",
];

/// Load progress of the rendering library. Terminal once Ready or Failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryLoadState {
    Pending,
    Ready,
    Failed(String),
}

impl LibraryLoadState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LibraryLoadState::Pending)
    }
}

/// Constructors registered by loaded sources, keyed by registration name.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: HashMap<String, EngineConstructor>,
}

impl ProviderRegistry {
    pub fn register(&mut self, name: impl Into<String>, constructor: EngineConstructor) {
        self.entries.insert(name.into(), constructor);
    }

    pub fn get(&self, name: &str) -> Option<&EngineConstructor> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.remove(name);
    }

    fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// One candidate provider of the rendering engine.
pub trait EngineSource: Send {
    fn name(&self) -> &str;
    /// Register constructors into the registry. An `Err` diagnostic makes
    /// the loader advance to the next candidate.
    fn load(&mut self, registry: &mut ProviderRegistry) -> Result<(), String>;
}

/// Shared cancellation flag so an unmount can abandon an in-flight load
/// without the completion landing on a disposed app.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Result of a load attempt.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Ready(EngineHandle),
    Failed(String),
    Cancelled,
}

pub struct EngineLoader {
    sources: Vec<Box<dyn EngineSource>>,
    registry: ProviderRegistry,
    settle_delay: Duration,
    timeout: Duration,
    cancel: CancelFlag,
}

impl EngineLoader {
    pub fn new(
        sources: Vec<Box<dyn EngineSource>>,
        settle_delay: Duration,
        timeout: Duration,
    ) -> Self {
        EngineLoader {
            sources,
            registry: ProviderRegistry::default(),
            settle_delay,
            timeout,
            cancel: CancelFlag::default(),
        }
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Walk the candidate sources until one yields a usable constructor or
    /// the global timeout elapses. Consumes the loader; a retry builds a
    /// fresh one, so Ready/Failed stay terminal per attempt.
    pub async fn load(mut self) -> LoadOutcome {
        let timeout = self.timeout;
        let settle_delay = self.settle_delay;
        let cancel = self.cancel.clone();
        let registry = &mut self.registry;
        let sources = &mut self.sources;

        let attempt = async move {
            if let Some(constructor) = registry.get(CANONICAL_ENGINE_NAME) {
                debug!("Engine constructor already registered; skipping source walk");
                return LoadOutcome::Ready(EngineHandle::new(
                    CANONICAL_ENGINE_NAME,
                    constructor.clone(),
                ));
            }

            for source in sources.iter_mut() {
                if cancel.is_cancelled() {
                    return LoadOutcome::Cancelled;
                }
                let registered_before = registry.names();
                debug!(source = source.name(), "Attempting engine source");
                if let Err(reason) = source.load(registry) {
                    warn!(source = source.name(), "Engine source failed to load: {reason}");
                    unwind_source(registry, &registered_before);
                    continue;
                }

                // Registration can lag the load itself; give it a beat.
                tokio::time::sleep(settle_delay).await;
                if cancel.is_cancelled() {
                    return LoadOutcome::Cancelled;
                }

                match probe(registry) {
                    Some((found_as, constructor)) => {
                        registry.register(CANONICAL_ENGINE_NAME, constructor.clone());
                        info!(
                            source = source.name(),
                            found_as, "Rendering engine ready"
                        );
                        return LoadOutcome::Ready(EngineHandle::new(
                            source.name().to_string(),
                            constructor,
                        ));
                    }
                    None => {
                        warn!(
                            source = source.name(),
                            "Source loaded but exposed no usable constructor"
                        );
                        unwind_source(registry, &registered_before);
                    }
                }
            }

            LoadOutcome::Failed("all rendering engine sources were exhausted".to_string())
        };

        match tokio::time::timeout(timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(?timeout, "Rendering engine load timed out");
                LoadOutcome::Failed(format!(
                    "no rendering engine became ready within {:.1}s",
                    timeout.as_secs_f32()
                ))
            }
        }
    }
}

fn probe(registry: &ProviderRegistry) -> Option<(&'static str, EngineConstructor)> {
    PROBE_NAMES
        .iter()
        .find_map(|name| registry.get(name).map(|ctor| (*name, ctor.clone())))
}

/// Remove everything a failed source added, the way a failed script tag is
/// pulled back out of the document.
fn unwind_source(registry: &mut ProviderRegistry, registered_before: &[String]) {
    let added: Vec<String> = registry
        .names()
        .into_iter()
        .filter(|name| !registered_before.contains(name))
        .collect();
    for name in added {
        registry.remove(&name);
    }
}

/// Map configured source names to sources. Unknown names stay in the walk
/// as always-failing candidates so a typo shows up in the diagnostics
/// instead of silently shrinking the list.
pub fn sources_from_config(names: &[String]) -> Vec<Box<dyn EngineSource>> {
    names
        .iter()
        .map(|name| match name.as_str() {
            "builtin" => Box::new(super::builtin::BuiltinSource) as Box<dyn EngineSource>,
            other => Box::new(UnknownSource {
                name: other.to_string(),
            }) as Box<dyn EngineSource>,
        })
        .collect()
}

struct UnknownSource {
    name: String,
}

impl EngineSource for UnknownSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&mut self, _registry: &mut ProviderRegistry) -> Result<(), String> {
        Err(format!("no engine source named `{}` is available", self.name))
    }
}
