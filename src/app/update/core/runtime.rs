use super::super::Effect;
use super::super::super::messages::Message;
use super::super::super::state::{App, INITIAL_FLIP_DELAY};
use crate::engine::loader::{EngineLoader, LoadOutcome, sources_from_config};
use crate::engine::surface::FlipbookSurface;
use crate::media;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::window;
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::LoadEngine => {
                let sources = sources_from_config(&self.config.engine_sources);
                let loader = EngineLoader::new(
                    sources,
                    Duration::from_millis(self.config.engine_settle_delay_ms),
                    Duration::from_secs_f32(self.config.engine_load_timeout_secs),
                );
                self.engine.cancel = Some(loader.cancel_flag());
                info!(
                    sources = ?self.config.engine_sources,
                    timeout_secs = self.config.engine_load_timeout_secs,
                    "Starting rendering engine load"
                );
                Task::perform(loader.load(), |outcome| match outcome {
                    LoadOutcome::Ready(handle) => Message::EngineReady { handle },
                    LoadOutcome::Failed(reason) => Message::EngineLoadFailed { reason },
                    LoadOutcome::Cancelled => Message::EngineLoadCancelled,
                })
            }
            Effect::BuildSurface => self.build_surface(),
            Effect::EngineFlipTo(target) => {
                let flips = self.engine_flip_to(target);
                self.flip_events_task(flips)
            }
            Effect::EngineFlipNext => {
                let flips = self.engine_step(1);
                self.flip_events_task(flips)
            }
            Effect::EngineFlipPrev => {
                let flips = self.engine_step(-1);
                self.flip_events_task(flips)
            }
            Effect::PrefetchImages { all } => self.image_fetch_tasks(all),
            Effect::SaveBookmark => {
                self.persist_bookmark();
                Task::none()
            }
            Effect::OpenDownload => {
                let Some(url) = self.download_url() else {
                    return Task::none();
                };
                info!(%url, "Opening download");
                if let Err(err) = Command::new("xdg-open").arg(&url).spawn() {
                    warn!(%url, "Failed to open download: {err}");
                }
                Task::none()
            }
            Effect::QuitSafely => {
                if let Some(cancel) = &self.engine.cancel {
                    cancel.cancel();
                }
                self.persist_bookmark();
                if let Some(surface) = self.engine.surface.as_mut() {
                    surface.destroy();
                }
                info!("Shutting down viewer");
                iced::exit()
            }
        }
    }

    fn build_surface(&mut self) -> Task<Message> {
        let Some(handle) = self.engine.handle.clone() else {
            warn!("Surface requested before an engine handle was ready");
            return Task::none();
        };
        let Some(first_page_px) = self.document.first_page_size() else {
            warn!("Surface requested without page dimensions");
            return Task::none();
        };
        if let Some(surface) = self.engine.surface.as_mut() {
            if !surface.is_stale(&self.image_urls, first_page_px) {
                debug!("Surface already current; skipping rebuild");
                return Task::none();
            }
            surface.destroy();
            self.engine.surface = None;
        }

        match FlipbookSurface::build(
            &handle,
            &self.image_urls,
            first_page_px,
            self.viewer.current_page,
            &self.surface_tuning(),
        ) {
            Ok(surface) => {
                self.engine.surface = Some(surface);
                let mut tasks = vec![self.image_fetch_tasks(false)];
                if self.viewer.current_page > 0 {
                    // Reconcile the engine with the locator's start page once
                    // the surface has settled.
                    let target = self.viewer.current_page;
                    tasks.push(Task::perform(
                        async move {
                            tokio::time::sleep(INITIAL_FLIP_DELAY).await;
                            target
                        },
                        Message::FlipToIndex,
                    ));
                }
                Task::batch(tasks)
            }
            Err(err) => {
                warn!(%err, "Failed to build flipbook surface; navigation falls back to direct state");
                Task::none()
            }
        }
    }

    /// Drive the engine to `target` and return the flip events it emitted.
    /// A missing surface or an engine that rejects the call degrades into a
    /// direct state commit so the viewer never wedges on an engine quirk.
    pub(super) fn engine_flip_to(&mut self, target: usize) -> Vec<usize> {
        match self.engine.surface.as_mut() {
            Some(surface) => match surface.flip_to(target) {
                Ok(()) => surface.drain_flips(),
                Err(err) => {
                    warn!(index = target, %err, "Engine rejected flip; committing state directly");
                    self.commit_page(target);
                    self.persist_bookmark();
                    Vec::new()
                }
            },
            None => {
                debug!(index = target, "No surface attached; committing state directly");
                self.commit_page(target);
                self.persist_bookmark();
                Vec::new()
            }
        }
    }

    /// Step through the engine's own next/prev API, with the same degraded
    /// path as [`Self::engine_flip_to`].
    pub(super) fn engine_step(&mut self, direction: i32) -> Vec<usize> {
        let fallback_target = if direction > 0 {
            Some(self.viewer.current_page + 1)
        } else {
            self.viewer.current_page.checked_sub(1)
        };
        match self.engine.surface.as_mut() {
            Some(surface) => {
                let result = if direction > 0 {
                    surface.flip_next()
                } else {
                    surface.flip_prev()
                };
                match result {
                    Ok(()) => surface.drain_flips(),
                    Err(err) => {
                        warn!(direction, %err, "Engine rejected step; committing state directly");
                        if let Some(target) = fallback_target.filter(|t| self.viewer.in_range(*t)) {
                            self.commit_page(target);
                            self.persist_bookmark();
                        }
                        Vec::new()
                    }
                }
            }
            None => {
                debug!(direction, "No surface attached; committing state directly");
                if let Some(target) = fallback_target.filter(|t| self.viewer.in_range(*t)) {
                    self.commit_page(target);
                    self.persist_bookmark();
                }
                Vec::new()
            }
        }
    }

    fn flip_events_task(&mut self, flips: Vec<usize>) -> Task<Message> {
        if flips.is_empty() {
            self.image_fetch_tasks(false)
        } else {
            Task::batch(
                flips
                    .into_iter()
                    .map(|index| Task::done(Message::EngineFlipped(index))),
            )
        }
    }

    /// Fetch page images that are missing around the current page (or all
    /// of them, for the thumbnail strip).
    pub(super) fn image_fetch_tasks(&mut self, all: bool) -> Task<Message> {
        let total = self.image_urls.len();
        if total == 0 {
            return Task::none();
        }
        let (lo, hi) = if all {
            (0, total)
        } else {
            let radius = self.config.prefetch_radius;
            let current = self.viewer.current_page;
            (
                current.saturating_sub(radius),
                (current + radius + 2).min(total),
            )
        };

        let mut tasks = Vec::new();
        for index in lo..hi {
            if !self.images.needs_fetch(index) {
                continue;
            }
            self.images.mark_pending(index);
            let location = self.image_urls[index].clone();
            tasks.push(Task::perform(
                async move {
                    match media::load_image_bytes(&location) {
                        Ok(bytes) => Message::PageImageLoaded {
                            index,
                            bytes: Some(bytes),
                        },
                        Err(err) => {
                            warn!(index, "Page image fetch failed: {err:#}");
                            Message::PageImageLoaded { index, bytes: None }
                        }
                    }
                },
                |message| message,
            ));
        }
        if tasks.is_empty() {
            Task::none()
        } else {
            Task::batch(tasks)
        }
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    // Captured events belong to a focused widget (e.g. the page-number
    // input); shortcuts must not fire while typing.
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}
