mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::config::{AppConfig, ThemeMode};
use crate::document::Document;
use crate::link::DocumentLocator;
use iced::{Point, Size, Theme, window};

/// Helper to launch the viewer with a loaded document.
pub fn run_app(
    document: Document,
    config: AppConfig,
    locator: DocumentLocator,
    start_page: usize,
) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        position: match (config.window_pos_x, config.window_pos_y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                window::Position::Specific(Point::new(x, y))
            }
            _ => window::Position::Default,
        },
        ..window::Settings::default()
    };

    iced::application("Flipbook Viewer", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| {
            if matches!(app.theme_mode(), ThemeMode::Night) {
                Theme::Dark
            } else {
                Theme::Light
            }
        })
        .run_with(move || App::bootstrap(document, config, locator, start_page))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for app-level unit tests.

    use super::messages::Message;
    use super::state::App;
    use crate::config::AppConfig;
    use crate::document::{Document, Page};
    use crate::engine::loader::LibraryLoadState;
    use crate::engine::surface::FlipbookSurface;
    use crate::engine::testing::{RecordingProbes, recording_handle};
    use crate::link::DocumentLocator;
    use iced::Task;

    pub(crate) fn test_document(pages: usize) -> Document {
        Document {
            slug: "demo".into(),
            title: "Demo".into(),
            total_pages: pages,
            can_download: false,
            pages: (1..=pages)
                .map(|n| Page {
                    page_number: n,
                    file: format!("page-{n:03}.jpg"),
                    width: 800,
                    height: 600,
                    image_url: None,
                })
                .collect(),
        }
    }

    pub(crate) fn test_app(pages: usize, start: usize) -> (App, Task<Message>) {
        App::bootstrap(
            test_document(pages),
            AppConfig::default(),
            DocumentLocator::parse("books/demo/pages.json"),
            start,
        )
    }

    pub(crate) fn test_app_with_locator(pages: usize, locator: &str) -> (App, Task<Message>) {
        let locator = DocumentLocator::parse(locator);
        let document = test_document(pages);
        let start = locator.start_index(document.page_count()).unwrap_or(0);
        App::bootstrap(document, AppConfig::default(), locator, start)
    }

    fn attach_surface(app: &mut App, reject_flips: bool) -> RecordingProbes {
        let probes = RecordingProbes::default();
        let handle = recording_handle(&probes, reject_flips);
        let surface = FlipbookSurface::build(
            &handle,
            &app.image_urls,
            (800, 600),
            app.viewer.current_page,
            &app.surface_tuning(),
        )
        .expect("test surface");
        app.engine.load = LibraryLoadState::Ready;
        app.engine.handle = Some(handle);
        app.engine.surface = Some(surface);
        probes
    }

    pub(crate) fn attach_recording_surface(app: &mut App) -> RecordingProbes {
        attach_surface(app, false)
    }

    pub(crate) fn attach_rejecting_surface(app: &mut App) -> RecordingProbes {
        attach_surface(app, true)
    }
}
