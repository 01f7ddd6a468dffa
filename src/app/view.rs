use super::messages::Message;
use super::state::{App, NAV_BAR_CLEARANCE, PAGE_INPUT_ID, THUMBNAIL_HEIGHT};
use crate::engine::loader::LibraryLoadState;
use crate::geometry;
use iced::alignment::{Horizontal, Vertical};
use iced::widget::{
    Row, button, canvas, column, container, image, mouse_area, row, scrollable, stack, text,
    text_input,
};
use iced::{Color, Element, Length, Padding, Point, Rectangle, Renderer, Size, Theme, mouse};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        if let Some(reason) = &self.document_error {
            return self.document_error_view(reason);
        }
        if self.image_urls.is_empty() {
            return self.document_error_view("no page images could be resolved");
        }
        match &self.engine.load {
            LibraryLoadState::Failed(reason) => self.engine_failed_view(reason),
            LibraryLoadState::Pending => self.loading_view(),
            LibraryLoadState::Ready => self.viewer_body(),
        }
    }

    fn document_error_view(&self, reason: &str) -> Element<'_, Message> {
        let body = column![
            text("This flipbook is incomplete").size(24),
            text("The document has not finished processing yet. Please try again later.").size(16),
            text(reason.to_string()).size(13),
        ]
        .spacing(12)
        .align_x(Horizontal::Center);
        centered(body.into())
    }

    fn engine_failed_view(&self, reason: &str) -> Element<'_, Message> {
        let body = column![
            text("The page-flip engine could not be loaded").size(24),
            text(reason.to_string()).size(14),
            button("Reload").on_press(Message::RetryEngineLoad),
        ]
        .spacing(12)
        .align_x(Horizontal::Center);
        centered(body.into())
    }

    fn loading_view(&self) -> Element<'_, Message> {
        centered(
            column![
                text(format!("Loading {}…", self.display_title())).size(20),
                text("Preparing the page-flip engine").size(14),
            ]
            .spacing(8)
            .align_x(Horizontal::Center)
            .into(),
        )
    }

    fn display_title(&self) -> &str {
        if self.document.title.is_empty() {
            &self.document.slug
        } else {
            &self.document.title
        }
    }

    fn viewer_body(&self) -> Element<'_, Message> {
        let mut layers = stack([self.page_stage()]);
        if let Some(lens) = self.lens_overlay() {
            layers = layers.push(lens);
        }
        if self.viewer.thumbnails_visible {
            layers = layers.push(self.thumbnail_overlay());
        }
        if self.viewer.navigation_visible {
            layers = layers.push(self.nav_overlay());
        }
        layers.width(Length::Fill).height(Length::Fill).into()
    }

    fn page_stage(&self) -> Element<'_, Message> {
        let pages = self.displayed_pages();
        let mut spread = Row::new().align_y(Vertical::Center);
        for (index, rect) in &pages {
            spread = spread.push(self.page_image(*index, rect.width, rect.height));
        }
        let stage = container(spread)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center);

        mouse_area(stage)
            .on_move(|point: Point| Message::PointerMoved {
                x: point.x,
                y: point.y,
            })
            .on_exit(Message::PointerLeft)
            .on_press(Message::SurfacePressed)
            .into()
    }

    fn page_image(&self, index: usize, width: f32, height: f32) -> Element<'_, Message> {
        match self.images.get(index) {
            Some(handle) => image(handle.clone())
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .into(),
            None => container(text(format!("Loading page {}…", index + 1)).size(14))
                .width(Length::Fixed(width))
                .height(Length::Fixed(height))
                .align_x(Horizontal::Center)
                .align_y(Vertical::Center)
                .style(placeholder_style)
                .into(),
        }
    }

    fn nav_overlay(&self) -> Element<'_, Message> {
        let current = self.viewer.current_page;
        let total = self.viewer.total_pages;

        let prev = button(text("‹").size(18))
            .on_press_maybe((current > 0).then_some(Message::FlipPrev));
        let next = button(text("›").size(18))
            .on_press_maybe((current + 1 < total).then_some(Message::FlipNext));
        let page_input = text_input("page", &self.viewer.page_input)
            .id(PAGE_INPUT_ID.clone())
            .on_input(Message::PageInputChanged)
            .on_submit(Message::PageInputCommitted)
            .width(Length::Fixed(56.0));
        let page_label = text(format!("Page {} of {}", current + 1, total)).size(14);

        let zoom_out = button(text("−")).on_press(Message::ZoomOut);
        let zoom_label = button(text(format!("{:.0}%", self.viewer.zoom * 100.0)).size(13))
            .on_press(Message::ZoomReset);
        let zoom_in = button(text("＋")).on_press(Message::ZoomIn);

        let magnifier = button(text(if self.viewer.magnifier_active {
            "Magnifier on"
        } else {
            "Magnifier"
        }))
        .on_press(Message::ToggleMagnifier);
        let thumbnails = button(text(if self.viewer.thumbnails_visible {
            "Hide pages"
        } else {
            "Pages"
        }))
        .on_press(Message::ToggleThumbnails);
        let theme = button(text("Theme")).on_press(Message::ToggleTheme);

        let mut bar = row![
            prev,
            next,
            page_input,
            page_label,
            zoom_out,
            zoom_label,
            zoom_in,
            magnifier,
            thumbnails,
            theme,
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        if self.document.can_download {
            bar = bar.push(button(text("Download")).on_press(Message::DownloadRequested));
        }
        bar = bar.push(text(self.share_link.clone()).size(12));

        let panel = container(bar).padding(10).style(overlay_style);
        container(panel)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Bottom)
            .padding(16)
            .into()
    }

    fn thumbnail_overlay(&self) -> Element<'_, Message> {
        let current = self.viewer.current_page;
        let mut strip = Row::new().spacing(6).align_y(Vertical::Center);
        for index in 0..self.viewer.total_pages {
            let label: Element<'_, Message> = match self.images.get(index) {
                Some(handle) => image(handle.clone())
                    .height(Length::Fixed(THUMBNAIL_HEIGHT))
                    .into(),
                None => text(format!("{}", index + 1)).size(13).into(),
            };
            strip = strip.push(
                button(label)
                    .style(if index == current {
                        button::primary
                    } else {
                        button::secondary
                    })
                    .on_press(Message::ThumbnailClicked(index)),
            );
        }

        let panel = container(
            scrollable(strip)
                .direction(scrollable::Direction::Horizontal(
                    scrollable::Scrollbar::new(),
                ))
                .width(Length::Fill),
        )
        .padding(8)
        .style(overlay_style);

        container(panel)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Bottom)
            .padding(Padding {
                top: 0.0,
                right: 16.0,
                bottom: NAV_BAR_CLEARANCE,
                left: 16.0,
            })
            .into()
    }

    /// The magnifier lens: a fixed-size viewport whose center follows the
    /// pointer, showing the unzoomed page image scaled by the lens
    /// magnification and offset by the mapped percentages.
    fn lens_overlay(&self) -> Option<Element<'_, Message>> {
        let position = self.viewer.magnifier_position;
        if !(self.viewer.magnifier_active && position.active) {
            return None;
        }
        let handle = self.images.get(self.viewer.lens_page)?.clone();
        let layout = self.page_layout()?;
        let diameter = self.config.lens_diameter;
        let (backdrop_w, backdrop_h) =
            geometry::lens_backdrop_size(layout.width, layout.height, self.viewer.magnifier_zoom);
        let (origin_x, origin_y) = geometry::lens_backdrop_origin(
            position.rel_x,
            position.rel_y,
            diameter,
            backdrop_w,
            backdrop_h,
        );

        let lens = canvas(Lens {
            handle,
            origin: (origin_x, origin_y),
            backdrop: (backdrop_w, backdrop_h),
            diameter,
        })
        .width(Length::Fixed(diameter))
        .height(Length::Fixed(diameter));

        Some(
            container(lens)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(Padding {
                    top: (position.abs_y - diameter / 2.0).max(0.0),
                    right: 0.0,
                    bottom: 0.0,
                    left: (position.abs_x - diameter / 2.0).max(0.0),
                })
                .into(),
        )
    }
}

fn centered(body: Element<'_, Message>) -> Element<'_, Message> {
    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into()
}

fn overlay_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: iced::border::rounded(8),
        ..container::Style::default()
    }
}

fn placeholder_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: iced::border::rounded(2),
        ..container::Style::default()
    }
}

struct Lens {
    handle: image::Handle,
    origin: (f32, f32),
    backdrop: (f32, f32),
    diameter: f32,
}

impl canvas::Program<Message> for Lens {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.draw_image(
            Rectangle::new(
                Point::new(self.origin.0, self.origin.1),
                Size::new(self.backdrop.0, self.backdrop.1),
            ),
            canvas::Image::new(self.handle.clone()),
        );
        let center = Point::new(self.diameter / 2.0, self.diameter / 2.0);
        let ring = canvas::Path::circle(center, self.diameter / 2.0 - 2.0);
        frame.stroke(
            &ring,
            canvas::Stroke::default()
                .with_width(3.0)
                .with_color(Color::WHITE),
        );
        vec![frame.into_geometry()]
    }
}
