//! Coordinate mapping for the magnifier lens and page hit-testing.
//!
//! Everything in this module is pure math over screen-space rectangles so
//! the mapping can be exercised without a running window. Pointer positions
//! are converted into percentage offsets within the hovered page, and those
//! percentages drive both the lens placement and the lens backdrop offset.

/// Screen-space rectangle of a rendered page image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Page layout orientation, derived from the first page's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Single page on screen (tall pages).
    Portrait,
    /// Two-page spread (wide pages).
    Landscape,
}

/// Magnifier lens position. `rel_x`/`rel_y` are percentages (0–100) within
/// the hovered page image; `abs_x`/`abs_y` are viewer-space coordinates used
/// to place the lens itself. The all-zero value with `active == false` is
/// the inactive sentinel: the renderer hides the lens entirely, which keeps
/// it distinguishable from a legitimate (0, 0) corner position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensPosition {
    pub rel_x: f32,
    pub rel_y: f32,
    pub abs_x: f32,
    pub abs_y: f32,
    pub active: bool,
}

impl LensPosition {
    pub const INACTIVE: LensPosition = LensPosition {
        rel_x: 0.0,
        rel_y: 0.0,
        abs_x: 0.0,
        abs_y: 0.0,
        active: false,
    };
}

impl Default for LensPosition {
    fn default() -> Self {
        LensPosition::INACTIVE
    }
}

/// Percentage position of the pointer within `rect`, clamped to [0, 100] on
/// both axes. Returns `None` when the pointer is outside the rectangle.
pub fn relative_within(rect: &PageRect, px: f32, py: f32) -> Option<(f32, f32)> {
    if !rect.contains(px, py) || rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let rel_x = ((px - rect.x) / rect.width * 100.0).clamp(0.0, 100.0);
    let rel_y = ((py - rect.y) / rect.height * 100.0).clamp(0.0, 100.0);
    Some((rel_x, rel_y))
}

/// Locate the page rectangle the pointer is actually over. The flip engine
/// keeps adjacent pages mounted during animation, so several rects may be
/// live at once; the first rect is the defensive default when none contains
/// the pointer.
pub fn hovered_rect<'a>(rects: &'a [PageRect], px: f32, py: f32) -> Option<&'a PageRect> {
    rects
        .iter()
        .find(|rect| rect.contains(px, py))
        .or_else(|| rects.first())
}

/// Screen rectangles of the currently displayed pages, centered in the
/// viewer area and scaled by the active zoom factor. Landscape orientation
/// produces the two-page spread (left then right).
pub fn display_rects(
    area_width: f32,
    area_height: f32,
    page_width: f32,
    page_height: f32,
    orientation: Orientation,
    zoom: f32,
) -> Vec<PageRect> {
    if page_width <= 0.0 || page_height <= 0.0 {
        return Vec::new();
    }
    let w = page_width * zoom;
    let h = page_height * zoom;
    match orientation {
        Orientation::Portrait => {
            let x = (area_width - w) / 2.0;
            let y = (area_height - h) / 2.0;
            vec![PageRect {
                x,
                y,
                width: w,
                height: h,
            }]
        }
        Orientation::Landscape => {
            let x = (area_width - w * 2.0) / 2.0;
            let y = (area_height - h) / 2.0;
            vec![
                PageRect {
                    x,
                    y,
                    width: w,
                    height: h,
                },
                PageRect {
                    x: x + w,
                    y,
                    width: w,
                    height: h,
                },
            ]
        }
    }
}

/// Fraction of the page visible through the lens, as a percentage. A
/// magnification of 2 shows 50% of the lens-covered region, i.e. the image
/// appears at double size inside the lens.
pub fn lens_visible_fraction(magnifier_zoom: f32) -> f32 {
    100.0 / magnifier_zoom.max(1.0)
}

/// Size of the lens backdrop: the unzoomed page display size scaled by the
/// lens magnification. The lens deliberately operates on the unzoomed page
/// image so its magnification stays independent of the viewer zoom.
pub fn lens_backdrop_size(page_width: f32, page_height: f32, magnifier_zoom: f32) -> (f32, f32) {
    let mz = magnifier_zoom.max(1.0);
    (page_width * mz, page_height * mz)
}

/// Top-left origin of the backdrop image inside a lens of `lens_diameter`,
/// following background-position percentage semantics: at `rel` percent the
/// same relative point of backdrop and lens coincide, so the offset
/// saturates naturally at the image edges.
pub fn lens_backdrop_origin(
    rel_x: f32,
    rel_y: f32,
    lens_diameter: f32,
    backdrop_width: f32,
    backdrop_height: f32,
) -> (f32, f32) {
    let fx = rel_x / 100.0;
    let fy = rel_y / 100.0;
    (
        (lens_diameter - backdrop_width) * fx,
        (lens_diameter - backdrop_height) * fy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: PageRect = PageRect {
        x: 100.0,
        y: 50.0,
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn center_maps_to_fifty_fifty() {
        let (rx, ry) = relative_within(&RECT, 500.0, 350.0).unwrap();
        assert!((rx - 50.0).abs() < f32::EPSILON);
        assert!((ry - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn corners_stay_within_percentage_bounds() {
        let (rx, ry) = relative_within(&RECT, 100.0, 50.0).unwrap();
        assert_eq!((rx, ry), (0.0, 0.0));
        let (rx, ry) = relative_within(&RECT, 900.0, 650.0).unwrap();
        assert_eq!((rx, ry), (100.0, 100.0));
    }

    #[test]
    fn outside_rect_is_rejected() {
        assert!(relative_within(&RECT, 99.0, 350.0).is_none());
        assert!(relative_within(&RECT, 500.0, 651.0).is_none());
    }

    #[test]
    fn percentages_are_zoom_invariant() {
        // The same relative pointer position yields the same percentages no
        // matter how the rect was scaled before hit-testing.
        let zoomed = PageRect {
            x: 0.0,
            y: 0.0,
            width: RECT.width * 2.0,
            height: RECT.height * 2.0,
        };
        let (rx, ry) = relative_within(&zoomed, zoomed.width / 2.0, zoomed.height / 2.0).unwrap();
        assert!((rx - 50.0).abs() < f32::EPSILON);
        assert!((ry - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn hovered_rect_prefers_containing_page() {
        let spread = display_rects(2000.0, 1000.0, 400.0, 600.0, Orientation::Landscape, 1.0);
        assert_eq!(spread.len(), 2);
        let right = hovered_rect(&spread, spread[1].x + 10.0, spread[1].y + 10.0).unwrap();
        assert_eq!(right, &spread[1]);
    }

    #[test]
    fn hovered_rect_falls_back_to_first() {
        let spread = display_rects(2000.0, 1000.0, 400.0, 600.0, Orientation::Landscape, 1.0);
        let fallback = hovered_rect(&spread, -50.0, -50.0).unwrap();
        assert_eq!(fallback, &spread[0]);
    }

    #[test]
    fn portrait_rect_centers_and_scales_with_zoom() {
        let rects = display_rects(1000.0, 1000.0, 400.0, 600.0, Orientation::Portrait, 1.5);
        assert_eq!(rects.len(), 1);
        assert!((rects[0].width - 600.0).abs() < f32::EPSILON);
        assert!((rects[0].height - 900.0).abs() < f32::EPSILON);
        assert!((rects[0].x - 200.0).abs() < f32::EPSILON);
        assert!((rects[0].y - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn lens_fraction_halves_at_double_magnification() {
        assert!((lens_visible_fraction(2.0) - 50.0).abs() < f32::EPSILON);
        assert!((lens_visible_fraction(4.0) - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn backdrop_centered_at_midpoint() {
        let (bw, bh) = lens_backdrop_size(400.0, 600.0, 2.0);
        let (ox, oy) = lens_backdrop_origin(50.0, 50.0, 180.0, bw, bh);
        // The backdrop's center sits on the lens center.
        assert!((ox + bw / 2.0 - 90.0).abs() < 0.001);
        assert!((oy + bh / 2.0 - 90.0).abs() < 0.001);
    }

    #[test]
    fn backdrop_origin_saturates_at_edges() {
        let (bw, bh) = lens_backdrop_size(400.0, 600.0, 2.0);
        let (ox, oy) = lens_backdrop_origin(0.0, 0.0, 180.0, bw, bh);
        assert_eq!((ox, oy), (0.0, 0.0));
        let (ox, oy) = lens_backdrop_origin(100.0, 100.0, 180.0, bw, bh);
        assert!((ox - (180.0 - bw)).abs() < 0.001);
        assert!((oy - (180.0 - bh)).abs() < 0.001);
    }

    #[test]
    fn inactive_sentinel_is_all_zero() {
        let sentinel = LensPosition::INACTIVE;
        assert!(!sentinel.active);
        assert_eq!(
            (sentinel.rel_x, sentinel.rel_y, sentinel.abs_x, sentinel.abs_y),
            (0.0, 0.0, 0.0, 0.0)
        );
    }
}
