//! Responsive fit of the book into the available viewport.
//!
//! All values are CSS-style pixels in the book's own coordinate space. The
//! host maps them onto whatever surface it draws on.

pub const BASE_WIDTH: f32 = 420.0;
pub const BASE_HEIGHT: f32 = 560.0;
pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 1.2;
pub const MOBILE_BREAKPOINT: f32 = 600.0;

const SPREAD_SHIFT: f32 = BASE_WIDTH / 2.0;
const CARD_BASE_WIDTH: f32 = 800.0;
const CARD_BASE_HEIGHT: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPx {
    pub width: f32,
    pub height: f32,
    /// Height of the preview banner, when the host shows one.
    pub banner_height: Option<f32>,
}

impl ViewportPx {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            banner_height: None,
        }
    }

    pub fn with_banner(mut self, banner_height: f32) -> Self {
        self.banner_height = Some(banner_height);
        self
    }

    fn available(&self) -> (f32, f32) {
        let width = finite_or_zero(self.width).max(0.0);
        let banner = self.banner_height.map(finite_or_zero).unwrap_or(0.0);
        let height = (finite_or_zero(self.height) - banner).max(0.0);
        (width, height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookTransform {
    pub scale: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Horizontal shift applied to the book itself so the spine sits in the
    /// middle of an open spread.
    pub book_shift_x: f32,
    /// Narrow viewport showing an open spread; the host may need to scroll.
    pub mobile_open: bool,
    pub card_scale: f32,
    pub target_width: f32,
    pub available_width: f32,
    pub available_height: f32,
}

impl BookTransform {
    pub fn visual_size(&self) -> (f32, f32) {
        (self.target_width * self.scale, BASE_HEIGHT * self.scale)
    }

    /// Left edge of the drawn book relative to the viewport: centered when it
    /// fits, pinned to the start edge otherwise.
    pub fn visual_left(&self) -> f32 {
        let (visual_width, _) = self.visual_size();
        ((self.available_width - visual_width) / 2.0).max(0.0)
    }

    pub fn visual_top(&self) -> f32 {
        let (_, visual_height) = self.visual_size();
        ((self.available_height - visual_height) / 2.0).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Padding {
    width: f32,
    height: f32,
}

fn padding_for(available_width: f32, available_height: f32, preview: bool) -> Padding {
    let mobile = available_width < MOBILE_BREAKPOINT;
    if preview {
        return if mobile {
            Padding {
                width: 10.0,
                height: 20.0,
            }
        } else {
            Padding {
                width: 20.0,
                height: 30.0,
            }
        };
    }

    Padding {
        width: (available_width * 0.05).clamp(10.0, 60.0),
        height: (available_height * 0.06).clamp(20.0, 80.0),
    }
}

pub fn compute_transform(viewport: ViewportPx, open: bool, preview: bool) -> BookTransform {
    let (available_width, available_height) = viewport.available();
    let mobile = available_width < MOBILE_BREAKPOINT;
    let target_width = if open { BASE_WIDTH * 2.0 } else { BASE_WIDTH };
    let padding = padding_for(available_width, available_height, preview);

    let mut width_ratio = available_width / (target_width + padding.width);
    if mobile && open {
        width_ratio = width_ratio.max(MIN_SCALE);
    }
    let height_ratio = available_height / (BASE_HEIGHT + padding.height);
    let scale = clamp_scale(width_ratio.min(height_ratio));

    let excess_width = BASE_WIDTH * (1.0 - scale) / 2.0;
    let excess_height = BASE_HEIGHT * (1.0 - scale) / 2.0;
    let mut margin_left = -excess_width;
    let mut margin_right = -excess_width;
    let mobile_open = mobile && open;
    if mobile_open {
        let spread_offset = SPREAD_SHIFT * scale;
        let centering_offset = ((available_width - target_width * scale) / 2.0).max(0.0);
        margin_left += spread_offset + centering_offset;
        margin_right += spread_offset;
    }

    BookTransform {
        scale,
        margin_left,
        margin_right,
        margin_top: -excess_height,
        margin_bottom: -excess_height,
        book_shift_x: if open { SPREAD_SHIFT } else { 0.0 },
        mobile_open,
        card_scale: card_scale(available_width, available_height),
        target_width,
        available_width,
        available_height,
    }
}

fn card_scale(available_width: f32, available_height: f32) -> f32 {
    let safety = if available_width < MOBILE_BREAKPOINT {
        40.0
    } else {
        80.0
    };
    (available_width / (CARD_BASE_WIDTH + safety))
        .min(available_height / CARD_BASE_HEIGHT)
        .min(1.0)
        .max(0.0)
}

fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
