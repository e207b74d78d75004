use fast_image_resize as fr;
use image::{DynamicImage, RgbaImage};
use ratatui::layout::Rect;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use crate::error::{AppError, AppResult};

use super::frame::RgbaFrame;

const PHOTO_DOWNSCALE_FILTER: fr::FilterType = fr::FilterType::CatmullRom;

pub(crate) fn create_protocol_with_picker(
    picker: &Picker,
    frame: &RgbaFrame,
) -> AppResult<StatefulProtocol> {
    let image = RgbaImage::from_raw(frame.width, frame.height, frame.pixels_to_vec()).ok_or(
        AppError::invalid_argument("photo pixels length does not match dimensions"),
    )?;
    Ok(picker.new_resize_protocol(DynamicImage::ImageRgba8(image)))
}

/// Pixel bounds of a cell area.
pub(crate) fn area_bounds_px(area: Rect, cell_px: (u16, u16)) -> (u32, u32) {
    (
        u32::from(area.width.max(1)).saturating_mul(u32::from(cell_px.0.max(1))),
        u32::from(area.height.max(1)).saturating_mul(u32::from(cell_px.1.max(1))),
    )
}

/// Shrinks a decoded photo to fit `max_width` x `max_height`, keeping its
/// aspect. Photos already inside the bounds come back untouched.
pub(crate) fn downscale_to_bounds(
    frame: RgbaFrame,
    max_width: u32,
    max_height: u32,
) -> AppResult<RgbaFrame> {
    let Some((dst_width, dst_height)) =
        fit_downscale_dimensions(frame.width, frame.height, max_width, max_height)
    else {
        return Ok(frame);
    };
    resize_frame_simd(frame, dst_width, dst_height)
}

pub(crate) fn fit_downscale_dimensions(
    src_width: u32,
    src_height: u32,
    max_width: u32,
    max_height: u32,
) -> Option<(u32, u32)> {
    if src_width == 0 || src_height == 0 || max_width == 0 || max_height == 0 {
        return None;
    }
    if src_width <= max_width && src_height <= max_height {
        return None;
    }

    let width_limited = (max_width as u64).saturating_mul(src_height as u64)
        <= (max_height as u64).saturating_mul(src_width as u64);

    if width_limited {
        let dst_height =
            ((src_height as u64).saturating_mul(max_width as u64) / src_width as u64).max(1) as u32;
        Some((max_width, dst_height.min(max_height)))
    } else {
        let dst_width =
            ((src_width as u64).saturating_mul(max_height as u64) / src_height as u64).max(1) as u32;
        Some((dst_width.min(max_width), max_height))
    }
}

fn resize_frame_simd(frame: RgbaFrame, dst_width: u32, dst_height: u32) -> AppResult<RgbaFrame> {
    if frame.width == dst_width && frame.height == dst_height {
        return Ok(frame);
    }

    let src = fr::images::Image::from_vec_u8(
        frame.width,
        frame.height,
        frame.pixels_to_vec(),
        fr::PixelType::U8x4,
    )
    .map_err(|_| AppError::invalid_argument("photo pixels length does not match dimensions"))?;

    let mut dst = fr::images::Image::new(dst_width, dst_height, fr::PixelType::U8x4);
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(PHOTO_DOWNSCALE_FILTER));
    fr::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|_| AppError::unsupported("failed to downscale photo"))?;

    Ok(RgbaFrame {
        width: dst_width,
        height: dst_height,
        pixels: dst.into_vec().into(),
    })
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{area_bounds_px, downscale_to_bounds, fit_downscale_dimensions};
    use crate::media::RgbaFrame;

    fn frame(width: u32, height: u32) -> RgbaFrame {
        RgbaFrame {
            width,
            height,
            pixels: vec![128; width as usize * height as usize * 4].into(),
        }
    }

    #[test]
    fn fit_keeps_aspect_on_the_limiting_axis() {
        assert_eq!(fit_downscale_dimensions(2000, 1000, 400, 400), Some((400, 200)));
        assert_eq!(fit_downscale_dimensions(1000, 2000, 400, 400), Some((200, 400)));
        assert_eq!(fit_downscale_dimensions(100, 50, 400, 400), None);
        assert_eq!(fit_downscale_dimensions(0, 50, 400, 400), None);
    }

    #[test]
    fn downscale_shrinks_large_photos() {
        let shrunk = downscale_to_bounds(frame(64, 32), 16, 16).expect("resize should succeed");
        assert_eq!((shrunk.width, shrunk.height), (16, 8));
        assert_eq!(shrunk.byte_len(), 16 * 8 * 4);
    }

    #[test]
    fn small_photos_keep_their_buffer() {
        let source = frame(4, 4);
        let kept = downscale_to_bounds(source.clone(), 16, 16).expect("no-op resize");
        assert!(std::sync::Arc::ptr_eq(&source.pixels, &kept.pixels));
    }

    #[test]
    fn area_bounds_scale_by_cell_size() {
        assert_eq!(area_bounds_px(Rect::new(0, 0, 30, 10), (10, 20)), (300, 200));
        assert_eq!(area_bounds_px(Rect::new(0, 0, 0, 0), (0, 0)), (1, 1));
    }
}
