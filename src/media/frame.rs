use std::path::Path;
use std::sync::Arc;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl RgbaFrame {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels_to_vec(&self) -> Vec<u8> {
        self.pixels.as_ref().to_vec()
    }
}

/// Where page photos come from.
pub trait PhotoSource: Send + Sync {
    fn load(&self, path: &Path, page: usize) -> AppResult<RgbaFrame>;
}

/// Reads and decodes image files from disk.
#[derive(Debug, Default)]
pub struct FsPhotoSource;

impl PhotoSource for FsPhotoSource {
    fn load(&self, path: &Path, page: usize) -> AppResult<RgbaFrame> {
        let bytes = std::fs::read(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read photo: {}", path.display()))
        })?;
        decode_photo(&bytes, page)
    }
}

pub fn decode_photo(bytes: &[u8], page: usize) -> AppResult<RgbaFrame> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| AppError::photo_decode(page, source))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(RgbaFrame {
        width,
        height,
        pixels: image.into_raw().into(),
    })
}
