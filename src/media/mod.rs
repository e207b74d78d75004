//! Page photos: decode, downscale, cache, and draw.

mod cache;
mod frame;
mod image_ops;
mod presenter;
mod worker;

pub use cache::{CacheCounters, PhotoCache, PhotoKey};
pub use frame::{FsPhotoSource, PhotoSource, RgbaFrame, decode_photo};
pub use presenter::PhotoPresenter;
pub(crate) use image_ops::area_bounds_px;
pub(crate) use presenter::center_rect_within;
pub use worker::{PhotoResult, PhotoWorker};
