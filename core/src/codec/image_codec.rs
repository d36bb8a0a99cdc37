//! `image`-crate backed decoder

use std::path::Path;

use image::imageops::{self, FilterType};

use super::{Frame, GifMovie, MediaDecoder};
use crate::geometry::{ScalingBound, Size};

/// Production decoder: PNG stills via `image::open`, GIF movies via [`GifMovie`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl MediaDecoder for ImageCodec {
    type Movie = GifMovie;

    fn decode_still(&self, path: &Path) -> Option<Frame> {
        match image::open(path) {
            Ok(image) => Some(image.to_rgba8()),
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    fn open_movie(&self, path: &Path) -> GifMovie {
        GifMovie::open(path)
    }
}

/// Downscale `frame` to fit `bound`; frames already within bounds are
/// returned untouched.
pub fn scale_frame(frame: Frame, bound: &ScalingBound) -> Frame {
    let native = Size::new(frame.width(), frame.height());
    let target = bound.fit(native);
    if target == native {
        return frame;
    }
    resize(&frame, target)
}

/// Smooth (bilinear) resize to exactly `size`.
pub(crate) fn resize(frame: &Frame, size: Size) -> Frame {
    imageops::resize(frame, size.width, size.height, FilterType::Triangle)
}
