//! Decoding collaborators
//!
//! The engine never decodes images itself. It asks a [`MediaDecoder`] for
//! still frames and for self-clocking movie handles. [`ImageCodec`] is the
//! production implementation backed by the `image` crate.

mod image_codec;
mod movie;

pub use image_codec::{ImageCodec, scale_frame};
pub use movie::GifMovie;

use std::path::Path;
use std::time::Instant;

use crate::geometry::Size;

/// A decoded RGBA raster ready for display.
pub type Frame = image::RgbaImage;

/// Extension of still images loaded as frame sequences.
pub const STILL_IMAGE_EXTENSION: &str = "png";

/// Extension of files played as native (self-clocking) animations.
pub const NATIVE_ANIMATION_EXTENSION: &str = "gif";

/// Every extension offered by the file chooser.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = [STILL_IMAGE_EXTENSION, NATIVE_ANIMATION_EXTENSION];

/// Check whether `path` carries the native-animation extension (case-insensitive).
pub fn is_native_animation(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(NATIVE_ANIMATION_EXTENSION))
}

/// Source of decoded frames and movie handles.
pub trait MediaDecoder {
    /// Movie handle type produced by [`MediaDecoder::open_movie`].
    type Movie: MovieHandle;

    /// Decode a single still image. Returns `None` when the file cannot be decoded.
    fn decode_still(&self, path: &Path) -> Option<Frame>;

    /// Open a native animation. Always returns a handle; check
    /// [`MovieHandle::is_valid`] before using it.
    fn open_movie(&self, path: &Path) -> Self::Movie;
}

/// Playback state of a movie handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieState {
    NotRunning,
    Paused,
    Running,
}

/// A self-clocking animated image.
///
/// The handle owns per-frame timing. Callers only pick a rate as a
/// percentage of native speed and pull frame-changed notifications with
/// [`MovieHandle::poll`].
pub trait MovieHandle {
    fn is_valid(&self) -> bool;

    fn frame_count(&self) -> usize;

    fn current_frame_number(&self) -> usize;

    /// The current frame at the scaled size (if one was set).
    fn current_frame(&self) -> Option<&Frame>;

    /// Jump to frame `n`. Returns false if there is no such frame.
    fn jump_to_frame(&mut self, n: usize) -> bool;

    /// Apply a display size to every frame.
    fn set_scaled_size(&mut self, size: Size);

    fn speed_percent(&self) -> u32;

    /// Set the play rate in percent of native speed (100 = native).
    fn set_speed_percent(&mut self, percent: u32);

    fn state(&self) -> MovieState;

    fn start(&mut self, now: Instant);

    /// Pause or resume in place; the frame position is kept.
    fn set_paused(&mut self, paused: bool, now: Instant);

    fn stop(&mut self);

    /// Frame-changed notification: returns the new frame number if the
    /// movie advanced since the last poll.
    fn poll(&mut self, now: Instant) -> Option<usize>;

    /// When the next frame change is due, if the movie is running.
    fn next_deadline(&self) -> Option<Instant>;
}
