//! Test doubles for the decoding and display collaborators

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::Rgba;

use crate::codec::{Frame, GifMovie, MediaDecoder};
use crate::geometry::{Point, Size};
use crate::surface::DisplaySurface;

/// Build owned paths from string literals.
pub fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

/// A solid frame whose red channel identifies it.
pub fn marker_frame(marker: u8, width: u32, height: u32) -> Frame {
    Frame::from_pixel(width, height, Rgba([marker, 0, 0, 255]))
}

/// Read back the marker of a frame built with [`marker_frame`].
pub fn frame_marker(frame: &Frame) -> u8 {
    frame.get_pixel(0, 0).0[0]
}

/// Decoder serving in-memory frames; unknown paths fail to decode.
#[derive(Default)]
pub struct FakeDecoder {
    stills: HashMap<PathBuf, Frame>,
    movies: HashMap<PathBuf, Vec<Frame>>,
    /// Every path passed to `decode_still`, in call order
    pub decoded: RefCell<Vec<PathBuf>>,
}

impl FakeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_still(mut self, path: &str, frame: Frame) -> Self {
        self.stills.insert(PathBuf::from(path), frame);
        self
    }

    /// Register a movie whose frames all last 100ms at native rate.
    pub fn with_movie(mut self, path: &str, frames: Vec<Frame>) -> Self {
        self.movies.insert(PathBuf::from(path), frames);
        self
    }
}

impl MediaDecoder for FakeDecoder {
    type Movie = GifMovie;

    fn decode_still(&self, path: &Path) -> Option<Frame> {
        self.decoded.borrow_mut().push(path.to_path_buf());
        self.stills.get(path).cloned()
    }

    fn open_movie(&self, path: &Path) -> GifMovie {
        let frames = self.movies.get(path).cloned().unwrap_or_default();
        GifMovie::from_images(
            frames
                .into_iter()
                .map(|f| (f, Duration::from_millis(100)))
                .collect(),
        )
    }
}

/// Surface that records everything presented on it.
#[derive(Debug, Default)]
pub struct FakeSurface {
    pub presented: Vec<Frame>,
    pub position: Point,
    pub size: Size,
    pub opacity: Option<f32>,
}

impl FakeSurface {
    pub fn last_marker(&self) -> Option<u8> {
        self.presented.last().map(frame_marker)
    }
}

impl DisplaySurface for FakeSurface {
    fn set_content(&mut self, frame: &Frame) {
        self.presented.push(frame.clone());
    }

    fn adjust_size(&mut self) {
        if let Some(frame) = self.presented.last() {
            self.size = Size::new(frame.width(), frame.height());
        }
    }

    fn position(&self) -> Point {
        self.position
    }

    fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = Some(opacity);
    }
}
