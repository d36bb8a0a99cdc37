//! Deskpet Core - playback engine for the desktop pet overlay
//!
//! This crate holds everything that does not depend on a window system:
//! the animation playback engine, the control actions the menu maps onto it,
//! and the collaborators it talks to through traits.
//!
//! # Architecture
//!
//! - [`PlaybackEngine`] - Owns the active [`AnimationSource`] and its clock
//! - [`Controller`] - Maps discrete [`ControlAction`]s onto engine calls
//! - [`MediaDecoder`] / [`MovieHandle`] - Decoding collaborators ([`ImageCodec`] in production)
//! - [`DisplaySurface`] - The window the frames are presented on

pub mod codec;
pub mod config;
pub mod control;
pub mod engine;
pub mod geometry;
pub mod speed;
pub mod surface;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod timer;

pub use codec::{
    Frame, GifMovie, ImageCodec, MediaDecoder, MovieHandle, MovieState,
    NATIVE_ANIMATION_EXTENSION, STILL_IMAGE_EXTENSION, SUPPORTED_EXTENSIONS,
};
pub use control::{
    ControlAction, ControlOutcome, Controller, DragTracker, OPACITY_PRESETS, PauseLabel,
    sort_selection,
};
pub use engine::{AnimationSource, LoadError, PlaybackEngine, PlaybackState, SourceKind};
pub use geometry::{Point, ScalingBound, ScreenGeometry, Size};
pub use speed::{NominalSpeed, SPEED_PRESETS};
pub use surface::DisplaySurface;
pub use timer::FrameTimer;
