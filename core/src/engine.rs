//! Animation playback engine
//!
//! Owns the active [`AnimationSource`] and its clock. Exactly one source is
//! active at a time; each variant owns its own clock (the frame timer or the
//! movie's internal one), so replacing the source also drops the clock that
//! drove the previous one.
//!
//! The engine is driven from a single thread: the host calls
//! [`PlaybackEngine::tick`] every frame and sleeps until
//! [`PlaybackEngine::next_wakeup`].

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::codec::{Frame, MediaDecoder, MovieHandle, is_native_animation, scale_frame};
use crate::geometry::{ScalingBound, ScreenGeometry, Size};
use crate::speed::NominalSpeed;
use crate::surface::DisplaySurface;
use crate::timer::FrameTimer;

/// Why a load left the engine unloaded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    #[error("none of the selected files could be decoded")]
    NoValidFrames,
    #[error("the animation file is not valid")]
    InvalidAnimation,
}

/// Which playback path a selection takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Still images advanced by the engine's timer
    FrameSequence,
    /// A single self-clocking animated file
    NativeAnimation,
}

impl SourceKind {
    /// Exactly one file with the native-animation extension plays natively;
    /// anything else (including mixed selections) is a frame sequence.
    pub fn classify(paths: &[PathBuf]) -> Self {
        match paths {
            [only] if is_native_animation(only) => SourceKind::NativeAnimation,
            _ => SourceKind::FrameSequence,
        }
    }
}

/// Decoded, pre-scaled still frames and the timer that advances them.
#[derive(Debug)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    index: usize,
    timer: FrameTimer,
}

impl FrameSequence {
    fn new(frames: Vec<Frame>, interval: Duration) -> Self {
        Self {
            frames,
            index: 0,
            timer: FrameTimer::new(interval),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    fn current(&self) -> Option<&Frame> {
        self.frames.get(self.index)
    }

    /// Step forward cyclically and return the new current frame.
    fn advance(&mut self) -> Option<&Frame> {
        if self.frames.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.frames.len();
        self.frames.get(self.index)
    }
}

/// The one active animation.
#[derive(Debug)]
pub enum AnimationSource<M> {
    FrameSequence(FrameSequence),
    NativeAnimation(M),
}

impl<M: MovieHandle> AnimationSource<M> {
    pub fn kind(&self) -> SourceKind {
        match self {
            AnimationSource::FrameSequence(_) => SourceKind::FrameSequence,
            AnimationSource::NativeAnimation(_) => SourceKind::NativeAnimation,
        }
    }

    fn current_frame(&self) -> Option<&Frame> {
        match self {
            AnimationSource::FrameSequence(seq) => seq.current(),
            AnimationSource::NativeAnimation(movie) => movie.current_frame(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        match self {
            AnimationSource::FrameSequence(seq) => seq.timer.deadline(),
            AnimationSource::NativeAnimation(movie) => movie.next_deadline(),
        }
    }

    /// Stop whichever clock drives this source.
    fn halt(&mut self) {
        match self {
            AnimationSource::FrameSequence(seq) => seq.timer.stop(),
            AnimationSource::NativeAnimation(movie) => movie.stop(),
        }
    }
}

/// Mutable playback state owned by the engine.
#[derive(Debug)]
pub struct PlaybackState<M> {
    source: Option<AnimationSource<M>>,
    speed: NominalSpeed,
    paused: bool,
}

impl<M> Default for PlaybackState<M> {
    fn default() -> Self {
        Self {
            source: None,
            speed: NominalSpeed::default(),
            paused: false,
        }
    }
}

impl<M: MovieHandle> PlaybackState<M> {
    pub fn source(&self) -> Option<&AnimationSource<M>> {
        self.source.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> NominalSpeed {
        self.speed
    }

    /// Current index into the frame sequence; `None` for native animations
    /// or when nothing is loaded.
    pub fn current_frame_index(&self) -> Option<usize> {
        match &self.source {
            Some(AnimationSource::FrameSequence(seq)) => Some(seq.index),
            _ => None,
        }
    }
}

/// The playback engine.
pub struct PlaybackEngine<D: MediaDecoder> {
    decoder: D,
    state: PlaybackState<D::Movie>,
}

impl<D: MediaDecoder> PlaybackEngine<D> {
    /// Create an unloaded engine at the default speed.
    pub fn new(decoder: D) -> Self {
        Self::with_speed(decoder, NominalSpeed::default())
    }

    pub fn with_speed(decoder: D, speed: NominalSpeed) -> Self {
        Self {
            decoder,
            state: PlaybackState {
                speed,
                ..PlaybackState::default()
            },
        }
    }

    pub fn state(&self) -> &PlaybackState<D::Movie> {
        &self.state
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn speed(&self) -> NominalSpeed {
        self.state.speed
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        self.state.source.as_ref().map(AnimationSource::kind)
    }

    pub fn current_frame_index(&self) -> Option<usize> {
        self.state.current_frame_index()
    }

    /// Rate applied to the active native animation, if any.
    pub fn movie_speed_percent(&self) -> Option<u32> {
        match &self.state.source {
            Some(AnimationSource::NativeAnimation(movie)) => Some(movie.speed_percent()),
            _ => None,
        }
    }

    /// Replace the active source with the animation in `paths`.
    ///
    /// The previous source is disposed first, so a failed load leaves the
    /// engine unloaded. On success the surface is resized to the new content
    /// and keeps the position it had before the load.
    pub fn load<S: DisplaySurface>(
        &mut self,
        paths: &[PathBuf],
        surface: &mut S,
        screen: &ScreenGeometry,
        now: Instant,
    ) -> Result<SourceKind, LoadError> {
        self.dispose();

        let position = surface.position();
        let bound = screen.scaling_bound();
        let kind = SourceKind::classify(paths);

        let source = match kind {
            SourceKind::FrameSequence => self.load_frame_sequence(paths, &bound, now)?,
            SourceKind::NativeAnimation => self.load_native_animation(&paths[0], &bound, now)?,
        };

        if let Some(frame) = source.current_frame() {
            surface.set_content(frame);
        }
        surface.adjust_size();
        surface.move_to(position);

        self.state.source = Some(source);
        self.state.paused = false;

        tracing::info!(
            "Loaded {:?} from {} file(s) at {}ms/frame",
            kind,
            paths.len(),
            self.state.speed.as_millis()
        );
        Ok(kind)
    }

    fn load_frame_sequence(
        &self,
        paths: &[PathBuf],
        bound: &ScalingBound,
        now: Instant,
    ) -> Result<AnimationSource<D::Movie>, LoadError> {
        let frames: Vec<Frame> = paths
            .iter()
            .filter_map(|path| self.decoder.decode_still(path))
            .map(|frame| scale_frame(frame, bound))
            .collect();

        if frames.is_empty() {
            return Err(LoadError::NoValidFrames);
        }
        if frames.len() < paths.len() {
            tracing::debug!(
                "Skipped {} undecodable file(s)",
                paths.len() - frames.len()
            );
        }

        let mut sequence = FrameSequence::new(frames, self.state.speed.interval());
        sequence.timer.start(now);
        Ok(AnimationSource::FrameSequence(sequence))
    }

    fn load_native_animation(
        &self,
        path: &Path,
        bound: &ScalingBound,
        now: Instant,
    ) -> Result<AnimationSource<D::Movie>, LoadError> {
        let mut movie = self.decoder.open_movie(path);
        if !movie.is_valid() || !movie.jump_to_frame(0) {
            return Err(LoadError::InvalidAnimation);
        }

        let native = movie
            .current_frame()
            .map(|frame| Size::new(frame.width(), frame.height()))
            .ok_or(LoadError::InvalidAnimation)?;
        let target = bound.fit(native);
        if target != native {
            tracing::debug!(
                "Scaling animation from {}x{} to {}x{}",
                native.width,
                native.height,
                target.width,
                target.height
            );
            movie.set_scaled_size(target);
        }

        movie.set_speed_percent(self.state.speed.rate_percent());
        movie.start(now);
        Ok(AnimationSource::NativeAnimation(movie))
    }

    /// Step a frame sequence forward by one frame and present it.
    ///
    /// No-op for native animations or when nothing is loaded.
    pub fn advance_frame<S: DisplaySurface>(&mut self, surface: &mut S) {
        if let Some(AnimationSource::FrameSequence(seq)) = &mut self.state.source
            && let Some(frame) = seq.advance()
        {
            surface.set_content(frame);
        }
    }

    /// Change the nominal speed (milliseconds per frame).
    ///
    /// Always stored, even when unloaded. A running frame sequence restarts
    /// its timer at the new interval; a native animation gets a new rate.
    pub fn set_speed(&mut self, millis: u32, now: Instant) {
        let speed = NominalSpeed::new(millis);
        self.state.speed = speed;

        match &mut self.state.source {
            Some(AnimationSource::NativeAnimation(movie)) => {
                movie.set_speed_percent(speed.rate_percent());
                tracing::debug!("Animation rate set to {}%", speed.rate_percent());
            }
            Some(AnimationSource::FrameSequence(seq)) => {
                // Stopped (paused) timers keep the interval for resume
                seq.timer.set_interval(speed.interval(), now);
                tracing::debug!("Frame interval set to {}ms", speed.as_millis());
            }
            None => {}
        }
    }

    /// Pause or resume playback in place. No-op when unloaded.
    pub fn set_paused(&mut self, pause: bool, now: Instant) {
        let Some(source) = &mut self.state.source else {
            return;
        };

        match source {
            AnimationSource::NativeAnimation(movie) => movie.set_paused(pause, now),
            AnimationSource::FrameSequence(seq) => {
                if pause {
                    seq.timer.stop();
                } else if !seq.timer.is_active() {
                    seq.timer.start(now);
                }
            }
        }
        self.state.paused = pause;
    }

    /// Drive the active clock. Returns true if a new frame was presented.
    pub fn tick<S: DisplaySurface>(&mut self, surface: &mut S, now: Instant) -> bool {
        let advance_due = match &mut self.state.source {
            Some(AnimationSource::FrameSequence(seq)) => seq.timer.poll(now),
            Some(AnimationSource::NativeAnimation(movie)) => {
                if movie.poll(now).is_none() {
                    return false;
                }
                if let Some(frame) = movie.current_frame() {
                    surface.set_content(frame);
                }
                return true;
            }
            None => false,
        };

        if advance_due {
            self.advance_frame(surface);
        }
        advance_due
    }

    /// When the host should call [`PlaybackEngine::tick`] next.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.state.source.as_ref().and_then(AnimationSource::next_deadline)
    }

    /// Stop all clocks and release the active source. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if let Some(mut source) = self.state.source.take() {
            source.halt();
            tracing::debug!("Disposed {:?}", source.kind());
        }
        self.state.paused = false;
    }
}

impl<D: MediaDecoder> Drop for PlaybackEngine<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
