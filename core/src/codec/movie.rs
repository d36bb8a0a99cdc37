//! Self-clocking GIF movie
//!
//! All frames are decoded up front together with their delays. The movie
//! keeps its own clock: it knows when the current frame was shown and how
//! long it stays, scaled by the rate percentage.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use super::image_codec::resize;
use super::{Frame, MovieHandle, MovieState};
use crate::geometry::Size;

/// Delay used for frames that declare none (GIF convention).
const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

struct MovieFrame {
    image: Frame,
    delay: Duration,
}

/// A decoded GIF played on its own cadence.
pub struct GifMovie {
    frames: Vec<MovieFrame>,
    current: usize,
    speed_percent: u32,
    state: MovieState,
    /// When the current frame went on screen (running), adjusted on resume
    shown_at: Option<Instant>,
    /// Time already spent on the current frame when paused
    paused_elapsed: Duration,
}

impl std::fmt::Debug for GifMovie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifMovie")
            .field("frames", &self.frames.len())
            .field("current", &self.current)
            .field("speed_percent", &self.speed_percent)
            .field("state", &self.state)
            .finish()
    }
}

impl GifMovie {
    /// Decode the GIF at `path`. Unreadable or empty files yield an invalid movie.
    pub fn open(path: &Path) -> Self {
        match decode_frames(path) {
            Ok(frames) => {
                tracing::debug!("Decoded {}: {} frames", path.display(), frames.len());
                Self::from_frames(frames)
            }
            Err(e) => {
                tracing::debug!("Invalid animation {}: {}", path.display(), e);
                Self::from_frames(Vec::new())
            }
        }
    }

    /// Build a movie from already-decoded frames and their delays.
    pub fn from_images(frames: Vec<(Frame, Duration)>) -> Self {
        Self::from_frames(
            frames
                .into_iter()
                .map(|(image, delay)| MovieFrame {
                    image,
                    delay: normalize_delay(delay),
                })
                .collect(),
        )
    }

    fn from_frames(frames: Vec<MovieFrame>) -> Self {
        Self {
            frames,
            current: 0,
            speed_percent: 100,
            state: MovieState::NotRunning,
            shown_at: None,
            paused_elapsed: Duration::ZERO,
        }
    }

    /// How long the current frame stays on screen at the current rate.
    fn current_delay(&self) -> Duration {
        let native = self
            .frames
            .get(self.current)
            .map_or(DEFAULT_FRAME_DELAY, |f| f.delay);
        (native * 100 / self.speed_percent.max(1)).max(Duration::from_millis(1))
    }
}

fn normalize_delay(delay: Duration) -> Duration {
    if delay.is_zero() {
        DEFAULT_FRAME_DELAY
    } else {
        delay
    }
}

fn decode_frames(path: &Path) -> Result<Vec<MovieFrame>, image::ImageError> {
    let file = File::open(path).map_err(image::ImageError::IoError)?;
    let decoder = GifDecoder::new(BufReader::new(file))?;

    let mut frames = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame?;
        let (numer, denom) = frame.delay().numer_denom_ms();
        let millis = if denom > 0 { numer / denom } else { 0 };
        frames.push(MovieFrame {
            delay: normalize_delay(Duration::from_millis(u64::from(millis))),
            image: frame.into_buffer(),
        });
    }
    Ok(frames)
}

impl MovieHandle for GifMovie {
    fn is_valid(&self) -> bool {
        !self.frames.is_empty()
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn current_frame_number(&self) -> usize {
        self.current
    }

    fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.current).map(|f| &f.image)
    }

    fn jump_to_frame(&mut self, n: usize) -> bool {
        if n >= self.frames.len() {
            return false;
        }
        self.current = n;
        self.paused_elapsed = Duration::ZERO;
        true
    }

    fn set_scaled_size(&mut self, size: Size) {
        // Originals are not kept; only the delays outlive scaling
        for frame in &mut self.frames {
            frame.image = resize(&frame.image, size);
        }
    }

    fn speed_percent(&self) -> u32 {
        self.speed_percent
    }

    fn set_speed_percent(&mut self, percent: u32) {
        self.speed_percent = percent.max(1);
    }

    fn state(&self) -> MovieState {
        self.state
    }

    fn start(&mut self, now: Instant) {
        if !self.is_valid() {
            return;
        }
        self.state = MovieState::Running;
        self.shown_at = Some(now);
        self.paused_elapsed = Duration::ZERO;
    }

    fn set_paused(&mut self, paused: bool, now: Instant) {
        match (self.state, paused) {
            (MovieState::Running, true) => {
                self.paused_elapsed = self
                    .shown_at
                    .map_or(Duration::ZERO, |shown| now.saturating_duration_since(shown));
                self.shown_at = None;
                self.state = MovieState::Paused;
            }
            (MovieState::Paused, false) => {
                self.shown_at = Some(now.checked_sub(self.paused_elapsed).unwrap_or(now));
                self.paused_elapsed = Duration::ZERO;
                self.state = MovieState::Running;
            }
            _ => {}
        }
    }

    fn stop(&mut self) {
        self.state = MovieState::NotRunning;
        self.shown_at = None;
        self.paused_elapsed = Duration::ZERO;
    }

    fn poll(&mut self, now: Instant) -> Option<usize> {
        if self.state != MovieState::Running || self.frames.len() < 2 {
            return None;
        }
        let deadline = self.next_deadline()?;
        if now < deadline {
            return None;
        }

        self.current = (self.current + 1) % self.frames.len();
        // Stay on schedule unless the host fell a whole frame behind
        let shown = if now.saturating_duration_since(deadline) < self.current_delay() {
            deadline
        } else {
            now
        };
        self.shown_at = Some(shown);
        Some(self.current)
    }

    fn next_deadline(&self) -> Option<Instant> {
        if self.state != MovieState::Running || self.frames.len() < 2 {
            return None;
        }
        self.shown_at.map(|shown| shown + self.current_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn movie(delays: &[u64]) -> GifMovie {
        GifMovie::from_images(
            delays
                .iter()
                .map(|&d| (Frame::new(20, 10), ms(d)))
                .collect(),
        )
    }

    #[test]
    fn test_empty_movie_is_invalid() {
        let mut m = GifMovie::from_images(Vec::new());
        assert!(!m.is_valid());
        m.start(Instant::now());
        assert_eq!(m.state(), MovieState::NotRunning);
    }

    #[test]
    fn test_missing_file_is_invalid() {
        assert!(!GifMovie::open(Path::new("/no/such/pet.gif")).is_valid());
    }

    #[test]
    fn test_self_clocked_advance() {
        let t0 = Instant::now();
        let mut m = movie(&[100, 200, 100]);
        m.start(t0);

        assert_eq!(m.poll(t0 + ms(99)), None);
        assert_eq!(m.poll(t0 + ms(100)), Some(1));
        // Second frame lasts 200ms
        assert_eq!(m.poll(t0 + ms(299)), None);
        assert_eq!(m.poll(t0 + ms(300)), Some(2));
        assert_eq!(m.poll(t0 + ms(400)), Some(0));
    }

    #[test]
    fn test_speed_percent_scales_delay() {
        let t0 = Instant::now();
        let mut m = movie(&[100, 100]);
        m.set_speed_percent(200);
        m.start(t0);
        assert_eq!(m.next_deadline(), Some(t0 + ms(50)));

        m.set_speed_percent(50);
        assert_eq!(m.next_deadline(), Some(t0 + ms(200)));
    }

    #[test]
    fn test_zero_delay_defaults() {
        let t0 = Instant::now();
        let mut m = movie(&[0, 0]);
        m.start(t0);
        assert_eq!(m.next_deadline(), Some(t0 + DEFAULT_FRAME_DELAY));
    }

    #[test]
    fn test_pause_keeps_position_and_elapsed() {
        let t0 = Instant::now();
        let mut m = movie(&[100, 100, 100]);
        m.start(t0);
        assert_eq!(m.poll(t0 + ms(100)), Some(1));

        m.set_paused(true, t0 + ms(130));
        assert_eq!(m.state(), MovieState::Paused);
        assert_eq!(m.poll(t0 + ms(1000)), None);
        assert_eq!(m.next_deadline(), None);

        m.set_paused(false, t0 + ms(1000));
        assert_eq!(m.current_frame_number(), 1);
        // 30ms were already spent on frame 1
        assert_eq!(m.next_deadline(), Some(t0 + ms(1070)));
    }

    #[test]
    fn test_single_frame_never_changes() {
        let t0 = Instant::now();
        let mut m = movie(&[100]);
        m.start(t0);
        assert_eq!(m.poll(t0 + ms(500)), None);
        assert_eq!(m.next_deadline(), None);
    }

    #[test]
    fn test_scaled_size_applies_to_all_frames() {
        let mut m = movie(&[100, 100]);
        m.set_scaled_size(Size::new(10, 5));
        assert_eq!(m.current_frame().map(|f| f.dimensions()), Some((10, 5)));
        m.jump_to_frame(1);
        assert_eq!(m.current_frame().map(|f| f.dimensions()), Some((10, 5)));
    }

    #[test]
    fn test_scaling_replaces_originals_and_keeps_delays() {
        let t0 = Instant::now();
        let mut m = movie(&[30, 70]);
        m.set_scaled_size(Size::new(4, 2));
        assert!(m.frames.iter().all(|f| f.image.dimensions() == (4, 2)));
        assert_eq!(m.frame_count(), 2);

        m.start(t0);
        assert_eq!(m.next_deadline(), Some(t0 + ms(30)));
        assert_eq!(m.poll(t0 + ms(30)), Some(1));
        assert_eq!(m.next_deadline(), Some(t0 + ms(100)));
    }

    #[test]
    fn test_stop() {
        let t0 = Instant::now();
        let mut m = movie(&[100, 100]);
        m.start(t0);
        m.stop();
        assert_eq!(m.state(), MovieState::NotRunning);
        assert_eq!(m.poll(t0 + ms(500)), None);
    }
}
