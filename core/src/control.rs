//! Control surface logic
//!
//! Maps the discrete menu actions onto playback engine calls and tracks
//! drag-to-move input. The windowing layer only has to turn clicks into
//! [`ControlAction`]s and pointer events into [`DragTracker`] calls.

use std::path::PathBuf;
use std::time::Instant;

use crate::codec::{MediaDecoder, is_native_animation};
use crate::engine::{LoadError, PlaybackEngine, SourceKind};
use crate::geometry::{Point, ScreenGeometry};
use crate::surface::DisplaySurface;

/// Opacity menu entries, in percent.
pub const OPACITY_PRESETS: [u8; 5] = [100, 85, 70, 55, 40];

/// Opacity of a freshly started pet, in percent.
pub const DEFAULT_OPACITY: u8 = 85;

/// Actions the user can trigger from the pet's menu.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Load the chosen files (empty selection does nothing)
    Load(Vec<PathBuf>),
    /// Set window opacity in percent
    SetOpacity(u8),
    /// Set playback speed in milliseconds per frame
    SetSpeed(u32),
    /// Pause if playing, resume if paused
    TogglePause,
    /// Center the window on the primary display
    ResetPosition,
    /// Release playback resources and quit
    Exit,
}

/// What came of a handled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Done,
    Loaded(SourceKind),
    LoadFailed(LoadError),
    /// Resources are released; the host should terminate
    Exit,
}

/// Text of the pause/resume menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PauseLabel {
    #[default]
    Pause,
    Resume,
}

impl PauseLabel {
    pub fn text(self) -> &'static str {
        match self {
            PauseLabel::Pause => "Pause",
            PauseLabel::Resume => "Resume",
        }
    }
}

/// Sort a file selection for loading.
///
/// Selections play in file-name order (case-insensitive). A lone native
/// animation is left as is.
pub fn sort_selection(paths: &mut [PathBuf]) {
    let lone_animation = matches!(paths, [only] if is_native_animation(only));
    if !lone_animation {
        paths.sort_by_cached_key(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .unwrap_or_default()
        });
    }
}

/// Menu-side state: the pause label and the current opacity.
#[derive(Debug, Clone)]
pub struct Controller {
    pause_label: PauseLabel,
    opacity: u8,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DEFAULT_OPACITY)
    }
}

impl Controller {
    pub fn new(opacity: u8) -> Self {
        Self {
            pause_label: PauseLabel::Pause,
            opacity: opacity.min(100),
        }
    }

    pub fn pause_label(&self) -> PauseLabel {
        self.pause_label
    }

    /// Current opacity in percent.
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Apply the current opacity to `surface` (used once at start-up).
    pub fn apply_opacity<S: DisplaySurface>(&self, surface: &mut S) {
        surface.set_opacity(f32::from(self.opacity) / 100.0);
    }

    /// Carry out `action` against the engine and the surface.
    pub fn handle<D: MediaDecoder, S: DisplaySurface>(
        &mut self,
        action: ControlAction,
        engine: &mut PlaybackEngine<D>,
        surface: &mut S,
        screen: &ScreenGeometry,
        now: Instant,
    ) -> ControlOutcome {
        let outcome = match action {
            ControlAction::Load(mut paths) => {
                if paths.is_empty() {
                    return ControlOutcome::Done;
                }
                sort_selection(&mut paths);
                match engine.load(&paths, surface, screen, now) {
                    Ok(kind) => ControlOutcome::Loaded(kind),
                    Err(e) => {
                        tracing::warn!("Failed to load animation: {}", e);
                        ControlOutcome::LoadFailed(e)
                    }
                }
            }
            ControlAction::SetOpacity(percent) => {
                self.opacity = percent.min(100);
                tracing::info!("Opacity set to {}%", self.opacity);
                self.apply_opacity(surface);
                ControlOutcome::Done
            }
            ControlAction::SetSpeed(millis) => {
                engine.set_speed(millis, now);
                tracing::info!("Speed set to {}ms/frame", engine.speed().as_millis());
                ControlOutcome::Done
            }
            ControlAction::TogglePause => {
                let pause = !engine.is_paused();
                engine.set_paused(pause, now);
                ControlOutcome::Done
            }
            ControlAction::ResetPosition => {
                let position = screen.centered(surface.size());
                tracing::info!("Resetting position to ({}, {})", position.x, position.y);
                surface.move_to(position);
                ControlOutcome::Done
            }
            ControlAction::Exit => {
                tracing::info!("Exit requested");
                engine.dispose();
                ControlOutcome::Exit
            }
        };

        self.pause_label = if engine.is_paused() {
            PauseLabel::Resume
        } else {
            PauseLabel::Pause
        };
        outcome
    }
}

/// Drag-to-move tracking in global (desktop) coordinates.
///
/// Each move translates the window by the distance since the previous
/// pointer sample, then re-captures, so rounding errors never accumulate.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    last: Option<Point>,
}

impl DragTracker {
    pub fn press(&mut self, global: Point) {
        self.last = Some(global);
    }

    /// Pointer moved to `global`; moves `surface` if a drag is active.
    /// Returns the applied delta.
    pub fn drag_to<S: DisplaySurface>(&mut self, global: Point, surface: &mut S) -> Option<Point> {
        let last = self.last?;
        let delta = global.delta_from(last);
        if delta != Point::default() {
            surface.translate(delta);
        }
        self.last = Some(global);
        Some(delta)
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
