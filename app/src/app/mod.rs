//! Pet application state and main loop
//!
//! One transparent, undecorated, always-on-top viewport. Each frame the app:
//! - runs queued control actions (start-up centering and CLI files)
//! - ticks the playback engine and uploads any new frame
//! - draws the frame (or the empty-state hint) and the right-click menu
//! - tracks drag-to-move and schedules the next repaint for the engine clock

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;
use thiserror::Error;

use crate::surface::EguiSurface;
use crate::ui::{MenuState, UiAction};
use deskpet_core::config::Config;
use deskpet_core::{
    ControlAction, ControlOutcome, Controller, DisplaySurface, DragTracker, ImageCodec,
    NominalSpeed, PlaybackEngine, Point, SUPPORTED_EXTENSIONS, ScreenGeometry,
};

/// Why the pet could not be shown.
#[derive(Error, Debug)]
pub enum AppError {
    /// The native window or its event loop failed to start
    #[error("could not open the pet window: {0}")]
    Window(String),
}

/// How long a load failure stays on screen.
const NOTICE_DURATION: Duration = Duration::from_secs(4);

/// Options collected from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Milliseconds per frame, overriding the config file
    pub speed_ms: Option<u32>,
    /// Opacity in percent, overriding the config file
    pub opacity: Option<u8>,
    /// Images to load at start-up
    pub files: Vec<PathBuf>,
    /// Print usage and quit
    pub show_help: bool,
}

/// A short message drawn over the pet.
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    text: String,
    until: Instant,
}

impl Notice {
    fn new(text: String, now: Instant) -> Self {
        Self {
            text,
            until: now + NOTICE_DURATION,
        }
    }

    fn is_active(&self, now: Instant) -> bool {
        now < self.until
    }
}

/// Actions run on the first frame: center the window, then load the
/// command-line files if there are any.
fn startup_actions(files: Vec<PathBuf>) -> Vec<ControlAction> {
    let mut actions = vec![ControlAction::ResetPosition];
    if !files.is_empty() {
        actions.push(ControlAction::Load(files));
    }
    actions
}

/// Primary display geometry, from the monitor size egui reports or the
/// configured fallback.
///
/// egui only reports the full monitor size, so taskbars and docks are
/// included in the bound and in centering.
fn screen_geometry(monitor_size: Option<egui::Vec2>, fallback: ScreenGeometry) -> ScreenGeometry {
    match monitor_size {
        Some(size) if size.x >= 1.0 && size.y >= 1.0 => {
            ScreenGeometry::with_size(size.x as u32, size.y as u32)
        }
        _ => fallback,
    }
}

/// Window-local pointer position to desktop coordinates.
fn to_global(window_origin: egui::Pos2, local: egui::Pos2) -> Point {
    Point::new(
        (window_origin.x + local.x).round() as i32,
        (window_origin.y + local.y).round() as i32,
    )
}

/// Pet application state
pub struct PetApp {
    engine: PlaybackEngine<ImageCodec>,
    controller: Controller,
    surface: EguiSurface,
    drag: DragTracker,
    fallback_screen: ScreenGeometry,
    /// Actions waiting for the next frame
    pending: Vec<ControlAction>,
    /// Set once Exit is chosen; other close requests are cancelled
    exit_requested: bool,
    notice: Option<Notice>,
}

impl PetApp {
    pub fn new(config: Config, options: LaunchOptions) -> Self {
        let speed = NominalSpeed::new(options.speed_ms.unwrap_or(config.playback.speed_ms));
        let controller = Controller::new(options.opacity.unwrap_or(config.window.opacity));

        let mut surface = EguiSurface::new(config.window.initial_size());
        controller.apply_opacity(&mut surface);

        Self {
            engine: PlaybackEngine::with_speed(ImageCodec, speed),
            controller,
            surface,
            drag: DragTracker::default(),
            fallback_screen: config.display.fallback_screen(),
            pending: startup_actions(options.files),
            exit_requested: false,
            notice: None,
        }
    }

    fn screen(&self, ctx: &egui::Context) -> ScreenGeometry {
        let monitor_size = ctx.input(|i| i.viewport().monitor_size);
        screen_geometry(monitor_size, self.fallback_screen)
    }

    fn menu_state(&self) -> MenuState {
        MenuState {
            pause_label: self.controller.pause_label(),
            opacity: self.controller.opacity(),
            speed_ms: self.engine.speed().as_millis(),
        }
    }

    fn handle_ui_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::ChooseFiles => {
                tracing::info!("Opening file picker");
                let selection = rfd::FileDialog::new()
                    .add_filter("Images", &SUPPORTED_EXTENSIONS)
                    .set_title("Choose pet images")
                    .pick_files();

                match selection {
                    Some(paths) => self.handle_action(ControlAction::Load(paths), ctx),
                    None => tracing::debug!("File picker cancelled"),
                }
            }
            UiAction::Control(action) => self.handle_action(action, ctx),
        }
    }

    fn handle_action(&mut self, action: ControlAction, ctx: &egui::Context) {
        let now = Instant::now();
        let screen = self.screen(ctx);

        match self
            .controller
            .handle(action, &mut self.engine, &mut self.surface, &screen, now)
        {
            ControlOutcome::Done => {}
            ControlOutcome::Loaded(_) => self.notice = None,
            ControlOutcome::LoadFailed(e) => {
                self.notice = Some(Notice::new(format!("Could not load: {}", e), now));
            }
            ControlOutcome::Exit => {
                self.exit_requested = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn handle_drag(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let origin = ctx
            .input(|i| i.viewport().outer_rect)
            .map(|rect| rect.min)
            .unwrap_or_else(|| {
                let position = self.surface.position();
                egui::pos2(position.x as f32, position.y as f32)
            });

        if response.drag_started_by(egui::PointerButton::Primary) {
            let press = ctx.input(|i| i.pointer.press_origin().or(i.pointer.latest_pos()));
            if let Some(local) = press {
                self.drag.press(to_global(origin, local));
            }
        } else if response.dragged_by(egui::PointerButton::Primary)
            && let Some(local) = ctx.input(|i| i.pointer.latest_pos())
        {
            self.drag.drag_to(to_global(origin, local), &mut self.surface);
        }

        if response.drag_stopped() {
            self.drag.release();
        }
    }

    fn show_pet(&self, ui: &mut egui::Ui) -> egui::Response {
        let opacity = self.surface.opacity();
        match (self.surface.texture(), self.surface.content_size()) {
            (Some(texture), Some(size)) => ui.add(
                egui::Image::from_texture(texture)
                    .fit_to_exact_size(egui::vec2(size.width as f32, size.height as f32))
                    .tint(egui::Color32::from_white_alpha(crate::ui::scale_alpha(
                        255, opacity,
                    )))
                    .sense(egui::Sense::click_and_drag()),
            ),
            _ => crate::ui::empty_hint(ui, opacity),
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(notice) = &self.notice else {
            return;
        };
        if !notice.is_active(now) {
            self.notice = None;
            return;
        }

        egui::Area::new(egui::Id::new("load_notice"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -4.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(egui::Color32::LIGHT_RED, &notice.text);
                });
            });
        ctx.request_repaint_after(notice.until.saturating_duration_since(now));
    }
}

impl eframe::App for PetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Only the Exit action may close the pet
        if ctx.input(|i| i.viewport().close_requested()) && !self.exit_requested {
            tracing::debug!("Ignoring close request");
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        for action in std::mem::take(&mut self.pending) {
            self.handle_action(action, ctx);
        }

        self.engine.tick(&mut self.surface, Instant::now());
        self.surface.flush(ctx);

        let mut ui_action = None;
        let menu_state = self.menu_state();

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let response = self.show_pet(ui);
                self.handle_drag(ctx, &response);
                response.context_menu(|ui| {
                    if let Some(action) = crate::ui::pet_menu(ui, &menu_state) {
                        ui_action = Some(action);
                    }
                });
            });

        if let Some(action) = ui_action {
            self.handle_ui_action(action, ctx);
        }

        let now = Instant::now();
        self.show_notice(ctx, now);

        if self.surface.flush(ctx) {
            ctx.request_repaint();
        }
        if let Some(deadline) = self.engine.next_wakeup() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

/// Run the pet application
pub fn run(options: LaunchOptions) -> Result<(), AppError> {
    tracing::info!("Starting Deskpet");

    let config = deskpet_core::config::load();
    let size = config.window.initial_size();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Deskpet")
            .with_inner_size([size.width as f32, size.height as f32])
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(egui::WindowLevel::AlwaysOnTop)
            .with_taskbar(false)
            .with_icon(crate::icon::window_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Deskpet",
        native_options,
        Box::new(move |_cc| Ok(Box::new(PetApp::new(config, options)))),
    )
    .map_err(|e| AppError::Window(e.to_string()))?;

    tracing::info!("Deskpet exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskpet_core::{PauseLabel, Size};

    #[test]
    fn test_app_error_message() {
        let error = AppError::Window("no display".to_string());
        assert_eq!(error.to_string(), "could not open the pet window: no display");
    }

    #[test]
    fn test_startup_centers_before_loading() {
        assert_eq!(startup_actions(Vec::new()), vec![ControlAction::ResetPosition]);

        let files = vec![PathBuf::from("pet.gif")];
        assert_eq!(
            startup_actions(files.clone()),
            vec![ControlAction::ResetPosition, ControlAction::Load(files)]
        );
    }

    #[test]
    fn test_screen_geometry_fallback() {
        let fallback = ScreenGeometry::with_size(1920, 1080);
        assert_eq!(screen_geometry(None, fallback), fallback);
        assert_eq!(screen_geometry(Some(egui::vec2(0.0, 0.0)), fallback), fallback);
        assert_eq!(
            screen_geometry(Some(egui::vec2(2560.0, 1440.0)), fallback),
            ScreenGeometry::with_size(2560, 1440)
        );
    }

    #[test]
    fn test_to_global() {
        let global = to_global(egui::pos2(100.0, 50.0), egui::pos2(10.4, 20.6));
        assert_eq!(global, Point::new(110, 71));
    }

    #[test]
    fn test_notice_expires() {
        let now = Instant::now();
        let notice = Notice::new("oops".to_string(), now);
        assert!(notice.is_active(now));
        assert!(notice.is_active(now + Duration::from_secs(3)));
        assert!(!notice.is_active(now + NOTICE_DURATION));
    }

    #[test]
    fn test_new_app_applies_options() {
        let options = LaunchOptions {
            speed_ms: Some(20),
            opacity: Some(55),
            files: vec![PathBuf::from("a.png")],
            show_help: false,
        };
        let app = PetApp::new(Config::default(), options);
        assert_eq!(app.engine.speed().as_millis(), 20);
        assert_eq!(
            app.menu_state(),
            MenuState {
                pause_label: PauseLabel::Pause,
                opacity: 55,
                speed_ms: 20,
            }
        );
        assert_eq!(app.surface.opacity(), 0.55);
        assert_eq!(app.pending.len(), 2);
        assert!(!app.engine.is_loaded());
    }

    #[test]
    fn test_new_app_uses_config() {
        let mut config = Config::default();
        config.playback.speed_ms = 250;
        config.window.initial_width = 300;
        let app = PetApp::new(config, LaunchOptions::default());
        assert_eq!(app.engine.speed().as_millis(), 250);
        assert_eq!(app.controller.opacity(), 85);
        assert_eq!(app.pending, vec![ControlAction::ResetPosition]);
        assert_eq!(app.surface.size(), Size::new(300, 200));
    }
}
