//! Pet window UI
//!
//! The pet itself is just the current frame. Everything else lives in the
//! right-click menu, which reports the user's choice as a [`UiAction`] for
//! the application to carry out.

use eframe::egui;

use deskpet_core::{ControlAction, OPACITY_PRESETS, PauseLabel, SPEED_PRESETS};

/// Actions triggered from the pet window.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Open the native file picker and load the selection
    ChooseFiles,
    /// Forward a playback/window action to the controller
    Control(ControlAction),
}

/// What the menu needs to render its checked entries and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub pause_label: PauseLabel,
    pub opacity: u8,
    pub speed_ms: u32,
}

pub fn opacity_label(percent: u8) -> String {
    format!("{}%", percent)
}

pub fn speed_label(name: &str, millis: u32) -> String {
    format!("{} ({}ms)", name, millis)
}

/// Renders the right-click menu and returns the chosen action.
pub fn pet_menu(ui: &mut egui::Ui, state: &MenuState) -> Option<UiAction> {
    let mut action = None;

    if ui.button("Choose images...").clicked() {
        action = Some(UiAction::ChooseFiles);
        ui.close();
    }

    ui.menu_button("Opacity", |ui| {
        for percent in OPACITY_PRESETS {
            if ui
                .radio(state.opacity == percent, opacity_label(percent))
                .clicked()
            {
                action = Some(UiAction::Control(ControlAction::SetOpacity(percent)));
                ui.close();
            }
        }
    });

    ui.menu_button("Speed", |ui| {
        for (name, millis) in SPEED_PRESETS {
            if ui
                .radio(state.speed_ms == millis, speed_label(name, millis))
                .clicked()
            {
                action = Some(UiAction::Control(ControlAction::SetSpeed(millis)));
                ui.close();
            }
        }
    });

    if ui.button(state.pause_label.text()).clicked() {
        action = Some(UiAction::Control(ControlAction::TogglePause));
        ui.close();
    }

    if ui.button("Reset position").clicked() {
        action = Some(UiAction::Control(ControlAction::ResetPosition));
        ui.close();
    }

    ui.separator();

    if ui.button("Exit").clicked() {
        action = Some(UiAction::Control(ControlAction::Exit));
        ui.close();
    }

    action
}

/// Placeholder shown before anything is loaded; also the drag and menu target.
pub fn empty_hint(ui: &mut egui::Ui, opacity: f32) -> egui::Response {
    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

    let painter = ui.painter();
    painter.rect_filled(
        rect,
        egui::CornerRadius::same(12),
        egui::Color32::from_black_alpha(scale_alpha(160, opacity)),
    );
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "Right-click to\nchoose a pet",
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(scale_alpha(255, opacity)),
    );

    response
}

/// Multiply an alpha value by an opacity in `[0, 1]`.
pub fn scale_alpha(alpha: u8, opacity: f32) -> u8 {
    (f32::from(alpha) * opacity.clamp(0.0, 1.0)).round() as u8
}
