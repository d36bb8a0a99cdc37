//! Deskpet overlay
//!
//! The eframe host around [`deskpet_core`]: a transparent, undecorated,
//! always-on-top window that shows the current frame, a right-click menu,
//! native file dialogs and drag-to-move.

pub mod app;
pub mod icon;
pub mod surface;
pub mod ui;
