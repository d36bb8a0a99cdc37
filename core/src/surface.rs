//! Display surface abstraction
//!
//! The frameless, always-on-top, transparent window the pet is drawn in.
//! The engine presents frames and restores the window position through this
//! trait; the windowing layer decides how that maps onto real windows.

use crate::codec::Frame;
use crate::geometry::{Point, Size};

pub trait DisplaySurface {
    /// Show `frame` as the window content.
    fn set_content(&mut self, frame: &Frame);

    /// Resize the window to the size of the current content.
    fn adjust_size(&mut self);

    /// Current top-left position.
    fn position(&self) -> Point;

    fn move_to(&mut self, position: Point);

    fn size(&self) -> Size;

    /// Window-level opacity in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f32);

    /// Move the window by `delta`.
    fn translate(&mut self, delta: Point) {
        let position = self.position().translated(delta);
        self.move_to(position);
    }
}
