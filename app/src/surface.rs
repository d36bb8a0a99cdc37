//! egui-backed display surface
//!
//! The pet window is a single borderless viewport. Frames become a texture
//! and geometry changes become [`egui::ViewportCommand`]s; both are queued
//! while the engine runs and sent to egui by [`EguiSurface::flush`].

use eframe::egui;

use deskpet_core::{DisplaySurface, Frame, Point, Size};

/// The pet window as seen by the playback engine.
pub struct EguiSurface {
    texture: Option<egui::TextureHandle>,
    pending_image: Option<egui::ColorImage>,
    content_size: Option<Size>,
    size: Size,
    position: Point,
    opacity: f32,
    pending_size: Option<Size>,
    pending_position: Option<Point>,
}

impl EguiSurface {
    /// A surface for a window of `size` that has shown nothing yet.
    pub fn new(size: Size) -> Self {
        Self {
            texture: None,
            pending_image: None,
            content_size: None,
            size,
            position: Point::default(),
            opacity: 1.0,
            pending_size: None,
            pending_position: None,
        }
    }

    /// Texture holding the latest uploaded frame.
    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    /// Size of the latest frame, in pixels.
    pub fn content_size(&self) -> Option<Size> {
        self.content_size
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn pending_size(&self) -> Option<Size> {
        self.pending_size
    }

    pub fn pending_position(&self) -> Option<Point> {
        self.pending_position
    }

    /// Upload the pending frame and send pending window commands.
    ///
    /// Returns true if anything was sent.
    pub fn flush(&mut self, ctx: &egui::Context) -> bool {
        let mut sent = false;

        if let Some(image) = self.pending_image.take() {
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.texture =
                        Some(ctx.load_texture("pet-frame", image, egui::TextureOptions::LINEAR));
                }
            }
            sent = true;
        }

        if let Some(size) = self.pending_size.take() {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                size.width as f32,
                size.height as f32,
            )));
            sent = true;
        }

        if let Some(position) = self.pending_position.take() {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                position.x as f32,
                position.y as f32,
            )));
            sent = true;
        }

        sent
    }
}

/// Convert a decoded frame into an egui image.
pub fn to_color_image(frame: &Frame) -> egui::ColorImage {
    egui::ColorImage::from_rgba_unmultiplied(
        [frame.width() as usize, frame.height() as usize],
        frame.as_raw(),
    )
}

impl DisplaySurface for EguiSurface {
    fn set_content(&mut self, frame: &Frame) {
        self.content_size = Some(Size::new(frame.width(), frame.height()));
        self.pending_image = Some(to_color_image(frame));
    }

    fn adjust_size(&mut self) {
        if let Some(size) = self.content_size
            && size != self.size
        {
            self.size = size;
            self.pending_size = Some(size);
        }
    }

    fn position(&self) -> Point {
        self.position
    }

    fn move_to(&mut self, position: Point) {
        if position != self.position || self.pending_position.is_some() {
            self.position = position;
            self.pending_position = Some(position);
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_to_color_image() {
        let frame = Frame::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let image = to_color_image(&frame);
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels.len(), 6);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn test_adjust_size_follows_content() {
        let mut surface = EguiSurface::new(Size::new(200, 200));
        surface.adjust_size();
        assert_eq!(surface.pending_size(), None);

        surface.set_content(&Frame::new(64, 48));
        assert_eq!(surface.size(), Size::new(200, 200));
        surface.adjust_size();
        assert_eq!(surface.size(), Size::new(64, 48));
        assert_eq!(surface.pending_size(), Some(Size::new(64, 48)));
        assert_eq!(surface.content_size(), Some(Size::new(64, 48)));
    }

    #[test]
    fn test_move_to_queues_position() {
        let mut surface = EguiSurface::new(Size::new(10, 10));
        surface.move_to(Point::default());
        assert_eq!(surface.pending_position(), None);

        surface.translate(Point::new(5, -3));
        assert_eq!(surface.position(), Point::new(5, -3));
        assert_eq!(surface.pending_position(), Some(Point::new(5, -3)));
    }

    #[test]
    fn test_opacity_clamped() {
        let mut surface = EguiSurface::new(Size::new(10, 10));
        surface.set_opacity(0.7);
        assert_eq!(surface.opacity(), 0.7);
        surface.set_opacity(3.0);
        assert_eq!(surface.opacity(), 1.0);
    }

    #[test]
    fn test_flush_uploads_and_clears() {
        let ctx = egui::Context::default();
        let mut surface = EguiSurface::new(Size::new(10, 10));
        assert!(!surface.flush(&ctx));

        surface.set_content(&Frame::new(4, 4));
        surface.adjust_size();
        surface.move_to(Point::new(1, 1));
        assert!(surface.flush(&ctx));
        assert!(surface.texture().is_some());
        assert_eq!(surface.pending_size(), None);
        assert_eq!(surface.pending_position(), None);
        assert!(!surface.flush(&ctx));
    }
}
