//! Window icon
//!
//! `icon.png` next to the executable wins; otherwise a small dark-cyan disc
//! is drawn so the pet always has an icon.

use std::path::{Path, PathBuf};

use eframe::egui;

pub const ICON_FILE_NAME: &str = "icon.png";

const FALLBACK_EDGE: u32 = 16;
const FALLBACK_COLOR: [u8; 4] = [0, 139, 139, 255];

/// Icon for the pet window.
pub fn window_icon() -> egui::IconData {
    bundled_icon_path()
        .and_then(|path| load_icon(&path))
        .unwrap_or_else(fallback_icon)
}

fn bundled_icon_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(ICON_FILE_NAME))
}

/// Load an icon from an image file. Missing or unreadable files yield `None`.
pub fn load_icon(path: &Path) -> Option<egui::IconData> {
    if !path.is_file() {
        return None;
    }
    match image::open(path) {
        Ok(image) => {
            let image = image.to_rgba8();
            let (width, height) = image.dimensions();
            tracing::debug!("Using window icon {}", path.display());
            Some(egui::IconData {
                rgba: image.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            tracing::warn!("Failed to load icon {}: {}", path.display(), e);
            None
        }
    }
}

/// A filled disc on a transparent square.
pub fn fallback_icon() -> egui::IconData {
    let center = FALLBACK_EDGE as f32 / 2.0;
    let radius = center - 0.5;

    let mut rgba = Vec::with_capacity((FALLBACK_EDGE * FALLBACK_EDGE * 4) as usize);
    for y in 0..FALLBACK_EDGE {
        for x in 0..FALLBACK_EDGE {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            if dx * dx + dy * dy <= radius * radius {
                rgba.extend_from_slice(&FALLBACK_COLOR);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    egui::IconData {
        rgba,
        width: FALLBACK_EDGE,
        height: FALLBACK_EDGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(icon: &egui::IconData, x: u32, y: u32) -> &[u8] {
        let offset = ((y * icon.width + x) * 4) as usize;
        &icon.rgba[offset..offset + 4]
    }

    #[test]
    fn test_fallback_icon_is_disc() {
        let icon = fallback_icon();
        assert_eq!((icon.width, icon.height), (16, 16));
        assert_eq!(icon.rgba.len(), 16 * 16 * 4);
        assert_eq!(pixel(&icon, 8, 8), &FALLBACK_COLOR);
        assert_eq!(pixel(&icon, 1, 8), &FALLBACK_COLOR);
        assert_eq!(pixel(&icon, 0, 8)[3], 0);
        assert_eq!(pixel(&icon, 0, 0)[3], 0);
        assert_eq!(pixel(&icon, 15, 15)[3], 0);
    }

    #[test]
    fn test_load_missing_icon() {
        assert!(load_icon(Path::new("/no/such/icon.png")).is_none());
    }

    #[test]
    fn test_load_icon_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ICON_FILE_NAME);
        image::RgbaImage::from_pixel(4, 2, image::Rgba([1, 2, 3, 4]))
            .save(&path)
            .unwrap();

        let icon = load_icon(&path).unwrap();
        assert_eq!((icon.width, icon.height), (4, 2));
        assert_eq!(&icon.rgba[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_unreadable_icon_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ICON_FILE_NAME);
        std::fs::write(&path, b"not an image").unwrap();
        assert!(load_icon(&path).is_none());
    }
}
