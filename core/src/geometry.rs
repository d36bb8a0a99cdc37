//! Window and screen geometry
//!
//! All coordinates are logical pixels. Image pixels map 1:1 onto logical
//! pixels, so a frame's dimensions are also the window size it needs.

/// Fraction of the primary display a frame may occupy before it is downscaled.
pub const SCALING_FRACTION: f64 = 0.9;

/// Top-left window position on the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by `delta`.
    pub fn translated(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Component-wise difference `self - origin`.
    pub fn delta_from(self, origin: Point) -> Point {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Available geometry of the primary display (excludes taskbars where the
/// platform reports them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub origin: Point,
    pub size: Size,
}

impl ScreenGeometry {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Screen of the given size anchored at the desktop origin.
    pub const fn with_size(width: u32, height: u32) -> Self {
        Self::new(Point::new(0, 0), Size::new(width, height))
    }

    /// Position that centers a window of `window` size on this screen.
    ///
    /// Windows larger than the screen get a negative offset, so their center
    /// still lines up with the screen center.
    pub fn centered(&self, window: Size) -> Point {
        let dx = (i64::from(self.size.width) - i64::from(window.width)).div_euclid(2);
        let dy = (i64::from(self.size.height) - i64::from(window.height)).div_euclid(2);
        Point::new(self.origin.x + dx as i32, self.origin.y + dy as i32)
    }

    /// The downscaling bound derived from this screen.
    pub fn scaling_bound(&self) -> ScalingBound {
        ScalingBound::for_screen(self)
    }
}

/// Bounding box frames are fitted into: 90% of the screen in each dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingBound {
    max: Size,
}

impl ScalingBound {
    pub fn for_screen(screen: &ScreenGeometry) -> Self {
        let scale = |v: u32| ((f64::from(v) * SCALING_FRACTION) as u32).max(1);
        Self {
            max: Size::new(scale(screen.size.width), scale(screen.size.height)),
        }
    }

    pub fn max(&self) -> Size {
        self.max
    }

    /// Whether a frame of `size` has to be downscaled.
    pub fn exceeds(&self, size: Size) -> bool {
        size.width > self.max.width || size.height > self.max.height
    }

    /// Size a frame of native `size` is displayed at.
    ///
    /// Oversized frames shrink to the largest size that fits the bound while
    /// keeping their aspect ratio; everything else is returned unchanged.
    pub fn fit(&self, size: Size) -> Size {
        if !self.exceeds(size) || size.width == 0 || size.height == 0 {
            return size;
        }

        let (w, h) = (u64::from(size.width), u64::from(size.height));
        let (max_w, max_h) = (u64::from(self.max.width), u64::from(self.max.height));

        // Width that matches the bound's height; fall back to width-limited.
        let width_at_max_h = w * max_h / h;
        let (fit_w, fit_h) = if width_at_max_h <= max_w {
            (width_at_max_h, max_h)
        } else {
            (max_w, h * max_w / w)
        };

        Size::new((fit_w as u32).max(1), (fit_h as u32).max(1))
    }
}
