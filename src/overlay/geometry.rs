//! Screen-space rectangles and the safe drawing area

/// Axis-aligned rectangle in pixels. `contains` is half-open on the right and bottom edges.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Square of side `side` centered on `(cx, cy)`
    pub fn square_at(cx: f32, cy: f32, side: f32) -> Self {
        let half = side / 2.0;
        Self::new(cx - half, cy - half, cx + half, cy + half)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Same size, moved so its center sits on `(cx, cy)`
    pub fn recentered(&self, cx: f32, cy: f32) -> Self {
        let (ox, oy) = self.center();
        self.offset(cx - ox, cy - oy)
    }

    /// Offset of `(x, y)` from the center divided by the half extents
    pub fn normalized_offset(&self, x: f32, y: f32) -> (f32, f32) {
        let (cx, cy) = self.center();
        let half_width = self.width() / 2.0;
        let half_height = self.height() / 2.0;
        if half_width <= 0.0 || half_height <= 0.0 {
            return (0.0, 0.0);
        }
        ((x - cx) / half_width, (y - cy) / half_height)
    }
}

/// Display cutout insets in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Dimensions of the surface the overlay draws on
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
    pub cutout: Insets,
}

impl Screen {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            cutout: Insets::default(),
        }
    }

    pub fn with_cutout(mut self, cutout: Insets) -> Self {
        self.cutout = cutout;
        self
    }

    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Screen minus cutout insets, mirrored so the area stays centered.
    pub fn safe_area(&self) -> Rect {
        let horizontal = self.cutout.left.max(self.cutout.right);
        let vertical = self.cutout.top.max(self.cutout.bottom);
        Rect::new(
            horizontal,
            vertical,
            self.width - horizontal,
            self.height - vertical,
        )
    }

    /// Pixel center for a normalized position inside the safe area
    pub fn denormalize(&self, position: (f64, f64)) -> (f32, f32) {
        let safe = self.safe_area();
        (
            safe.left + (position.0 as f32) * safe.width(),
            safe.top + (position.1 as f32) * safe.height(),
        )
    }

    pub fn normalize(&self, x: f32, y: f32) -> (f64, f64) {
        let safe = self.safe_area();
        let width = f64::from(safe.width());
        let height = f64::from(safe.height());
        if width <= 0.0 || height <= 0.0 {
            return (0.0, 0.0);
        }
        (
            f64::from(x - safe.left) / width,
            f64::from(y - safe.top) / height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(9.99, 9.99));
        assert!(!rect.contains(10.0, 5.0));
        assert!(!rect.contains(5.0, 10.0));
    }

    #[test]
    fn cutout_is_mirrored() {
        let screen = Screen::new(2000.0, 1000.0).with_cutout(Insets {
            left: 80.0,
            top: 0.0,
            right: 0.0,
            bottom: 20.0,
        });
        assert_eq!(screen.safe_area(), Rect::new(80.0, 20.0, 1920.0, 980.0));
    }

    #[test]
    fn normalize_inverts_denormalize() {
        let screen = Screen::new(1280.0, 720.0).with_cutout(Insets {
            left: 40.0,
            ..Insets::default()
        });
        let (x, y) = screen.denormalize((0.25, 0.75));
        let (nx, ny) = screen.normalize(x, y);
        assert!((nx - 0.25).abs() < 1e-6);
        assert!((ny - 0.75).abs() < 1e-6);
    }
}
