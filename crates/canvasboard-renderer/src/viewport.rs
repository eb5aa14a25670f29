use canvasboard_core::{BBox, Point};
use serde::{Deserialize, Serialize};

/// Multiplicative change per wheel notch.
pub const ZOOM_STEP: f64 = 1.05;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

/// Pan/zoom transform of the canvas surface.
///
/// `screen = canvas * scale + offset`, so the offset is the screen position of
/// the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen X of the canvas origin.
    pub offset_x: f64,
    /// Screen Y of the canvas origin.
    pub offset_y: f64,
    /// Zoom level (pixels per canvas unit).
    pub scale: f64,
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 500.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            width,
            height,
        }
    }

    /// Pan the viewport by a delta in screen pixels. Non-finite deltas are ignored.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// One wheel notch at a screen position. Positive `delta_y` (scrolling
    /// down) zooms out, anything else zooms in. Non-finite input is ignored.
    pub fn zoom(&mut self, delta_y: f64, screen_x: f64, screen_y: f64) {
        if !(delta_y.is_finite() && screen_x.is_finite() && screen_y.is_finite()) {
            return;
        }
        let factor = if delta_y > 0.0 {
            1.0 / ZOOM_STEP
        } else {
            ZOOM_STEP
        };
        self.zoom_at(screen_x, screen_y, factor);
    }

    /// Zoom in/out centered on a screen position. The scale is clamped to
    /// `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        // Convert screen to canvas before zoom
        let anchor = self.screen_to_canvas(Point::new(screen_x, screen_y));

        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }
        self.scale = new_scale;

        // Adjust offset so the point under the cursor stays fixed
        self.offset_x = screen_x - anchor.x * self.scale;
        self.offset_y = screen_y - anchor.y * self.scale;
        log::trace!("zoom -> {:.4}", self.scale);
    }

    /// Back to 1:1 with the canvas origin at the top-left corner.
    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Refit to the container's pixel size. Empty or non-finite sizes are ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset_x,
            canvas.y * self.scale + self.offset_y,
        )
    }

    /// Get the visible bounding box in canvas coordinates.
    pub fn visible_bounds(&self) -> BBox {
        BBox::new(
            self.screen_to_canvas(Point::new(0.0, 0.0)),
            self.screen_to_canvas(Point::new(self.width, self.height)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_in_out_round_trip() {
        let mut vp = Viewport::new(800.0, 500.0);
        for _ in 0..7 {
            vp.zoom(-1.0, 400.0, 250.0);
        }
        assert!(vp.scale > 1.0);
        for _ in 0..7 {
            vp.zoom(1.0, 400.0, 250.0);
        }
        assert!((vp.scale - 1.0).abs() < 1e-9);
        assert!(vp.offset_x.abs() < 1e-6);
        assert!(vp.offset_y.abs() < 1e-6);
    }

    #[test]
    fn test_zoom_keeps_focal_point() {
        let mut vp = Viewport::new(800.0, 500.0);
        vp.pan(30.0, -10.0);
        let focal = Point::new(123.0, 321.0);
        let before = vp.screen_to_canvas(focal);
        vp.zoom(-120.0, focal.x, focal.y);
        let after = vp.screen_to_canvas(focal);
        assert!(before.distance_to(&after) < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::default();
        for _ in 0..500 {
            vp.zoom(1.0, 0.0, 0.0);
        }
        assert!((vp.scale - MIN_SCALE).abs() < 1e-12);
        for _ in 0..1000 {
            vp.zoom(-1.0, 0.0, 0.0);
        }
        assert!((vp.scale - MAX_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_reset_and_pan() {
        let mut vp = Viewport::default();
        vp.pan(15.0, 25.0);
        vp.zoom(-1.0, 10.0, 10.0);
        vp.reset_zoom();
        assert_eq!(vp.scale, 1.0);
        assert_eq!((vp.offset_x, vp.offset_y), (0.0, 0.0));
        vp.pan(5.0, -5.0);
        let p = vp.canvas_to_screen(Point::new(0.0, 0.0));
        assert_eq!(p, Point::new(5.0, -5.0));
    }

    #[test]
    fn test_resize_and_bounds() {
        let mut vp = Viewport::default();
        vp.resize(1000.0, 600.0);
        vp.resize(0.0, 100.0);
        let bounds = vp.visible_bounds();
        assert_eq!(bounds.max, Point::new(1000.0, 600.0));
    }

    #[test]
    fn test_clamped_step_does_not_round_trip() {
        // 9.8 * 1.05 clamps to 10.0, and 10.0 / 1.05 lands below 9.8.
        let mut vp = Viewport::default();
        vp.scale = 9.8;
        vp.zoom(-1.0, 0.0, 0.0);
        assert_eq!(vp.scale, MAX_SCALE);
        vp.zoom(1.0, 0.0, 0.0);
        assert!((vp.scale - MAX_SCALE / ZOOM_STEP).abs() < 1e-12);
        assert!(vp.scale < 9.8);

        // Already at the bound: the step is a no-op and the offset stays put.
        vp.scale = MIN_SCALE;
        vp.offset_x = 7.0;
        vp.zoom(1.0, 50.0, 50.0);
        assert_eq!((vp.scale, vp.offset_x), (MIN_SCALE, 7.0));
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut vp = Viewport::default();
        vp.zoom(f64::NAN, 0.0, 0.0);
        vp.zoom(-1.0, f64::INFINITY, 0.0);
        vp.pan(f64::NAN, 1.0);
        vp.resize(f64::INFINITY, 300.0);
        assert_eq!(vp, Viewport::default());
    }
}
