/// Viewport mapping between screen pixels and grid cells under zoom/pan.
///
/// `zoom` is pixels per cell; `pan_x`/`pan_y` are the grid coordinates of
/// the pixel at the window's top-left corner. Pan is always clamped so the
/// visible window `[pan, pan + viewport/zoom]` stays inside the grid.
#[derive(Debug, Clone)]
pub struct Camera {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    viewport_w: f32,
    viewport_h: f32,
    grid_w: f32,
    grid_h: f32,
}

/// Maximum zoom: 32 screen pixels per grid cell.
const MAX_ZOOM: f32 = 32.0;

/// Zoom change per scroll tick.
const ZOOM_STEP: f32 = 1.1;

/// Uniform block handed to the render shader (padded to 32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub pan_x: f32,
    pub pan_y: f32,
    pub zoom: f32,
    pub _pad0: f32,
    pub grid_width: f32,
    pub grid_height: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl Camera {
    pub fn new(viewport_w: u32, viewport_h: u32, grid_w: u32, grid_h: u32) -> Self {
        let mut cam = Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            viewport_w: viewport_w as f32,
            viewport_h: viewport_h as f32,
            grid_w: grid_w as f32,
            grid_h: grid_h as f32,
        };
        cam.reset();
        cam
    }

    /// Smallest zoom that keeps the visible window within the grid.
    fn min_zoom(&self) -> f32 {
        (self.viewport_w / self.grid_w).max(self.viewport_h / self.grid_h)
    }

    fn clamp_pan(&mut self) {
        let max_x = (self.grid_w - self.viewport_w / self.zoom).max(0.0);
        let max_y = (self.grid_h - self.viewport_h / self.zoom).max(0.0);
        self.pan_x = self.pan_x.clamp(0.0, max_x);
        self.pan_y = self.pan_y.clamp(0.0, max_y);
    }

    /// Map a screen pixel to the grid cell under it (floored).
    pub fn screen_to_grid(&self, sx: f32, sy: f32) -> (i32, i32) {
        let gx = sx / self.zoom + self.pan_x;
        let gy = sy / self.zoom + self.pan_y;
        (gx.floor() as i32, gy.floor() as i32)
    }

    /// Map a grid coordinate to the screen pixel of its top-left corner.
    pub fn grid_to_screen(&self, gx: f32, gy: f32) -> (f32, f32) {
        ((gx - self.pan_x) * self.zoom, (gy - self.pan_y) * self.zoom)
    }

    /// Multiplicative zoom by `delta_ticks` scroll steps, anchored at the
    /// cursor: the grid point under the cursor before the zoom maps to the
    /// same pixel afterwards (then pan is re-clamped).
    pub fn zoom_at(&mut self, delta_ticks: f32, cursor_x: f32, cursor_y: f32) {
        let before_x = cursor_x / self.zoom + self.pan_x;
        let before_y = cursor_y / self.zoom + self.pan_y;

        self.zoom = (self.zoom * ZOOM_STEP.powf(delta_ticks)).clamp(self.min_zoom(), MAX_ZOOM);

        let after_x = cursor_x / self.zoom + self.pan_x;
        let after_y = cursor_y / self.zoom + self.pan_y;
        self.pan_x += before_x - after_x;
        self.pan_y += before_y - after_y;
        self.clamp_pan();
    }

    /// Pan by a screen-pixel delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx / self.zoom;
        self.pan_y += dy / self.zoom;
        self.clamp_pan();
    }

    /// Default view: zoomed out to fit the grid, centered.
    pub fn reset(&mut self) {
        self.zoom = self.min_zoom().min(MAX_ZOOM);
        self.pan_x = (self.grid_w - self.viewport_w / self.zoom) / 2.0;
        self.pan_y = (self.grid_h - self.viewport_h / self.zoom) / 2.0;
        self.clamp_pan();
    }

    /// Track window resizes; re-clamps zoom and pan.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_w = (width.max(1)) as f32;
        self.viewport_h = (height.max(1)) as f32;
        self.zoom = self.zoom.clamp(self.min_zoom(), MAX_ZOOM);
        self.clamp_pan();
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            pan_x: self.pan_x,
            pan_y: self.pan_y,
            zoom: self.zoom,
            _pad0: 0.0,
            grid_width: self.grid_w,
            grid_height: self.grid_h,
            _pad1: 0.0,
            _pad2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(512, 512, 256, 256)
    }

    #[test]
    fn test_default_fits_grid() {
        let cam = camera();
        // 512 px over 256 cells = 2 px per cell at minimum zoom.
        assert!((cam.zoom - 2.0).abs() < 1e-6);
        assert!((cam.pan_x - 0.0).abs() < 1e-6);
        let (gx, gy) = cam.screen_to_grid(511.0, 511.0);
        assert!(gx < 256 && gy < 256);
    }

    #[test]
    fn test_round_trip_within_one_cell() {
        let mut cam = camera();
        cam.zoom_at(8.0, 100.0, 200.0);
        for &(gx, gy) in &[(3.0f32, 7.0f32), (100.0, 50.0), (40.25, 41.75)] {
            let (sx, sy) = cam.grid_to_screen(gx, gy);
            let (rx, ry) = cam.screen_to_grid(sx, sy);
            assert!((rx as f32 - gx).abs() <= 1.0);
            assert!((ry as f32 - gy).abs() <= 1.0);
        }
    }

    #[test]
    fn test_zoom_anchors_cursor() {
        let mut cam = camera();
        cam.zoom_at(4.0, 256.0, 256.0);
        let before = cam.screen_to_grid(300.0, 180.0);

        cam.zoom_at(2.0, 300.0, 180.0);
        let after = cam.screen_to_grid(300.0, 180.0);

        assert!((after.0 - before.0).abs() <= 1);
        assert!((after.1 - before.1).abs() <= 1);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut cam = camera();
        cam.zoom_at(200.0, 0.0, 0.0);
        assert!(cam.zoom <= MAX_ZOOM);
        cam.zoom_at(-200.0, 0.0, 0.0);
        assert!((cam.zoom - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_clamps_to_grid() {
        let mut cam = camera();
        cam.zoom_at(10.0, 256.0, 256.0);
        cam.pan(-1e6, -1e6);
        assert!((cam.pan_x - 0.0).abs() < 1e-6);
        assert!((cam.pan_y - 0.0).abs() < 1e-6);

        cam.pan(1e6, 1e6);
        let visible = 512.0 / cam.zoom;
        assert!((cam.pan_x - (256.0 - visible)).abs() < 1e-3);
        assert!((cam.pan_y - (256.0 - visible)).abs() < 1e-3);
    }

    #[test]
    fn test_reset_restores_full_view() {
        let mut cam = camera();
        cam.zoom_at(12.0, 50.0, 50.0);
        cam.pan(300.0, 300.0);
        cam.reset();
        assert!((cam.zoom - 2.0).abs() < 1e-6);
        assert!((cam.pan_x - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_carries_state() {
        let cam = camera();
        let u = cam.uniform();
        assert!((u.grid_width - 256.0).abs() < f32::EPSILON);
        assert!((u.zoom - cam.zoom).abs() < f32::EPSILON);
    }
}
