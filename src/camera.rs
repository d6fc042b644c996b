use crate::math::Vec3;
use crate::ray::Ray;

/// Pinhole camera at `eye` looking down -Z with an image plane at distance 1.
///
/// The vertical field of view spans [-1, 1] on that plane; the horizontal
/// extent is stretched by the raster's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self { eye: Vec3::ZERO }
    }
}

impl Camera {
    /// Screen-space coordinates of the center of pixel (`x`, `y`); `v` grows upward.
    pub fn screen_coords(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
        let (width, height) = (width as f32, height as f32);
        let aspect_ratio = width / height;
        let u = (2.0 * (x as f32 + 0.5) / width - 1.0) * aspect_ratio;
        let v = 1.0 - 2.0 * (y as f32 + 0.5) / height;
        (u, v)
    }

    pub fn ray_for_pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let (u, v) = Self::screen_coords(x, y, width, height);
        // never zero: the z component is fixed at -1
        Ray::new(self.eye, Vec3::new(u, v, -1.0).normalize())
    }
}
