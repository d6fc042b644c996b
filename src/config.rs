/// Raster and window size in pixels.
pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

pub const WINDOW_TITLE: &str = "Simple Ray Tracer";

/// Dark gray cleared behind the traced quad.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 25.0 / 255.0,
    g: 25.0 / 255.0,
    b: 25.0 / 255.0,
    a: 1.0,
};
