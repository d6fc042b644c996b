use std::time::Instant;

use image::{Rgba, RgbaImage};

use crate::camera::Camera;
use crate::light::LightOrbit;
use crate::math::{self, Vec3};
use crate::scene::Scene;
use crate::tracer::{TraceSettings, Tracer};

/// Raster the frame driver writes finished pixels into.
pub trait FrameTarget {
    fn dimensions(&self) -> (u32, u32);
    fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]);
}

impl FrameTarget for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn set_pixel(&mut self, x: u32, y: u32, [r, g, b]: [u8; 3]) {
        self.put_pixel(x, y, Rgba([r, g, b, 255]));
    }
}

/// Owns the static scene and traces one full frame per call.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    scene: Scene,
    camera: Camera,
    light: LightOrbit,
    settings: TraceSettings,
}

impl FrameDriver {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            camera: Camera::default(),
            light: LightOrbit::default(),
            settings: TraceSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TraceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn light_position(&self, elapsed: f32) -> Vec3 {
        self.light.position(elapsed)
    }

    /// Trace every pixel of `target` with the light placed for `elapsed`
    /// seconds, row by row from the top. Returns the light position used.
    pub fn render<T: FrameTarget + ?Sized>(&self, elapsed: f32, target: &mut T) -> Vec3 {
        let started = Instant::now();
        let light_position = self.light_position(elapsed);
        let tracer = Tracer::new(&self.scene, self.settings);
        let (width, height) = target.dimensions();

        for y in 0..height {
            for x in 0..width {
                let ray = self.camera.ray_for_pixel(x, y, width, height);
                let color = tracer.trace(&ray, light_position, 0);
                target.set_pixel(x, y, math::to_rgb8(color));
            }
        }

        tracing::debug!(
            elapsed,
            light = %light_position,
            trace_ms = started.elapsed().as_secs_f32() * 1000.0,
            "frame traced"
        );
        light_position
    }
}
