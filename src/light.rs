use crate::math::Vec3;

/// Point light circling above and behind the spheres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightOrbit {
    pub radius: f32,
    pub height: f32,
    pub center_z: f32,
}

impl Default for LightOrbit {
    fn default() -> Self {
        Self {
            radius: 5.0,
            height: 5.0,
            center_z: -10.0,
        }
    }
}

impl LightOrbit {
    /// Light position after `elapsed` seconds; one radian per second.
    pub fn position(&self, elapsed: f32) -> Vec3 {
        Vec3::new(
            self.radius * elapsed.cos(),
            self.height,
            self.radius * elapsed.sin() + self.center_z,
        )
    }
}
