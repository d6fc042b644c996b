use crate::math::Vec3;

/// Half-line used for primary, shadow and reflection rays.
///
/// `direction` is expected to be unit length wherever shading math is done
/// with it; constructing a ray does not normalize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_walks_along_direction() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_Z);
        assert_eq!(ray.at(0.0), ray.origin);
        assert!((ray.at(5.0) - Vec3::new(1.0, 0.0, -5.0)).length() < 1e-6);
    }
}
