use crate::math::{Color, Vec3};
use crate::ray::Ray;

/// Share of a surface's final color taken from its mirror reflection.
pub const DEFAULT_REFLECTIVITY: f32 = 0.5;

/// Ordered, read-only list of spheres. Order only matters for exact ties in
/// hit distance, where the earlier sphere wins.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Red, green and blue spheres in a row above a huge reflective floor sphere.
    pub fn three_spheres_on_floor() -> Self {
        Self::new(vec![
            Sphere::new(Vec3::new(-2.0, 0.0, -10.0), 1.0, Color::new(1.0, 0.0, 0.0)),
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Color::new(0.0, 1.0, 0.0)),
            Sphere::new(Vec3::new(2.0, 0.0, -10.0), 1.0, Color::new(0.0, 0.0, 1.0)),
            Sphere::new(
                Vec3::new(0.0, -10004.0, -10.0),
                10000.0,
                Color::new(0.8, 0.8, 0.8),
            ),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,

    pub albedo: Color,
    pub reflectivity: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, albedo: Color) -> Self {
        Self {
            center,
            radius,
            albedo,
            reflectivity: DEFAULT_REFLECTIVITY,
        }
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    /// Distance along `ray` to the sphere surface.
    ///
    /// The near root is preferred; when it lies behind the origin (the origin
    /// is inside the sphere) the far root is used instead. A root of exactly
    /// zero counts as a hit.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        // (d.d)t^2 + 2(oc.d)t + (oc.oc - r^2) = 0
        // where
        // oc = ray origin - sphere center
        // d = ray direction
        // t = hit distance
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t0 = (-b - sqrt_d) / (2.0 * a);
        let t1 = (-b + sqrt_d) / (2.0 * a);

        let near = t0.min(t1);
        let t = if near < 0.0 { t0.max(t1) } else { near };
        (t >= 0.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, Color::ONE)
    }

    #[test]
    fn outside_origin_hits_near_root() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = unit_sphere().intersect(&ray).unwrap();
        assert!((t - 4.0).abs() < EPS);
    }

    #[test]
    fn inside_origin_hits_far_root() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.5), Vec3::NEG_Z);
        let t = unit_sphere().intersect(&ray).unwrap();
        assert!((t - 1.5).abs() < EPS);
    }

    #[test]
    fn origin_on_surface_facing_out_is_zero_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        assert_eq!(unit_sphere().intersect(&ray), Some(0.0));
    }

    #[test]
    fn misses_when_discriminant_negative() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::NEG_Z);
        assert_eq!(unit_sphere().intersect(&ray), None);
    }

    #[test]
    fn sphere_behind_origin_is_missed() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(unit_sphere().intersect(&ray), None);
    }

    #[test]
    fn unnormalized_direction_scales_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -2.0));
        let t = unit_sphere().intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < EPS);
    }

    #[test]
    fn default_scene_layout() {
        let scene = Scene::three_spheres_on_floor();
        assert_eq!(scene.spheres.len(), 4);
        assert!(scene
            .spheres
            .iter()
            .all(|s| s.reflectivity == DEFAULT_REFLECTIVITY && s.radius > 0.0));
    }
}
