//! Recursive Whitted-style shading: Lambertian direct light, hard shadows
//! from a single point light, and a mirror bounce blended by reflectivity.

use crate::math::{self, Color, Vec3};
use crate::ray::Ray;
use crate::scene::{Scene, Sphere};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSettings {
    /// Deepest recursion level that still shades; deeper calls return `background`.
    pub max_depth: u32,
    /// Returned for rays that hit nothing or exceed `max_depth`.
    pub background: Color,
    /// Multiplier applied to the direct term of a shadowed point.
    pub shadow_attenuation: f32,
    /// Offset along the normal for secondary ray origins.
    pub surface_bias: f32,
    /// Hits at or beyond this distance are ignored.
    pub no_hit_distance: f32,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            max_depth: 2,
            background: Color::splat(0.1),
            shadow_attenuation: 0.2,
            surface_bias: 0.001,
            no_hit_distance: 1e9,
        }
    }
}

/// Closest surface along a ray.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'scene> {
    pub index: usize,
    pub sphere: &'scene Sphere,
    pub t: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Tracer<'scene> {
    scene: &'scene Scene,
    settings: TraceSettings,
}

impl<'scene> Tracer<'scene> {
    pub fn new(scene: &'scene Scene, settings: TraceSettings) -> Self {
        Self { scene, settings }
    }

    /// Linear scan for the smallest non-negative hit distance. Ties keep the
    /// earlier sphere.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'scene>> {
        let mut nearest = self.settings.no_hit_distance;
        let mut found = None;

        for (index, sphere) in self.scene.spheres.iter().enumerate() {
            if let Some(t) = sphere.intersect(ray) {
                if t < nearest {
                    nearest = t;
                    found = Some(Hit { index, sphere, t });
                }
            }
        }

        found
    }

    /// Whether any sphere other than `hit_index` blocks `shadow_ray`.
    ///
    /// Occluders anywhere along the ray count, including ones past the light.
    pub fn in_shadow(&self, shadow_ray: &Ray, hit_index: usize) -> bool {
        self.scene
            .spheres
            .iter()
            .enumerate()
            .any(|(index, sphere)| index != hit_index && sphere.intersect(shadow_ray).is_some())
    }

    /// Color seen along `ray`, lit by a point light at `light_position`.
    ///
    /// `ray.direction` must be unit length. Primary rays start at depth 0.
    pub fn trace(&self, ray: &Ray, light_position: Vec3, depth: u32) -> Color {
        if depth > self.settings.max_depth {
            return self.settings.background;
        }

        let Some(hit) = self.nearest_hit(ray) else {
            return self.settings.background;
        };
        let sphere = hit.sphere;

        let hit_point = ray.at(hit.t);
        // hit_point lies on a sphere of positive radius, so this never degenerates
        let normal = (hit_point - sphere.center).normalize();
        let biased_origin = hit_point + normal * self.settings.surface_bias;

        let base_color = match math::try_unit(light_position - hit_point) {
            Ok(light_dir) => {
                let diffuse = normal.dot(light_dir).max(0.0);
                let lit = sphere.albedo * diffuse;
                if self.in_shadow(&Ray::new(biased_origin, light_dir), hit.index) {
                    lit * self.settings.shadow_attenuation
                } else {
                    lit
                }
            }
            // light sits on the surface point: no direction to light from
            Err(_) => Color::ZERO,
        };

        let reflect_dir = math::reflect(ray.direction, normal).normalize();
        let reflected_color = self.trace(
            &Ray::new(biased_origin, reflect_dir),
            light_position,
            depth + 1,
        );

        let reflectivity = sphere.reflectivity;
        base_color * (1.0 - reflectivity) + reflected_color * reflectivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_color_eq(actual: Color, expected: Color) {
        assert!(
            (actual - expected).abs().max_element() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn red_sphere_scene() -> Scene {
        Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            Color::new(1.0, 0.0, 0.0),
        )])
    }

    #[test]
    fn miss_returns_background() {
        let scene = red_sphere_scene();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(tracer.trace(&ray, Vec3::new(0.0, 5.0, 0.0), 0), Color::splat(0.1));
    }

    #[test]
    fn empty_scene_returns_background() {
        let scene = Scene::default();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(tracer.trace(&ray, Vec3::ZERO, 0), Color::splat(0.1));
    }

    #[test]
    fn depth_past_limit_returns_background_immediately() {
        let scene = red_sphere_scene();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(tracer.trace(&ray, Vec3::ZERO, 3), Color::splat(0.1));
        assert_eq!(tracer.trace(&ray, Vec3::ZERO, 100), Color::splat(0.1));
    }

    #[test]
    fn nearest_hit_picks_closest_sphere() {
        let scene = Scene::new(vec![
            Sphere::new(Vec3::new(0.0, 0.0, -20.0), 1.0, Color::ONE),
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, Color::ONE),
        ]);
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let hit = tracer
            .nearest_hit(&Ray::new(Vec3::ZERO, Vec3::NEG_Z))
            .unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.t - 9.0).abs() < 1e-4);
    }

    #[test]
    fn head_on_light_mixes_base_and_background() {
        // light at the eye: full diffuse, reflected ray flies back out and misses
        let scene = red_sphere_scene();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = tracer.trace(&ray, Vec3::ZERO, 0);
        assert_color_eq(color, Color::new(0.55, 0.05, 0.05));
    }

    #[test]
    fn reflection_blend_at_last_level() {
        // at max depth the reflected ray is cut off and yields the background
        let scene = red_sphere_scene();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = tracer.trace(&ray, Vec3::ZERO, 2);
        let base = Color::new(1.0, 0.0, 0.0);
        assert_color_eq(color, base * 0.5 + Color::splat(0.1) * 0.5);
    }

    #[test]
    fn per_sphere_reflectivity_is_respected() {
        let scene = Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            Color::new(1.0, 0.0, 0.0),
        )
        .with_reflectivity(0.0)]);
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let color = tracer.trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), Vec3::ZERO, 0);
        assert_color_eq(color, Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn back_facing_light_gives_no_diffuse() {
        let scene = red_sphere_scene();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        // light behind the sphere, seen from the camera side
        let color = tracer.trace(
            &Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            Vec3::new(0.0, 0.0, -20.0),
            0,
        );
        assert_color_eq(color, Color::splat(0.05));
    }

    #[test]
    fn occluded_point_is_attenuated() {
        let occluder = Sphere::new(Vec3::new(0.0, 4.0, 0.0), 1.0, Color::ONE);
        let lit_scene = Scene::new(vec![Sphere::new(Vec3::ZERO, 1.0, Color::ONE)]);
        let mut shadow_scene = lit_scene.clone();
        shadow_scene.spheres.push(occluder);

        let light = Vec3::new(0.0, 10.0, 0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.5, 5.0), Vec3::NEG_Z);

        let lit = Tracer::new(&lit_scene, TraceSettings::default()).trace(&ray, light, 0);
        let shadowed = Tracer::new(&shadow_scene, TraceSettings::default()).trace(&ray, light, 0);

        // both reflections escape to the background, so only the direct term differs
        let background_share = Color::splat(0.1) * 0.5;
        let lit_direct = lit - background_share;
        assert!(lit_direct.x > 0.1);
        assert_color_eq(shadowed - background_share, lit_direct * 0.2);
    }

    #[test]
    fn shadow_test_ignores_the_hit_sphere() {
        let scene = Scene::new(vec![
            Sphere::new(Vec3::ZERO, 1.0, Color::ONE),
            Sphere::new(Vec3::new(0.0, 4.0, 0.0), 1.0, Color::ONE),
        ]);
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let up = Ray::new(Vec3::new(0.0, 1.001, 0.0), Vec3::Y);
        assert!(tracer.in_shadow(&up, 0));
        assert!(!tracer.in_shadow(&up, 1));
        let sideways = Ray::new(Vec3::new(0.0, 1.001, 0.0), Vec3::X);
        assert!(!tracer.in_shadow(&sideways, 0));
    }

    #[test]
    fn light_on_surface_does_not_produce_nan() {
        let scene = red_sphere_scene();
        let tracer = Tracer::new(&scene, TraceSettings::default());
        let color = tracer.trace(
            &Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            Vec3::new(0.0, 0.0, -9.0),
            0,
        );
        assert!(color.is_finite());
        assert_color_eq(color, Color::splat(0.05));
    }
}
