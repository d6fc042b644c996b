//! Vector math shared by the tracer.
//!
//! Points, directions and linear RGB colors are all [`Vec3`]; colors are
//! unclamped until they are converted to 8-bit channels by [`to_rgb8`].

pub use glam::Vec3;

/// Linear RGB color, one channel per component.
pub type Color = Vec3;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("cannot normalize a zero-length or non-finite vector: {0}")]
    ZeroLength(Vec3),
}

/// Scale `v` to unit length, refusing vectors whose magnitude is too small
/// (or not finite) to produce a meaningful direction.
pub fn try_unit(v: Vec3) -> Result<Vec3, MathError> {
    let length = v.length();
    if !length.is_finite() || length < f32::EPSILON {
        return Err(MathError::ZeroLength(v));
    }
    Ok(v / length)
}

/// Mirror `direction` around `normal`. `normal` must be unit length.
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - normal * 2.0 * direction.dot(normal)
}

pub fn to_rgb8(color: Color) -> [u8; 3] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}
