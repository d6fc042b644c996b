//! Brute-force Whitted ray tracer over a small, fixed scene of spheres lit by
//! one orbiting point light.
//!
//! The core (`math`, `ray`, `scene`, `tracer`, `camera`, `light`, `frame`) is
//! pure CPU code with no window or GPU dependency. `application`, `renderer`
//! and `texture` present the traced frames in a winit window through wgpu.

pub mod application;
pub mod camera;
pub mod config;
pub mod frame;
pub mod light;
pub mod math;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod tracer;

pub use frame::{FrameDriver, FrameTarget};
pub use scene::{Scene, Sphere};
pub use tracer::{TraceSettings, Tracer};
