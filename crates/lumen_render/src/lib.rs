//! Lumen - CPU path tracing core.
//!
//! A Monte Carlo path tracer: a scene of hittable objects is queried through
//! a bounding volume hierarchy, light transport is evaluated by bounded
//! recursion over material scatter/emission, and pixels are rendered by a
//! fixed pool of worker threads.

mod bvh;
mod camera;
mod error;
mod hittable;
mod image_buffer;
mod material;
mod progress;
mod renderer;
mod scene;
mod sphere;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, SceneError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use image_buffer::ImageBuffer;
pub use material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use progress::{NullProgress, Progress};
pub use renderer::{partition_pixels, render, render_to_file, RenderSettings};
pub use scene::{Accelerator, Background, Scene};
pub use sphere::Sphere;

/// Re-export common math types.
pub use lumen_math::{Aabb, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Draw a uniform f32 in [0, 1) from a dyn rng.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}
