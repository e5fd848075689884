//! Scene ownership and the recursive path integrator.

use std::str::FromStr;
use std::sync::Arc;

use crate::{
    BvhNode, Color, HitRecord, Hittable, HittableList, Ray, SceneError,
};
use lumen_math::Interval;
use rand::RngCore;

/// Epsilon lower bound for hit queries, avoids shadow acne from a ray
/// re-intersecting the surface it just left.
const T_MIN: f32 = 1e-3;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Flat ambient color.
    Solid(Color),
    /// White-to-blue gradient blended by ray direction.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                (1.0 - a) * Color::new(1.0, 1.0, 1.0) + a * Color::new(0.5, 0.7, 1.0)
            }
        }
    }
}

/// Acceleration structure selection.
///
/// Parsed from configuration; an unknown name is rejected before any
/// render starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Bvh,
}

impl FromStr for Accelerator {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bvh" => Ok(Accelerator::Bvh),
            other => Err(SceneError::UnknownAccelerator(other.to_string())),
        }
    }
}

/// A renderable scene: the object collection, its accelerator, and the
/// background.
///
/// The accelerator shares ownership of the collection's entries and is
/// rebuilt from scratch on every mutation; there are no incremental
/// updates. Object sets are static for the duration of a render.
pub struct Scene {
    objects: HittableList,
    accelerator: Accelerator,
    accel: BvhNode,
    background: Background,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(accelerator: Accelerator, background: Background) -> Self {
        Self {
            objects: HittableList::new(),
            accelerator,
            accel: BvhNode::new(Vec::new()),
            background,
        }
    }

    /// Create a scene from a configured accelerator name.
    ///
    /// Fails fast on an unknown name, before any geometry is loaded.
    pub fn with_accelerator_name(name: &str, background: Background) -> Result<Self, SceneError> {
        Ok(Self::new(name.parse()?, background))
    }

    /// Append one object and rebuild the accelerator.
    pub fn push(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
        self.rebuild_accelerator();
    }

    /// Append a batch of objects with a single rebuild.
    pub fn push_all(&mut self, objects: Vec<Arc<dyn Hittable>>) {
        for object in objects {
            self.objects.push(object);
        }
        self.rebuild_accelerator();
    }

    /// Replace the whole collection with a single object and rebuild.
    pub fn load(&mut self, object: Arc<dyn Hittable>) {
        self.objects.load(vec![object]);
        self.rebuild_accelerator();
    }

    /// Replace the whole collection and rebuild the accelerator.
    pub fn load_all(&mut self, objects: Vec<Arc<dyn Hittable>>) {
        self.objects.load(objects);
        self.rebuild_accelerator();
    }

    pub fn objects(&self) -> &HittableList {
        &self.objects
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// The accelerator over the current collection.
    pub fn accelerator(&self) -> &BvhNode {
        &self.accel
    }

    fn rebuild_accelerator(&mut self) {
        match self.accelerator {
            Accelerator::Bvh => {
                self.accel = BvhNode::new(self.objects.objects().to_vec());
            }
        }
    }

    /// Compute the color transported back along a ray.
    ///
    /// Recursion is bounded by `bounces_left`; each scatter decrements the
    /// budget, so termination is guaranteed for any geometry. Colors are
    /// accumulated HDR, clamping is the image writer's concern.
    pub fn ray_color(&self, ray: &Ray, bounces_left: u32, rng: &mut dyn RngCore) -> Color {
        if bounces_left == 0 {
            return Color::ZERO;
        }

        let mut rec = HitRecord::default();
        if !self
            .accel
            .hit(ray, Interval::new(T_MIN, f32::INFINITY), &mut rec)
        {
            return self.background.color(ray);
        }

        let emitted = rec.material.emitted(rec.u, rec.v, rec.p);
        match rec.material.scatter(ray, &rec, rng) {
            Some(result) => {
                let scattered_color = self.ray_color(&result.scattered, bounces_left - 1, rng);
                emitted + result.attenuation * scattered_color
            }
            None => emitted,
        }
    }
}
