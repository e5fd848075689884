//! Hittable trait, hit records, and the flat object list.

use std::sync::Arc;

use crate::{Material, Ray, ScatterResult};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A material that absorbs everything, used for `HitRecord::default()`.
struct Absorber;

impl Material for Absorber {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }
}

static ABSORBER: Absorber = Absorber;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV surface parametrization for texturing
    pub u: f32,
    pub v: f32,
    /// Ray parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    /// The "no hit yet" record: `t` is +infinity so any real hit compares
    /// nearer, and the material absorbs everything.
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &ABSORBER,
            u: 0.0,
            v: 0.0,
            t: f32::INFINITY,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Store the normal so it always points against the incoming ray,
    /// tracking which face was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Objects that rays can intersect.
///
/// A primitive shape, a flat list, and a BVH node all implement this,
/// which is what lets an accelerator wrap a collection transparently.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection with `t` inside `ray_t`.
    ///
    /// Returns true and fills `rec` if such an intersection exists.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// The axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A flat list of hittable objects.
///
/// Objects are shared (`Arc`) so an accelerator built over the list
/// references the same entries instead of copying geometry.
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Append an object to the list.
    pub fn push(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Replace the backing sequence wholesale.
    pub fn load(&mut self, objects: Vec<Arc<dyn Hittable>>) {
        self.bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
        self.objects = objects;
    }

    /// Remove all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// The objects in insertion order.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Sphere};

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            radius,
            Lambertian::new(Color::new(0.5, 0.5, 0.5)),
        ))
    }

    #[test]
    fn test_default_record_is_no_hit_sentinel() {
        let rec = HitRecord::default();
        assert_eq!(rec.t, f32::INFINITY);
    }

    #[test]
    fn test_empty_list_never_hits() {
        let list = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(!list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert_eq!(list.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_list_returns_nearest_hit() {
        let mut list = HittableList::new();
        list.push(sphere(Vec3::new(0.0, 0.0, -10.0), 1.0));
        list.push(sphere(Vec3::new(0.0, 0.0, -4.0), 1.0));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));

        // Nearer sphere's front face is at z = -3
        assert!((rec.t - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_list_bbox_is_union() {
        let mut list = HittableList::new();
        list.push(sphere(Vec3::new(-5.0, 0.0, 0.0), 1.0));
        list.push(sphere(Vec3::new(5.0, 0.0, 0.0), 1.0));

        let bbox = list.bounding_box();
        assert!(bbox.x.min <= -6.0);
        assert!(bbox.x.max >= 6.0);
    }

    #[test]
    fn test_load_replaces_contents() {
        let mut list = HittableList::new();
        list.push(sphere(Vec3::ZERO, 1.0));
        list.load(vec![
            sphere(Vec3::new(0.0, 0.0, -4.0), 1.0),
            sphere(Vec3::new(0.0, 0.0, -8.0), 1.0),
        ]);

        assert_eq!(list.len(), 2);
        // Old object's bounds are gone
        assert!(list.bounding_box().z.max <= -2.9);
    }
}
