//! Bounding Volume Hierarchy acceleration structure.
//!
//! A binary tree built once over a hittable collection, turning the
//! per-ray nearest-hit query from a linear scan into an expected
//! O(log n) pruned search.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Ray};
use lumen_math::{Aabb, Interval};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// BVH node - either a branch with two children or a leaf with primitives.
///
/// Nodes hold `Arc`s into the scene's object collection, never copies of
/// geometry. A built tree is immutable; scene mutation rebuilds from scratch.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    /// The tree over an empty collection.
    Empty,
}

impl BvhNode {
    /// Build a BVH over a collection of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        let node = Self::build(objects);
        log::debug!("built BVH over {} primitives", node.primitive_count());
        node
    }

    /// Recursive median-split construction.
    ///
    /// Sort by bounding-box centroid along the axis where centroids spread
    /// the most, split at the median, recurse on each half.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_objects = objects.split_off(n / 2);
        let left_objects = objects;

        BvhNode::Branch {
            left: Box::new(Self::build(left_objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }

    /// Number of primitives reachable through this subtree.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { objects, .. } => objects.len(),
            BvhNode::Branch { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    let interval = Interval::new(ray_t.min, closest);
                    if obj.hit(ray, interval, rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // A left hit shrinks the search window for the right child
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gen_f32, Color, HittableList, Lambertian, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            radius,
            Lambertian::new(Color::new(0.5, 0.5, 0.5)),
        ))
    }

    fn random_spheres(n: usize, seed: u64) -> Vec<Arc<dyn Hittable>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let center = Vec3::new(
                    gen_f32(&mut rng) * 20.0 - 10.0,
                    gen_f32(&mut rng) * 20.0 - 10.0,
                    gen_f32(&mut rng) * 20.0 - 10.0,
                );
                sphere(center, 0.2 + gen_f32(&mut rng))
            })
            .collect()
    }

    // Every node's bbox contains the union of its descendants' boxes.
    fn check_bbox_soundness(node: &BvhNode) {
        if let BvhNode::Branch { left, right, bbox } = node {
            let joined = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
            for axis in 0..3 {
                assert!(bbox.axis_interval(axis).min <= joined.axis_interval(axis).min + 1e-4);
                assert!(bbox.axis_interval(axis).max >= joined.axis_interval(axis).max - 1e-4);
            }
            check_bbox_soundness(left);
            check_bbox_soundness(right);
        }
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)]);
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_unit_sphere_scenario() {
        // Unit sphere at origin, ray from (0,0,-5) toward +Z:
        // hit at distance 4 with outward normal (0,0,-1).
        let bvh = BvhNode::new(vec![sphere(Vec3::ZERO, 1.0)]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let mut rec = HitRecord::default();

        assert!(bvh.hit(&ray, Interval::new(0.001, f32::MAX), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
    }

    fn collect_leaf_objects<'a>(node: &'a BvhNode, out: &mut Vec<&'a Arc<dyn Hittable>>) {
        match node {
            BvhNode::Branch { left, right, .. } => {
                collect_leaf_objects(left, out);
                collect_leaf_objects(right, out);
            }
            BvhNode::Leaf { objects, .. } => out.extend(objects.iter()),
            BvhNode::Empty => {}
        }
    }

    #[test]
    fn test_bvh_partition_completeness() {
        // Every input object lands in exactly one leaf.
        for n in [1, 2, 3, 7, 64, 101] {
            let objects = random_spheres(n, 11);
            let bvh = BvhNode::new(objects.clone());
            assert_eq!(bvh.primitive_count(), n);

            let mut leaves = Vec::new();
            collect_leaf_objects(&bvh, &mut leaves);
            assert_eq!(leaves.len(), n);
            for obj in &objects {
                let copies = leaves.iter().filter(|l| Arc::ptr_eq(l, obj)).count();
                assert_eq!(copies, 1);
            }
        }
    }

    #[test]
    fn test_bvh_bbox_soundness() {
        let bvh = BvhNode::new(random_spheres(64, 5));
        check_bbox_soundness(&bvh);
    }

    #[test]
    fn test_bvh_matches_brute_force() {
        let objects = random_spheres(50, 3);

        let mut list = HittableList::new();
        for obj in &objects {
            list.push(Arc::clone(obj));
        }
        let bvh = BvhNode::new(objects);

        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let origin = Vec3::new(
                gen_f32(&mut rng) * 30.0 - 15.0,
                gen_f32(&mut rng) * 30.0 - 15.0,
                gen_f32(&mut rng) * 30.0 - 15.0,
            );
            let direction = Vec3::new(
                gen_f32(&mut rng) * 2.0 - 1.0,
                gen_f32(&mut rng) * 2.0 - 1.0,
                gen_f32(&mut rng) * 2.0 - 1.0,
            );
            if direction.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new(origin, direction);
            let window = Interval::new(0.001, f32::INFINITY);

            let mut bvh_rec = HitRecord::default();
            let mut list_rec = HitRecord::default();
            let bvh_hit = bvh.hit(&ray, window, &mut bvh_rec);
            let list_hit = list.hit(&ray, window, &mut list_rec);

            assert_eq!(bvh_hit, list_hit);
            if bvh_hit {
                assert!((bvh_rec.t - list_rec.t).abs() < 1e-3);
                assert!((bvh_rec.p - list_rec.p).length() < 1e-2);
            }
        }
    }

    #[test]
    fn test_bvh_miss_outside_root_bbox() {
        let bvh = BvhNode::new(random_spheres(16, 9));
        let bbox = bvh.bounding_box();

        // A ray starting beyond the box and pointing away can never hit
        let origin = Vec3::new(bbox.x.max + 10.0, 0.0, 0.0);
        let ray = Ray::new(origin, Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
    }
}
