use raybvh::accelerators::bvh::{BVHAccel, BuildMethod};
use raybvh::core::geometry::{Point3f, Ray, Vector3f};
use raybvh::core::interaction::SurfaceInteraction;
use raybvh::core::primitive::{Primitive, PrimitiveDt, TransformedPrimitive};
use raybvh::core::rng::RNG;
use raybvh::core::transform::Transformf;
use raybvh::shapes::{Cube, Sphere};
use raybvh::Float;
use std::sync::Arc;

const INF: Float = Float::INFINITY;
const T_MIN: Float = 1e-3;

fn unit_cube_at(x: Float, y: Float, z: Float) -> PrimitiveDt {
    Arc::new(Cube::new(
        Point3f::new(x, y, z),
        Point3f::new(x + 1.0, y + 1.0, z + 1.0),
    ))
}

fn random_spheres(rng: &mut RNG, n: usize) -> Vec<PrimitiveDt> {
    (0..n)
        .map(|_| {
            let center = Point3f::new(
                rng.uniform_range(-50.0, 50.0),
                rng.uniform_range(-50.0, 50.0),
                rng.uniform_range(-50.0, 50.0),
            );
            let radius = rng.uniform_range(0.2, 3.0);
            Arc::new(Sphere::new(center, radius)) as PrimitiveDt
        })
        .collect()
}

fn random_ray(rng: &mut RNG) -> Ray {
    let o = Point3f::new(
        rng.uniform_range(-80.0, 80.0),
        rng.uniform_range(-80.0, 80.0),
        rng.uniform_range(-80.0, 80.0),
    );
    loop {
        let d = Vector3f::new(
            rng.uniform_range(-1.0, 1.0),
            rng.uniform_range(-1.0, 1.0),
            rng.uniform_range(-1.0, 1.0),
        );
        if d.length() > 0.1 {
            return Ray::new(o, d.normalize());
        }
    }
}

fn brute_force(
    primitives: &[PrimitiveDt],
    ray: &Ray,
    t_min: Float,
    mut t_max: Float,
) -> Option<(usize, SurfaceInteraction)> {
    let mut closest = None;
    for (i, primitive) in primitives.iter().enumerate() {
        if let Some(si) = primitive.intersect(ray, t_min, t_max) {
            t_max = si.t;
            closest = Some((i, si));
        }
    }
    closest
}

fn count_nodes(accel: &BVHAccel, index: usize, leaves: &mut usize, interiors: &mut usize) {
    let node = accel.nodes()[index];
    if node.is_leaf() {
        *leaves += 1;
    } else {
        *interiors += 1;
        count_nodes(accel, node.left_child(), leaves, interiors);
        count_nodes(accel, node.right_child(), leaves, interiors);
    }
}

fn check_permutation(accel: &BVHAccel, n: usize) {
    let mut order: Vec<usize> = accel.primitive_order().to_vec();
    order.sort_unstable();
    let expected: Vec<usize> = (0..n).collect();
    assert_eq!(order, expected, "primitive order is not a permutation");
}

fn check_containment(accel: &BVHAccel, index: usize) {
    let node = accel.nodes()[index];
    if node.is_leaf() {
        for i in node.first()..node.first() + node.count() {
            let p = accel.primitive_order()[i];
            assert!(
                node.bounds().contains(&accel.primitives()[p].world_bound()),
                "leaf {} does not contain primitive {}",
                index,
                p
            );
        }
    } else {
        let left = accel.nodes()[node.left_child()];
        let right = accel.nodes()[node.right_child()];
        assert!(node.bounds().contains(&left.bounds()));
        assert!(node.bounds().contains(&right.bounds()));
        check_containment(accel, node.left_child());
        check_containment(accel, node.right_child());
    }
}

#[test]
fn single_primitive_build_is_one_leaf() {
    for &method in &[BuildMethod::BinnedSah, BuildMethod::Agglomerative] {
        let accel = BVHAccel::new(vec![unit_cube_at(0.0, 0.0, 0.0)], method);
        let root = accel.nodes()[0];
        assert!(root.is_leaf());
        assert_eq!(root.count(), 1);
        assert_eq!(root.bounds().min, Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(root.bounds().max, Point3f::new(1.0, 1.0, 1.0));
    }
}

#[test]
fn two_primitives_stay_one_leaf_under_sah() {
    let prims = vec![unit_cube_at(0.0, 0.0, 0.0), unit_cube_at(10.0, 0.0, 0.0)];
    let accel = BVHAccel::new(prims, BuildMethod::BinnedSah);
    let root = accel.nodes()[0];
    assert!(root.is_leaf());
    assert_eq!(root.count(), 2);
}

#[test]
fn clustering_four_disjoint_boxes() {
    let prims = vec![
        unit_cube_at(0.0, 0.0, 0.0),
        unit_cube_at(10.0, 0.0, 0.0),
        unit_cube_at(0.0, 10.0, 0.0),
        unit_cube_at(10.0, 10.0, 0.0),
    ];
    let accel = BVHAccel::new(prims, BuildMethod::Agglomerative);

    let (mut leaves, mut interiors) = (0, 0);
    count_nodes(&accel, 0, &mut leaves, &mut interiors);
    assert_eq!(leaves, 4);
    assert_eq!(interiors, 3);
    check_containment(&accel, 0);

    // A ray dropped straight onto each box reports that box alone.
    let offsets = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
    for (i, &(x, y)) in offsets.iter().enumerate() {
        let ray = Ray::new(
            Point3f::new(x + 0.5, y + 0.5, 5.0),
            Vector3f::new(0.0, 0.0, -1.0),
        );
        let si = accel.intersect(&ray, T_MIN, INF).unwrap();
        assert_eq!(si.primitive, Some(i));
        assert!((si.t - 4.0).abs() < 1e-4);
    }
}

#[test]
fn clustering_two_candidates_merges_once() {
    let prims = vec![unit_cube_at(0.0, 0.0, 0.0), unit_cube_at(5.0, 0.0, 0.0)];
    let accel = BVHAccel::new(prims, BuildMethod::Agglomerative);
    let (mut leaves, mut interiors) = (0, 0);
    count_nodes(&accel, 0, &mut leaves, &mut interiors);
    assert_eq!(leaves, 2);
    assert_eq!(interiors, 1);
}

#[test]
fn sah_four_boxes_splits_into_two_leaves() {
    let prims = vec![
        unit_cube_at(0.0, 0.0, 0.0),
        unit_cube_at(1.5, 0.0, 0.0),
        unit_cube_at(20.0, 0.0, 0.0),
        unit_cube_at(21.5, 0.0, 0.0),
    ];
    let accel = BVHAccel::new(prims, BuildMethod::BinnedSah);
    let (mut leaves, mut interiors) = (0, 0);
    count_nodes(&accel, 0, &mut leaves, &mut interiors);
    assert_eq!(leaves, 2);
    assert_eq!(interiors, 1);
    check_containment(&accel, 0);
    check_permutation(&accel, 4);

    // The split must separate the two clusters.
    let left = accel.nodes()[accel.nodes()[0].left_child()];
    let right = accel.nodes()[accel.nodes()[0].right_child()];
    assert_eq!(left.count(), 2);
    assert_eq!(right.count(), 2);
}

#[test]
fn away_pointing_ray_misses() {
    let prims = vec![
        unit_cube_at(0.0, 0.0, 0.0),
        unit_cube_at(10.0, 0.0, 0.0),
        unit_cube_at(0.0, 10.0, 0.0),
        unit_cube_at(10.0, 10.0, 0.0),
    ];
    for &method in &[BuildMethod::BinnedSah, BuildMethod::Agglomerative] {
        let accel = BVHAccel::new(prims.clone(), method);
        let ray = Ray::new(Point3f::new(5.0, 5.0, 50.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(accel.intersect(&ray, T_MIN, INF).is_none());
    }
}

#[test]
fn reported_distance_never_exceeds_t_max() {
    let prims = vec![unit_cube_at(0.0, 0.0, 0.0)];
    let accel = BVHAccel::new(prims, BuildMethod::BinnedSah);
    let ray = Ray::new(Point3f::new(0.5, 0.5, 5.0), Vector3f::new(0.0, 0.0, -1.0));
    // Box entry sits at t = 4; a tighter bound must suppress the hit.
    assert!(accel.intersect(&ray, T_MIN, 2.0).is_none());
    let si = accel.intersect(&ray, T_MIN, 10.0).unwrap();
    assert!(si.t <= 10.0);
    assert!((si.t - 4.0).abs() < 1e-4);
}

#[test]
fn empty_build_always_misses() {
    for &method in &[BuildMethod::BinnedSah, BuildMethod::Agglomerative] {
        let accel = BVHAccel::new(Vec::new(), method);
        let ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(accel.intersect(&ray, T_MIN, INF).is_none());
    }
}

#[test]
fn build_invariants_hold_for_random_scenes() {
    let mut rng = RNG::new(7);
    for &method in &[BuildMethod::BinnedSah, BuildMethod::Agglomerative] {
        let prims = random_spheres(&mut rng, 100);
        let accel = BVHAccel::new(prims, method);
        check_permutation(&accel, 100);
        check_containment(&accel, 0);
    }
}

#[test]
fn traversal_matches_brute_force() {
    let mut rng = RNG::new(42);
    let prims = random_spheres(&mut rng, 150);
    for &method in &[BuildMethod::BinnedSah, BuildMethod::Agglomerative] {
        let accel = BVHAccel::new(prims.clone(), method);
        let mut hits = 0;
        for _ in 0..400 {
            let ray = random_ray(&mut rng);
            let expected = brute_force(&prims, &ray, T_MIN, INF);
            let got = accel.intersect(&ray, T_MIN, INF);
            match (expected, got) {
                (None, None) => {}
                (Some((index, reference)), Some(si)) => {
                    hits += 1;
                    assert!(
                        (si.t - reference.t).abs() < 1e-3 * (1.0 + reference.t),
                        "{:?}: got t = {}, expected t = {}",
                        method,
                        si.t,
                        reference.t
                    );
                    if si.primitive != Some(index) {
                        // Only acceptable for a near-tie between primitives.
                        assert!((si.t - reference.t).abs() < 1e-3);
                    }
                }
                (expected, got) => panic!(
                    "{:?}: brute force {:?} but traversal {:?}",
                    method,
                    expected.map(|(i, si)| (i, si.t)),
                    got.map(|si| si.t)
                ),
            }
        }
        assert!(hits > 20, "suspiciously few hits: {}", hits);
    }
}

#[test]
fn coincident_centroids_terminate_via_median_fallback() {
    let prims: Vec<PrimitiveDt> = (0..16)
        .map(|_| Arc::new(Sphere::new(Point3f::new(1.0, 2.0, 3.0), 0.5)) as PrimitiveDt)
        .collect();
    let accel = BVHAccel::new(prims.clone(), BuildMethod::BinnedSah);
    check_permutation(&accel, 16);
    check_containment(&accel, 0);

    let ray = Ray::new(Point3f::new(1.0, 2.0, 10.0), Vector3f::new(0.0, 0.0, -1.0));
    let si = accel.intersect(&ray, T_MIN, INF).unwrap();
    let (_, reference) = brute_force(&prims, &ray, T_MIN, INF).unwrap();
    assert!((si.t - reference.t).abs() < 1e-4);
}

#[test]
fn shrinking_t_max_keeps_closest_hit_within_leaf() {
    // Three overlapping spheres along one axis inside a single leaf.
    let prims: Vec<PrimitiveDt> = vec![
        Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 0.0), 1.0)),
        Arc::new(Sphere::new(Point3f::new(0.5, 0.0, 0.0), 1.0)),
        Arc::new(Sphere::new(Point3f::new(-0.5, 0.0, 0.0), 1.0)),
    ];
    let accel = BVHAccel::new(prims.clone(), BuildMethod::BinnedSah);
    let ray = Ray::new(Point3f::new(10.0, 0.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
    let si = accel.intersect(&ray, T_MIN, INF).unwrap();
    // Nearest surface belongs to the sphere centered at x = 0.5.
    assert_eq!(si.primitive, Some(1));
    assert!((si.t - 8.5).abs() < 1e-4);
}

#[test]
fn instanced_hierarchy_reports_world_distance() {
    let unit_sphere: PrimitiveDt = Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 0.0), 1.0));

    let scaled: PrimitiveDt = Arc::new(TransformedPrimitive::new(
        unit_sphere.clone(),
        Transformf::scale(2.0, 2.0, 2.0),
    ));
    let shifted: PrimitiveDt = Arc::new(TransformedPrimitive::new(
        unit_sphere,
        Transformf::translate(&Vector3f::new(0.0, 20.0, 0.0)),
    ));
    let accel = BVHAccel::new(vec![scaled, shifted], BuildMethod::Agglomerative);

    // The scaled instance has world radius 2, so the hit lands at x = 2 and
    // the distance is measured in world units, not local parametric t.
    let ray = Ray::new(Point3f::new(10.0, 0.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0));
    let si = accel.intersect(&ray, T_MIN, INF).unwrap();
    assert!((si.t - 8.0).abs() < 1e-3);
    assert!((si.p.x - 2.0).abs() < 1e-3);
    assert!((si.n.x - 1.0).abs() < 1e-3);

    let ray = Ray::new(Point3f::new(0.0, 20.0, 10.0), Vector3f::new(0.0, 0.0, -1.0));
    let si = accel.intersect(&ray, T_MIN, INF).unwrap();
    assert!((si.t - 9.0).abs() < 1e-3);
    assert!((si.p.z - 1.0).abs() < 1e-3);
}

#[test]
fn nested_hierarchies_compose() {
    // Per-object SAH structures composed by a top-level clustering build.
    let mut rng = RNG::new(3);
    let object_a = random_spheres(&mut rng, 20);
    let object_b = random_spheres(&mut rng, 20);
    let flat: Vec<PrimitiveDt> = object_a.iter().chain(object_b.iter()).cloned().collect();

    let inner_a: PrimitiveDt = Arc::new(BVHAccel::new(object_a, BuildMethod::BinnedSah));
    let inner_b: PrimitiveDt = Arc::new(BVHAccel::new(object_b, BuildMethod::BinnedSah));
    let top = BVHAccel::new(vec![inner_a, inner_b], BuildMethod::Agglomerative);

    for _ in 0..200 {
        let ray = random_ray(&mut rng);
        let expected = brute_force(&flat, &ray, T_MIN, INF);
        let got = top.intersect(&ray, T_MIN, INF);
        match (expected, got) {
            (None, None) => {}
            (Some((_, reference)), Some(si)) => {
                assert!((si.t - reference.t).abs() < 1e-3 * (1.0 + reference.t));
            }
            (expected, got) => panic!(
                "nested traversal diverged: brute force {:?}, traversal {:?}",
                expected.map(|(i, si)| (i, si.t)),
                got.map(|si| si.t)
            ),
        }
    }
}

#[test]
fn world_bound_matches_scene_extent() {
    let prims = vec![unit_cube_at(0.0, 0.0, 0.0), unit_cube_at(9.0, 9.0, 9.0)];
    let accel = BVHAccel::new(prims, BuildMethod::BinnedSah);
    let bound = accel.world_bound();
    assert_eq!(bound.min, Point3f::new(0.0, 0.0, 0.0));
    assert_eq!(bound.max, Point3f::new(10.0, 10.0, 10.0));
}
