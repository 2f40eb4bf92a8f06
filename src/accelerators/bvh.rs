use crate::core::arena::{BVHNode, NodeArena};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Union, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::primitive::{Primitive, PrimitiveDt};
use crate::Float;
use std::cmp::Ordering;

const N_BINS: usize = 16;
/// Shrinks the top edge of the binning range so the largest centroid maps
/// into the last bin instead of one past it.
const BIN_EPSILON: Float = 1e-5;
/// Centroid ranges below this are treated as a single point on that axis.
const MIN_AXIS_RANGE: Float = 1e-12;
/// Ranges with fewer primitives than this stay leaves.
const MIN_SPLIT_COUNT: usize = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BuildMethod {
    /// Top-down binned subdivision over one object's primitives.
    BinnedSah,
    /// Bottom-up nearest-neighbor clustering of prebuilt sub-structures.
    Agglomerative,
}

#[derive(Default, Copy, Clone)]
pub(crate) struct Bin {
    pub(crate) bounds: Bounds3f,
    pub(crate) count: usize,
}

/// Cost of splitting between bin `i` and `i + 1`, for each of the interior
/// split planes, via suffix accumulation of the right side and a prefix
/// sweep of the left. A side with no primitives yields a NaN cost and is
/// never selected.
pub(crate) fn split_costs(bins: &[Bin; N_BINS]) -> [Float; N_BINS - 1] {
    let mut right_bounds = [Bounds3f::default(); N_BINS - 1];
    let mut right_counts = [0usize; N_BINS - 1];
    let mut acc = Bounds3f::default();
    let mut count = 0;
    for i in (1..N_BINS).rev() {
        acc = acc.union(&bins[i].bounds);
        count += bins[i].count;
        right_bounds[i - 1] = acc;
        right_counts[i - 1] = count;
    }

    let mut costs = [0.0 as Float; N_BINS - 1];
    let mut acc = Bounds3f::default();
    let mut count = 0;
    for i in 0..N_BINS - 1 {
        acc = acc.union(&bins[i].bounds);
        count += bins[i].count;
        costs[i] =
            acc.cost() * count as Float + right_bounds[i].cost() * right_counts[i] as Float;
    }
    costs
}

/// Strictly lowest cost wins; the first minimum found keeps the slot.
pub(crate) fn best_split(costs: &[Float; N_BINS - 1]) -> Option<usize> {
    let mut best = None;
    let mut best_cost = Float::MAX;
    for (i, &cost) in costs.iter().enumerate() {
        if cost < best_cost {
            best_cost = cost;
            best = Some(i);
        }
    }
    best
}

enum CandidateNode {
    Leaf(usize),
    Interior(usize),
}

struct Candidate {
    bounds: Bounds3f,
    node: CandidateNode,
}

fn materialize(c: &Candidate) -> BVHNode {
    match c.node {
        CandidateNode::Leaf(first) => BVHNode {
            bounds: c.bounds,
            left_first: first,
            count: 1,
        },
        CandidateNode::Interior(left) => BVHNode {
            bounds: c.bounds,
            left_first: left,
            count: 0,
        },
    }
}

/// Bounding volume hierarchy over a set of primitives. Construction owns
/// the node arena and the primitive index permutation exclusively; the
/// finished structure is immutable and safe to traverse from any number of
/// threads. Rebuilding replaces the whole structure, callers serialize that
/// against in-flight queries themselves.
pub struct BVHAccel {
    primitives: Vec<PrimitiveDt>,
    prim_order: Vec<usize>,
    arena: NodeArena,
    method: BuildMethod,
}

impl BVHAccel {
    pub fn new(primitives: Vec<PrimitiveDt>, method: BuildMethod) -> BVHAccel {
        let n = primitives.len();
        let mut accel = BVHAccel {
            prim_order: (0..n).collect(),
            arena: NodeArena::new(n),
            primitives,
            method,
        };
        if n == 0 {
            // Root stays an empty leaf; every query misses.
            return accel;
        }

        let prim_bounds: Vec<Bounds3f> =
            accel.primitives.iter().map(|p| p.world_bound()).collect();
        let centroids: Vec<Point3f> = prim_bounds.iter().map(|b| b.centroid()).collect();

        match method {
            BuildMethod::BinnedSah => accel.subdivide(0, 0, n, &prim_bounds, &centroids),
            BuildMethod::Agglomerative => accel.cluster(&prim_bounds),
        }
        log::debug!(
            "built {:?} BVH over {} primitives, {} arena slots",
            method,
            n,
            accel.arena.capacity()
        );
        accel
    }

    pub fn method(&self) -> BuildMethod {
        self.method
    }

    /// Raw node storage, unused slots included; the tree starts at slot 0.
    pub fn nodes(&self) -> &[BVHNode] {
        self.arena.nodes()
    }

    /// Permutation of `0..N` mapping leaf ranges to primitive indices.
    pub fn primitive_order(&self) -> &[usize] {
        &self.prim_order
    }

    pub fn primitives(&self) -> &[PrimitiveDt] {
        &self.primitives
    }

    fn subdivide(
        &mut self,
        node: usize,
        first: usize,
        count: usize,
        prim_bounds: &[Bounds3f],
        centroids: &[Point3f],
    ) {
        let mut bounds = Bounds3f::default();
        for &p in &self.prim_order[first..first + count] {
            bounds = bounds.union(&prim_bounds[p]);
        }
        {
            let n = self.arena.get_mut(node);
            n.bounds = bounds;
            n.left_first = first;
            n.count = count;
        }
        if count < MIN_SPLIT_COUNT {
            return;
        }

        let mut centroid_bounds = Bounds3f::default();
        for &p in &self.prim_order[first..first + count] {
            centroid_bounds = centroid_bounds.union(&centroids[p]);
        }
        let axis = centroid_bounds.maximum_extent();

        let mid = self
            .partition_binned(first, count, &centroid_bounds, axis, prim_bounds, centroids)
            .unwrap_or_else(|| self.partition_median(first, count, axis, centroids));
        debug_assert!(mid > 0 && mid < count);

        let (left, right) = self.arena.alloc_top_pair();
        {
            let n = self.arena.get_mut(node);
            n.left_first = left;
            n.count = 0;
        }
        self.subdivide(left, first, mid, prim_bounds, centroids);
        self.subdivide(right, first + mid, count - mid, prim_bounds, centroids);
    }

    /// Bins the range's centroids along `axis`, picks the cheapest of the 15
    /// interior split planes and partitions the index range in place.
    /// Returns the left-side count, or `None` when the range degenerates and
    /// the caller must fall back to a median split.
    fn partition_binned(
        &mut self,
        first: usize,
        count: usize,
        centroid_bounds: &Bounds3f,
        axis: usize,
        prim_bounds: &[Bounds3f],
        centroids: &[Point3f],
    ) -> Option<usize> {
        let k0 = centroid_bounds.min[axis];
        let range = centroid_bounds.max[axis] - k0;
        if range < MIN_AXIS_RANGE {
            log::warn!(
                "degenerate centroid bounds on axis {}, falling back to median split",
                axis
            );
            return None;
        }
        let k1 = N_BINS as Float * (1.0 - BIN_EPSILON) / range;
        let bin_of = |p: usize| (k1 * (centroids[p][axis] - k0)).floor() as usize;

        let mut bins = [Bin::default(); N_BINS];
        for &p in &self.prim_order[first..first + count] {
            let b = bin_of(p);
            bins[b].count += 1;
            bins[b].bounds = bins[b].bounds.union(&prim_bounds[p]);
        }

        let costs = split_costs(&bins);
        let best = best_split(&costs)?;
        let split_bin = best + 1;
        let left_count: usize = bins[..split_bin].iter().map(|b| b.count).sum();
        if left_count == 0 || left_count == count {
            // A one-sided winner would recurse on an unchanged range.
            log::warn!("binned split produced an empty side, falling back to median split");
            return None;
        }

        // Two-pointer in-place partition of the index range by bin id.
        let order = &mut self.prim_order;
        let mut i = first;
        let mut j = first + count;
        loop {
            while i < j && bin_of(order[i]) < split_bin {
                i += 1;
            }
            while j > i && bin_of(order[j - 1]) >= split_bin {
                j -= 1;
            }
            if i >= j {
                break;
            }
            order.swap(i, j - 1);
            i += 1;
            j -= 1;
        }
        debug_assert_eq!(i - first, left_count);
        Some(left_count)
    }

    /// Progress-guaranteeing fallback: order the range by centroid along
    /// `axis` around its median element and split the counts down the
    /// middle.
    fn partition_median(
        &mut self,
        first: usize,
        count: usize,
        axis: usize,
        centroids: &[Point3f],
    ) -> usize {
        let mid = count / 2;
        let mut range = self.prim_order[first..first + count].to_vec();
        floydrivest::nth_element(&mut range, mid, &mut |p1: &usize, p2: &usize| {
            let c1 = centroids[*p1][axis];
            let c2 = centroids[*p2][axis];
            if c1 < c2 {
                Ordering::Less
            } else if c1 == c2 {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        });
        self.prim_order[first..first + count].copy_from_slice(&range);
        mid
    }

    /// Nearest-neighbor clustering over one-element candidates, sliding a
    /// three-element window (`a`, `b = best(a)`, `c = best(b)`) and merging
    /// whenever `a` and `b` are mutually nearest. Merged pairs are written
    /// through the arena's bottom cursor; the survivor becomes the root.
    fn cluster(&mut self, prim_bounds: &[Bounds3f]) {
        let mut list: Vec<Candidate> = prim_bounds
            .iter()
            .enumerate()
            .map(|(i, b)| Candidate {
                bounds: *b,
                node: CandidateNode::Leaf(i),
            })
            .collect();

        let mut a = 0;
        let mut b = if list.len() > 1 {
            Self::best_match(&list, a)
        } else {
            0
        };
        while list.len() > 1 {
            let c = Self::best_match(&list, b);
            if a == c {
                let (left, right) = self.arena.alloc_bottom_pair();
                *self.arena.get_mut(left) = materialize(&list[a]);
                *self.arena.get_mut(right) = materialize(&list[b]);
                let merged = Candidate {
                    bounds: list[a].bounds.union(&list[b].bounds),
                    node: CandidateNode::Interior(left),
                };
                let (hi, lo) = if a > b { (a, b) } else { (b, a) };
                list.remove(hi);
                list.remove(lo);
                list.push(merged);
                a = list.len() - 1;
                if list.len() > 1 {
                    b = Self::best_match(&list, a);
                }
            } else {
                a = b;
                b = c;
            }
        }
        *self.arena.get_mut(0) = materialize(&list[0]);
    }

    /// Candidate minimizing the cost of the merged box, skipping `target`;
    /// the first minimum found wins ties.
    fn best_match(list: &[Candidate], target: usize) -> usize {
        debug_assert!(list.len() > 1);
        let mut best = target;
        let mut best_cost = Float::MAX;
        for (i, candidate) in list.iter().enumerate() {
            if i == target {
                continue;
            }
            let cost = list[target].bounds.union(&candidate.bounds).cost();
            if cost < best_cost {
                best_cost = cost;
                best = i;
            }
        }
        best
    }

    fn hit_node(
        &self,
        index: usize,
        ray: &Ray,
        inv_dir: &Vector3f,
        t_min: Float,
        mut t_max: Float,
    ) -> Option<SurfaceInteraction> {
        let node = self.arena.get(index);
        if node.is_leaf() {
            let mut closest = None;
            for i in node.first()..node.first() + node.count() {
                let p = self.prim_order[i];
                // Each accepted hit tightens the bound for the rest of the
                // leaf, so the last accepted one is the closest.
                if let Some(mut si) = self.primitives[p].intersect(ray, t_min, t_max) {
                    t_max = si.t;
                    si.primitive = Some(p);
                    closest = Some(si);
                }
            }
            closest
        } else {
            let left = node.left_child();
            let right = node.right_child();
            let (l_hit, l_dist) = self.arena.get(left).bounds().intersect_p(ray, inv_dir);
            let (r_hit, r_dist) = self.arena.get(right).bounds().intersect_p(ray, inv_dir);
            let l_hit = l_hit && l_dist < t_max;
            let r_hit = r_hit && r_dist < t_max;
            match (l_hit, r_hit) {
                (false, false) => None,
                (true, false) => self.hit_node(left, ray, inv_dir, t_min, t_max),
                (false, true) => self.hit_node(right, ray, inv_dir, t_min, t_max),
                (true, true) => {
                    let (near, far, far_dist) = if l_dist <= r_dist {
                        (left, right, r_dist)
                    } else {
                        (right, left, l_dist)
                    };
                    let mut closest = self.hit_node(near, ray, inv_dir, t_min, t_max);
                    if let Some(si) = &closest {
                        t_max = si.t;
                    }
                    // The near subtree may have tightened t_max past the far
                    // child's entry point.
                    if far_dist < t_max {
                        if let Some(si) = self.hit_node(far, ray, inv_dir, t_min, t_max) {
                            closest = Some(si);
                        }
                    }
                    closest
                }
            }
        }
    }
}

impl Primitive for BVHAccel {
    fn world_bound(&self) -> Bounds3f {
        if self.primitives.is_empty() {
            Bounds3f::default()
        } else {
            self.arena.get(0).bounds()
        }
    }

    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SurfaceInteraction> {
        if self.primitives.is_empty() {
            return None;
        }
        let inv_dir = Vector3f::new(1.0 / ray.d.x, 1.0 / ray.d.y, 1.0 / ray.d.z);
        let (hit, distance) = self.arena.get(0).bounds().intersect_p(ray, &inv_dir);
        if !hit || distance >= t_max {
            return None;
        }
        self.hit_node(0, ray, &inv_dir, t_min, t_max)
    }
}
