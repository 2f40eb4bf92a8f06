use crate::core::geometry::{Bounds3f, Point3f, Ray, Union};
use crate::core::interaction::SurfaceInteraction;
use crate::core::primitive::Primitive;
use crate::Float;

/// Rays closer to parallel than this to the triangle plane never hit.
const DET_EPSILON: Float = 1e-5;
/// Padding applied to flat bounds so no axis collapses to zero width.
const BOUNDS_PADDING: Float = 1e-4;

pub struct Triangle {
    v0: Point3f,
    v1: Point3f,
    v2: Point3f,
}

impl Triangle {
    pub fn new(v0: Point3f, v1: Point3f, v2: Point3f) -> Self {
        Triangle { v0, v1, v2 }
    }
}

impl Primitive for Triangle {
    fn world_bound(&self) -> Bounds3f {
        let mut bounds = Bounds3f::new(self.v0, self.v1).union(&self.v2);
        for axis in 0..3 {
            if bounds.min[axis] == bounds.max[axis] {
                bounds.min[axis] -= BOUNDS_PADDING;
                bounds.max[axis] += BOUNDS_PADDING;
            }
        }
        bounds
    }

    /// Möller-Trumbore intersection.
    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SurfaceInteraction> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        let pvec = ray.d.cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < DET_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.o - self.v0;
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(&e1);
        let v = ray.d.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(&qvec) * inv_det;
        if t <= t_min || t >= t_max {
            return None;
        }

        let mut si = SurfaceInteraction::new(ray.at(t), t);
        si.u = u;
        si.v = v;
        si.set_face_normal(ray, e1.cross(&e2).normalize());
        Some(si)
    }
}
