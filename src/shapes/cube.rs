use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::primitive::Primitive;
use crate::Float;

/// Axis-aligned box primitive.
pub struct Cube {
    bounds: Bounds3f,
}

impl Cube {
    pub fn new(min: Point3f, max: Point3f) -> Self {
        Cube {
            bounds: Bounds3f::new(min, max),
        }
    }
}

impl Primitive for Cube {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SurfaceInteraction> {
        let mut t_near = Float::NEG_INFINITY;
        let mut t_far = Float::INFINITY;
        let mut near_axis = 0;
        let mut far_axis = 0;
        for axis in 0..3 {
            let inv = 1.0 / ray.d[axis];
            let mut t0 = (self.bounds.min[axis] - ray.o[axis]) * inv;
            let mut t1 = (self.bounds.max[axis] - ray.o[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
            }
            if t1 < t_far {
                t_far = t1;
                far_axis = axis;
            }
            if t_near > t_far {
                return None;
            }
        }

        // Entry face when the origin is outside, exit face when inside.
        let (t, axis, leaving) = if t_near > t_min && t_near < t_max {
            (t_near, near_axis, false)
        } else if t_far > t_min && t_far < t_max {
            (t_far, far_axis, true)
        } else {
            return None;
        };

        let mut outward = Vector3f::default();
        let sign = if ray.d[axis] > 0.0 { 1.0 } else { -1.0 };
        outward[axis] = if leaving { sign } else { -sign };

        let mut si = SurfaceInteraction::new(ray.at(t), t);
        si.set_face_normal(ray, outward);
        Some(si)
    }
}
