use crate::core::clamp;
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::primitive::Primitive;
use crate::core::quadratic;
use crate::{Float, PI};

pub struct Sphere {
    center: Point3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Sphere { center, radius }
    }
}

impl Primitive for Sphere {
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SurfaceInteraction> {
        let oc = ray.o - self.center;
        let a = ray.d.length_squared();
        let b = 2.0 * oc.dot(&ray.d);
        let c = oc.length_squared() - self.radius * self.radius;

        let mut t0 = 0.0;
        let mut t1 = 0.0;
        if !quadratic(a, b, c, &mut t0, &mut t1) {
            return None;
        }
        let t = if t0 > t_min && t0 < t_max {
            t0
        } else if t1 > t_min && t1 < t_max {
            t1
        } else {
            return None;
        };

        let p = ray.at(t);
        let outward = (p - self.center) / self.radius;
        let mut si = SurfaceInteraction::new(p, t);
        si.set_face_normal(ray, outward);
        // Spherical coordinates of the unit offset.
        let theta = clamp(-outward.y, -1.0, 1.0).acos();
        let phi = (-outward.z).atan2(outward.x) + PI;
        si.u = phi / (2.0 * PI);
        si.v = theta / PI;
        Some(si)
    }
}
