use crate::core::geometry::{Point3f, Ray, Vector3f};
use crate::Float;

/// Record of the closest accepted ray/primitive intersection.
#[derive(Debug, Default, Copy, Clone)]
pub struct SurfaceInteraction {
    pub p: Point3f,
    pub n: Vector3f,
    pub t: Float,
    pub u: Float,
    pub v: Float,
    pub front_face: bool,
    /// Index of the primitive that produced the hit, within the collection
    /// handed to the enclosing hierarchy. Filled in during traversal.
    pub primitive: Option<usize>,
}

impl SurfaceInteraction {
    pub fn new(p: Point3f, t: Float) -> Self {
        SurfaceInteraction {
            p,
            t,
            ..Default::default()
        }
    }

    /// Stores the normal facing against the ray and remembers which side
    /// was hit. `outward` must point away from the surface interior.
    pub fn set_face_normal(&mut self, ray: &Ray, outward: Vector3f) {
        self.front_face = ray.d.dot(&outward) < 0.0;
        self.n = if self.front_face { outward } else { -outward };
    }
}
