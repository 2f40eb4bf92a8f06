use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::transform::Transformf;
use crate::Float;
use std::sync::Arc;

/// Capability contract every intersectable object satisfies: a world-space
/// bounding box and a nearest-hit query over `(t_min, t_max)`. A built
/// hierarchy implements it too, so hierarchies nest inside hierarchies.
pub trait Primitive: Send + Sync {
    fn world_bound(&self) -> Bounds3f;
    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SurfaceInteraction>;
}

pub type PrimitiveDt = Arc<dyn Primitive>;

/// A primitive placed in the scene under an affine transform. Rays are
/// pulled into the primitive's local space for the actual test; the hit
/// point and normal are pushed back out afterwards.
pub struct TransformedPrimitive {
    primitive: PrimitiveDt,
    primitive_to_world: Transformf,
}

impl TransformedPrimitive {
    pub fn new(primitive: PrimitiveDt, primitive_to_world: Transformf) -> Self {
        TransformedPrimitive {
            primitive,
            primitive_to_world,
        }
    }
}

impl Primitive for TransformedPrimitive {
    fn world_bound(&self) -> Bounds3f {
        self.primitive_to_world
            .transform_bounds(&self.primitive.world_bound())
    }

    fn intersect(&self, ray: &Ray, t_min: Float, t_max: Float) -> Option<SurfaceInteraction> {
        let local_ray = self.primitive_to_world.inverse().transform_ray(ray);
        let mut si = self.primitive.intersect(&local_ray, t_min, t_max)?;
        let p_world = self.primitive_to_world.transform_point(&si.p);
        let n_world = self
            .primitive_to_world
            .transform_normal(&si.n)
            .normalize();
        si.p = p_world;
        // The local parametric t is not a world distance once the transform
        // scales non-uniformly; report the distance measured outside.
        si.t = (p_world - ray.o).length() / ray.d.length();
        si.set_face_normal(ray, n_world);
        Some(si)
    }
}
