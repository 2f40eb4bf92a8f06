use crate::core::RealNum;
use crate::Float;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign};

macro_rules! make_elem3 {
    (struct $name:ident) => {
        #[derive(Debug, Default, Copy, Clone, PartialEq)]
        pub struct $name<T> {
            pub x: T,
            pub y: T,
            pub z: T,
        }

        impl<T> $name<T> {
            pub fn new(x: T, y: T, z: T) -> Self {
                $name { x, y, z }
            }
        }

        impl<T: RealNum<T>> $name<T> {
            pub fn min(&self, rhs: &Self) -> Self {
                $name::new(
                    self.x.min(rhs.x),
                    self.y.min(rhs.y),
                    self.z.min(rhs.z),
                )
            }

            pub fn max(&self, rhs: &Self) -> Self {
                $name::new(
                    self.x.max(rhs.x),
                    self.y.max(rhs.y),
                    self.z.max(rhs.z),
                )
            }

            pub fn abs(&self) -> Self {
                $name::new(self.x.abs(), self.y.abs(), self.z.abs())
            }
        }

        impl<T: RealNum<T>> Mul<T> for $name<T> {
            type Output = $name<T>;

            fn mul(self, rhs: T) -> Self::Output {
                $name::new(self.x * rhs, self.y * rhs, self.z * rhs)
            }
        }

        impl<T: RealNum<T>> Div<T> for $name<T> {
            type Output = $name<T>;

            fn div(self, rhs: T) -> Self::Output {
                $name::new(self.x / rhs, self.y / rhs, self.z / rhs)
            }
        }

        impl<T: RealNum<T>> Neg for $name<T> {
            type Output = $name<T>;

            fn neg(self) -> Self::Output {
                $name::new(-self.x, -self.y, -self.z)
            }
        }

        impl<T> Index<usize> for $name<T> {
            type Output = T;

            fn index(&self, index: usize) -> &Self::Output {
                match index {
                    0 => &self.x,
                    1 => &self.y,
                    2 => &self.z,
                    _ => panic!("out of index"),
                }
            }
        }

        impl<T> IndexMut<usize> for $name<T> {
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                match index {
                    0 => &mut self.x,
                    1 => &mut self.y,
                    2 => &mut self.z,
                    _ => panic!("out of index"),
                }
            }
        }
    };
}

make_elem3!(struct Vector3);
pub type Vector3f = Vector3<Float>;

make_elem3!(struct Point3);
pub type Point3f = Point3<Float>;

impl<T: RealNum<T>> Add for Vector3<T> {
    type Output = Vector3<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: RealNum<T>> AddAssign for Vector3<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl<T: RealNum<T>> Sub for Vector3<T> {
    type Output = Vector3<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: RealNum<T>> SubAssign for Vector3<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl<T: RealNum<T>> Vector3<T> {
    pub fn length_squared(&self) -> T {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    pub fn normalize(&self) -> Vector3<T> {
        *self / self.length()
    }

    pub fn dot(&self, rhs: &Vector3<T>) -> T {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(&self, rhs: &Vector3<T>) -> Vector3<T> {
        Vector3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }
}

impl<T: RealNum<T>> Add<Vector3<T>> for Point3<T> {
    type Output = Point3<T>;

    fn add(self, rhs: Vector3<T>) -> Self::Output {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: RealNum<T>> Sub<Vector3<T>> for Point3<T> {
    type Output = Point3<T>;

    fn sub(self, rhs: Vector3<T>) -> Self::Output {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: RealNum<T>> Sub for Point3<T> {
    type Output = Vector3<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray { o, d }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

pub trait Union<T = Self> {
    fn union(&self, rhs: &T) -> Self;
}

/// Axis-aligned bounding box. The default value is the empty box
/// (min = max bound, max = min bound), the identity for `union`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3<T> {
    pub min: Point3<T>,
    pub max: Point3<T>,
}

pub type Bounds3f = Bounds3<Float>;

impl<T: RealNum<T>> Default for Bounds3<T> {
    fn default() -> Self {
        Bounds3 {
            min: Point3::new(T::max_value(), T::max_value(), T::max_value()),
            max: Point3::new(T::min_value(), T::min_value(), T::min_value()),
        }
    }
}

impl<T: RealNum<T>> Union for Bounds3<T> {
    fn union(&self, rhs: &Self) -> Self {
        Bounds3 {
            min: self.min.min(&rhs.min),
            max: self.max.max(&rhs.max),
        }
    }
}

impl<T: RealNum<T>> Union<Point3<T>> for Bounds3<T> {
    fn union(&self, rhs: &Point3<T>) -> Self {
        Bounds3 {
            min: self.min.min(rhs),
            max: self.max.max(rhs),
        }
    }
}

impl<T: RealNum<T>> Bounds3<T> {
    pub fn new(p1: Point3<T>, p2: Point3<T>) -> Self {
        Bounds3 {
            min: p1.min(&p2),
            max: p1.max(&p2),
        }
    }

    pub fn diagonal(&self) -> Vector3<T> {
        self.max - self.min
    }

    pub fn centroid(&self) -> Point3<T> {
        let half = T::one() / T::two();
        Point3::new(
            (self.min.x + self.max.x) * half,
            (self.min.y + self.max.y) * half,
            (self.min.z + self.max.z) * half,
        )
    }

    /// Longest axis of the box; ties are kept on the earliest axis.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        let mut axis = 0;
        for a in 1..3 {
            if d[a] > d[axis] {
                axis = a;
            }
        }
        axis
    }

    /// Extent-product cost metric shared by the split and merge heuristics.
    /// Deliberately not the `2(xy+yz+zx)` surface-area formula; the split
    /// decisions and their tests are calibrated against this product.
    pub fn cost(&self) -> T {
        let d = self.diagonal();
        d.x * d.y * d.z
    }

    pub fn contains(&self, rhs: &Self) -> bool {
        self.min.x <= rhs.min.x
            && self.min.y <= rhs.min.y
            && self.min.z <= rhs.min.z
            && self.max.x >= rhs.max.x
            && self.max.y >= rhs.max.y
            && self.max.z >= rhs.max.z
    }
}

impl Bounds3f {
    /// Ray/slab test. Returns the entry distance clamped to the origin; a
    /// hit requires the exit to lie at or beyond that distance. Degenerate
    /// (zero-extent) slabs collapse the interval without dividing by zero.
    pub fn intersect_p(&self, ray: &Ray, inv_dir: &Vector3f) -> (bool, Float) {
        let mut t_near = Float::NEG_INFINITY;
        let mut t_far = Float::INFINITY;
        for axis in 0..3 {
            let t1 = (self.min[axis] - ray.o[axis]) * inv_dir[axis];
            let t2 = (self.max[axis] - ray.o[axis]) * inv_dir[axis];
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
        let distance = t_near.max(0.0);
        (t_far >= distance, distance)
    }
}
