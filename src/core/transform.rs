use crate::core::geometry::{Bounds3f, Point3f, Ray, Union, Vector3f};
use crate::core::radians;
use crate::Float;
use std::ops::Mul;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

impl Matrix4x4 {
    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        for i in 0..4 {
            m[i][i] = 1.0;
        }
        Matrix4x4 { m }
    }

    pub fn transpose(&self) -> Matrix4x4 {
        let mut m = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                m[i][j] = self.m[j][i];
            }
        }
        Matrix4x4 { m }
    }

    /// Gauss-Jordan elimination with full pivoting.
    pub fn inverse(&self) -> Matrix4x4 {
        let mut indexc = [0usize; 4];
        let mut indexr = [0usize; 4];
        let mut ipiv = [0usize; 4];
        let mut minv = self.m;
        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big = 0.0;
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for k in 0..4 {
                        if ipiv[k] == 0 {
                            if minv[j][k].abs() >= big {
                                big = minv[j][k].abs();
                                irow = j;
                                icol = k;
                            }
                        } else if ipiv[k] > 1 {
                            panic!("singular matrix in matrix_invert");
                        }
                    }
                }
            }
            ipiv[icol] += 1;
            if irow != icol {
                for k in 0..4 {
                    let tmp = minv[irow][k];
                    minv[irow][k] = minv[icol][k];
                    minv[icol][k] = tmp;
                }
            }

            indexr[i] = irow;
            indexc[i] = icol;
            if minv[icol][icol] == 0.0 {
                panic!("singular matrix in matrix_invert");
            }

            let pivinv = 1.0 / minv[icol][icol];
            minv[icol][icol] = 1.0;
            for j in 0..4 {
                minv[icol][j] *= pivinv;
            }

            for j in 0..4 {
                if j != icol {
                    let save = minv[j][icol];
                    minv[j][icol] = 0.0;
                    for k in 0..4 {
                        minv[j][k] -= minv[icol][k] * save;
                    }
                }
            }
        }

        for j in (0..4).rev() {
            if indexr[j] != indexc[j] {
                for k in 0..4 {
                    let tmp = minv[k][indexr[j]];
                    minv[k][indexr[j]] = minv[k][indexc[j]];
                    minv[k][indexc[j]] = tmp;
                }
            }
        }

        Matrix4x4 { m: minv }
    }
}

impl From<[[Float; 4]; 4]> for Matrix4x4 {
    fn from(m: [[Float; 4]; 4]) -> Self {
        Matrix4x4 { m }
    }
}

impl Mul for &Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut r = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                r[i][j] = self.m[i][0] * rhs.m[0][j]
                    + self.m[i][1] * rhs.m[1][j]
                    + self.m[i][2] * rhs.m[2][j]
                    + self.m[i][3] * rhs.m[3][j];
            }
        }
        Matrix4x4 { m: r }
    }
}

/// Affine transform carrying its matrix and the precomputed inverse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transformf {
    m: Matrix4x4,
    m_inv: Matrix4x4,
}

impl Default for Transformf {
    fn default() -> Self {
        Transformf::identity()
    }
}

impl Transformf {
    pub fn new(m: Matrix4x4) -> Self {
        let m_inv = m.inverse();
        Transformf { m, m_inv }
    }

    pub fn from_parts(m: Matrix4x4, m_inv: Matrix4x4) -> Self {
        Transformf { m, m_inv }
    }

    pub fn identity() -> Self {
        Transformf {
            m: Matrix4x4::identity(),
            m_inv: Matrix4x4::identity(),
        }
    }

    pub fn translate(delta: &Vector3f) -> Self {
        let mut m = Matrix4x4::identity();
        m.m[0][3] = delta.x;
        m.m[1][3] = delta.y;
        m.m[2][3] = delta.z;
        let mut m_inv = Matrix4x4::identity();
        m_inv.m[0][3] = -delta.x;
        m_inv.m[1][3] = -delta.y;
        m_inv.m[2][3] = -delta.z;
        Transformf { m, m_inv }
    }

    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        let mut m = Matrix4x4::identity();
        m.m[0][0] = x;
        m.m[1][1] = y;
        m.m[2][2] = z;
        let mut m_inv = Matrix4x4::identity();
        m_inv.m[0][0] = 1.0 / x;
        m_inv.m[1][1] = 1.0 / y;
        m_inv.m[2][2] = 1.0 / z;
        Transformf { m, m_inv }
    }

    pub fn rotate_x(theta: Float) -> Self {
        let (sin_t, cos_t) = radians(theta).sin_cos();
        let mut m = Matrix4x4::identity();
        m.m[1][1] = cos_t;
        m.m[1][2] = -sin_t;
        m.m[2][1] = sin_t;
        m.m[2][2] = cos_t;
        Transformf {
            m,
            m_inv: m.transpose(),
        }
    }

    pub fn rotate_y(theta: Float) -> Self {
        let (sin_t, cos_t) = radians(theta).sin_cos();
        let mut m = Matrix4x4::identity();
        m.m[0][0] = cos_t;
        m.m[0][2] = sin_t;
        m.m[2][0] = -sin_t;
        m.m[2][2] = cos_t;
        Transformf {
            m,
            m_inv: m.transpose(),
        }
    }

    pub fn rotate_z(theta: Float) -> Self {
        let (sin_t, cos_t) = radians(theta).sin_cos();
        let mut m = Matrix4x4::identity();
        m.m[0][0] = cos_t;
        m.m[0][1] = -sin_t;
        m.m[1][0] = sin_t;
        m.m[1][1] = cos_t;
        Transformf {
            m,
            m_inv: m.transpose(),
        }
    }

    pub fn inverse(&self) -> Transformf {
        Transformf {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    pub fn matrix(&self) -> &Matrix4x4 {
        &self.m
    }

    pub fn inverse_matrix(&self) -> &Matrix4x4 {
        &self.m_inv
    }

    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w == 1.0 {
            Point3f::new(x, y, z)
        } else {
            Point3f::new(x / w, y / w, z / w)
        }
    }

    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Normals transform by the inverse transpose.
    pub fn transform_normal(&self, n: &Vector3f) -> Vector3f {
        let m = &self.m_inv.m;
        Vector3f::new(
            m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
            m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
            m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
        )
    }

    pub fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::new(self.transform_point(&ray.o), self.transform_vector(&ray.d))
    }

    /// Conservative bounds transform: union of the eight transformed corners.
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        let mut out = Bounds3f::default();
        for i in 0..8 {
            let corner = Point3f::new(
                if i & 1 == 0 { b.min.x } else { b.max.x },
                if i & 2 == 0 { b.min.y } else { b.max.y },
                if i & 4 == 0 { b.min.z } else { b.max.z },
            );
            out = out.union(&self.transform_point(&corner));
        }
        out
    }
}

impl Mul for &Transformf {
    type Output = Transformf;

    fn mul(self, rhs: Self) -> Self::Output {
        Transformf {
            m: &self.m * &rhs.m,
            m_inv: &rhs.m_inv * &self.m_inv,
        }
    }
}
