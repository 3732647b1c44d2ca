//! 3D point / direction type

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::PRECISION;

/// 3D point with x, y, z components
///
/// Also used as an Euler angle triple (radians) for [`Point3::rotate`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Self = Self { x: 0.0, y: 0.0, z: 1.0 };

    /// Create a new Point3
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Rotate by an Euler angle triple
    ///
    /// The Z rotation is applied first, then Y, then X. The X step uses the
    /// same matrix layout as the Z step (it mixes x and y, not y and z). Map
    /// files produced by this tool depend on that exact order and layout, so
    /// it must not be replaced with a conventional rotation.
    ///
    /// An angle of exactly `(0, 0, 0)` returns `self` untouched.
    pub fn rotate(self, angle: Point3) -> Self {
        if angle.x == 0.0 && angle.y == 0.0 && angle.z == 0.0 {
            return self;
        }

        let (sz, cz) = angle.z.sin_cos();
        let p = Self::new(
            self.x * cz + self.y * sz,
            -self.x * sz + self.y * cz,
            self.z,
        );

        let (sy, cy) = angle.y.sin_cos();
        let p = Self::new(
            p.x * cy - p.z * sy,
            p.y,
            p.x * sy + p.z * cy,
        );

        let (sx, cx) = angle.x.sin_cos();
        Self::new(
            p.x * cx + p.y * sx,
            -p.x * sx + p.y * cx,
            p.z,
        )
    }

    /// Dot product
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length (magnitude)
    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

// Operator overloads

impl std::ops::Add for Point3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::AddAssign for Point3 {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl std::ops::Sub for Point3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f64> for Point3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Neg for Point3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.p$} {:.p$} {:.p$}", self.x, self.y, self.z, p = PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: Point3, b: Point3) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON && (a.z - b.z).abs() < EPSILON
    }

    #[test]
    fn test_identity_rotation_is_exact() {
        let points = [
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(-1234.5678, 1e-12, 9.999_999),
            Point3::new(f64::MAX, f64::MIN_POSITIVE, -0.0),
        ];
        for p in points {
            let r = p.rotate(Point3::ZERO);
            assert_eq!(r.x.to_bits(), p.x.to_bits());
            assert_eq!(r.y.to_bits(), p.y.to_bits());
            assert_eq!(r.z.to_bits(), p.z.to_bits());
        }
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        // Z step maps +X to -Y
        let r = Point3::X.rotate(Point3::new(0.0, 0.0, FRAC_PI_2));
        assert!(approx_eq(r, Point3::new(0.0, -1.0, 0.0)), "got {:?}", r);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // Y step maps +X to +Z
        let r = Point3::X.rotate(Point3::new(0.0, FRAC_PI_2, 0.0));
        assert!(approx_eq(r, Point3::Z), "got {:?}", r);
    }

    #[test]
    fn test_rotate_x_uses_z_layout() {
        // The X step mixes x and y, so +Z is untouched
        let r = Point3::Z.rotate(Point3::new(FRAC_PI_2, 0.0, 0.0));
        assert!(approx_eq(r, Point3::Z), "got {:?}", r);
        let r = Point3::X.rotate(Point3::new(FRAC_PI_2, 0.0, 0.0));
        assert!(approx_eq(r, Point3::new(0.0, -1.0, 0.0)), "got {:?}", r);
    }

    #[test]
    fn test_rotate_order_z_then_y() {
        // Z turns +Y into +X, then Y turns +X into +Z
        let r = Point3::Y.rotate(Point3::new(0.0, FRAC_PI_2, FRAC_PI_2));
        assert!(approx_eq(r, Point3::Z), "got {:?}", r);
    }

    #[test]
    fn test_rotate_preserves_length() {
        let p = Point3::new(3.0, -4.0, 12.0);
        let r = p.rotate(Point3::new(0.3, -1.1, 2.5));
        assert!((r.length() - 13.0).abs() < EPSILON);
    }

    #[test]
    fn test_cross() {
        assert!(approx_eq(Point3::X.cross(Point3::Y), Point3::Z));
    }

    #[test]
    fn test_display_precision() {
        let p = Point3::new(1.0, -2.5, 1.0 / 3.0);
        assert_eq!(p.to_string(), "1.000 -2.500 0.333");
    }
}
