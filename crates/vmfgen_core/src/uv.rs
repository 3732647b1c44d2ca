//! Texture projection for a single brush face

use serde::{Serialize, Deserialize};
use vmfgen_math::{Point2, Point3, PRECISION};

/// How a texture is projected onto one face
///
/// The axes are world-space directions; translate and scale are in texels
/// and world units per texel respectively.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UVFace {
    pub u_axis: Point3,
    pub u_translate: f64,
    pub u_scale: f64,
    pub v_axis: Point3,
    pub v_translate: f64,
    pub v_scale: f64,
}

impl Default for UVFace {
    fn default() -> Self {
        Self::new(Point3::X, Point3::Y)
    }
}

impl UVFace {
    /// Create a projection from two axes with no offset and unit scale
    pub fn new(u_axis: Point3, v_axis: Point3) -> Self {
        Self {
            u_axis,
            u_translate: 0.0,
            u_scale: 1.0,
            v_axis,
            v_translate: 0.0,
            v_scale: 1.0,
        }
    }

    /// Projection for the side face running from `from` to `to` (clockwise)
    ///
    /// U follows the edge backwards (`from - to`), divided by its dominant
    /// component so the larger of x/y is exactly +-1. V points up local Z.
    /// Returns `None` for a zero-length edge.
    pub fn for_edge(from: Point2, to: Point2) -> Option<Self> {
        let diff = from - to;
        let max = diff.x.abs().max(diff.y.abs());
        if max == 0.0 {
            return None;
        }
        Some(Self::new(Point3::new(diff.x / max, diff.y / max, 0.0), Point3::Z))
    }

    /// Set the texture offsets
    pub fn with_translate(mut self, u: f64, v: f64) -> Self {
        self.u_translate = u;
        self.v_translate = v;
        self
    }

    /// Set the texture scales
    pub fn with_scale(mut self, u: f64, v: f64) -> Self {
        self.u_scale = u;
        self.v_scale = v;
        self
    }

    /// Rotate both axes; offsets and scales are unchanged
    pub fn rotate(&self, angle: Point3) -> Self {
        Self {
            u_axis: self.u_axis.rotate(angle),
            v_axis: self.v_axis.rotate(angle),
            ..*self
        }
    }

    /// U axis as written to a `side` block: `[x y z translate] scale`
    pub fn u_str(&self) -> String {
        format!("[{} {:.p$}] {:.p$}", self.u_axis, self.u_translate, self.u_scale, p = PRECISION)
    }

    /// V axis as written to a `side` block: `[x y z translate] scale`
    pub fn v_str(&self) -> String {
        format!("[{} {:.p$}] {:.p$}", self.v_axis, self.v_translate, self.v_scale, p = PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_default_axes() {
        let uv = UVFace::default();
        assert_eq!(uv.u_axis, Point3::X);
        assert_eq!(uv.v_axis, Point3::Y);
        assert_eq!(uv.u_translate, 0.0);
        assert_eq!(uv.u_scale, 1.0);
    }

    #[test]
    fn test_for_edge_normalizes_by_dominant_component() {
        // Edge from (2, 0) back to (0, 1): diff = (2, -1)
        let uv = UVFace::for_edge(Point2::new(2.0, 0.0), Point2::new(0.0, 1.0)).unwrap();
        assert_eq!(uv.u_axis, Point3::new(1.0, -0.5, 0.0));
        assert_eq!(uv.v_axis, Point3::Z);
    }

    #[test]
    fn test_for_edge_zero_length() {
        let p = Point2::new(3.0, 3.0);
        assert!(UVFace::for_edge(p, p).is_none());
    }

    #[test]
    fn test_rotate_keeps_scale_and_offset() {
        let uv = UVFace::default().with_translate(8.0, 4.0).with_scale(0.25, 0.5);
        let rotated = uv.rotate(Point3::new(0.0, 0.0, FRAC_PI_2));
        assert_eq!(rotated.u_translate, 8.0);
        assert_eq!(rotated.v_scale, 0.5);
        assert!((rotated.u_axis.y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_strings() {
        let uv = UVFace::default().with_scale(0.25, 0.25);
        assert_eq!(uv.u_str(), "[1.000 0.000 0.000 0.000] 0.250");
        assert_eq!(uv.v_str(), "[0.000 1.000 0.000 0.000] 0.250");
    }
}
