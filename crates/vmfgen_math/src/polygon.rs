//! Regular polygon generation

use std::f64::consts::{PI, TAU};

use crate::Point2;

/// Generate a regular polygon with `sides` vertices
///
/// `radius` is the apothem (distance from the center to each edge's
/// midpoint); the vertices end up at `hypot(tan(pi / sides), 1) * radius`.
/// Vertex `i` sits at angle `(i - 0.5) / sides` turns, measured clockwise
/// from the negative Y axis, so the first edge is centered on -Y and the
/// winding is clockwise starting at minimum Y.
///
/// Returns an empty list for fewer than 3 sides.
pub fn gen_polygon(sides: usize, radius: f64) -> Vec<Point2> {
    if sides < 3 {
        return Vec::new();
    }

    let n = sides as f64;
    let point_distance = (PI / n).tan().hypot(1.0) * radius;

    (0..sides)
        .map(|i| {
            let t = (i as f64 - 0.5) / n * TAU;
            Point2::new(-t.sin() * point_distance, -t.cos() * point_distance)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    /// Twice the signed area; negative for clockwise winding
    fn signed_area2(points: &[Point2]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| {
                let a = points[i];
                let b = points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum()
    }

    #[test]
    fn test_vertex_count_and_radius() {
        for sides in 3..=12 {
            let radius = 100.0;
            let points = gen_polygon(sides, radius);
            assert_eq!(points.len(), sides);

            let expected = (PI / sides as f64).tan().hypot(1.0) * radius;
            for p in &points {
                assert!((p.length() - expected).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_clockwise_winding() {
        for sides in 3..=12 {
            let points = gen_polygon(sides, 64.0);
            assert!(signed_area2(&points) < 0.0, "{} sides not clockwise", sides);
        }
    }

    #[test]
    fn test_points_are_distinct() {
        let points = gen_polygon(16, 32.0);
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert!((points[i] - points[j]).length() > EPSILON);
            }
        }
    }

    #[test]
    fn test_first_edge_centered_on_negative_y() {
        let points = gen_polygon(8, 256.0);
        // First vertex sits half a step before -Y
        let angle = (-points[0].x).atan2(-points[0].y);
        assert!((angle - (-0.5 / 8.0 * TAU)).abs() < EPSILON);

        // Edge between vertex 0 and 1 has its midpoint on -Y at the apothem
        let mid_x = (points[0].x + points[1].x) / 2.0;
        let mid_y = (points[0].y + points[1].y) / 2.0;
        assert!(mid_x.abs() < EPSILON);
        assert!((mid_y + 256.0).abs() < EPSILON);
    }

    #[test]
    fn test_square() {
        let points = gen_polygon(4, 1.0);
        let expected = [
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, -1.0),
            Point2::new(-1.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        for (p, e) in points.iter().zip(expected.iter()) {
            assert!((p.x - e.x).abs() < EPSILON && (p.y - e.y).abs() < EPSILON, "{:?} != {:?}", p, e);
        }
    }

    #[test]
    fn test_degenerate_side_counts() {
        assert!(gen_polygon(0, 1.0).is_empty());
        assert!(gen_polygon(2, 1.0).is_empty());
    }
}
