//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use gearsrs::float_types::Real;
use nalgebra::Point2;

/// Returns the bounding box `[min_x, min_y, max_x, max_y]` of a set of 2D points.
pub fn bounding_box(points: &[Point2<Real>]) -> [Real; 4] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    [min_x, min_y, max_x, max_y]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Shoelace area of a closed ring given without its closing point.
pub fn signed_area(ring: &[Point2<Real>]) -> Real {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (p, q) = (ring[i], ring[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<Real>()
        / 2.0
}

/// Distance from `p` to the nearest point of the polyline ring (segments included).
pub fn distance_to_ring(ring: &[Point2<Real>], p: &Point2<Real>) -> Real {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            let ab = b - a;
            let t = if ab.norm_squared() > 0.0 {
                ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (a + ab * t - p).norm()
        })
        .fold(Real::MAX, Real::min)
}
