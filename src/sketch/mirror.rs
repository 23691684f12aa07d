//! Reflection across a line in the XY plane.

use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};

use super::curve::{CircularArc, Curve, angle_of};
use crate::errors::ConstructionError;
use crate::float_types::{EPSILON, Real};

/// The line `a·x + b·y + c = 0` with `(a, b)` of unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorLine {
    a: Real,
    b: Real,
    c: Real,
}

impl MirrorLine {
    /// The line through two distinct points.
    pub fn through(p1: Point2<Real>, p2: Point2<Real>) -> Result<Self, ConstructionError> {
        let a = p2.y - p1.y;
        let b = -(p2.x - p1.x);
        let c = -a * p1.x - b * p1.y;
        let m = (a * a + b * b).sqrt();
        if m < EPSILON {
            return Err(ConstructionError::DegenerateMirrorLine);
        }
        Ok(Self {
            a: a / m,
            b: b / m,
            c: c / m,
        })
    }

    /// Signed distance of `p` from the line.
    pub fn distance(&self, p: &Point2<Real>) -> Real {
        self.a * p.x + self.b * p.y + self.c
    }

    pub fn reflect(&self, p: &Point2<Real>) -> Point2<Real> {
        let d = self.distance(p);
        Point2::new(p.x - 2.0 * self.a * d, p.y - 2.0 * self.b * d)
    }

    /// Reflect in the XY plane; `z` is carried over unchanged.
    pub fn reflect_point3(&self, p: &Point3<Real>) -> Point3<Real> {
        let q = self.reflect(&Point2::new(p.x, p.y));
        Point3::new(q.x, q.y, p.z)
    }

    /// Reflect every point, keeping the input order.
    pub fn reflect_points(&self, points: &[Point2<Real>]) -> Vec<Point2<Real>> {
        points.iter().map(|p| self.reflect(p)).collect()
    }

    pub fn reflect_points3(&self, points: &[Point3<Real>]) -> Vec<Point3<Real>> {
        points.iter().map(|p| self.reflect_point3(p)).collect()
    }

    /// Mirror image of a curve, running in the same order as the input (so arcs flip
    /// their turning direction).
    pub fn reflect_curve(&self, curve: &Curve) -> Curve {
        match curve {
            Curve::Line { start, end } => Curve::line(self.reflect(start), self.reflect(end)),
            Curve::Arc(arc) => {
                let center = self.reflect(&arc.center);
                let start = self.reflect(&arc.start_point());
                Curve::Arc(CircularArc::new(
                    center,
                    arc.radius,
                    angle_of(&center, &start),
                    -arc.sweep,
                ))
            },
            Curve::Polyline(points) => Curve::Polyline(self.reflect_points(points)),
        }
    }

    pub fn reflect_chain(&self, curves: &[Curve]) -> Vec<Curve> {
        curves.iter().map(|c| self.reflect_curve(c)).collect()
    }

    /// The same reflection as a homogeneous 3D transform (a mirror about the vertical
    /// plane through the line).
    pub fn matrix(&self) -> Matrix4<Real> {
        let n = Vector3::new(self.a, self.b, 0.0);
        let reflect_3 = Matrix3::identity() - 2.0 * n * n.transpose();
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&reflect_3);
        m[(0, 3)] = -2.0 * self.a * self.c;
        m[(1, 3)] = -2.0 * self.b * self.c;
        m
    }
}
