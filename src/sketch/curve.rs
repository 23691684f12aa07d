use nalgebra::{Point2, Rotation2, Vector2};

use crate::float_types::{Real, TAU};

/// A circular arc given by its centre, radius, start angle and signed sweep (radians,
/// positive counter-clockwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub center: Point2<Real>,
    pub radius: Real,
    pub start_angle: Real,
    pub sweep: Real,
}

impl CircularArc {
    pub fn new(center: Point2<Real>, radius: Real, start_angle: Real, sweep: Real) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    /// Arc around `center` from `start` to `end`, both assumed to lie on the same circle.
    ///
    /// `ccw` picks the turning direction; the sweep is in `(0, 2π]` for counter-clockwise
    /// and `[-2π, 0)` for clockwise arcs, coincident end points give a full turn.
    pub fn between(center: Point2<Real>, start: Point2<Real>, end: Point2<Real>, ccw: bool) -> Self {
        let a0 = angle_of(&center, &start);
        let a1 = angle_of(&center, &end);
        let mut sweep = (a1 - a0).rem_euclid(TAU);
        if ccw {
            if sweep <= 0.0 {
                sweep = TAU;
            }
        } else {
            sweep -= TAU;
        }
        Self::new(center, (start - center).norm(), a0, sweep)
    }

    /// Arc from `start` to `end` around `center` turning by the smaller angle.
    pub fn minor(center: Point2<Real>, start: Point2<Real>, end: Point2<Real>) -> Self {
        let a0 = angle_of(&center, &start);
        let a1 = angle_of(&center, &end);
        let mut sweep = (a1 - a0).rem_euclid(TAU);
        if sweep > TAU / 2.0 {
            sweep -= TAU;
        }
        Self::new(center, (start - center).norm(), a0, sweep)
    }

    pub fn end_angle(&self) -> Real {
        self.start_angle + self.sweep
    }

    pub fn point_at_angle(&self, angle: Real) -> Point2<Real> {
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }

    pub fn start_point(&self) -> Point2<Real> {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_point(&self) -> Point2<Real> {
        self.point_at_angle(self.end_angle())
    }

    pub fn length(&self) -> Real {
        self.radius * self.sweep.abs()
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.center, self.radius, self.end_angle(), -self.sweep)
    }

    /// `segments + 1` points from start to end, evenly spaced by angle.
    pub fn sample(&self, segments: usize) -> Vec<Point2<Real>> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| {
                let t = i as Real / segments as Real;
                self.point_at_angle(self.start_angle + t * self.sweep)
            })
            .collect()
    }
}

pub(crate) fn angle_of(center: &Point2<Real>, p: &Point2<Real>) -> Real {
    (p.y - center.y).atan2(p.x - center.x)
}

/// One piece of a profile boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line {
        start: Point2<Real>,
        end: Point2<Real>,
    },
    Arc(CircularArc),
    /// A sampled curve (the involute flanks), passed through point by point.
    Polyline(Vec<Point2<Real>>),
}

impl Curve {
    pub fn line(start: Point2<Real>, end: Point2<Real>) -> Self {
        Curve::Line { start, end }
    }

    pub fn start(&self) -> Point2<Real> {
        match self {
            Curve::Line { start, .. } => *start,
            Curve::Arc(arc) => arc.start_point(),
            Curve::Polyline(points) => points.first().copied().unwrap_or_else(Point2::origin),
        }
    }

    pub fn end(&self) -> Point2<Real> {
        match self {
            Curve::Line { end, .. } => *end,
            Curve::Arc(arc) => arc.end_point(),
            Curve::Polyline(points) => points.last().copied().unwrap_or_else(Point2::origin),
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Curve::Line { start, end } => Curve::line(*end, *start),
            Curve::Arc(arc) => Curve::Arc(arc.reversed()),
            Curve::Polyline(points) => Curve::Polyline(points.iter().rev().copied().collect()),
        }
    }

    pub fn length(&self) -> Real {
        match self {
            Curve::Line { start, end } => (end - start).norm(),
            Curve::Arc(arc) => arc.length(),
            Curve::Polyline(points) => points.windows(2).map(|w| (w[1] - w[0]).norm()).sum(),
        }
    }

    /// The curve turned by `angle` radians about the origin.
    pub fn rotated(&self, angle: Real) -> Self {
        let rotation = Rotation2::new(angle);
        match self {
            Curve::Line { start, end } => Curve::line(rotation * start, rotation * end),
            Curve::Arc(arc) => Curve::Arc(CircularArc::new(
                rotation * arc.center,
                arc.radius,
                arc.start_angle + angle,
                arc.sweep,
            )),
            Curve::Polyline(points) => Curve::Polyline(points.iter().map(|p| rotation * p).collect()),
        }
    }

    /// Points along the curve including both ends; arcs are split into `arc_segments`.
    pub fn sample(&self, arc_segments: usize) -> Vec<Point2<Real>> {
        match self {
            Curve::Line { start, end } => vec![*start, *end],
            Curve::Arc(arc) => arc.sample(arc_segments),
            Curve::Polyline(points) => points.clone(),
        }
    }
}
