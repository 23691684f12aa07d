//! Closed boundaries built from curves.

use geo::{Area, BoundingRect, Coord, LineString, Polygon as GeoPolygon};
use nalgebra::Point2;

use super::curve::Curve;
use crate::errors::ConstructionError;
use crate::float_types::{Real, tolerance};

/// An ordered, closed list of curves.
///
/// Each curve starts where the previous one ends (within [`tolerance`]) and the last one
/// ends where the first starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    curves: Vec<Curve>,
}

impl Profile {
    /// Check closure and wrap the curves; `shape` names the profile in errors.
    pub fn new(shape: &'static str, curves: Vec<Curve>) -> Result<Self, ConstructionError> {
        if curves.is_empty() {
            return Err(ConstructionError::OpenProfile {
                shape,
                index: 0,
                next: 0,
                gap: Real::INFINITY,
            });
        }
        let n = curves.len();
        for (index, curve) in curves.iter().enumerate() {
            let next = (index + 1) % n;
            let gap = (curves[next].start() - curve.end()).norm();
            if gap > tolerance() {
                return Err(ConstructionError::OpenProfile {
                    shape,
                    index,
                    next,
                    gap,
                });
            }
        }
        Ok(Self { curves })
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// The boundary as a polygon ring without the closing duplicate point.
    pub fn to_polygon(&self, arc_segments: usize) -> Vec<Point2<Real>> {
        let mut ring: Vec<Point2<Real>> = Vec::new();
        for curve in &self.curves {
            for p in curve.sample(arc_segments) {
                if ring.last().is_none_or(|last| (p - last).norm() > tolerance()) {
                    ring.push(p);
                }
            }
        }
        while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() <= tolerance() {
            ring.pop();
        }
        ring
    }

    pub fn to_geo(&self, arc_segments: usize) -> GeoPolygon<Real> {
        let coords: Vec<Coord<Real>> = self
            .to_polygon(arc_segments)
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        GeoPolygon::new(LineString::new(coords), vec![])
    }

    /// Shoelace area; positive for counter-clockwise boundaries.
    pub fn signed_area(&self, arc_segments: usize) -> Real {
        self.to_geo(arc_segments).signed_area()
    }

    pub fn is_ccw(&self, arc_segments: usize) -> bool {
        self.signed_area(arc_segments) > 0.0
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounding_box(&self, arc_segments: usize) -> (Point2<Real>, Point2<Real>) {
        match self.to_geo(arc_segments).bounding_rect() {
            Some(rect) => (
                Point2::new(rect.min().x, rect.min().y),
                Point2::new(rect.max().x, rect.max().y),
            ),
            None => (Point2::origin(), Point2::origin()),
        }
    }

    pub fn bounding_box_area(&self, arc_segments: usize) -> Real {
        let (min, max) = self.bounding_box(arc_segments);
        (max.x - min.x) * (max.y - min.y)
    }
}

/// Pick the candidate region with the smallest bounding-box area (first wins on ties).
///
/// A well-formed sketch offers one or two candidate regions; anything else means the
/// construction went wrong.
pub fn select_smallest(
    shape: &'static str,
    candidates: Vec<Profile>,
    arc_segments: usize,
) -> Result<Profile, ConstructionError> {
    if !(1..=2).contains(&candidates.len()) {
        return Err(ConstructionError::RegionCount {
            shape,
            found: candidates.len(),
        });
    }
    let mut best: Option<(Real, Profile)> = None;
    for candidate in candidates {
        let area = candidate.bounding_box_area(arc_segments);
        if best.as_ref().is_none_or(|(smallest, _)| area < *smallest) {
            best = Some((area, candidate));
        }
    }
    best.map(|(_, profile)| profile)
        .ok_or(ConstructionError::RegionCount { shape, found: 0 })
}
