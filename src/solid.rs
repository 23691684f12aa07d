//! Extruded triangle-mesh bodies.

use std::fmt::Debug;
use std::sync::OnceLock;

use geo::{
    Area, Coord, LineString, Orient, Polygon as GeoPolygon, Triangle, TriangulateEarcut,
    orient::Direction,
};
use nalgebra::{Matrix4, Point2, Point3};

use crate::errors::ConstructionError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::{Aabb, BoundingVolume};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A closed triangle mesh, outward facing triangles in counter-clockwise order.
#[derive(Debug, Clone)]
pub struct Body<S: Clone> {
    pub triangles: Vec<[Point3<Real>; 3]>,
    /// Lazily calculated AABB that spans `triangles`.
    bounding_box: OnceLock<Aabb>,
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Body<S> {
    pub fn from_triangles(triangles: Vec<[Point3<Real>; 3]>, metadata: Option<S>) -> Self {
        Self {
            triangles,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Extrude a closed polygon ring (no repeated closing point) from `z = 0` up to
    /// `z = height`.
    ///
    /// The caps are ear-clipped with `geo`; the ring may be given in either orientation.
    pub fn extrude(
        shape: &'static str,
        ring: &[Point2<Real>],
        height: Real,
        metadata: Option<S>,
    ) -> Result<Self, ConstructionError> {
        if ring.len() < 3 {
            return Err(ConstructionError::Triangulation { shape });
        }
        let coords: Vec<Coord<Real>> = ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
        let polygon = GeoPolygon::new(LineString::new(coords), vec![]).orient(Direction::Default);
        let triangulation = polygon.earcut_triangles_raw();
        let vertices = triangulation.vertices;
        let triangle_indices = triangulation.triangle_indices;
        if triangle_indices.is_empty() {
            return Err(ConstructionError::Triangulation { shape });
        }

        let at = |i: usize| Coord {
            x: vertices[2 * i],
            y: vertices[2 * i + 1],
        };
        let lift = |c: Coord<Real>, z: Real| Point3::new(c.x, c.y, z);

        let mut triangles = Vec::with_capacity(triangle_indices.len() / 3 * 2 + ring.len() * 2);
        for tri in triangle_indices.chunks_exact(3) {
            let (mut a, b, mut c) = (at(tri[0]), at(tri[1]), at(tri[2]));
            if Triangle::new(a, b, c).signed_area() < 0.0 {
                std::mem::swap(&mut a, &mut c);
            }
            // Top faces +z, bottom faces -z.
            triangles.push([lift(a, height), lift(b, height), lift(c, height)]);
            triangles.push([lift(c, 0.0), lift(b, 0.0), lift(a, 0.0)]);
        }

        // The exterior is counter-clockwise now, so walls built along it face outwards.
        for edge in polygon.exterior().lines() {
            let (a0, b0) = (lift(edge.start, 0.0), lift(edge.end, 0.0));
            let (a1, b1) = (lift(edge.start, height), lift(edge.end, height));
            triangles.push([a0, b0, b1]);
            triangles.push([a0, b1, a1]);
        }

        Ok(Self::from_triangles(triangles, metadata))
    }

    /// Apply an arbitrary 3D transform; mirror transforms flip the triangles so they
    /// keep facing outwards.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        let flip = matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        let triangles = self
            .triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = tri.map(|p| matrix.transform_point(&p));
                if flip { [a, c, b] } else { [a, b, c] }
            })
            .collect();
        Self::from_triangles(triangles, self.metadata.clone())
    }

    /// One transformed copy per matrix, in order.
    #[cfg(not(feature = "parallel"))]
    pub fn copies(&self, transforms: &[Matrix4<Real>]) -> Vec<Self> {
        transforms.iter().map(|m| self.transform(m)).collect()
    }

    /// One transformed copy per matrix, in order.
    #[cfg(feature = "parallel")]
    pub fn copies(&self, transforms: &[Matrix4<Real>]) -> Vec<Self> {
        transforms.par_iter().map(|m| self.transform(m)).collect()
    }

    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut points = self.triangles.iter().flatten();
            let Some(first) = points.next() else {
                return Aabb::new(Point3::origin(), Point3::origin());
            };
            let (mut mins, mut maxs) = (*first, *first);
            for p in points {
                mins = mins.inf(p);
                maxs = maxs.sup(p);
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Enclosed volume by the divergence theorem.
    pub fn volume(&self) -> Real {
        self.triangles
            .iter()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<Real>()
            / 6.0
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// A gear as separate bodies: an optional hub (the spur gear's root disk) and one body per
/// tooth.
#[derive(Debug, Clone)]
pub struct GearSolid<S: Clone> {
    pub hub: Option<Body<S>>,
    pub teeth: Vec<Body<S>>,
}

impl<S: Clone + Send + Sync + Debug> GearSolid<S> {
    pub fn bodies(&self) -> impl Iterator<Item = &Body<S>> {
        self.hub.iter().chain(self.teeth.iter())
    }

    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    /// Sum of the body volumes. Hub and teeth meet along the root circle with differently
    /// tessellated edges, so the slivers there make this approximate.
    pub fn volume(&self) -> Real {
        self.bodies().map(Body::volume).sum()
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bodies()
            .map(Body::bounding_box)
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_else(|| Aabb::new(Point3::origin(), Point3::origin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2<Real>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn cube_volume_either_orientation() {
        let ccw = Body::<()>::extrude("cube", &unit_square(), 2.0, None).unwrap();
        assert!((ccw.volume() - 2.0).abs() < 1e-12);
        let mut cw = unit_square();
        cw.reverse();
        let cw = Body::<()>::extrude("cube", &cw, 2.0, None).unwrap();
        assert!((cw.volume() - 2.0).abs() < 1e-12);
        assert_eq!(ccw.triangle_count(), 12);
    }

    #[test]
    fn mirrored_body_keeps_positive_volume() {
        let body = Body::<()>::extrude("cube", &unit_square(), 1.0, None).unwrap();
        let mut mirror = Matrix4::identity();
        mirror[(0, 0)] = -1.0;
        assert!((body.transform(&mirror).volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_notched_ring_faces_outwards() {
        // an L shape, clockwise, so ear clipping has a reflex corner to deal with
        let ring = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 0.0),
        ];
        let body = Body::<()>::extrude("notch", &ring, 1.5, None).unwrap();
        assert!((body.volume() - 4.5).abs() < 1e-12);
        for [a, b, c] in &body.triangles {
            let normal = (b - a).cross(&(c - a));
            if a.z == 1.5 && b.z == 1.5 && c.z == 1.5 {
                assert!(normal.z > 0.0);
            } else if a.z == 0.0 && b.z == 0.0 && c.z == 0.0 {
                assert!(normal.z < 0.0);
            } else {
                let centre = (a.coords + b.coords + c.coords) / 3.0;
                // walls point away from the L's interior point (0.5, 0.5)
                let (dx, dy) = (centre.x - 0.5, centre.y - 0.5);
                assert!(normal.x * dx + normal.y * dy > 0.0);
            }
        }
    }

    #[test]
    fn degenerate_ring_rejected() {
        let ring = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert_eq!(
            Body::<()>::extrude("line", &ring, 1.0, None).err(),
            Some(ConstructionError::Triangulation { shape: "line" })
        );
    }

    #[test]
    fn bounds_span_the_extrusion() {
        let body = Body::<()>::extrude("cube", &unit_square(), 3.0, None).unwrap();
        let bb = body.bounding_box();
        assert_eq!(bb.mins, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bb.maxs, Point3::new(1.0, 1.0, 3.0));
    }
}
