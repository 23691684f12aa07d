//! Involute flank construction by unrolling tangent lines from the base circle.
//!
//! Sample `i` sits on the line tangent to the base circle at polar angle
//! `-offset + i·Δθ`, at distance `i · π · base_diameter · (Δθ / 360°)` from the point of
//! tangency, measured clockwise. This is the unrolling relation of the involute: the
//! length along the tangent equals the arc rolled off the base circle. The samples run
//! from the base circle outwards and turn towards the tooth centre line (+x).

use nalgebra::{Point2, Vector2};
use tracing::warn;

use crate::diameters::DerivedDiameters;
use crate::errors::ConstructionError;
use crate::float_types::{PI, Real, tolerance};
use crate::params::InvoluteSettings;

/// The involute function `inv(α) = tan α − α`.
pub fn involute_function(angle: Real) -> Real {
    angle.tan() - angle
}

/// Unit vector at polar angle `angle`.
pub(crate) fn polar(angle: Real) -> Vector2<Real> {
    Vector2::new(angle.cos(), angle.sin())
}

/// Raw involute samples for a base circle, starting on it at polar angle `-offset_angle`.
pub fn unroll(base_diameter: Real, offset_angle: Real, settings: &InvoluteSettings) -> Vec<Point2<Real>> {
    let base_radius = base_diameter / 2.0;
    let step = settings.step_deg.to_radians();
    (0..settings.sample_count)
        .map(|i| {
            let phi = -offset_angle + i as Real * step;
            let tangent_point = Point2::origin() + polar(phi) * base_radius;
            let direction = Vector2::new(phi.sin(), -phi.cos());
            let length = i as Real * PI * base_diameter * (settings.step_deg / 360.0);
            tangent_point + direction * length
        })
        .collect()
}

/// Parameter `s` where the segment `a + s·(b − a)` leaves the circle of `radius` around
/// the origin (the larger root of the intersection quadratic).
pub(crate) fn circle_exit(a: &Point2<Real>, b: &Point2<Real>, radius: Real) -> Option<Real> {
    let d = b - a;
    let dd = d.norm_squared();
    if dd <= 0.0 {
        return None;
    }
    let ad = a.coords.dot(&d);
    let disc = ad * ad - dd * (a.coords.norm_squared() - radius * radius);
    if disc < 0.0 {
        return None;
    }
    Some((-ad + disc.sqrt()) / dd)
}

/// One involute flank clipped between the root and outside circles.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoluteFlank {
    /// The unclipped samples.
    pub samples: Vec<Point2<Real>>,
    /// Flank points from the root circle to the outside circle.
    pub points: Vec<Point2<Real>>,
    /// The first segment of `points` is the radial line from the root up to the base
    /// circle (the root circle is inside the base circle).
    pub radial_foot: bool,
    /// The samples stopped short of the outside circle and the last one was extended.
    pub extended: bool,
}

impl InvoluteFlank {
    /// The flank below the centre line (`y < 0`), running outwards.
    pub fn build(
        diameters: &DerivedDiameters,
        offset_angle: Real,
        settings: &InvoluteSettings,
    ) -> Result<Self, ConstructionError> {
        let samples = unroll(diameters.base_diameter, offset_angle, settings);
        let root_radius = diameters.root_radius();
        let outside_radius = diameters.outside_radius();

        let radial_foot = root_radius < diameters.base_radius() - tolerance();
        let mut points = if radial_foot {
            let mut points = Vec::with_capacity(samples.len() + 1);
            points.push(Point2::origin() + polar(-offset_angle) * root_radius);
            points.extend_from_slice(&samples);
            points
        } else {
            clip_to_root(&samples, root_radius)?
        };

        let extended = clip_to_outside(&mut points, outside_radius);
        if extended {
            warn!(
                outside_radius,
                reached = points.len(),
                "involute samples stop short of the outside circle, extending the last segment"
            );
        }

        let tip = points[points.len() - 1];
        if tip.y >= 0.0 {
            return Err(ConstructionError::PointedTooth {
                radius: tip.coords.norm(),
            });
        }

        Ok(Self {
            samples,
            points,
            radial_foot,
            extended,
        })
    }

    pub fn foot(&self) -> Point2<Real> {
        self.points[0]
    }

    pub fn tip(&self) -> Point2<Real> {
        self.points[self.points.len() - 1]
    }
}

/// Drop the samples inside the root circle, starting the flank where it crosses it.
fn clip_to_root(samples: &[Point2<Real>], root_radius: Real) -> Result<Vec<Point2<Real>>, ConstructionError> {
    if samples[0].coords.norm() >= root_radius {
        return Ok(samples.to_vec());
    }
    for (i, pair) in samples.windows(2).enumerate() {
        if pair[1].coords.norm() >= root_radius {
            let s = circle_exit(&pair[0], &pair[1], root_radius).unwrap_or(1.0);
            let mut points = vec![pair[0] + (pair[1] - pair[0]) * s];
            points.extend_from_slice(&samples[i + 1..]);
            return Ok(points);
        }
    }
    Err(ConstructionError::FlankBelowRoot {
        radius: root_radius,
    })
}

/// Cut the flank at its first crossing of the outside circle, or extend the last segment
/// up to it. Returns whether the flank was extended.
fn clip_to_outside(points: &mut Vec<Point2<Real>>, outside_radius: Real) -> bool {
    for i in 1..points.len() {
        if points[i].coords.norm() >= outside_radius {
            let s = circle_exit(&points[i - 1], &points[i], outside_radius).unwrap_or(1.0);
            let tip = points[i - 1] + (points[i] - points[i - 1]) * s;
            points.truncate(i);
            points.push(tip);
            return false;
        }
    }
    let n = points.len();
    let (a, b) = (points[n - 2], points[n - 1]);
    match circle_exit(&a, &b, outside_radius) {
        Some(s) => {
            points.push(a + (b - a) * s);
            true
        },
        None => false,
    }
}
