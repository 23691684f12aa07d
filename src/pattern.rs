//! Replication of one tooth into many.
//!
//! Every copy's transform is computed directly from its index, so copy `i` is placed by
//! one rotation (or translation) instead of `i` accumulated steps.

use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Unit, Vector3};

use crate::float_types::{Real, TAU};

/// `count` copies spaced evenly around `axis` through `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularPattern {
    pub count: u32,
    pub center: Point3<Real>,
    pub axis: Unit<Vector3<Real>>,
}

impl CircularPattern {
    /// Copies around the z axis through the origin, as used for spur gears.
    pub fn around_z(count: u32) -> Self {
        Self {
            count,
            center: Point3::origin(),
            axis: Vector3::z_axis(),
        }
    }

    /// Rotation of copy `index`, in radians.
    pub fn angle(&self, index: u32) -> Real {
        index as Real * TAU / self.count as Real
    }

    /// Rotation of copy `index`, in degrees.
    pub fn angle_deg(&self, index: u32) -> Real {
        index as Real * 360.0 / self.count as Real
    }

    pub fn transform(&self, index: u32) -> Matrix4<Real> {
        let to_origin = Translation3::from(-self.center.coords).to_homogeneous();
        let rotation = Rotation3::from_axis_angle(&self.axis, self.angle(index)).to_homogeneous();
        let back = Translation3::from(self.center.coords).to_homogeneous();
        back * rotation * to_origin
    }

    pub fn transforms(&self) -> impl Iterator<Item = Matrix4<Real>> + '_ {
        (0..self.count).map(|i| self.transform(i))
    }
}

/// `count` copies along `direction`, `spacing` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPattern {
    pub count: u32,
    pub direction: Unit<Vector3<Real>>,
    pub spacing: Real,
}

impl LinearPattern {
    pub fn along_x(count: u32, spacing: Real) -> Self {
        Self {
            count,
            direction: Vector3::x_axis(),
            spacing,
        }
    }

    pub fn offset(&self, index: u32) -> Vector3<Real> {
        self.direction.into_inner() * (index as Real * self.spacing)
    }

    pub fn transform(&self, index: u32) -> Matrix4<Real> {
        Translation3::from(self.offset(index)).to_homogeneous()
    }

    pub fn transforms(&self) -> impl Iterator<Item = Matrix4<Real>> + '_ {
        (0..self.count).map(|i| self.transform(i))
    }

    /// Distance from the first copy's origin to the end of the last copy.
    pub fn span(&self) -> Real {
        self.count as Real * self.spacing
    }
}
