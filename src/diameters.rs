//! Reference circles and tooth proportions derived from [`GearParameters`].
//!
//! Everything here is a pure function of the parameters. The floating-point operations
//! are performed in the same order as the formulas built by
//! [`SymbolicSpurGear`](crate::expr::SymbolicSpurGear), so evaluating a formula gives
//! exactly the same number as calling these functions.

use crate::float_types::{DEG, PI, Real};
use crate::params::GearParameters;

/// Dedendum as a multiple of the module.
pub const DEDENDUM_FACTOR: Real = 1.25;

/// Largest root fillet radius as a fraction of the tooth thickness.
pub const ROOT_FILLET_FACTOR: Real = 0.4;

/// The four reference circles of a spur gear.
///
/// Always derived as a group; there is no way to change one diameter on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedDiameters {
    pub pitch_diameter: Real,
    pub base_diameter: Real,
    pub root_diameter: Real,
    pub outside_diameter: Real,
    pub dedendum: Real,
}

impl DerivedDiameters {
    pub fn derive(params: &GearParameters) -> Self {
        let teeth = params.number_of_teeth as Real;
        let module = params.module;

        let pitch_diameter = teeth * module;
        let dedendum = DEDENDUM_FACTOR * module;
        let root_diameter = pitch_diameter - 2.0 * dedendum;
        let base_diameter = pitch_diameter * params.pressure_angle.cos();
        let outside_diameter = pitch_diameter + 2.0 * module;

        Self {
            pitch_diameter,
            base_diameter,
            root_diameter,
            outside_diameter,
            dedendum,
        }
    }

    pub fn pitch_radius(&self) -> Real {
        self.pitch_diameter / 2.0
    }

    pub fn base_radius(&self) -> Real {
        self.base_diameter / 2.0
    }

    pub fn root_radius(&self) -> Real {
        self.root_diameter / 2.0
    }

    pub fn outside_radius(&self) -> Real {
        self.outside_diameter / 2.0
    }

    /// Addendum, the radial distance from the pitch circle to the outside circle.
    pub fn addendum(&self) -> Real {
        (self.outside_diameter - self.pitch_diameter) / 2.0
    }
}

/// Tooth proportions along the pitch line/circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToothDimensions {
    /// Arc distance between neighbouring teeth on the pitch circle, `π·m`.
    pub circular_pitch: Real,
    /// Ideal tooth thickness, half the circular pitch.
    pub tooth_thickness: Real,
    /// Half of the tooth thickness after backlash was taken off.
    pub half_tooth_thickness: Real,
    /// Upper bound for the root fillet radius; depends on the module alone.
    pub max_root_fillet_radius: Real,
}

impl ToothDimensions {
    pub fn derive(module: Real, backlash: Real) -> Self {
        let circular_pitch = PI * module;
        let tooth_thickness = circular_pitch / 2.0;
        let half_tooth_thickness = (tooth_thickness - backlash) / 2.0;
        let max_root_fillet_radius = ROOT_FILLET_FACTOR * tooth_thickness;

        Self {
            circular_pitch,
            tooth_thickness,
            half_tooth_thickness,
            max_root_fillet_radius,
        }
    }

    pub fn for_params(params: &GearParameters) -> Self {
        Self::derive(params.module, params.backlash)
    }
}

/// Angle between the tooth symmetry line and the base point of each involute flank, in radians.
///
/// Measured with the root diameter: `(half_tooth_thickness / (π · root_diameter)) · 360°`.
pub fn mirror_offset_angle(diameters: &DerivedDiameters, tooth: &ToothDimensions) -> Real {
    let degrees = (tooth.half_tooth_thickness / (PI * diameters.root_diameter)) * 360.0;
    degrees * DEG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_angle_does_not_move_root_or_outside() {
        let a = DerivedDiameters::derive(&GearParameters::new(14.5 * DEG, 2.0, 30));
        let b = DerivedDiameters::derive(&GearParameters::new(25.0 * DEG, 2.0, 30));
        assert_eq!(a.root_diameter, b.root_diameter);
        assert_eq!(a.outside_diameter, b.outside_diameter);
        assert_eq!(a.pitch_diameter, b.pitch_diameter);
        assert!(a.base_diameter > b.base_diameter);
    }

    #[test]
    fn backlash_only_thins_half_thickness() {
        let ideal = ToothDimensions::derive(5.0, 0.0);
        let loose = ToothDimensions::derive(5.0, 0.2);
        assert_eq!(ideal.tooth_thickness, loose.tooth_thickness);
        assert_eq!(ideal.max_root_fillet_radius, loose.max_root_fillet_radius);
        assert!((ideal.half_tooth_thickness - loose.half_tooth_thickness - 0.1).abs() < 1e-12);
    }

    #[test]
    fn offset_angle_uses_root_diameter() {
        let params = GearParameters::new(20.0 * DEG, 5.0, 20);
        let diameters = DerivedDiameters::derive(&params);
        let tooth = ToothDimensions::for_params(&params);
        // 3.927 / (π · 87.5) · 360° ≈ 5.142°
        let expected = (PI * 5.0 / 4.0) / (PI * 87.5) * 360.0;
        assert!((mirror_offset_angle(&diameters, &tooth).to_degrees() - expected).abs() < 1e-9);
    }
}
