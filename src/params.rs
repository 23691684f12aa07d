//! Gear parameters and build options.

use crate::diameters::ToothDimensions;
use crate::errors::ConfigError;
use crate::float_types::{LengthUnit, Real, DEG, MM};

/// Largest accepted pressure angle, in radians.
pub const MAX_PRESSURE_ANGLE: Real = 45.0 * DEG;

/// Scalar inputs shared by the spur gear and rack generators.
///
/// Lengths are in millimetres, the pressure angle in radians. The values are plain data:
/// anything derived from them (diameters, tooth thickness, ...) is recomputed on demand
/// through [`DerivedDiameters::derive`](crate::diameters::DerivedDiameters::derive), never
/// stored alongside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearParameters {
    pub pressure_angle: Real,
    pub module: Real,
    pub number_of_teeth: u32,
    pub backlash: Real,
    pub root_fillet_radius: Real,
    pub thickness: Real,
}

impl Default for GearParameters {
    fn default() -> Self {
        Self {
            pressure_angle: 20.0 * DEG,
            module: 5.0 * MM,
            number_of_teeth: 20,
            backlash: 0.0,
            root_fillet_radius: 1.0 * MM,
            thickness: 5.0 * MM,
        }
    }
}

impl GearParameters {
    pub fn new(pressure_angle: Real, module: Real, number_of_teeth: u32) -> Self {
        Self {
            pressure_angle,
            module,
            number_of_teeth,
            ..Self::default()
        }
    }

    pub fn with_backlash(mut self, backlash: Real) -> Self {
        self.backlash = backlash;
        self
    }

    pub fn with_root_fillet_radius(mut self, radius: Real) -> Self {
        self.root_fillet_radius = radius;
        self
    }

    pub fn with_thickness(mut self, thickness: Real) -> Self {
        self.thickness = thickness;
        self
    }

    /// Check every invariant the generators rely on.
    ///
    /// Runs before any geometry is built; the first violated rule is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("Pressure angle", self.pressure_angle),
            ("Module", self.module),
            ("Backlash", self.backlash),
            ("Root fillet radius", self.root_fillet_radius),
            ("Thickness", self.thickness),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field: *field });
        }

        if self.pressure_angle <= 0.0 {
            return Err(ConfigError::PressureAngleTooSmall {
                degrees: self.pressure_angle.to_degrees(),
            });
        }
        if self.pressure_angle > MAX_PRESSURE_ANGLE {
            return Err(ConfigError::PressureAngleTooLarge {
                degrees: self.pressure_angle.to_degrees(),
            });
        }
        if self.number_of_teeth < 1 {
            return Err(ConfigError::TooFewTeeth);
        }
        if self.module <= 0.0 {
            return Err(ConfigError::ModuleNotPositive { value: self.module });
        }
        if self.thickness <= 0.0 {
            return Err(ConfigError::ThicknessNotPositive {
                value: self.thickness,
            });
        }

        let tooth = ToothDimensions::derive(self.module, 0.0);
        if self.backlash < 0.0 {
            return Err(ConfigError::NegativeBacklash {
                value: self.backlash,
            });
        }
        if self.backlash >= tooth.tooth_thickness {
            return Err(ConfigError::BacklashTooLarge {
                value: self.backlash,
                max: tooth.tooth_thickness,
            });
        }
        if self.root_fillet_radius < 0.0 {
            return Err(ConfigError::NegativeRootFilletRadius {
                value: self.root_fillet_radius,
            });
        }
        if self.root_fillet_radius > tooth.max_root_fillet_radius {
            return Err(ConfigError::RootFilletRadiusTooLarge {
                value: self.root_fillet_radius,
                max: tooth.max_root_fillet_radius,
            });
        }
        Ok(())
    }
}

/// Sampling of the tangent-unrolling involute construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoluteSettings {
    /// Number of tangent lines (and so involute samples), `K`.
    pub sample_count: usize,
    /// Angle between neighbouring tangent points on the base circle, in degrees.
    pub step_deg: Real,
}

impl Default for InvoluteSettings {
    fn default() -> Self {
        Self {
            sample_count: 10,
            step_deg: 5.0,
        }
    }
}

/// Knobs that do not change the gear itself, only how it is sampled and laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    pub involute: InvoluteSettings,
    /// Segments used when an arc is turned into a polygon.
    pub arc_segments: usize,
    /// Segments used for full circles (the spur gear hub).
    pub circle_segments: usize,
    /// The unit the rack's bottom box height and unitless formula lengths are measured in.
    pub length_unit: LengthUnit,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            involute: InvoluteSettings::default(),
            arc_segments: 8,
            circle_segments: 128,
            length_unit: LengthUnit::Millimeter,
        }
    }
}

impl BuildOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.involute.sample_count < 2 {
            return Err(ConfigError::InvalidSetting(format!(
                "involute sample count must be at least 2 (got {})",
                self.involute.sample_count
            )));
        }
        if !(self.involute.step_deg > 0.0 && self.involute.step_deg < 90.0) {
            return Err(ConfigError::InvalidSetting(format!(
                "involute step must be between 0 and 90 degrees (got {})",
                self.involute.step_deg
            )));
        }
        if self.arc_segments < 1 {
            return Err(ConfigError::InvalidSetting(
                "arc segments must be at least 1".to_string(),
            ));
        }
        if self.circle_segments < 3 {
            return Err(ConfigError::InvalidSetting(format!(
                "circle segments must be at least 3 (got {})",
                self.circle_segments
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GearParameters::default().validate(), Ok(()));
        assert_eq!(BuildOptions::default().validate(), Ok(()));
    }

    #[test]
    fn pressure_angle_bounds() {
        let zero = GearParameters::new(0.0, 5.0, 20);
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::PressureAngleTooSmall { .. })
        ));

        let limit = GearParameters::new(45.0 * DEG, 5.0, 20);
        assert_eq!(limit.validate(), Ok(()));

        let steep = GearParameters::new(46.0 * DEG, 5.0, 20);
        assert!(matches!(
            steep.validate(),
            Err(ConfigError::PressureAngleTooLarge { .. })
        ));
    }

    #[test]
    fn zero_teeth_rejected() {
        let params = GearParameters::new(20.0 * DEG, 5.0, 0);
        assert_eq!(params.validate(), Err(ConfigError::TooFewTeeth));
    }

    #[test]
    fn nan_rejected() {
        let params = GearParameters::new(20.0 * DEG, Real::NAN, 20);
        assert_eq!(
            params.validate(),
            Err(ConfigError::NotFinite { field: "Module" })
        );
    }

    #[test]
    fn single_sample_rejected() {
        let mut options = BuildOptions::default();
        options.involute.sample_count = 1;
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidSetting(_))
        ));
    }
}
