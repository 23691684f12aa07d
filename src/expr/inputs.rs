//! User input as formula strings, and component naming.

use tracing::debug;

use super::symbolic::{
    BACKLASH, MODULE, NUMBER_OF_TEETH, PRESSURE_ANGLE, ROOT_FILLET_RADIUS, THICKNESS,
};
use super::{Bindings, Expr, ExprError, Unit, UnitKind, parse};
use crate::errors::ConfigError;
use crate::float_types::{LengthUnit, Real};
use crate::params::GearParameters;

/// The six gear inputs as typed by a user, e.g. `"20 deg"` or `"2 * module"`.
///
/// A formula without any unit or parameter reference is read in the field's default
/// unit: degrees for the pressure angle, the active [`LengthUnit`] for lengths. The tooth
/// count is a plain number. A unit of the wrong kind (`"2 cm"` for the tooth count,
/// `"0.3 mm"` for the angle) is rejected. Fields are evaluated top to bottom and each may refer to
/// the ones above it by name (`pressure_angle`, `module`, `number_of_teeth`,
/// `backlash`, `root_fillet_radius`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInputs {
    pub pressure_angle: String,
    pub module: String,
    pub number_of_teeth: String,
    pub backlash: String,
    pub root_fillet_radius: String,
    pub thickness: String,
}

impl Default for ParameterInputs {
    fn default() -> Self {
        Self {
            pressure_angle: "20 deg".to_string(),
            module: "5 mm".to_string(),
            number_of_teeth: "20".to_string(),
            backlash: "0 mm".to_string(),
            root_fillet_radius: "1 mm".to_string(),
            thickness: "5 mm".to_string(),
        }
    }
}

impl ParameterInputs {
    /// Defaults for a rack, which starts with fewer teeth than a spur gear.
    pub fn rack_defaults() -> Self {
        Self {
            number_of_teeth: "10".to_string(),
            ..Self::default()
        }
    }

    /// Evaluate and validate every field.
    pub fn evaluate(&self, length_unit: LengthUnit) -> Result<GearParameters, ConfigError> {
        self.evaluate_with(length_unit, Bindings::new())
    }

    /// Like [`evaluate`](Self::evaluate), with extra named values the formulas may use.
    pub fn evaluate_with(
        &self,
        length_unit: LengthUnit,
        mut bindings: Bindings,
    ) -> Result<GearParameters, ConfigError> {
        let length = Unit::from(length_unit);

        let pressure_angle = field(
            "Pressure angle",
            &self.pressure_angle,
            Some(Unit::Degree),
            &bindings,
        )?;
        bindings.set(PRESSURE_ANGLE, pressure_angle);

        let module = field("Module", &self.module, Some(length), &bindings)?;
        bindings.set(MODULE, module);

        let teeth = field("Number of teeth", &self.number_of_teeth, None, &bindings)?;
        let number_of_teeth = whole_teeth(teeth)?;
        bindings.set(NUMBER_OF_TEETH, teeth);

        let backlash = field("Backlash", &self.backlash, Some(length), &bindings)?;
        bindings.set(BACKLASH, backlash);

        let root_fillet_radius = field(
            "Root fillet radius",
            &self.root_fillet_radius,
            Some(length),
            &bindings,
        )?;
        bindings.set(ROOT_FILLET_RADIUS, root_fillet_radius);

        let thickness = field("Thickness", &self.thickness, Some(length), &bindings)?;
        bindings.set(THICKNESS, thickness);

        let params = GearParameters {
            pressure_angle,
            module,
            number_of_teeth,
            backlash,
            root_fillet_radius,
            thickness,
        };
        debug!(?params, "evaluated parameter inputs");
        params.validate()?;
        Ok(params)
    }
}

fn field(
    name: &'static str,
    text: &str,
    default_unit: Option<Unit>,
    bindings: &Bindings,
) -> Result<Real, ConfigError> {
    let invalid = |source| ConfigError::InvalidExpression {
        field: name,
        source,
    };
    let mut expr = parse(text).map_err(invalid)?;
    let expected = default_unit.map(Unit::kind);
    if let Some(unit) = expr.units().into_iter().find(|u| Some(u.kind()) != expected) {
        return Err(invalid(ExprError::UnitMismatch {
            unit: unit.symbol(),
            expected: UnitKind::describe(expected),
        }));
    }
    if let Some(unit) = default_unit {
        if !expr.has_unit() && !expr.has_params() {
            expr = Expr::Unit(Box::new(expr), unit);
        }
    }
    expr.eval(bindings).map_err(invalid)
}

fn whole_teeth(value: Real) -> Result<u32, ConfigError> {
    if value.fract() != 0.0 {
        return Err(ConfigError::FractionalTeeth { value });
    }
    if value < 1.0 {
        return Err(ConfigError::TooFewTeeth);
    }
    if value > u32::MAX as Real {
        return Err(ConfigError::InvalidSetting(format!(
            "Number of teeth {value} is too large"
        )));
    }
    Ok(value as u32)
}

/// Letters, digits and underscores only; never empty.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a component name against the naming rules and the names already in use.
pub fn validate_name<S: AsRef<str>>(name: &str, existing: &[S]) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName);
    }
    if !is_valid_name(name) {
        return Err(ConfigError::InvalidName(name.to_string()));
    }
    if existing.iter().any(|taken| taken.as_ref() == name) {
        return Err(ConfigError::NameTaken(name.to_string()));
    }
    Ok(())
}

/// First of `{base}1`, `{base}2`, ... not in `existing`.
pub fn next_available_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    (1..)
        .map(|i| format!("{base}{i}"))
        .find(|candidate| !existing.iter().any(|taken| taken.as_ref() == candidate))
        .unwrap_or_else(|| base.to_string())
}
