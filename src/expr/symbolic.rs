//! Formula tables for the derived gear and rack quantities.
//!
//! Each derived quantity is a named formula over the user inputs and the quantities
//! before it, like a user parameter table in a parametric CAD model. Evaluating a table
//! produces exactly the numbers [`DerivedDiameters`], [`ToothDimensions`] and
//! [`RackDimensions`] compute, since the operations happen in the same order.

use super::{Bindings, Expr, ExprError, Unit};
use crate::diameters::{DEDENDUM_FACTOR, DerivedDiameters, ROOT_FILLET_FACTOR, ToothDimensions};
use crate::float_types::{LengthUnit, Real};
use crate::params::GearParameters;
use crate::rack::RackDimensions;

pub(crate) const PRESSURE_ANGLE: &str = "pressure_angle";
pub(crate) const MODULE: &str = "module";
pub(crate) const NUMBER_OF_TEETH: &str = "number_of_teeth";
pub(crate) const BACKLASH: &str = "backlash";
pub(crate) const ROOT_FILLET_RADIUS: &str = "root_fillet_radius";
pub(crate) const THICKNESS: &str = "thickness";

/// `{prefix}_{name}`, or just `name` for an empty prefix.
pub(crate) fn qualified(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}_{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedFormula {
    pub name: String,
    pub expr: Expr,
    pub comment: &'static str,
}

/// Ordered list of named formulas; each may refer to inputs and to earlier entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    entries: Vec<NamedFormula>,
}

impl ParameterTable {
    pub fn push(&mut self, name: String, expr: Expr, comment: &'static str) {
        self.entries.push(NamedFormula {
            name,
            expr,
            comment,
        });
    }

    pub fn get(&self, name: &str) -> Option<&NamedFormula> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedFormula> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every entry in order, adding each result to the bindings.
    pub fn evaluate(&self, mut bindings: Bindings) -> Result<Bindings, ExprError> {
        for entry in &self.entries {
            let value = entry.expr.eval(&bindings)?;
            bindings.set(entry.name.clone(), value);
        }
        Ok(bindings)
    }
}

fn bind_inputs(prefix: &str, params: &GearParameters) -> Bindings {
    Bindings::new()
        .with(qualified(prefix, PRESSURE_ANGLE), params.pressure_angle)
        .with(qualified(prefix, MODULE), params.module)
        .with(qualified(prefix, NUMBER_OF_TEETH), params.number_of_teeth as Real)
        .with(qualified(prefix, BACKLASH), params.backlash)
        .with(qualified(prefix, ROOT_FILLET_RADIUS), params.root_fillet_radius)
        .with(qualified(prefix, THICKNESS), params.thickness)
}

/// Parameter table of a spur gear.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicSpurGear {
    prefix: String,
    table: ParameterTable,
}

impl SymbolicSpurGear {
    pub fn new(prefix: &str) -> Self {
        let p = |name: &str| Expr::param(qualified(prefix, name));
        let mut table = ParameterTable::default();
        let mut add = |name: &str, expr: Expr, comment: &'static str| {
            table.push(qualified(prefix, name), expr, comment)
        };

        add("pitch_diameter", p(NUMBER_OF_TEETH) * p(MODULE), "Pitch diameter");
        add("dedendum", DEDENDUM_FACTOR * p(MODULE), "Dedendum");
        add(
            "root_diameter",
            p("pitch_diameter") - 2.0 * p("dedendum"),
            "Root diameter",
        );
        add(
            "base_diameter",
            p("pitch_diameter") * p(PRESSURE_ANGLE).cos(),
            "Base circle diameter",
        );
        add(
            "outside_diameter",
            p("pitch_diameter") + 2.0 * p(MODULE),
            "Outside diameter",
        );
        add("circular_pitch", Expr::Pi * p(MODULE), "Circular pitch");
        add("tooth_thickness", p("circular_pitch") / 2.0, "Tooth thickness");
        add(
            "half_tooth_thickness",
            (p("tooth_thickness") - p(BACKLASH)) / 2.0,
            "Half tooth thickness",
        );
        add(
            "max_root_fillet_radius",
            ROOT_FILLET_FACTOR * p("tooth_thickness"),
            "Largest root fillet radius",
        );
        add(
            "mirror_offset_angle",
            ((p("half_tooth_thickness") / (Expr::Pi * p("root_diameter"))) * 360.0)
                .with_unit(Unit::Degree),
            "Flank offset from the tooth centre line",
        );

        Self {
            prefix: prefix.to_string(),
            table,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full parameter name for a base name such as `"root_diameter"`.
    pub fn name(&self, base: &str) -> String {
        qualified(&self.prefix, base)
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn evaluate(&self, params: &GearParameters) -> Result<Bindings, ExprError> {
        self.table.evaluate(bind_inputs(&self.prefix, params))
    }

    pub fn diameters(&self, params: &GearParameters) -> Result<DerivedDiameters, ExprError> {
        let values = self.evaluate(params)?;
        Ok(DerivedDiameters {
            pitch_diameter: values.value(&self.name("pitch_diameter"))?,
            base_diameter: values.value(&self.name("base_diameter"))?,
            root_diameter: values.value(&self.name("root_diameter"))?,
            outside_diameter: values.value(&self.name("outside_diameter"))?,
            dedendum: values.value(&self.name("dedendum"))?,
        })
    }

    pub fn tooth_dimensions(&self, params: &GearParameters) -> Result<ToothDimensions, ExprError> {
        let values = self.evaluate(params)?;
        Ok(ToothDimensions {
            circular_pitch: values.value(&self.name("circular_pitch"))?,
            tooth_thickness: values.value(&self.name("tooth_thickness"))?,
            half_tooth_thickness: values.value(&self.name("half_tooth_thickness"))?,
            max_root_fillet_radius: values.value(&self.name("max_root_fillet_radius"))?,
        })
    }

    pub fn mirror_offset_angle(&self, params: &GearParameters) -> Result<Real, ExprError> {
        self.evaluate(params)?
            .value(&self.name("mirror_offset_angle"))
    }
}

/// Parameter table of a rack.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicRack {
    prefix: String,
    table: ParameterTable,
}

impl SymbolicRack {
    pub fn new(prefix: &str, length_unit: LengthUnit) -> Self {
        let p = |name: &str| Expr::param(qualified(prefix, name));
        let mut table = ParameterTable::default();
        let mut add = |name: &str, expr: Expr, comment: &'static str| {
            table.push(qualified(prefix, name), expr, comment)
        };

        add("dedendum", DEDENDUM_FACTOR * p(MODULE), "Dedendum");
        add("pitch", Expr::Pi * p(MODULE), "Linear pitch");
        add(
            "tooth_thickness",
            (p("pitch") / 2.0) - p(BACKLASH),
            "Tooth thickness on the pitch line",
        );
        add("height", p(MODULE) + p("dedendum"), "Tooth height");
        add(
            "face_angle",
            p(PRESSURE_ANGLE) + Expr::num(90.0).with_unit(Unit::Degree),
            "Face angle from the root line",
        );
        add(
            "mirrored_face_angle",
            Expr::num(90.0).with_unit(Unit::Degree) - p(PRESSURE_ANGLE),
            "Mirrored face angle from the root line",
        );
        add(
            "pitch_line_length",
            p(NUMBER_OF_TEETH) * p("pitch"),
            "Length of the pitch line",
        );
        add(
            "bottom_box_height",
            Expr::num(1.0).with_unit(Unit::from(length_unit)),
            "Height of the box under the root line",
        );
        add(
            "max_root_fillet_radius",
            ROOT_FILLET_FACTOR * (p("pitch") / 2.0),
            "Largest root fillet radius",
        );

        Self {
            prefix: prefix.to_string(),
            table,
        }
    }

    pub fn name(&self, base: &str) -> String {
        qualified(&self.prefix, base)
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn evaluate(&self, params: &GearParameters) -> Result<Bindings, ExprError> {
        self.table.evaluate(bind_inputs(&self.prefix, params))
    }

    pub fn dimensions(&self, params: &GearParameters) -> Result<RackDimensions, ExprError> {
        let values = self.evaluate(params)?;
        Ok(RackDimensions {
            dedendum: values.value(&self.name("dedendum"))?,
            pitch: values.value(&self.name("pitch"))?,
            tooth_thickness: values.value(&self.name("tooth_thickness"))?,
            height: values.value(&self.name("height"))?,
            face_angle: values.value(&self.name("face_angle"))?,
            mirrored_face_angle: values.value(&self.name("mirrored_face_angle"))?,
            pitch_line_length: values.value(&self.name("pitch_line_length"))?,
            bottom_box_height: values.value(&self.name("bottom_box_height"))?,
            max_root_fillet_radius: values.value(&self.name("max_root_fillet_radius"))?,
        })
    }
}
