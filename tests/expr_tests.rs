mod support;

use gearsrs::{
    ConfigError, DerivedDiameters, GearParameters, ParameterInputs, RackDimensions,
    SymbolicRack, SymbolicSpurGear, ToothDimensions,
    diameters::mirror_offset_angle,
    expr::{Bindings, ExprError, next_available_name, parse, validate_name},
    float_types::{DEG, LengthUnit, Real},
};

use proptest::prelude::*;

use crate::support::approx_eq;

fn sample_params() -> Vec<GearParameters> {
    vec![
        GearParameters::default(),
        GearParameters::new(14.5 * DEG, 1.25, 37).with_backlash(0.05),
        GearParameters::new(25.0 * DEG, 0.8, 9).with_root_fillet_radius(0.2),
        GearParameters::new(20.0 * DEG, 3.175, 120).with_backlash(0.1),
    ]
}

#[test]
fn spur_gear_formulas_match_numeric_derivation_exactly() {
    let symbolic = SymbolicSpurGear::new("SpurGear1");
    for params in sample_params() {
        let diameters = DerivedDiameters::derive(&params);
        let tooth = ToothDimensions::for_params(&params);
        assert_eq!(symbolic.diameters(&params), Ok(diameters));
        assert_eq!(symbolic.tooth_dimensions(&params), Ok(tooth));
        assert_eq!(
            symbolic.mirror_offset_angle(&params),
            Ok(mirror_offset_angle(&diameters, &tooth))
        );
    }
}

#[test]
fn rack_formulas_match_numeric_derivation_exactly() {
    for unit in [LengthUnit::Millimeter, LengthUnit::Inch] {
        let symbolic = SymbolicRack::new("Rack1", unit);
        for params in sample_params() {
            assert_eq!(
                symbolic.dimensions(&params),
                Ok(RackDimensions::derive(&params, unit))
            );
        }
    }
}

#[test]
fn formulas_print_and_reparse() {
    let symbolic = SymbolicSpurGear::new("g");
    let params = GearParameters::default();
    let values = symbolic.evaluate(&params).unwrap();
    let bindings = Bindings::new()
        .with("g_pressure_angle", params.pressure_angle)
        .with("g_module", params.module)
        .with("g_number_of_teeth", 20.0)
        .with("g_backlash", 0.0)
        .with("g_root_fillet_radius", 1.0)
        .with("g_thickness", 5.0);
    let mut reparsed = bindings;
    for entry in symbolic.table().iter() {
        let expr = parse(&entry.expr.to_string()).unwrap();
        assert_eq!(expr, entry.expr, "{}", entry.name);
        let value = expr.eval(&reparsed).unwrap();
        assert_eq!(Ok(value), values.value(&entry.name));
        reparsed.set(entry.name.clone(), value);
    }
}

#[test]
fn default_inputs_give_default_parameters() {
    assert_eq!(
        ParameterInputs::default().evaluate(LengthUnit::Millimeter),
        Ok(GearParameters::default())
    );
    let rack = ParameterInputs::rack_defaults()
        .evaluate(LengthUnit::Millimeter)
        .unwrap();
    assert_eq!(rack.number_of_teeth, 10);
}

#[test]
fn inputs_may_refer_to_earlier_fields() {
    let inputs = ParameterInputs {
        thickness: "2 * module".to_string(),
        root_fillet_radius: "module / 5".to_string(),
        ..ParameterInputs::default()
    };
    let params = inputs.evaluate(LengthUnit::Millimeter).unwrap();
    assert_eq!(params.thickness, 10.0);
    assert_eq!(params.root_fillet_radius, 1.0);
}

#[test]
fn bare_numbers_take_the_default_unit() {
    let inputs = ParameterInputs {
        pressure_angle: "20".to_string(),
        module: "0.2".to_string(),
        backlash: "0".to_string(),
        root_fillet_radius: "0.01".to_string(),
        thickness: "0.5 mm".to_string(),
        ..ParameterInputs::default()
    };
    let params = inputs.evaluate(LengthUnit::Inch).unwrap();
    assert_eq!(params.pressure_angle, 20.0 * DEG);
    assert!(approx_eq(params.module, 5.08, 1e-12));
    assert!(approx_eq(params.root_fillet_radius, 0.254, 1e-12));
    assert_eq!(params.thickness, 0.5);

    let radians = ParameterInputs {
        pressure_angle: "0.25 rad".to_string(),
        ..ParameterInputs::default()
    };
    assert_eq!(
        radians.evaluate(LengthUnit::Millimeter).unwrap().pressure_angle,
        0.25
    );
}

#[test]
fn bad_inputs_name_the_field() {
    let typo = ParameterInputs {
        module: "5 * modul".to_string(),
        ..ParameterInputs::default()
    };
    let err = typo.evaluate(LengthUnit::Millimeter).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidExpression {
            field: "Module",
            source: ExprError::UnknownParameter("modul".to_string()),
        }
    );
    assert!(err.to_string().starts_with("Module is not valid"));

    let fractional = ParameterInputs {
        number_of_teeth: "12.5".to_string(),
        ..ParameterInputs::default()
    };
    assert!(matches!(
        fractional.evaluate(LengthUnit::Millimeter),
        Err(ConfigError::FractionalTeeth { .. })
    ));

    let none = ParameterInputs {
        number_of_teeth: "0".to_string(),
        ..ParameterInputs::default()
    };
    assert_eq!(
        none.evaluate(LengthUnit::Millimeter),
        Err(ConfigError::TooFewTeeth)
    );

    let steep = ParameterInputs {
        pressure_angle: "50 deg".to_string(),
        ..ParameterInputs::default()
    };
    assert!(matches!(
        steep.evaluate(LengthUnit::Millimeter),
        Err(ConfigError::PressureAngleTooLarge { .. })
    ));

    let division = ParameterInputs {
        backlash: "1 / 0".to_string(),
        ..ParameterInputs::default()
    };
    assert!(matches!(
        division.evaluate(LengthUnit::Millimeter),
        Err(ConfigError::InvalidExpression {
            field: "Backlash",
            source: ExprError::NonFinite { .. },
        })
    ));
}

#[test]
fn units_must_suit_the_field() {
    let mismatch = |inputs: ParameterInputs| inputs.evaluate(LengthUnit::Millimeter).unwrap_err();

    let teeth = mismatch(ParameterInputs {
        number_of_teeth: "2 cm".to_string(),
        ..ParameterInputs::default()
    });
    assert_eq!(
        teeth,
        ConfigError::InvalidExpression {
            field: "Number of teeth",
            source: ExprError::UnitMismatch {
                unit: "cm",
                expected: "a plain number",
            },
        }
    );

    let angle = mismatch(ParameterInputs {
        pressure_angle: "0.3 mm".to_string(),
        ..ParameterInputs::default()
    });
    assert_eq!(
        angle,
        ConfigError::InvalidExpression {
            field: "Pressure angle",
            source: ExprError::UnitMismatch {
                unit: "mm",
                expected: "an angle",
            },
        }
    );
    assert_eq!(
        angle.to_string(),
        "Pressure angle is not valid: mm is not a valid unit here, expected an angle"
    );

    let module = mismatch(ParameterInputs {
        module: "200 deg".to_string(),
        ..ParameterInputs::default()
    });
    assert!(matches!(
        module,
        ConfigError::InvalidExpression {
            field: "Module",
            source: ExprError::UnitMismatch { unit: "deg", expected: "a length" },
        }
    ));

    // a unit inside a longer formula is checked too
    let thickness = mismatch(ParameterInputs {
        thickness: "2 * module + 1 rad".to_string(),
        ..ParameterInputs::default()
    });
    assert!(matches!(
        thickness,
        ConfigError::InvalidExpression { field: "Thickness", .. }
    ));

    let matching = ParameterInputs {
        pressure_angle: "0.3 rad".to_string(),
        module: "0.2 cm".to_string(),
        thickness: "1 in".to_string(),
        ..ParameterInputs::default()
    }
    .evaluate(LengthUnit::Millimeter)
    .unwrap();
    assert_eq!(matching.pressure_angle, 0.3);
    assert!(approx_eq(matching.module, 2.0, 1e-12));
    assert_eq!(matching.thickness, 25.4);
}

#[test]
fn extra_bindings_are_visible_to_formulas() {
    let inputs = ParameterInputs {
        module: "shaft_diameter / 4".to_string(),
        ..ParameterInputs::default()
    };
    let params = inputs
        .evaluate_with(LengthUnit::Millimeter, Bindings::new().with("shaft_diameter", 8.0))
        .unwrap();
    assert_eq!(params.module, 2.0);
}

#[test]
fn component_names() {
    let taken = ["SpurGear1", "SpurGear2", "Rack1"];
    assert_eq!(next_available_name("SpurGear", &taken), "SpurGear3");
    assert_eq!(next_available_name("Rack", &taken), "Rack2");
    assert_eq!(next_available_name("Rack", &[] as &[&str]), "Rack1");

    assert_eq!(validate_name("Gear_A", &taken), Ok(()));
    assert_eq!(validate_name("", &taken), Err(ConfigError::EmptyName));
    assert!(matches!(
        validate_name("my gear", &taken),
        Err(ConfigError::InvalidName(_))
    ));
    assert_eq!(
        validate_name("Rack1", &taken),
        Err(ConfigError::NameTaken("Rack1".to_string()))
    );
}

#[test]
fn missing_input_is_reported_by_name() {
    let table = SymbolicSpurGear::new("g");
    let partial = Bindings::new().with("g_module", 2.0);
    assert!(matches!(
        table.table().evaluate(partial),
        Err(ExprError::UnknownParameter(_))
    ));
}

proptest! {
    #[test]
    fn symbolic_and_numeric_agree_for_any_gear(
        degrees in 1.0..45.0 as Real,
        module in 0.1..20.0 as Real,
        teeth in 1u32..500,
        backlash_share in 0.0..0.5 as Real,
    ) {
        let params = GearParameters::new(degrees * DEG, module, teeth)
            .with_backlash(backlash_share * module);
        let diameters = DerivedDiameters::derive(&params);
        let tooth = ToothDimensions::for_params(&params);
        let symbolic = SymbolicSpurGear::new("SpurGear1");
        prop_assert_eq!(symbolic.diameters(&params), Ok(diameters));
        prop_assert_eq!(symbolic.tooth_dimensions(&params), Ok(tooth));
        prop_assert_eq!(
            SymbolicRack::new("Rack1", LengthUnit::Centimeter).dimensions(&params),
            Ok(RackDimensions::derive(&params, LengthUnit::Centimeter))
        );
    }
}
