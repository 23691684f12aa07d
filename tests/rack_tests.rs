mod support;

use gearsrs::{
    BuildOptions, ConfigError, GearError, GearParameters, RackBuilder, RackDimensions,
    float_types::{DEG, LengthUnit},
    sketch::Curve,
};

use crate::support::{approx_eq, bounding_box, signed_area};

#[test]
fn dimensions_for_module_5() {
    let d = RackDimensions::derive(&GearParameters::default(), LengthUnit::Millimeter);
    assert!(approx_eq(d.pitch, 15.707_963, 1e-6));
    assert_eq!(d.dedendum, 6.25);
    assert_eq!(d.height, 11.25);
    assert!(approx_eq(d.tooth_thickness, d.pitch / 2.0, 1e-12));
    assert!(approx_eq(d.face_angle.to_degrees(), 110.0, 1e-9));
    assert!(approx_eq(d.mirrored_face_angle.to_degrees(), 70.0, 1e-9));
    assert!(approx_eq(d.pitch_line_length, 20.0 * d.pitch, 1e-9));
    assert_eq!(d.bottom_box_height, 1.0);
    assert!(approx_eq(d.max_root_fillet_radius, 3.1416, 1e-4));
}

#[test]
fn profile_is_closed_and_counter_clockwise() {
    let rack = RackBuilder::new(GearParameters::default()).build().unwrap();
    let curves = rack.tooth.profile.curves();
    for (i, c) in curves.iter().enumerate() {
        let next = &curves[(i + 1) % curves.len()];
        assert!((c.end() - next.start()).norm() < 1e-9);
    }
    let ring = rack.tooth.profile.to_polygon(rack.options.arc_segments);
    assert!(signed_area(&ring) > 0.0);

    let [min_x, min_y, max_x, max_y] = bounding_box(&ring);
    assert!(approx_eq(min_x, 0.0, 1e-9));
    assert!(approx_eq(max_x, rack.dimensions.pitch, 1e-9));
    assert!(approx_eq(min_y, -1.0, 1e-9));
    assert!(approx_eq(max_y, 11.25, 1e-9));
}

#[test]
fn sharp_tooth_area_is_box_plus_trapezoid() {
    let params = GearParameters::default().with_root_fillet_radius(0.0);
    let rack = RackBuilder::new(params).build().unwrap();
    let d = rack.dimensions;
    let lean = (20.0 * DEG).tan();
    let bottom = d.tooth_thickness + 2.0 * d.dedendum * lean;
    let top = d.tooth_thickness - 2.0 * 5.0 * lean;
    assert!(approx_eq(d.top_land_width(), top, 1e-9));
    let expected = d.pitch * d.bottom_box_height + d.height * (bottom + top) / 2.0;
    assert!(approx_eq(rack.tooth.profile.signed_area(8), expected, 1e-9));

    let [left, right] = rack.tooth.face_feet;
    assert!(approx_eq(right.x - left.x, bottom, 1e-9));
    assert!(approx_eq(left.x + right.x, d.pitch, 1e-9));
}

#[test]
fn fillets_fill_the_root_corners() {
    let sharp = RackBuilder::new(GearParameters::default().with_root_fillet_radius(0.0))
        .build()
        .unwrap();
    let round = RackBuilder::new(GearParameters::default()).build().unwrap();
    // the corner between root line and face is concave, rounding it adds material
    assert!(round.tooth.profile.signed_area(8) > sharp.tooth.profile.signed_area(8));
    let [left, right] = round.tooth.fillets.unwrap();
    assert!(approx_eq(left.center.x + right.center.x, round.dimensions.pitch, 1e-9));
}

#[test]
fn pitch_line_spans_every_tooth() {
    let params = GearParameters::new(20.0 * DEG, 2.0, 7).with_root_fillet_radius(0.0);
    let rack = RackBuilder::new(params)
        .build()
        .unwrap();
    match rack.pitch_line() {
        Curve::Line { start, end } => {
            assert_eq!(start.y, 2.5);
            assert_eq!(end.y, 2.5);
            assert!(approx_eq(end.x - start.x, 7.0 * 2.0 * gearsrs::float_types::PI, 1e-9));
        },
        other => panic!("expected a line, got {other:?}"),
    }
    assert!(approx_eq(rack.length(), rack.dimensions.pitch_line_length, 1e-9));
}

#[test]
fn solid_has_one_body_per_tooth() {
    let rack = RackBuilder::new(GearParameters::new(20.0 * DEG, 5.0, 10))
        .build()
        .unwrap();
    let solid = rack.solid::<()>(None).unwrap();
    assert!(solid.hub.is_none());
    assert_eq!(solid.body_count(), 10);

    let area = rack.tooth.profile.signed_area(rack.options.arc_segments);
    assert!(approx_eq(solid.volume(), 10.0 * area * 5.0, 1e-6));

    let bounds = solid.bounding_box();
    assert!(approx_eq(bounds.maxs.x - bounds.mins.x, 10.0 * rack.dimensions.pitch, 1e-9));
}

#[test]
fn bottom_box_follows_the_length_unit() {
    let options = BuildOptions {
        length_unit: LengthUnit::Inch,
        ..BuildOptions::default()
    };
    let rack = RackBuilder::new(GearParameters::default())
        .options(options)
        .build()
        .unwrap();
    assert_eq!(rack.dimensions.bottom_box_height, 25.4);
    let ring = rack.tooth.profile.to_polygon(8);
    let [_, min_y, _, _] = bounding_box(&ring);
    assert!(approx_eq(min_y, -25.4, 1e-9));
}

#[test]
fn backlash_narrows_the_tooth() {
    let d = RackDimensions::derive(&GearParameters::default().with_backlash(0.2), LengthUnit::Millimeter);
    assert!(approx_eq(d.tooth_thickness, d.pitch / 2.0 - 0.2, 1e-12));
}

#[test]
fn rack_rejects_oversized_fillet() {
    let params = GearParameters::default().with_root_fillet_radius(3.5);
    assert!(matches!(
        RackBuilder::new(params).build(),
        Err(GearError::Config(ConfigError::RootFilletRadiusTooLarge { .. }))
    ));
}

#[test]
fn tooth_heights_scale_with_module() {
    for module in [0.5, 1.0, 2.5, 10.0] {
        let d = RackDimensions::derive(&GearParameters::new(20.0 * DEG, module, 4), LengthUnit::Millimeter);
        assert!(approx_eq(d.height, 2.25 * module, 1e-12));
        assert!(approx_eq(d.addendum(), module, 1e-12));
        assert!(d.top_land_width() > 0.0);
    }
}

#[test]
fn narrow_gap_leaves_no_room_for_the_fillet() {
    // module 2: the gap floor is ~1.32 wide, a 1 mm fillet needs ~1.4
    let params = GearParameters::new(20.0 * DEG, 2.0, 7);
    assert!(matches!(
        RackBuilder::new(params).build(),
        Err(GearError::Construction(gearsrs::ConstructionError::FilletDoesNotFit { .. }))
    ));
}
