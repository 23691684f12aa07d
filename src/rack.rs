//! Straight-sided involute racks.
//!
//! One tooth spans a single pitch from `x = 0` to `x = pitch`, root line on `y = 0`, tip at
//! `y = height`. The faces lean by the pressure angle and the tooth is `tooth_thickness`
//! wide on the pitch line `y = dedendum`. A box of one length unit closes the tooth
//! below the root line, so neighbouring teeth join into one bar when patterned along +x.

use std::fmt::Debug;

use nalgebra::{Point2, Vector2};
use tracing::{debug, instrument};

use crate::diameters::{DEDENDUM_FACTOR, ROOT_FILLET_FACTOR};
use crate::errors::{ConstructionError, GearError};
use crate::float_types::{DEG, LengthUnit, PI, Real};
use crate::involute::polar;
use crate::params::{BuildOptions, GearParameters};
use crate::pattern::LinearPattern;
use crate::sketch::{CircularArc, Curve, MirrorLine, Profile, select_smallest};
use crate::solid::{Body, GearSolid};

/// Rack proportions; lengths in millimetres, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RackDimensions {
    pub dedendum: Real,
    pub pitch: Real,
    /// Width of the tooth on the pitch line.
    pub tooth_thickness: Real,
    pub height: Real,
    /// Angle from the root line to the face, `pressure_angle + 90°`.
    pub face_angle: Real,
    /// `90° - pressure_angle`.
    pub mirrored_face_angle: Real,
    pub pitch_line_length: Real,
    pub bottom_box_height: Real,
    pub max_root_fillet_radius: Real,
}

impl RackDimensions {
    pub fn derive(params: &GearParameters, length_unit: LengthUnit) -> Self {
        let module = params.module;
        let dedendum = DEDENDUM_FACTOR * module;
        let pitch = PI * module;
        let tooth_thickness = (pitch / 2.0) - params.backlash;
        let height = module + dedendum;
        let face_angle = params.pressure_angle + 90.0 * DEG;
        let mirrored_face_angle = 90.0 * DEG - params.pressure_angle;
        let pitch_line_length = params.number_of_teeth as Real * pitch;
        let bottom_box_height = 1.0 * length_unit.to_mm();
        let max_root_fillet_radius = ROOT_FILLET_FACTOR * (pitch / 2.0);

        Self {
            dedendum,
            pitch,
            tooth_thickness,
            height,
            face_angle,
            mirrored_face_angle,
            pitch_line_length,
            bottom_box_height,
            max_root_fillet_radius,
        }
    }

    /// Addendum, from the pitch line up to the tip.
    pub fn addendum(&self) -> Real {
        self.height - self.dedendum
    }

    /// Width of the flat tip.
    pub fn top_land_width(&self) -> Real {
        let lean = -self.face_angle.cos() / self.face_angle.sin();
        self.tooth_thickness - 2.0 * self.addendum() * lean
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RackBuilder {
    params: GearParameters,
    options: BuildOptions,
}

impl RackBuilder {
    pub fn new(params: GearParameters) -> Self {
        Self {
            params,
            options: BuildOptions::default(),
        }
    }

    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    #[instrument(skip(self), fields(teeth = self.params.number_of_teeth, module = self.params.module))]
    pub fn build(&self) -> Result<Rack, GearError> {
        self.params.validate()?;
        self.options.validate()?;

        let dimensions = RackDimensions::derive(&self.params, self.options.length_unit);
        debug!(
            pitch = dimensions.pitch,
            height = dimensions.height,
            tooth_thickness = dimensions.tooth_thickness,
            "derived rack dimensions"
        );
        let tooth = RackToothProfile::build(
            &dimensions,
            self.params.root_fillet_radius,
            self.options.arc_segments,
        )?;

        Ok(Rack {
            params: self.params,
            options: self.options,
            dimensions,
            tooth,
            pattern: LinearPattern::along_x(self.params.number_of_teeth, dimensions.pitch),
        })
    }
}

/// One rack tooth with its bottom box.
#[derive(Debug, Clone, PartialEq)]
pub struct RackToothProfile {
    /// Closed counter-clockwise boundary.
    pub profile: Profile,
    /// Where the faces meet the root line, left then right.
    pub face_feet: [Point2<Real>; 2],
    /// Ends of the top land, left then right.
    pub top_corners: [Point2<Real>; 2],
    /// Root fillets, left then right, each running from the root line to the face.
    pub fillets: Option<[CircularArc; 2]>,
}

impl RackToothProfile {
    fn build(
        dimensions: &RackDimensions,
        fillet_radius: Real,
        arc_segments: usize,
    ) -> Result<Self, ConstructionError> {
        let pitch = dimensions.pitch;
        let center = pitch / 2.0;
        let half = dimensions.tooth_thickness / 2.0;

        // The right face leans back over the tooth: its direction from the foot is the
        // face angle measured from the root line.
        let up = polar(dimensions.face_angle);
        let lean = -up.x / up.y;
        let right_foot = Point2::new(center + half + dimensions.dedendum * lean, 0.0);
        let right_top = Point2::new(center + half - dimensions.addendum() * lean, dimensions.height);

        if right_foot.x > pitch {
            return Err(ConstructionError::RackTooth {
                shape: "rack tooth",
                reason: format!(
                    "faces reach past the tooth pitch ({} > {pitch})",
                    right_foot.x
                ),
            });
        }
        if right_top.x - center <= 0.0 {
            return Err(ConstructionError::RackTooth {
                shape: "rack tooth",
                reason: "faces meet below the top land".to_string(),
            });
        }

        let root_end = Point2::new(pitch, 0.0);
        let (right_half, fillet) = if fillet_radius > 0.0 {
            let corner = face_fillet(right_foot, Vector2::x(), up, fillet_radius);
            let root_room = pitch - right_foot.x;
            let face_room = (right_top - right_foot).norm();
            if corner.tangent_distance > root_room || corner.tangent_distance > face_room {
                return Err(ConstructionError::FilletDoesNotFit {
                    shape: "rack tooth root",
                    radius: fillet_radius,
                });
            }
            (
                vec![
                    Curve::line(root_end, corner.on_root),
                    Curve::Arc(corner.arc),
                    Curve::line(corner.on_face, right_top),
                ],
                Some(corner.arc),
            )
        } else {
            (
                vec![Curve::line(root_end, right_foot), Curve::line(right_foot, right_top)],
                None,
            )
        };

        let centre_line = MirrorLine::through(Point2::new(center, 0.0), Point2::new(center, dimensions.height))?;
        let left_half: Vec<Curve> = centre_line
            .reflect_chain(&right_half)
            .iter()
            .rev()
            .map(Curve::reversed)
            .collect();
        let left_top = centre_line.reflect(&right_top);
        let left_foot = centre_line.reflect(&right_foot);

        let box_bottom = -dimensions.bottom_box_height;
        let mut curves = vec![
            Curve::line(Point2::new(0.0, box_bottom), Point2::new(pitch, box_bottom)),
            Curve::line(Point2::new(pitch, box_bottom), root_end),
        ];
        curves.extend(right_half);
        curves.push(Curve::line(right_top, left_top));
        curves.extend(left_half);
        curves.push(Curve::line(Point2::origin(), Point2::new(0.0, box_bottom)));

        let profile = select_smallest(
            "rack tooth",
            vec![Profile::new("rack tooth", curves)?],
            arc_segments,
        )?;

        let fillets = fillet.map(|right| {
            let left = match centre_line.reflect_curve(&Curve::Arc(right)) {
                Curve::Arc(arc) => arc,
                _ => right,
            };
            [left, right]
        });

        Ok(Self {
            profile,
            face_feet: [left_foot, right_foot],
            top_corners: [left_top, right_top],
            fillets,
        })
    }
}

struct CornerFillet {
    arc: CircularArc,
    on_root: Point2<Real>,
    on_face: Point2<Real>,
    tangent_distance: Real,
}

/// Round the corner at `corner` between the root line leaving along `along_root` and the
/// face leaving along `along_face` (both unit vectors). The arc runs root to face.
fn face_fillet(
    corner: Point2<Real>,
    along_root: Vector2<Real>,
    along_face: Vector2<Real>,
    radius: Real,
) -> CornerFillet {
    let angle = along_root.angle(&along_face);
    let tangent_distance = radius / (angle / 2.0).tan();
    let bisector = (along_root + along_face).normalize();
    let center = corner + bisector * (radius / (angle / 2.0).sin());
    let on_root = corner + along_root * tangent_distance;
    let on_face = corner + along_face * tangent_distance;
    CornerFillet {
        arc: CircularArc::minor(center, on_root, on_face),
        on_root,
        on_face,
        tangent_distance,
    }
}

/// A rack: one tooth, its construction pitch line and the linear pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Rack {
    pub params: GearParameters,
    pub options: BuildOptions,
    pub dimensions: RackDimensions,
    pub tooth: RackToothProfile,
    pub pattern: LinearPattern,
}

impl Rack {
    /// Construction line along the pitch line of all teeth.
    pub fn pitch_line(&self) -> Curve {
        let y = self.dimensions.dedendum;
        Curve::line(
            Point2::new(0.0, y),
            Point2::new(self.dimensions.pitch_line_length, y),
        )
    }

    /// Total length along x.
    pub fn length(&self) -> Real {
        self.pattern.span()
    }

    /// Extrude the tooth and pattern it; a rack has no hub.
    pub fn solid<S: Clone + Send + Sync + Debug>(
        &self,
        metadata: Option<S>,
    ) -> Result<GearSolid<S>, ConstructionError> {
        let ring = self.tooth.profile.to_polygon(self.options.arc_segments);
        let tooth = Body::extrude("rack tooth", &ring, self.params.thickness, metadata)?;
        let teeth = tooth.copies(&self.pattern.transforms().collect::<Vec<_>>());
        Ok(GearSolid { hub: None, teeth })
    }
}
