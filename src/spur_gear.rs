//! Involute spur gears.
//!
//! One tooth is built in the XY plane with the gear centre at the origin and the tooth
//! pointing along +x:
//!
//! 1. the lower flank (`y < 0`) is unrolled from the base circle and clipped between the
//!    root and outside circles ([`InvoluteFlank`]),
//! 2. an optional root fillet blends the flank foot into the root circle,
//! 3. the flank is mirrored across the centre line to get the upper flank,
//! 4. the top land arc joins the flank tips and a root arc closes the tooth.
//!
//! The tooth is then repeated `number_of_teeth` times around the z axis.

use std::fmt::Debug;

use nalgebra::{Point2, Vector2};
use tracing::{debug, instrument};

use crate::diameters::{DerivedDiameters, ToothDimensions, mirror_offset_angle};
use crate::errors::{ConstructionError, GearError};
use crate::float_types::{Real, TAU, tolerance};
use crate::involute::{InvoluteFlank, polar};
use crate::params::{BuildOptions, GearParameters};
use crate::pattern::CircularPattern;
use crate::sketch::{CircularArc, Curve, MirrorLine, Profile, select_smallest};
use crate::solid::{Body, GearSolid};

/// Builds a [`SpurGear`] from parameters.
///
/// ```
/// use gearsrs::{GearParameters, SpurGearBuilder};
///
/// let gear = SpurGearBuilder::new(GearParameters::default()).build()?;
/// assert_eq!(gear.diameters.pitch_diameter, 100.0);
/// assert_eq!(gear.pattern.count, 20);
/// # Ok::<(), gearsrs::GearError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpurGearBuilder {
    params: GearParameters,
    options: BuildOptions,
}

impl SpurGearBuilder {
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
    pub fn build(&self) -> Result<SpurGear, GearError> {
        self.params.validate()?;
        self.options.validate()?;

        let diameters = DerivedDiameters::derive(&self.params);
        if diameters.root_diameter <= 0.0 {
            return Err(ConstructionError::DegenerateCircle {
                circle: "root circle",
                diameter: diameters.root_diameter,
            }
            .into());
        }
        let tooth_dimensions = ToothDimensions::for_params(&self.params);
        let offset = mirror_offset_angle(&diameters, &tooth_dimensions);
        debug!(
            pitch_diameter = diameters.pitch_diameter,
            base_diameter = diameters.base_diameter,
            root_diameter = diameters.root_diameter,
            outside_diameter = diameters.outside_diameter,
            mirror_offset_deg = offset.to_degrees(),
            "derived spur gear circles"
        );

        let tooth = ToothProfile::build(
            &self.params,
            &diameters,
            offset,
            &self.options,
        )?;

        Ok(SpurGear {
            params: self.params,
            options: self.options,
            diameters,
            tooth_dimensions,
            mirror_offset_angle: offset,
            tooth,
            pattern: CircularPattern::around_z(self.params.number_of_teeth),
        })
    }
}

/// The boundary of one spur tooth and the pieces it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothProfile {
    /// Closed counter-clockwise boundary: lower flank, top land, upper flank, root arc.
    pub profile: Profile,
    /// The lower flank, clipped, with its raw involute samples.
    pub flank: InvoluteFlank,
    /// The mirrored flank, running outwards like `flank.points`.
    pub upper_flank: Vec<Point2<Real>>,
    pub mirror_line: MirrorLine,
    /// Root fillets below and above the centre line, each running from the root circle
    /// to the flank.
    pub fillets: Option<[CircularArc; 2]>,
    /// Where the lower side of the tooth leaves the root circle.
    pub root_point: Point2<Real>,
}

impl ToothProfile {
    fn build(
        params: &GearParameters,
        diameters: &DerivedDiameters,
        offset: Real,
        options: &BuildOptions,
    ) -> Result<Self, ConstructionError> {
        let root_radius = diameters.root_radius();
        let outside_radius = diameters.outside_radius();

        let flank = InvoluteFlank::build(diameters, offset, &options.involute)?;
        let mirror_line = MirrorLine::through(Point2::origin(), Point2::new(outside_radius, 0.0))?;

        let (mut lower, fillet) = if params.root_fillet_radius > 0.0 {
            let (fillet, chain) = root_fillet(&flank, root_radius, params.root_fillet_radius)?;
            let mut curves = vec![Curve::Arc(fillet)];
            curves.extend(chain);
            (curves, Some(fillet))
        } else {
            (flank_chain(&flank.points, flank.radial_foot), None)
        };
        let root_point = lower[0].start();

        let gap = TAU / params.number_of_teeth as Real - 2.0 * root_point.y.atan2(root_point.x).abs();
        if gap * root_radius < -tolerance() {
            return Err(ConstructionError::TeethOverlap {
                gap_degrees: gap.to_degrees(),
            });
        }

        let tip = flank.tip();
        let upper_tip = mirror_line.reflect(&tip);
        let upper_root = mirror_line.reflect(&root_point);
        let top_land = Curve::Arc(CircularArc::between(Point2::origin(), tip, upper_tip, true));

        let upper: Vec<Curve> = mirror_line
            .reflect_chain(&lower)
            .iter()
            .rev()
            .map(Curve::reversed)
            .collect();

        lower.push(top_land);
        lower.extend(upper);
        let mut tooth = lower.clone();
        tooth.push(Curve::Arc(CircularArc::minor(Point2::origin(), upper_root, root_point)));
        let mut outline = lower;
        outline.push(Curve::Arc(CircularArc::between(
            Point2::origin(),
            upper_root,
            root_point,
            true,
        )));

        let candidates = vec![
            Profile::new("spur tooth", tooth)?,
            Profile::new("spur tooth", outline)?,
        ];
        let profile = select_smallest("spur tooth", candidates, options.arc_segments)?;

        let fillets = fillet.map(|arc| {
            let mirrored = match mirror_line.reflect_curve(&Curve::Arc(arc)) {
                Curve::Arc(mirrored) => mirrored,
                _ => arc,
            };
            [arc, mirrored]
        });

        Ok(Self {
            profile,
            upper_flank: mirror_line.reflect_points(&flank.points),
            flank,
            mirror_line,
            fillets,
            root_point,
        })
    }

    /// Angle between the centre line and where the tooth meets the root circle.
    pub fn root_half_angle(&self) -> Real {
        self.root_point.y.atan2(self.root_point.x).abs()
    }
}

/// The flank as curves: the radial foot as a line, the involute as a polyline.
fn flank_chain(points: &[Point2<Real>], radial_foot: bool) -> Vec<Curve> {
    if radial_foot && points.len() > 2 {
        vec![
            Curve::line(points[0], points[1]),
            Curve::Polyline(points[1..].to_vec()),
        ]
    } else {
        vec![Curve::Polyline(points.to_vec())]
    }
}

/// Fillet of `radius` tangent to the flank and to the root circle from outside.
///
/// Returns the fillet arc (root circle to flank) and the rest of the flank after the
/// tangent point.
fn root_fillet(
    flank: &InvoluteFlank,
    root_radius: Real,
    radius: Real,
) -> Result<(CircularArc, Vec<Curve>), ConstructionError> {
    let points = &flank.points;
    for (j, pair) in points.windows(2).enumerate() {
        let (p0, p1) = (pair[0], pair[1]);
        let length = (p1 - p0).norm();
        if length <= 0.0 {
            continue;
        }
        let u = (p1 - p0) / length;
        // normal into the gap below the lower flank
        let n = Vector2::new(u.y, -u.x);
        let q = p0 + n * radius;
        let qu = q.coords.dot(&u);
        let disc = qu * qu - q.coords.norm_squared() + (root_radius + radius).powi(2);
        if disc < 0.0 {
            continue;
        }
        let s = -qu + disc.sqrt();
        if !(0.0..=length).contains(&s) {
            continue;
        }

        let center = q + u * s;
        let line_point = p0 + u * s;
        let root_point = Point2::from(center.coords * (root_radius / (root_radius + radius)));
        let arc = CircularArc::minor(center, root_point, line_point);

        let mut rest = vec![line_point];
        rest.extend_from_slice(&points[j + 1..]);
        let chain = flank_chain(&rest, flank.radial_foot && j == 0);
        debug!(segment = j, tangent_offset = s, "placed root fillet");
        return Ok((arc, chain));
    }
    Err(ConstructionError::FilletDoesNotFit {
        shape: "spur tooth root",
        radius,
    })
}

/// A spur gear: its circles, one tooth and how the tooth is repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct SpurGear {
    pub params: GearParameters,
    pub options: BuildOptions,
    pub diameters: DerivedDiameters,
    pub tooth_dimensions: ToothDimensions,
    /// Angle of the flank's base point below the centre line, radians.
    pub mirror_offset_angle: Real,
    pub tooth: ToothProfile,
    pub pattern: CircularPattern,
}

impl SpurGear {
    /// Angle between neighbouring teeth, in degrees.
    pub fn tooth_angle_deg(&self) -> Real {
        360.0 / self.pattern.count as Real
    }

    /// The whole gear perimeter: every tooth, joined by root arcs.
    pub fn outline(&self) -> Result<Profile, ConstructionError> {
        let root_radius = self.diameters.root_radius();
        let half = self.tooth.root_half_angle();
        let tooth_curves = self.tooth.profile.curves();
        // the tooth profile ends with its root arc
        let flanks = &tooth_curves[..tooth_curves.len() - 1];

        let mut curves = Vec::with_capacity(tooth_curves.len() * self.pattern.count as usize);
        for i in 0..self.pattern.count {
            let angle = self.pattern.angle(i);
            curves.extend(flanks.iter().map(|c| c.rotated(angle)));
            let gap = self.pattern.angle(1) - 2.0 * half;
            if gap * root_radius > tolerance() {
                curves.push(Curve::Arc(CircularArc::new(
                    Point2::origin(),
                    root_radius,
                    angle + half,
                    gap,
                )));
            }
        }
        Profile::new("spur gear outline", curves)
    }

    /// Extrude the hub (root disk) and every tooth to the gear thickness.
    pub fn solid<S: Clone + Send + Sync + Debug>(
        &self,
        metadata: Option<S>,
    ) -> Result<GearSolid<S>, ConstructionError> {
        let thickness = self.params.thickness;
        let root_radius = self.diameters.root_radius();
        let segments = self.options.circle_segments;
        let disk: Vec<Point2<Real>> = (0..segments)
            .map(|i| Point2::origin() + polar(i as Real * TAU / segments as Real) * root_radius)
            .collect();
        let hub = Body::extrude("spur gear hub", &disk, thickness, metadata.clone())?;

        let ring = self.tooth.profile.to_polygon(self.options.arc_segments);
        let tooth = Body::extrude("spur tooth", &ring, thickness, metadata)?;
        let teeth = tooth.copies(&self.pattern.transforms().collect::<Vec<_>>());
        debug!(teeth = self.pattern.count, "extruded spur gear");

        Ok(GearSolid {
            hub: Some(hub),
            teeth,
        })
    }
}
