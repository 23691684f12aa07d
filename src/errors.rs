//! Configuration and construction errors

use crate::expr::ExprError;
use crate::float_types::Real;

/// Invalid parameter combinations, settings or formulas.
///
/// These are detected before any geometry is built and carry a message the user can act on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Pressure angle must be greater than 0 (got {degrees} deg)")]
    PressureAngleTooSmall { degrees: Real },
    #[error("Pressure angle must be at most 45 degrees (got {degrees} deg)")]
    PressureAngleTooLarge { degrees: Real },
    #[error("Number of teeth must be greater than 0")]
    TooFewTeeth,
    #[error("Number of teeth must be a whole number (got {value})")]
    FractionalTeeth { value: Real },
    #[error("Module must be greater than 0 (got {value})")]
    ModuleNotPositive { value: Real },
    #[error("Thickness must be greater than 0 (got {value})")]
    ThicknessNotPositive { value: Real },
    #[error("Backlash must not be negative (got {value})")]
    NegativeBacklash { value: Real },
    #[error("Backlash {value} is too large. It must be less than the tooth thickness {max}")]
    BacklashTooLarge { value: Real, max: Real },
    #[error("Root fillet radius must not be negative (got {value})")]
    NegativeRootFilletRadius { value: Real },
    #[error("Root fillet radius {value} is too large. It must be at most {max}")]
    RootFilletRadiusTooLarge { value: Real, max: Real },
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} is not valid: {source}")]
    InvalidExpression {
        field: &'static str,
        #[source]
        source: ExprError,
    },
    #[error("Invalid build setting: {0}")]
    InvalidSetting(String),
    #[error("Name is required")]
    EmptyName,
    #[error("Name must only contain letters, numbers, underscores, no spaces (got {0:?})")]
    InvalidName(String),
    #[error("Name {0:?} is already taken")]
    NameTaken(String),
}

/// A geometric invariant was violated while constructing a profile.
///
/// These indicate degenerate geometry for extreme parameter ratios; the build is aborted
/// and the failing sub-shape is named.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    #[error("{circle} has a non-positive diameter ({diameter})")]
    DegenerateCircle { circle: &'static str, diameter: Real },
    #[error("mirror line is degenerate: both defining points coincide")]
    DegenerateMirrorLine,
    #[error("involute flank never leaves the root circle (radius {radius})")]
    FlankBelowRoot { radius: Real },
    #[error("involute flanks meet before reaching the outside circle (pointed tooth at radius {radius})")]
    PointedTooth { radius: Real },
    #[error("root fillet of radius {radius} does not fit on the {shape}")]
    FilletDoesNotFit { shape: &'static str, radius: Real },
    #[error("adjacent teeth overlap at the root circle ({gap_degrees} deg of free root arc)")]
    TeethOverlap { gap_degrees: Real },
    #[error("{shape} is degenerate: {reason}")]
    RackTooth { shape: &'static str, reason: String },
    #[error("expected 1 or 2 closed regions for {shape}, found {found}")]
    RegionCount { shape: &'static str, found: usize },
    #[error("{shape} profile is not closed: gap of {gap} between curves {index} and {next}")]
    OpenProfile {
        shape: &'static str,
        index: usize,
        next: usize,
        gap: Real,
    },
    #[error("{shape} profile could not be triangulated")]
    Triangulation { shape: &'static str },
}

/// Any failure while turning parameters into gear geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GearError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),
}
