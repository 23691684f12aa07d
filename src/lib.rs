//! Parametric **involute spur gears** and **racks**.
//!
//! A gear is described by a handful of scalar parameters (module, pressure angle, number
//! of teeth, backlash, root fillet radius and thickness). From them the library derives
//! the reference circles, builds one tooth as a closed profile of lines, arcs and a
//! sampled involute, and repeats it into a full gear or rack:
//!
//! - [`SpurGearBuilder`]: involute flank by tangent unrolling, mirrored, closed by the top
//!   land and root arcs with optional root fillets, patterned around the z axis
//! - [`RackBuilder`]: trapezoidal tooth with a bottom box and root fillets, patterned along x
//! - [`expr`]: the same quantities as named formulas, and formula-string input
//!   (`"20 deg"`, `"2 * module"`)
//! - [`solid`]: extruded triangle-mesh bodies of the teeth and hub
//!
//! Lengths are millimetres and angles radians throughout.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to place the patterned tooth copies in parallel

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod diameters;
pub mod errors;
pub mod expr;
pub mod float_types;
pub mod involute;
pub mod params;
pub mod pattern;
pub mod rack;
pub mod sketch;
pub mod solid;
pub mod spur_gear;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use diameters::{DerivedDiameters, ToothDimensions};
pub use errors::{ConfigError, ConstructionError, GearError};
pub use expr::{ParameterInputs, SymbolicRack, SymbolicSpurGear};
pub use params::{BuildOptions, GearParameters, InvoluteSettings};
pub use pattern::{CircularPattern, LinearPattern};
pub use rack::{Rack, RackBuilder, RackDimensions};
pub use solid::{Body, GearSolid};
pub use spur_gear::{SpurGear, SpurGearBuilder, ToothProfile};
