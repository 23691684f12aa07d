//! 2D sketch primitives: curves, closed profiles and mirroring.

pub mod curve;
pub mod mirror;
pub mod profile;

pub use curve::{CircularArc, Curve};
pub use mirror::MirrorLine;
pub use profile::{Profile, select_smallest};
