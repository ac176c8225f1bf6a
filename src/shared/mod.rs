//! Geteilte Typen für schichtübergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die Kern, Application-Layer und Binary
//! gemeinsam nutzen.

pub mod options;

pub use options::FitterOptions;
pub use options::{COMB_DENSITY_MAX, COMB_DENSITY_MIN, DEFAULT_CHORD_LENGTH_MM};
