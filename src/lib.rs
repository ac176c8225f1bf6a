//! Airfoil Spline Fitter Library.
//!
//! Constraint-basierter B-Spline-Fit für Profil-Ober- und Unterseite mit
//! Vorderkanten-Stetigkeit, Knoten-Verfeinerung, Hinterkanten-Editor,
//! Krümmungskamm, Bezier-Zerlegung und `.bsp`-Persistenz.

pub mod app;
pub mod bsp;
pub mod core;
pub mod fitting;
pub mod shared;

pub use app::{AppController, AppState, FitCommand, FitSession, SessionError};
pub use bsp::{parse_bsp, write_bsp};
pub use core::{FitInput, FitSettings, Surface, SurfaceCurve, SurfaceModel, SurfacePair};
pub use fitting::{fit, refine, sharpen, thicken, Continuity, FitMode, FitReport};
pub use shared::FitterOptions;
