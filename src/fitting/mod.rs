//! Fit-Engine: Parametrisierung, Constraint-Fit, Fehlerabschätzung,
//! Knoten-Verfeinerung, Hinterkanten-Editor, Krümmungskamm, Bezier-Zerlegung.
//!
//! Alle Operationen arbeiten auf einem explizit übergebenen [`SurfaceModel`]
//! und lassen es bei Fehlern unverändert.
//!
//! [`SurfaceModel`]: crate::core::SurfaceModel

pub mod bezier;
pub mod comb;
pub mod constraints;
pub mod error_estimate;
pub mod export;
pub mod fitter;
pub mod parameterization;
pub mod refine;
pub mod sampling;
pub mod trailing_edge;

pub use bezier::{decompose, decompose_curve, BezierSegment};
pub use comb::{comb, CombHair, CombSpan, CurvatureComb};
pub use constraints::Continuity;
pub use error_estimate::{estimate, estimate_with_samples, update_model_errors};
pub use error_estimate::{DEFAULT_SAMPLE_COUNT, MIN_SAMPLE_COUNT};
pub use export::{export_view, ExportSurface, ExportView};
pub use fitter::{fit, fit_curves, FitAdjustment, FitMode, FitReport};
pub use parameterization::parameterize;
pub use refine::{choose_knot, knot_candidates, refine, refine_at_max_error, refine_with};
pub use refine::{RefineConfig, RefineReport, KNOT_RESOLUTION};
pub use sampling::{adaptive_parameters, adaptive_points};
pub use trailing_edge::{sharpen, thicken, trailing_edge_tangent};
