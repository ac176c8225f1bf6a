//! Core-Domänentypen: Profil-Seiten, B-Spline-Kurven, Surface-Modell, Spatial-Index.

pub mod curve;
pub mod error;
pub mod model;
pub mod spatial;
pub mod surface;

pub use curve::{clamped_uniform_knots, SurfaceCurve};
pub use error::{DataError, DecomposeError, EditError, ExportError, FitError};
pub use error::{KnotVectorError, RefineError};
pub use model::{ErrorEstimate, FitInput, FitSettings, SurfaceModel};
pub use model::{DEFAULT_PARAM_EXPONENT, SHARP_TE_TOLERANCE};
pub use spatial::{CurveSample, SampleIndex, SampleMatch};
pub use surface::{Surface, SurfacePair};
