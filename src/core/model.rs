//! Surface-Modell: der gesamte Fit-Zustand einer Sitzung.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{Surface, SurfaceCurve, SurfacePair};

/// Standard-Exponent der Parametrisierung (Wurzel-Abbildung).
pub const DEFAULT_PARAM_EXPONENT: f64 = 0.5;
/// Toleranz, unter der die Endpunkte als spitze Hinterkante gelten.
pub const SHARP_TE_TOLERANCE: f64 = 1e-12;

/// Eingabedaten eines Fits: Punktfolgen je Seite (x steigend, Vorder- → Hinterkante).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitInput {
    /// Referenzpunkte je Seite
    pub points: SurfacePair<Vec<DVec2>>,
    /// Stumpfe Hinterkante: jede Seite endet auf ihrem eigenen letzten Punkt
    pub thickened: bool,
    /// Extern berechnete Hinterkanten-Tangenten (optional)
    pub te_tangents: Option<SurfacePair<DVec2>>,
}

impl FitInput {
    /// Eingabe mit spitzer Hinterkante und ohne Tangentenvorgabe.
    pub fn new(upper: Vec<DVec2>, lower: Vec<DVec2>) -> Self {
        Self {
            points: SurfacePair::new(upper, lower),
            thickened: false,
            te_tangents: None,
        }
    }

    /// Setzt das Flag für eine stumpfe Hinterkante.
    pub fn with_thickened(mut self, thickened: bool) -> Self {
        self.thickened = thickened;
        self
    }

    /// Setzt die Hinterkanten-Tangenten.
    pub fn with_te_tangents(mut self, upper: DVec2, lower: DVec2) -> Self {
        self.te_tangents = Some(SurfacePair::new(upper, lower));
        self
    }
}

/// Einstellungen eines Fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSettings {
    /// Angeforderter Polynomgrad
    pub degree: usize,
    /// Kontrollpunkte je Seite
    pub control_points: SurfacePair<usize>,
    /// Gleiche Krümmung an der Vorderkante
    pub enforce_g2: bool,
    /// Gleiche Krümmungsableitung an der Vorderkante (impliziert G2)
    pub enforce_g3: bool,
    /// Letzte zwei Kontrollpunkte entlang der Hinterkanten-Tangente
    pub enforce_te_tangency: bool,
    /// Eine einzige Knotenspanne (Bezier-Kurve) je Seite
    pub single_span: bool,
}

impl FitSettings {
    /// Symmetrische Einstellungen ohne optionale Constraints.
    pub fn symmetric(degree: usize, control_points: usize) -> Self {
        Self {
            degree,
            control_points: SurfacePair::splat(control_points),
            enforce_g2: false,
            enforce_g3: false,
            enforce_te_tangency: false,
            single_span: false,
        }
    }
}

impl Default for FitSettings {
    fn default() -> Self {
        Self::symmetric(4, 9)
    }
}

/// Ergebnis der Fehlerabschätzung einer Seite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorEstimate {
    /// Summe der quadrierten Abstände
    pub sum_sq: f64,
    /// Wurzel des mittleren quadratischen Abstands
    pub rms: f64,
    /// Größter Abstand
    pub max_error: f64,
    /// Index des Referenzpunkts mit dem größten Abstand
    pub max_index: usize,
    /// Kurvenparameter des nächsten Samples zu diesem Punkt
    pub parameter_at_max: f64,
}

/// Der gefittete Zustand beider Profil-Seiten.
///
/// Wird ausschließlich über die Operationen in [`crate::fitting`] verändert.
/// Ein fehlgeschlagener Aufruf lässt den Zustand unverändert.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceModel {
    /// Profilname (erste Zeile einer `.bsp`-Datei)
    pub name: String,
    /// Globales Gewicht der Glättungsstrafe
    pub smoothing_weight: f64,
    pub(crate) curves: Option<SurfacePair<SurfaceCurve>>,
    pub(crate) param_exponent: SurfacePair<f64>,
    pub(crate) sharp_trailing_edge: bool,
    pub(crate) last_error: SurfacePair<Option<ErrorEstimate>>,
    pub(crate) reference: Option<FitInput>,
    pub(crate) settings: Option<FitSettings>,
    pub(crate) te_baseline: Option<SurfacePair<DVec2>>,
    pub(crate) te_thickness: Option<f64>,
}

impl Default for SurfaceModel {
    fn default() -> Self {
        Self {
            name: String::new(),
            smoothing_weight: 0.0,
            curves: None,
            param_exponent: SurfacePair::splat(DEFAULT_PARAM_EXPONENT),
            sharp_trailing_edge: true,
            last_error: SurfacePair::default(),
            reference: None,
            settings: None,
            te_baseline: None,
            te_thickness: None,
        }
    }
}

impl SurfaceModel {
    /// Erstellt ein leeres, nicht gefittetes Modell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt ein Modell aus fertigen Kurven (z.B. aus einer `.bsp`-Datei).
    ///
    /// Ohne Referenzdaten; Fehlerwerte sind leer.
    pub fn from_curves(name: impl Into<String>, upper: SurfaceCurve, lower: SurfaceCurve) -> Self {
        let mut model = Self {
            name: name.into(),
            curves: Some(SurfacePair::new(upper, lower)),
            ..Self::default()
        };
        model.recompute_sharp_trailing_edge();
        model
    }

    /// `true`, sobald Kurven vorhanden sind.
    pub fn is_fitted(&self) -> bool {
        self.curves.is_some()
    }

    /// Beide Kurven, falls gefittet.
    pub fn curves(&self) -> Option<&SurfacePair<SurfaceCurve>> {
        self.curves.as_ref()
    }

    /// Kurve einer Seite, falls gefittet.
    pub fn curve(&self, surface: Surface) -> Option<&SurfaceCurve> {
        self.curves.as_ref().map(|c| &c[surface])
    }

    /// Grad der Oberseite (beide Seiten teilen nach einem Fit den Grad).
    pub fn degree(&self) -> Option<usize> {
        self.curve(Surface::Upper).map(SurfaceCurve::degree)
    }

    /// Kontrollpunktanzahl je Seite.
    pub fn control_point_counts(&self) -> Option<SurfacePair<usize>> {
        self.curves
            .as_ref()
            .map(|c| SurfacePair::new(c.upper.num_control_points(), c.lower.num_control_points()))
    }

    /// Parametrisierungs-Exponent einer Seite.
    pub fn param_exponent(&self, surface: Surface) -> f64 {
        self.param_exponent[surface]
    }

    /// Setzt den Parametrisierungs-Exponenten; wirkt beim nächsten Fit.
    ///
    /// Nicht positive oder nicht endliche Werte werden ignoriert.
    pub fn set_param_exponent(&mut self, surface: Surface, exponent: f64) -> bool {
        if exponent.is_finite() && exponent > 0.0 {
            self.param_exponent[surface] = exponent;
            true
        } else {
            false
        }
    }

    /// `true`, wenn die letzten Kontrollpunkte beider Seiten zusammenfallen.
    pub fn sharp_trailing_edge(&self) -> bool {
        self.sharp_trailing_edge
    }

    /// Letzte Fehlerabschätzung einer Seite.
    pub fn last_error(&self, surface: Surface) -> Option<&ErrorEstimate> {
        self.last_error[surface].as_ref()
    }

    /// Größter Abstand der letzten Fehlerabschätzung.
    pub fn last_max_error(&self, surface: Surface) -> Option<f64> {
        self.last_error(surface).map(|e| e.max_error)
    }

    /// Referenzpunkt-Index des größten Abstands.
    pub fn last_max_error_index(&self, surface: Surface) -> Option<usize> {
        self.last_error(surface).map(|e| e.max_index)
    }

    /// Eingabedaten des letzten Fits.
    pub fn reference(&self) -> Option<&FitInput> {
        self.reference.as_ref()
    }

    /// Einstellungen des letzten Fits.
    pub fn settings(&self) -> Option<&FitSettings> {
        self.settings.as_ref()
    }

    /// Angewandte Hinterkantendicke (Anteil der Sehne).
    pub fn te_thickness(&self) -> Option<f64> {
        self.te_thickness
    }

    /// Hinterkanten-Endpunkte vor dem Aufdicken.
    pub fn te_baseline(&self) -> Option<&SurfacePair<DVec2>> {
        self.te_baseline.as_ref()
    }

    /// Sehne von der Vorderkante zur Mitte der Hinterkanten-Endpunkte.
    pub fn chord(&self) -> Option<(DVec2, DVec2)> {
        let curves = self.curves.as_ref()?;
        let le = curves.upper.first_point();
        let te = self
            .te_baseline
            .map(|b| (b.upper + b.lower) * 0.5)
            .unwrap_or_else(|| (curves.upper.last_point() + curves.lower.last_point()) * 0.5);
        Some((le, te))
    }

    /// Entfernt die Referenzdaten; Fehlerwerte werden mit gelöscht.
    pub fn clear_reference(&mut self) {
        self.reference = None;
        self.last_error = SurfacePair::default();
    }

    pub(crate) fn recompute_sharp_trailing_edge(&mut self) {
        self.sharp_trailing_edge = match &self.curves {
            Some(c) => {
                let d = (c.upper.last_point() - c.lower.last_point()).abs();
                d.x <= SHARP_TE_TOLERANCE && d.y <= SHARP_TE_TOLERANCE
            }
            None => true,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::curve::clamped_uniform_knots;

    fn line(from: DVec2, to: DVec2) -> SurfaceCurve {
        let points = (0..4)
            .map(|i| from.lerp(to, i as f64 / 3.0))
            .collect::<Vec<_>>();
        SurfaceCurve::new(3, clamped_uniform_knots(4, 3), points).expect("gültige Kurve erwartet")
    }

    #[test]
    fn new_model_is_empty_with_default_exponents() {
        let model = SurfaceModel::new();
        assert!(!model.is_fitted());
        assert_eq!(model.param_exponent(Surface::Upper), DEFAULT_PARAM_EXPONENT);
        assert_eq!(model.param_exponent(Surface::Lower), DEFAULT_PARAM_EXPONENT);
        assert!(model.chord().is_none());
    }

    #[test]
    fn from_curves_detects_blunt_trailing_edge() {
        let sharp = SurfaceModel::from_curves(
            "sharp",
            line(DVec2::ZERO, DVec2::new(1.0, 0.0)),
            line(DVec2::ZERO, DVec2::new(1.0, 0.0)),
        );
        assert!(sharp.sharp_trailing_edge());

        let blunt = SurfaceModel::from_curves(
            "blunt",
            line(DVec2::ZERO, DVec2::new(1.0, 0.01)),
            line(DVec2::ZERO, DVec2::new(1.0, -0.01)),
        );
        assert!(!blunt.sharp_trailing_edge());
        assert!(blunt.reference().is_none());
        assert!(blunt.last_max_error(Surface::Upper).is_none());
    }

    #[test]
    fn invalid_exponent_is_rejected() {
        let mut model = SurfaceModel::new();
        assert!(!model.set_param_exponent(Surface::Upper, 0.0));
        assert!(!model.set_param_exponent(Surface::Upper, f64::NAN));
        assert!(model.set_param_exponent(Surface::Lower, 0.7));
        assert_eq!(model.param_exponent(Surface::Lower), 0.7);
    }
}
