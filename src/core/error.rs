//! Fehlertypen des Fit-Kerns.
//!
//! Alle Fehler sind strukturiert und behebbar; der Kern gibt niemals selbst
//! Meldungen aus. Ein fehlgeschlagener Fit oder eine fehlgeschlagene
//! Verfeinerung lässt das Modell unverändert.

use thiserror::Error;

use super::Surface;

/// Ungültige Eingabepunkte für die Parametrisierung.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Weniger als zwei Punkte.
    #[error("Zu wenige Punkte: {count} (mindestens 2)")]
    TooFewPoints { count: usize },

    /// NaN oder unendliche Koordinate.
    #[error("Ungültige Koordinate an Punkt {index}")]
    NonFinite { index: usize },

    /// x fällt oder stagniert zwischen zwei Punkten.
    #[error("x-Werte nicht streng steigend an Punkt {index}")]
    NonMonotonic { index: usize },

    /// Erster und letzter Punkt haben dieselbe x-Koordinate.
    #[error("x-Bereich der Punkte ist leer")]
    ZeroRange,

    /// Parametrisierungs-Exponent ≤ 0 oder nicht endlich.
    #[error("Ungültiger Parametrisierungs-Exponent: {0}")]
    InvalidExponent(f64),
}

/// Strukturfehler eines Knotenvektors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnotVectorError {
    /// Grad 0 ist nicht zulässig.
    #[error("Ungültiger Grad: {0}")]
    InvalidDegree(usize),

    /// Länge passt nicht zu Kontrollpunkten und Grad.
    #[error("Knotenvektor hat {actual} Einträge, erwartet {expected}")]
    InconsistentLength { expected: usize, actual: usize },

    /// Knoten fallen an einer Stelle.
    #[error("Knotenvektor fällt an Index {index}")]
    Decreasing { index: usize },

    /// Randknoten nicht (Grad+1)-fach.
    #[error("Knotenvektor ist nicht geklemmt")]
    NotClamped,

    /// Weniger als zwei verschiedene Knotenwerte.
    #[error("Knotenvektor ist entartet (weniger als zwei verschiedene Werte)")]
    Degenerate,

    /// Nicht endlicher Knotenwert.
    #[error("Ungültiger Knotenwert an Index {index}")]
    NonFinite { index: usize },
}

/// Fehler beim Constraint-Fit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Eingabepunkte einer Seite sind ungültig.
    #[error("Eingabedaten der {surface} ungültig: {source}")]
    Data {
        surface: Surface,
        #[source]
        source: DataError,
    },

    /// Grad 0 angefordert.
    #[error("Ungültiger Grad: {0}")]
    InvalidDegree(usize),

    /// Nicht mehr Kontrollpunkte als der Grad.
    #[error("{surface}: {control_points} Kontrollpunkte reichen für Grad {degree} nicht aus")]
    UnderDetermined {
        surface: Surface,
        control_points: usize,
        degree: usize,
    },

    /// Vorgegebener Knotenvektor ist strukturell ungültig.
    #[error("Knotenvektor der {surface} ungültig: {source}")]
    InvalidKnotVector {
        surface: Surface,
        #[source]
        source: KnotVectorError,
    },

    /// Die Datenpunkte bestimmen nicht alle Kontrollpunkte (Rangdefekt).
    #[error("Gleichungssystem des Fits ist unterbestimmt: Rang {rank} von {size}, zu wenige Datenpunkte je Knotenspanne")]
    RankDeficient { rank: usize, size: usize },

    /// Das KKT-System lieferte nicht endliche Werte oder verletzt die Constraints.
    #[error("Gleichungssystem des Fits ist nicht lösbar")]
    SingularSystem,
}

/// Fehler bei der Knoten-Verfeinerung.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefineError {
    /// Es existiert noch kein Fit.
    #[error("Kein B-Spline-Fit vorhanden")]
    NotFitted,

    /// Ohne Referenzpunkte kann nicht neu gefittet werden.
    #[error("Keine Referenzdaten für die Verfeinerung vorhanden")]
    NoReferenceData,

    /// Der Ziel-Parameter liegt außerhalb des Kurvenbereichs.
    #[error("Parameter {0} liegt außerhalb des Kurvenbereichs")]
    ParameterOutOfRange(f64),

    /// Der Neu-Fit nach dem Einfügen ist fehlgeschlagen.
    #[error("Neu-Fit nach Knoten-Einfügung fehlgeschlagen: {0}")]
    Fit(#[from] FitError),

    /// Keine Knotenposition senkt die maximale Abweichung oder hält sie.
    #[error("Verfeinerung verworfen: max. Abweichung stiege von {previous:.3e} auf mindestens {best:.3e}")]
    NoImprovement { previous: f64, best: f64 },
}

/// Fehler des Hinterkanten-Editors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Es existiert noch kein Fit.
    #[error("Kein B-Spline-Fit vorhanden")]
    NotFitted,

    /// Dickenanteil außerhalb `[0, 1)`.
    #[error("Ungültige Hinterkantendicke: {0} (erlaubt: 0 ≤ f < 1)")]
    InvalidThickness(f64),
}

/// Fehler der Bezier-Zerlegung.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecomposeError {
    /// Weniger als zwei verschiedene Knotenwerte.
    #[error("Knotenvektor ist entartet")]
    DegenerateKnotVector,

    /// Sonstiger Strukturfehler des Knotenvektors.
    #[error("Ungültiger Knotenvektor: {0}")]
    InvalidKnotVector(KnotVectorError),
}

/// Fehler beim Aufbau der Export-Sicht.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Es existiert noch kein Fit.
    #[error("Kein B-Spline-Fit für den Export vorhanden")]
    NotFitted,

    /// Sehnenlänge ≤ 0 oder nicht endlich.
    #[error("Sehnenlänge muss positiv sein: {0} mm")]
    InvalidChordLength(f64),
}

impl From<KnotVectorError> for DecomposeError {
    fn from(err: KnotVectorError) -> Self {
        match err {
            KnotVectorError::Degenerate => DecomposeError::DegenerateKnotVector,
            other => DecomposeError::InvalidKnotVector(other),
        }
    }
}
