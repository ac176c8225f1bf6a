use std::path::PathBuf;

use crate::core::{FitInput, FitSettings, Surface};
use crate::shared::FitterOptions;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum FitCommand {
    /// Referenzpunkte für folgende Fits setzen
    SetInput { input: FitInput },
    /// Neuer Fit mit den übergebenen Einstellungen
    Fit { settings: FitSettings },
    /// Neuer Fit mit den Standard-Einstellungen aus den Optionen
    FitWithDefaults,
    /// Erneuter Fit mit aktuellen Kontrollpunkt-Anzahlen und Exponenten
    Refit,
    /// Knoten an der Stelle der größten Abweichung einfügen
    RefineAtMaxError { surface: Surface },
    /// Knoten nahe `parameter` einfügen
    InsertKnot { surface: Surface, parameter: f64 },
    /// Hinterkante auf Anteil der Sehnenlänge öffnen
    Thicken { fraction: f64 },
    /// Hinterkante schließen
    Sharpen,
    /// Parametrisierungs-Exponent einer Seite setzen (refittet, falls gefittet)
    SetParamExponent { surface: Surface, exponent: f64 },
    /// Glättungsgewicht setzen (refittet, falls gefittet)
    SetSmoothing { weight: f64 },
    /// Fehlerabschätzung beider Seiten neu berechnen
    UpdateErrors,
    /// Laufzeit-Optionen übernehmen
    ApplyOptions { options: FitterOptions },
    /// Modell aus `.bsp`-Datei laden
    LoadBsp { path: PathBuf },
    /// Modell als `.bsp` speichern (`None` = zuletzt verwendeter Pfad)
    SaveBsp { path: Option<PathBuf> },
}

impl FitCommand {
    /// Kurzer Name für Log und Fortschrittsmeldungen.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SetInput { .. } => "Eingabe setzen",
            Self::Fit { .. } | Self::FitWithDefaults => "Fit",
            Self::Refit => "Refit",
            Self::RefineAtMaxError { .. } => "Verfeinern (max. Fehler)",
            Self::InsertKnot { .. } => "Knoten einfügen",
            Self::Thicken { .. } => "Hinterkante aufdicken",
            Self::Sharpen => "Hinterkante schärfen",
            Self::SetParamExponent { .. } => "Exponent setzen",
            Self::SetSmoothing { .. } => "Glättung setzen",
            Self::UpdateErrors => "Fehlerabschätzung",
            Self::ApplyOptions { .. } => "Optionen übernehmen",
            Self::LoadBsp { .. } => "BSP laden",
            Self::SaveBsp { .. } => "BSP speichern",
        }
    }
}
