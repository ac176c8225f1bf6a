//! Application State: zentrale Datenhaltung einer Fit-Sitzung.

use std::path::PathBuf;

use super::CommandLog;
use crate::core::{FitInput, SurfaceModel};
use crate::fitting::FitReport;
use crate::shared::FitterOptions;

/// Hauptzustand der Anwendung.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Aktuelles Kurvenmodell
    pub model: SurfaceModel,
    /// Referenzpunkte für den nächsten Fit (None = keine Eingabe gesetzt)
    pub input: Option<FitInput>,
    /// Laufzeit-Optionen
    pub options: FitterOptions,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Bericht des letzten erfolgreichen Fits
    pub last_fit_report: Option<FitReport>,
    /// Zuletzt geladene/gespeicherte `.bsp`-Datei
    pub current_file_path: Option<PathBuf>,
    /// Letzte Statusmeldung für die Anzeige
    pub status_message: Option<String>,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt einen App-State mit vorgegebenen Optionen.
    pub fn with_options(options: FitterOptions) -> Self {
        let mut model = SurfaceModel::new();
        model.smoothing_weight = options.smoothing_weight;
        Self {
            model,
            options,
            ..Self::default()
        }
    }

    /// `true`, sobald ein Modell gefittet oder geladen ist.
    pub fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    /// Kontrollpunkte je Seite (für Anzeige), `(0, 0)` ohne Modell.
    pub fn control_point_counts(&self) -> (usize, usize) {
        self.model
            .control_point_counts()
            .map_or((0, 0), |counts| (counts.upper, counts.lower))
    }
}
