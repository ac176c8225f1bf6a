//! Zentrale Konfiguration des Airfoil-Fitters.
//!
//! `FitterOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::{FitSettings, DEFAULT_PARAM_EXPONENT};
use crate::fitting::{RefineConfig, DEFAULT_SAMPLE_COUNT, KNOT_RESOLUTION, MIN_SAMPLE_COUNT};

/// Umgebungsvariable, die den Pfad der Optionen-Datei überschreibt.
pub const CONFIG_ENV_VAR: &str = "AIRFOILFITTER_CONFIG";
/// Dateiname der Optionen-Datei neben der Binary.
pub const CONFIG_FILE_NAME: &str = "airfoil_spline_fitter.toml";

// ── Fit ─────────────────────────────────────────────────────────────

/// Standard-Grad der B-Splines.
pub const DEFAULT_DEGREE: usize = 4;
/// Standard-Anzahl Kontrollpunkte je Seite.
pub const DEFAULT_CONTROL_POINTS: usize = 9;
/// Standard-Gewicht der Glättungsstrafe.
pub const DEFAULT_SMOOTHING_WEIGHT: f64 = 0.0;

// ── Hinterkante ─────────────────────────────────────────────────────

/// Standard-Anzahl Punkte für die Hinterkanten-Tangente.
pub const TE_VECTOR_POINTS_DEFAULT: usize = 2;
/// Minimale Anzahl Punkte für die Hinterkanten-Tangente.
pub const TE_VECTOR_POINTS_MIN: usize = 2;
/// Maximale Anzahl Punkte für die Hinterkanten-Tangente.
pub const TE_VECTOR_POINTS_MAX: usize = 5;

// ── Krümmungskamm ───────────────────────────────────────────────────

/// Minimale Haare je Knotenspanne.
pub const COMB_DENSITY_MIN: usize = 100;
/// Maximale Haare je Knotenspanne.
pub const COMB_DENSITY_MAX: usize = 1000;
/// Standard-Haare je Knotenspanne.
pub const COMB_DENSITY_DEFAULT: usize = 200;
/// Standard-Skalierung der Haarlänge.
pub const COMB_SCALE_DEFAULT: f64 = 0.020;

// ── Darstellung & Export ────────────────────────────────────────────

/// Punkte je Seite für die Kurvendarstellung.
pub const PLOT_POINTS_PER_SURFACE: usize = 500;
/// Krümmungsgewicht der adaptiven Punktverteilung.
pub const PLOT_CURVATURE_WEIGHT: f64 = 0.85;
/// Standard-Sehnenlänge beim Export in mm.
pub const DEFAULT_CHORD_LENGTH_MM: f64 = 200.0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Fitter-Optionen.
/// Wird als `airfoil_spline_fitter.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FitterOptions {
    // ── Fit ─────────────────────────────────────────────────────
    /// Grad der B-Splines
    pub default_degree: usize,
    /// Kontrollpunkte je Seite beim neuen Fit
    pub default_control_points: usize,
    /// Gewicht der Glättungsstrafe
    pub smoothing_weight: f64,
    /// Parametrisierungs-Exponent beim neuen Fit
    pub default_param_exponent: f64,

    // ── Fehler & Verfeinerung ───────────────────────────────────
    /// Kurven-Samples der Fehlerabschätzung (mindestens 30000)
    pub error_sample_count: usize,
    /// Spannenbreite, unter der die Nachbarspanne geteilt wird
    pub knot_resolution: f64,

    // ── Hinterkante ─────────────────────────────────────────────
    /// Punkte für die extern berechnete Hinterkanten-Tangente (2–5)
    pub te_vector_points: usize,

    // ── Krümmungskamm ───────────────────────────────────────────
    /// Haare je Knotenspanne
    pub comb_density: usize,
    /// Skalierung der Haarlänge
    pub comb_scale: f64,

    // ── Darstellung & Export ────────────────────────────────────
    /// Punkte je Seite für die Darstellung
    pub plot_points_per_surface: usize,
    /// Krümmungsgewicht der Punktverteilung (0 = gleichmäßig)
    pub plot_curvature_weight: f64,
    /// Sehnenlänge für den Export in mm
    pub chord_length_mm: f64,
}

impl Default for FitterOptions {
    fn default() -> Self {
        Self {
            default_degree: DEFAULT_DEGREE,
            default_control_points: DEFAULT_CONTROL_POINTS,
            smoothing_weight: DEFAULT_SMOOTHING_WEIGHT,
            default_param_exponent: DEFAULT_PARAM_EXPONENT,

            error_sample_count: DEFAULT_SAMPLE_COUNT,
            knot_resolution: KNOT_RESOLUTION,

            te_vector_points: TE_VECTOR_POINTS_DEFAULT,

            comb_density: COMB_DENSITY_DEFAULT,
            comb_scale: COMB_SCALE_DEFAULT,

            plot_points_per_surface: PLOT_POINTS_PER_SURFACE,
            plot_curvature_weight: PLOT_CURVATURE_WEIGHT,
            chord_length_mm: DEFAULT_CHORD_LENGTH_MM,
        }
    }
}

impl FitterOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.sanitized()
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei.
    ///
    /// `AIRFOILFITTER_CONFIG` hat Vorrang, sonst die Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return std::path::PathBuf::from(path);
        }
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("airfoil_spline_fitter"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join(CONFIG_FILE_NAME)
    }

    /// Begrenzt alle Werte auf ihre gültigen Bereiche.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.default_degree = self.default_degree.max(1);
        self.default_control_points = self.default_control_points.max(self.default_degree + 1);
        if !(self.smoothing_weight.is_finite() && self.smoothing_weight >= 0.0) {
            self.smoothing_weight = defaults.smoothing_weight;
        }
        if !(self.default_param_exponent.is_finite() && self.default_param_exponent > 0.0) {
            self.default_param_exponent = defaults.default_param_exponent;
        }
        self.error_sample_count = self.error_sample_count.max(MIN_SAMPLE_COUNT);
        if !(self.knot_resolution.is_finite() && self.knot_resolution > 0.0) {
            self.knot_resolution = defaults.knot_resolution;
        }
        self.te_vector_points = self
            .te_vector_points
            .clamp(TE_VECTOR_POINTS_MIN, TE_VECTOR_POINTS_MAX);
        self.comb_density = self.comb_density.clamp(COMB_DENSITY_MIN, COMB_DENSITY_MAX);
        if !self.comb_scale.is_finite() {
            self.comb_scale = defaults.comb_scale;
        }
        self.plot_points_per_surface = self.plot_points_per_surface.max(2);
        self.plot_curvature_weight = if self.plot_curvature_weight.is_finite() {
            self.plot_curvature_weight.clamp(0.0, 1.0)
        } else {
            defaults.plot_curvature_weight
        };
        if !(self.chord_length_mm.is_finite() && self.chord_length_mm > 0.0) {
            self.chord_length_mm = defaults.chord_length_mm;
        }
        self
    }

    /// Fit-Einstellungen eines neuen, symmetrischen Fits.
    pub fn fit_settings(&self) -> FitSettings {
        FitSettings::symmetric(self.default_degree, self.default_control_points)
    }

    /// Einstellungen der Knoten-Verfeinerung.
    pub fn refine_config(&self) -> RefineConfig {
        RefineConfig {
            resolution: self.knot_resolution,
            sample_count: self.error_sample_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip_preserves_values() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis erwartet");
        let path = dir.path().join(CONFIG_FILE_NAME);

        let options = FitterOptions {
            default_degree: 5,
            default_control_points: 12,
            comb_scale: 0.05,
            ..FitterOptions::default()
        };
        options.save_to_file(&path).expect("Speichern erwartet");

        let loaded = FitterOptions::load_from_file(&path);
        assert_eq!(loaded, options);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let loaded: FitterOptions =
            toml::from_str("default_degree = 3\n").expect("TOML-Parse erwartet");
        assert_eq!(loaded.default_degree, 3);
        assert_eq!(loaded.default_control_points, DEFAULT_CONTROL_POINTS);
        assert_eq!(loaded.chord_length_mm, DEFAULT_CHORD_LENGTH_MM);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("Temp-Verzeichnis erwartet");
        let path = dir.path().join("kaputt.toml");
        std::fs::write(&path, "default_degree = \"vier\"").expect("Schreiben erwartet");

        assert_eq!(FitterOptions::load_from_file(&path), FitterOptions::default());
    }

    #[test]
    fn sanitize_clamps_ranges() {
        let options = FitterOptions {
            error_sample_count: 100,
            comb_density: 5000,
            te_vector_points: 9,
            plot_curvature_weight: 3.0,
            chord_length_mm: -1.0,
            ..FitterOptions::default()
        }
        .sanitized();

        assert_eq!(options.error_sample_count, MIN_SAMPLE_COUNT);
        assert_eq!(options.comb_density, COMB_DENSITY_MAX);
        assert_eq!(options.te_vector_points, TE_VECTOR_POINTS_MAX);
        assert_eq!(options.plot_curvature_weight, 1.0);
        assert_eq!(options.chord_length_mm, DEFAULT_CHORD_LENGTH_MM);
    }
}
