//! Handler für Fit, Refit, Verfeinerung und Fehlerabschätzung.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::{FitInput, FitSettings, Surface};
use crate::shared::FitterOptions;

/// Setzt die Referenzpunkte.
pub fn set_input(state: &mut AppState, input: FitInput) {
    use_cases::fitting::set_input(state, input);
}

/// Neuer Fit mit expliziten Einstellungen.
pub fn fit(state: &mut AppState, settings: FitSettings) -> anyhow::Result<()> {
    use_cases::fitting::fit(state, settings)
}

/// Neuer Fit mit Standard-Einstellungen.
pub fn fit_with_defaults(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::fitting::fit_with_defaults(state)
}

/// Refit mit aktuellen Anzahlen und Exponenten.
pub fn refit(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::fitting::refit(state)
}

/// Verfeinert an der Stelle der größten Abweichung.
pub fn refine_at_max_error(state: &mut AppState, surface: Surface) -> anyhow::Result<()> {
    use_cases::fitting::refine_at_max_error(state, surface)
}

/// Fügt einen Knoten nahe `parameter` ein.
pub fn insert_knot(state: &mut AppState, surface: Surface, parameter: f64) -> anyhow::Result<()> {
    use_cases::fitting::insert_knot(state, surface, parameter)
}

/// Setzt den Parametrisierungs-Exponenten.
pub fn set_param_exponent(
    state: &mut AppState,
    surface: Surface,
    exponent: f64,
) -> anyhow::Result<()> {
    use_cases::fitting::set_param_exponent(state, surface, exponent)
}

/// Setzt das Glättungsgewicht.
pub fn set_smoothing(state: &mut AppState, weight: f64) -> anyhow::Result<()> {
    use_cases::fitting::set_smoothing(state, weight)
}

/// Aktualisiert die Fehlerabschätzung.
pub fn update_errors(state: &mut AppState) {
    use_cases::fitting::update_errors(state);
}

/// Übernimmt Laufzeit-Optionen.
pub fn apply_options(state: &mut AppState, options: FitterOptions) -> anyhow::Result<()> {
    use_cases::fitting::apply_options(state, options)
}
