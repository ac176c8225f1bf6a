//! Use-Cases für Fit, Refit, Knoten-Verfeinerung und Fehlerabschätzung.
//!
//! Jede Operation arbeitet auf einem Kandidaten und übernimmt ihn erst bei
//! Erfolg in den AppState.

use anyhow::{bail, Context, Result};

use crate::app::AppState;
use crate::core::{FitInput, FitSettings, Surface, SurfaceModel};
use crate::fitting::{self, FitMode, FitReport, RefineReport};
use crate::shared::FitterOptions;

/// Setzt die Referenzpunkte für folgende Fits.
pub fn set_input(state: &mut AppState, input: FitInput) {
    log::info!(
        "Eingabe gesetzt: {} Punkte oben, {} Punkte unten{}",
        input.points.upper.len(),
        input.points.lower.len(),
        if input.thickened { ", stumpfe Hinterkante" } else { "" }
    );
    state.input = Some(input);
}

/// Neuer Fit beider Seiten.
///
/// Exponenten starten beim konfigurierten Standardwert; Name und
/// Glättungsgewicht des bisherigen Modells bleiben erhalten.
pub fn fit(state: &mut AppState, settings: FitSettings) -> Result<()> {
    let input = prepared_input(state, &settings)?;

    let mut fresh = SurfaceModel::new();
    fresh.name = state.model.name.clone();
    fresh.smoothing_weight = state.model.smoothing_weight;
    let mode = FitMode::FreshWithExponent(state.options.default_param_exponent);

    let report = fitting::fit(&mut fresh, input, settings, mode)?;
    finish_fit(state, fresh, report);
    Ok(())
}

/// Neuer Fit mit den Standard-Einstellungen aus den Optionen.
pub fn fit_with_defaults(state: &mut AppState) -> Result<()> {
    let settings = state.options.fit_settings();
    fit(state, settings)
}

/// Erneuter Fit mit aktuellen Kontrollpunkt-Anzahlen und Exponenten.
pub fn refit(state: &mut AppState) -> Result<()> {
    let mut candidate = state.model.clone();
    let report = refit_candidate(state, &mut candidate)?
        .context("Refit nicht möglich: keine Referenzdaten vorhanden")?;
    finish_fit(state, candidate, report);
    Ok(())
}

/// Fügt einen Knoten an der Stelle der größten Abweichung ein.
///
/// Nutzt die zwischengespeicherte Fehlerabschätzung, sonst wird neu gesampelt.
pub fn refine_at_max_error(state: &mut AppState, surface: Surface) -> Result<()> {
    let config = state.options.refine_config();
    let report = match state.model.last_error(surface).map(|e| e.parameter_at_max) {
        Some(target) => fitting::refine_with(&mut state.model, surface, target, config)?,
        None => fitting::refine_at_max_error(&mut state.model, surface, config)?,
    };
    finish_refine(state, report);
    Ok(())
}

/// Fügt einen Knoten nahe `parameter` ein.
pub fn insert_knot(state: &mut AppState, surface: Surface, parameter: f64) -> Result<()> {
    let config = state.options.refine_config();
    let report = fitting::refine_with(&mut state.model, surface, parameter, config)?;
    finish_refine(state, report);
    Ok(())
}

/// Setzt den Parametrisierungs-Exponenten einer Seite.
///
/// Refittet, falls ein Modell mit Referenzdaten vorhanden ist.
pub fn set_param_exponent(state: &mut AppState, surface: Surface, exponent: f64) -> Result<()> {
    let mut candidate = state.model.clone();
    if !candidate.set_param_exponent(surface, exponent) {
        bail!("Ungültiger Parametrisierungs-Exponent: {}", exponent);
    }
    apply_with_optional_refit(state, candidate)
}

/// Setzt das Glättungsgewicht.
///
/// Refittet, falls ein Modell mit Referenzdaten vorhanden ist.
pub fn set_smoothing(state: &mut AppState, weight: f64) -> Result<()> {
    if !(weight.is_finite() && weight >= 0.0) {
        bail!("Ungültiges Glättungsgewicht: {}", weight);
    }
    let mut candidate = state.model.clone();
    candidate.smoothing_weight = weight;
    apply_with_optional_refit(state, candidate)
}

/// Berechnet die Fehlerabschätzung beider Seiten neu.
pub fn update_errors(state: &mut AppState) {
    fitting::update_model_errors(&mut state.model, state.options.error_sample_count);
    state.status_message = Some(error_summary(&state.model));
}

/// Übernimmt neue Laufzeit-Optionen (auf gültige Bereiche begrenzt).
///
/// Ändert sich `te_vector_points`, während Hinterkanten-Tangenz mit aus den
/// Eingabepunkten berechneten Tangenten aktiv ist, wird neu gefittet. Schlägt
/// der Refit fehl, gelten die bisherigen Optionen weiter.
pub fn apply_options(state: &mut AppState, options: FitterOptions) -> Result<()> {
    let previous = std::mem::replace(&mut state.options, options.sanitized());
    log::info!("Optionen übernommen");

    let te_points_changed = previous.te_vector_points != state.options.te_vector_points;
    if !(te_points_changed && uses_computed_te_tangents(state)) {
        return Ok(());
    }

    log::info!(
        "Punkte für Hinterkanten-Tangente von {} auf {} geändert, Refit",
        previous.te_vector_points,
        state.options.te_vector_points
    );
    let mut candidate = state.model.clone();
    match refit_candidate(state, &mut candidate) {
        Ok(Some(report)) => {
            finish_fit(state, candidate, report);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            state.options = previous;
            Err(e)
        }
    }
}

/// Kurzfassung der letzten Fehlerwerte für die Statuszeile.
pub fn error_summary(model: &SurfaceModel) -> String {
    let part = |surface: Surface| match model.last_max_error(surface) {
        Some(err) => format!("{}: max. Fehler {:.3e}", surface, err),
        None => format!("{}: kein Fehlerwert", surface),
    };
    format!("{}, {}", part(Surface::Upper), part(Surface::Lower))
}

// ── Interne Helfer ──────────────────────────────────────────────────

fn apply_with_optional_refit(state: &mut AppState, mut candidate: SurfaceModel) -> Result<()> {
    if candidate.is_fitted() {
        if let Some(report) = refit_candidate(state, &mut candidate)? {
            finish_fit(state, candidate, report);
            return Ok(());
        }
    }
    state.model = candidate;
    Ok(())
}

/// Refit von `candidate`; `None`, wenn keine Referenzdaten existieren.
fn refit_candidate(state: &AppState, candidate: &mut SurfaceModel) -> Result<Option<FitReport>> {
    let settings = candidate
        .settings()
        .copied()
        .unwrap_or_else(|| state.options.fit_settings());
    let input = match (&state.input, candidate.reference()) {
        (Some(_), _) => prepared_input(state, &settings)?,
        (None, Some(reference)) => reference.clone(),
        (None, None) => return Ok(None),
    };
    let report = fitting::fit(candidate, input, settings, FitMode::Refit)?;
    Ok(Some(report))
}

/// `true`, wenn der aktuelle Fit Hinterkanten-Tangenz nutzt und die Tangenten
/// aus den Eingabepunkten berechnet werden.
fn uses_computed_te_tangents(state: &AppState) -> bool {
    let tangency = state
        .model
        .settings()
        .is_some_and(|settings| settings.enforce_te_tangency);
    let computed = state
        .input
        .as_ref()
        .is_some_and(|input| input.te_tangents.is_none());
    state.model.is_fitted() && tangency && computed
}

/// Eingabe aus dem State; fehlende Hinterkanten-Tangenten werden aus den
/// letzten `te_vector_points` Punkten ergänzt, falls Tangenz gefordert ist.
fn prepared_input(state: &AppState, settings: &FitSettings) -> Result<FitInput> {
    let mut input = state
        .input
        .clone()
        .context("Keine Eingabepunkte gesetzt")?;

    if settings.enforce_te_tangency && input.te_tangents.is_none() {
        let count = state.options.te_vector_points;
        let tangents = input
            .points
            .as_ref()
            .map(|points| fitting::trailing_edge_tangent(points, count));
        if let (Some(upper), Some(lower)) = (tangents.upper, tangents.lower) {
            input = input.with_te_tangents(upper, lower);
        }
    }
    Ok(input)
}

fn finish_fit(state: &mut AppState, mut model: SurfaceModel, report: FitReport) {
    fitting::update_model_errors(&mut model, state.options.error_sample_count);
    for adjustment in &report.adjustments {
        log::warn!("Fit angepasst: {:?}", adjustment);
    }
    log::info!(
        "Fit abgeschlossen: Grad {}, {}/{} Kontrollpunkte, Stetigkeit {:?}",
        report.degree,
        report.control_points.upper,
        report.control_points.lower,
        report.continuity
    );

    state.model = model;
    state.last_fit_report = Some(report);
    state.status_message = Some(error_summary(&state.model));
}

fn finish_refine(state: &mut AppState, report: RefineReport) {
    fitting::update_model_errors(&mut state.model, state.options.error_sample_count);
    log::info!(
        "{} verfeinert: Knoten bei u={:.5}, {} Kontrollpunkte, max. Fehler {:.3e} -> {:.3e}",
        report.surface,
        report.knot,
        report.fit.control_points[report.surface],
        report.max_error_before,
        report.max_error_after
    );
    state.last_fit_report = Some(report.fit);
    state.status_message = Some(error_summary(&state.model));
}
