//! Application Controller für zentrale Command-Verarbeitung.

use super::{AppState, FitCommand};

/// Orchestriert Commands und Use-Cases auf den AppState.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    ///
    /// Schlägt ein Command fehl, bleibt das Modell unverändert; der Fehler
    /// landet zusätzlich in der Statusmeldung.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: FitCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        let label = command.label();
        use super::handlers;

        let result = match command {
            // === Eingabe & Fit ===
            FitCommand::SetInput { input } => {
                handlers::fitting::set_input(state, input);
                Ok(())
            }
            FitCommand::Fit { settings } => handlers::fitting::fit(state, settings),
            FitCommand::FitWithDefaults => handlers::fitting::fit_with_defaults(state),
            FitCommand::Refit => handlers::fitting::refit(state),

            // === Verfeinerung ===
            FitCommand::RefineAtMaxError { surface } => {
                handlers::fitting::refine_at_max_error(state, surface)
            }
            FitCommand::InsertKnot { surface, parameter } => {
                handlers::fitting::insert_knot(state, surface, parameter)
            }

            // === Hinterkante ===
            FitCommand::Thicken { fraction } => handlers::editing::thicken(state, fraction),
            FitCommand::Sharpen => handlers::editing::sharpen(state),

            // === Parameter & Optionen ===
            FitCommand::SetParamExponent { surface, exponent } => {
                handlers::fitting::set_param_exponent(state, surface, exponent)
            }
            FitCommand::SetSmoothing { weight } => handlers::fitting::set_smoothing(state, weight),
            FitCommand::UpdateErrors => {
                handlers::fitting::update_errors(state);
                Ok(())
            }
            FitCommand::ApplyOptions { options } => handlers::fitting::apply_options(state, options),

            // === Datei-I/O ===
            FitCommand::LoadBsp { path } => handlers::file_io::load(state, path),
            FitCommand::SaveBsp { path } => handlers::file_io::save(state, path),
        };

        if let Err(e) = &result {
            log::warn!("{} fehlgeschlagen: {:#}", label, e);
            state.status_message = Some(format!("{} fehlgeschlagen: {}", label, e));
        }
        result
    }
}
