//! Use-Cases für die Hinterkanten-Bearbeitung.

use anyhow::Result;

use super::fitting::error_summary;
use crate::app::AppState;
use crate::fitting;

/// Öffnet die Hinterkante auf `fraction` × Sehnenlänge.
pub fn thicken(state: &mut AppState, fraction: f64) -> Result<()> {
    fitting::thicken(&mut state.model, fraction)?;
    fitting::update_model_errors(&mut state.model, state.options.error_sample_count);
    log::info!("Hinterkante aufgedickt: {:.3}% der Sehne", fraction * 100.0);
    state.status_message = Some(error_summary(&state.model));
    Ok(())
}

/// Schließt die Hinterkante wieder.
pub fn sharpen(state: &mut AppState) -> Result<()> {
    fitting::sharpen(&mut state.model)?;
    fitting::update_model_errors(&mut state.model, state.options.error_sample_count);
    log::info!("Hinterkante geschärft");
    state.status_message = Some(error_summary(&state.model));
    Ok(())
}
