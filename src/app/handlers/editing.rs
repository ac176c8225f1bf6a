//! Handler für die Hinterkanten-Bearbeitung.

use crate::app::use_cases;
use crate::app::AppState;

/// Öffnet die Hinterkante.
pub fn thicken(state: &mut AppState, fraction: f64) -> anyhow::Result<()> {
    use_cases::editing::thicken(state, fraction)
}

/// Schließt die Hinterkante.
pub fn sharpen(state: &mut AppState) -> anyhow::Result<()> {
    use_cases::editing::sharpen(state)
}
