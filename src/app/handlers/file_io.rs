//! Handler für Datei-Operationen (Laden, Speichern).

use std::path::PathBuf;

use crate::app::use_cases;
use crate::app::AppState;

/// Lädt ein Modell aus dem übergebenen Pfad.
pub fn load(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    use_cases::file_io::load_bsp(state, path)
}

/// Speichert das Modell.
///
/// `None` speichert unter dem aktuell bekannten Pfad.
/// `Some(p)` speichert explizit unter dem neuen Pfad `p`.
pub fn save(state: &mut AppState, path: Option<PathBuf>) -> anyhow::Result<()> {
    use_cases::file_io::save_bsp(state, path)
}
