//! Use-Cases für Dateiaktionen.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::AppState;

/// Lädt ein Kurvenmodell aus einer `.bsp`-Datei.
///
/// Das geladene Modell hat keine Referenzdaten; gesetzte Eingabepunkte
/// bleiben für einen späteren Refit erhalten.
pub fn load_bsp(state: &mut AppState, path: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("BSP-Datei nicht lesbar: {}", path.display()))?;
    let mut model = crate::bsp::parse_bsp(&content)
        .with_context(|| format!("BSP-Datei fehlerhaft: {}", path.display()))?;
    model.smoothing_weight = state.model.smoothing_weight;

    log::info!("Modell '{}' geladen aus {}", model.name, path.display());
    state.status_message = Some(format!("'{}' geladen", model.name));
    state.model = model;
    state.last_fit_report = None;
    state.current_file_path = Some(path);
    Ok(())
}

/// Speichert das Modell als `.bsp`.
///
/// `None` speichert unter dem zuletzt verwendeten Pfad.
pub fn save_bsp(state: &mut AppState, path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(|| state.current_file_path.clone())
        .context("Kein Speicherpfad bekannt")?;
    let content = crate::bsp::write_bsp(&state.model)?;
    std::fs::write(&path, content)
        .with_context(|| format!("BSP-Datei nicht schreibbar: {}", path.display()))?;

    log::info!("Modell gespeichert nach {}", path.display());
    state.status_message = Some(format!("Gespeichert: {}", path.display()));
    state.current_file_path = Some(path);
    Ok(())
}
