/// Phase einer Hintergrund-Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    /// Operation wurde gestartet
    Started,
    /// Operation erfolgreich beendet, Modell übernommen
    Finished,
    /// Operation fehlgeschlagen, Modell unverändert
    Failed,
}

/// Best-effort Fortschrittsmeldung; kann verloren gehen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Name der Operation
    pub operation: &'static str,
    /// Phase
    pub stage: ProgressStage,
    /// Freitext (Statusmeldung oder Fehler)
    pub message: String,
}
