//! Hintergrund-Ausführung von Commands mit exklusivem Modellzugriff.
//!
//! Pro Sitzung läuft höchstens eine Operation. Eine zweite Anfrage wird
//! abgelehnt, nicht eingereiht. Der Worker hält die Schreibsperre für die
//! gesamte Laufzeit (Leser warten), rechnet auf einer Kopie und übernimmt
//! sie nur bei Erfolg.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use thiserror::Error;

use super::{AppController, AppState, FitCommand, Progress, ProgressStage};

/// Fehler der Sitzungsverwaltung.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Es läuft bereits eine Operation
    #[error("Es läuft bereits eine Operation; Anfrage abgelehnt")]
    Busy,
    /// Der Worker-Thread ist abgestürzt
    #[error("Hintergrund-Operation abgebrochen")]
    WorkerPanicked,
}

/// Gibt das Busy-Flag beim Drop wieder frei.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle auf eine laufende Hintergrund-Operation.
#[derive(Debug)]
pub struct OperationHandle {
    label: &'static str,
    outcome: Receiver<anyhow::Result<()>>,
}

impl OperationHandle {
    /// Name der Operation.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Blockiert bis zum Ende der Operation.
    pub fn wait(self) -> anyhow::Result<()> {
        self.outcome
            .recv()
            .unwrap_or_else(|_| Err(SessionError::WorkerPanicked.into()))
    }

    /// Ergebnis, falls die Operation bereits beendet ist.
    pub fn try_wait(&self) -> Option<anyhow::Result<()>> {
        match self.outcome.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SessionError::WorkerPanicked.into())),
        }
    }
}

/// Sitzung mit geteiltem AppState und Hintergrund-Worker.
pub struct FitSession {
    state: Arc<RwLock<AppState>>,
    busy: Arc<AtomicBool>,
    progress_tx: Sender<Progress>,
    progress_rx: Receiver<Progress>,
}

impl FitSession {
    /// Erstellt eine Sitzung über dem gegebenen State.
    pub fn new(state: AppState) -> Self {
        let (progress_tx, progress_rx) = mpsc::channel();
        Self {
            state: Arc::new(RwLock::new(state)),
            busy: Arc::new(AtomicBool::new(false)),
            progress_tx,
            progress_rx,
        }
    }

    /// `true`, solange eine Operation läuft.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Lesezugriff auf den State; wartet, solange eine Operation läuft.
    pub fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Kopie des aktuellen States.
    pub fn snapshot(&self) -> AppState {
        self.read().clone()
    }

    /// Bisher eingegangene Fortschrittsmeldungen (nicht blockierend).
    pub fn drain_progress(&self) -> Vec<Progress> {
        self.progress_rx.try_iter().collect()
    }

    /// Startet `command` im Hintergrund.
    ///
    /// `SessionError::Busy`, falls bereits eine Operation läuft; die laufende
    /// Operation bleibt davon unberührt.
    pub fn submit(&self, command: FitCommand) -> Result<OperationHandle, SessionError> {
        let label = command.label();
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("{} abgelehnt: es läuft bereits eine Operation", label);
            return Err(SessionError::Busy);
        }

        let busy = BusyGuard(Arc::clone(&self.busy));
        let state = Arc::clone(&self.state);
        let progress = self.progress_tx.clone();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let outcome = run_exclusive(&state, command, &progress, label);
            // Flag vor dem Ergebnis freigeben: wer auf das Ergebnis wartet,
            // darf sofort die nächste Operation starten
            drop(busy);
            let _ = outcome_tx.send(outcome);
        });

        log::info!("{} gestartet", label);
        Ok(OperationHandle {
            label,
            outcome: outcome_rx,
        })
    }

    /// Führt `command` im Hintergrund aus und wartet auf das Ergebnis.
    pub fn execute(&self, command: FitCommand) -> anyhow::Result<()> {
        self.submit(command)?.wait()
    }
}

fn run_exclusive(
    state: &RwLock<AppState>,
    command: FitCommand,
    progress: &Sender<Progress>,
    label: &'static str,
) -> anyhow::Result<()> {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    report(progress, label, ProgressStage::Started, String::new());

    let mut working = guard.clone();
    let result = catch_unwind(AssertUnwindSafe(|| {
        AppController::new().handle_command(&mut working, command)
    }));

    match result {
        Ok(Ok(())) => {
            let message = working.status_message.clone().unwrap_or_default();
            *guard = working;
            log::info!("{} abgeschlossen", label);
            report(progress, label, ProgressStage::Finished, message);
            Ok(())
        }
        Ok(Err(e)) => {
            // Modell bleibt unverändert; nur Log und Statusmeldung übernehmen
            guard.command_log = working.command_log;
            guard.status_message = working.status_message;
            report(progress, label, ProgressStage::Failed, format!("{:#}", e));
            Err(e)
        }
        Err(_) => {
            log::warn!("{} abgebrochen: Worker-Panic", label);
            report(
                progress,
                label,
                ProgressStage::Failed,
                SessionError::WorkerPanicked.to_string(),
            );
            Err(SessionError::WorkerPanicked.into())
        }
    }
}

/// Best-effort: ein fehlender Empfänger ist kein Fehler.
fn report(progress: &Sender<Progress>, operation: &'static str, stage: ProgressStage, message: String) {
    let _ = progress.send(Progress {
        operation,
        stage,
        message,
    });
}
