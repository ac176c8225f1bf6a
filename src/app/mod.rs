//! Application-Layer: Controller, State, Commands, Use-Cases und die
//! Hintergrund-Sitzung.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod session;
/// Application State
///
/// Dieses Modul verwaltet den Zustand einer Sitzung (Modell, Eingabe, Optionen).
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{FitCommand, Progress, ProgressStage};
pub use session::{FitSession, OperationHandle, SessionError};
pub use state::AppState;
