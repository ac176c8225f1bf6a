//! Command- und Fortschritts-Typen für den Datenfluss zum Controller.

mod command;
mod progress;

pub use command::FitCommand;
pub use progress::{Progress, ProgressStage};
