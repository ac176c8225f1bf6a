//! Verlauf der Fit-Commands einer Sitzung.
//!
//! Hält die zuletzt eingegangenen [`FitCommand`]s in Eingangsreihenfolge,
//! auch fehlgeschlagene. Beim Überlauf wird die ältere Hälfte verworfen.

use super::FitCommand;

/// Obergrenze der gehaltenen Commands.
const CAPACITY: usize = 1000;

/// Begrenzter Command-Verlauf.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    entries: Vec<FitCommand>,
}

impl CommandLog {
    /// Leerer Verlauf.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hängt `command` an; bei voller Kapazität fällt die ältere Hälfte weg.
    pub fn record(&mut self, command: &FitCommand) {
        if self.entries.len() >= CAPACITY {
            self.entries.drain(..CAPACITY / 2);
        }
        self.entries.push(command.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zuletzt eingegangener Command.
    pub fn last(&self) -> Option<&FitCommand> {
        self.entries.last()
    }

    /// Anzeigenamen aller Einträge, älteste zuerst.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(FitCommand::label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Surface;

    #[test]
    fn overflow_drops_older_half() {
        let mut log = CommandLog::new();
        for _ in 0..CAPACITY + 10 {
            log.record(&FitCommand::UpdateErrors);
        }
        assert_eq!(log.len(), CAPACITY / 2 + 10);
    }

    #[test]
    fn labels_follow_arrival_order() {
        let mut log = CommandLog::new();
        log.record(&FitCommand::FitWithDefaults);
        log.record(&FitCommand::RefineAtMaxError {
            surface: Surface::Lower,
        });

        let labels: Vec<_> = log.labels().collect();
        assert_eq!(
            labels,
            vec![
                FitCommand::FitWithDefaults.label(),
                FitCommand::RefineAtMaxError {
                    surface: Surface::Lower
                }
                .label()
            ]
        );
        assert!(matches!(log.last(), Some(FitCommand::RefineAtMaxError { .. })));
    }
}
