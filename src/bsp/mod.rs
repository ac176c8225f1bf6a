//! Import/Export des sektionierten `.bsp`-Formats.
//!
//! Eine Namenszeile, danach je Seite ein Kontrollpunkt-Block
//! (`Top Start`/`Top End`, zwei Spalten) und ein Knoten-Block
//! (`Top Knots Start`/`Top Knots End`, eine Spalte); `Bottom` analog.

pub mod parser;
pub mod writer;

pub use parser::parse_bsp;
pub use writer::write_bsp;

use crate::core::Surface;

/// Sektions-Präfix einer Seite in `.bsp`-Dateien.
pub(crate) fn section_prefix(surface: Surface) -> &'static str {
    match surface {
        Surface::Upper => "Top",
        Surface::Lower => "Bottom",
    }
}
