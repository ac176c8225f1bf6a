//! Profil-Seiten (Ober-/Unterseite) und paarweise Container.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Eine der beiden Profil-Seiten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    /// Oberseite (Saugseite)
    Upper,
    /// Unterseite (Druckseite)
    Lower,
}

impl Surface {
    /// Beide Seiten in fester Reihenfolge (Ober-, dann Unterseite).
    pub const ALL: [Surface; 2] = [Surface::Upper, Surface::Lower];

    /// Die jeweils andere Seite.
    pub fn other(self) -> Self {
        match self {
            Surface::Upper => Surface::Lower,
            Surface::Lower => Surface::Upper,
        }
    }

    /// Kurzbezeichnung für Logs und Statusmeldungen.
    pub fn label(self) -> &'static str {
        match self {
            Surface::Upper => "Oberseite",
            Surface::Lower => "Unterseite",
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ein Wert je Profil-Seite, indizierbar über [`Surface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacePair<T> {
    /// Wert der Oberseite
    pub upper: T,
    /// Wert der Unterseite
    pub lower: T,
}

impl<T> SurfacePair<T> {
    /// Erstellt ein Paar aus zwei Einzelwerten.
    pub fn new(upper: T, lower: T) -> Self {
        Self { upper, lower }
    }

    /// Erstellt ein Paar, dessen beide Werte über `f` erzeugt werden.
    pub fn from_fn(mut f: impl FnMut(Surface) -> T) -> Self {
        Self {
            upper: f(Surface::Upper),
            lower: f(Surface::Lower),
        }
    }

    /// Wendet `f` auf beide Werte an.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SurfacePair<U> {
        SurfacePair {
            upper: f(self.upper),
            lower: f(self.lower),
        }
    }

    /// Wie [`SurfacePair::map`], aber auf Referenzen.
    pub fn as_ref(&self) -> SurfacePair<&T> {
        SurfacePair {
            upper: &self.upper,
            lower: &self.lower,
        }
    }

    /// Iteriert in fester Reihenfolge über `(Seite, Wert)`.
    pub fn iter(&self) -> impl Iterator<Item = (Surface, &T)> {
        [(Surface::Upper, &self.upper), (Surface::Lower, &self.lower)].into_iter()
    }
}

impl<T: Clone> SurfacePair<T> {
    /// Beide Seiten mit demselben Wert.
    pub fn splat(value: T) -> Self {
        Self {
            upper: value.clone(),
            lower: value,
        }
    }
}

impl<T, E> SurfacePair<Result<T, E>> {
    /// Liefert das erste Fehlerergebnis (Oberseite zuerst) oder beide Werte.
    pub fn transpose(self) -> Result<SurfacePair<T>, E> {
        Ok(SurfacePair {
            upper: self.upper?,
            lower: self.lower?,
        })
    }
}

impl<T> Index<Surface> for SurfacePair<T> {
    type Output = T;

    fn index(&self, surface: Surface) -> &T {
        match surface {
            Surface::Upper => &self.upper,
            Surface::Lower => &self.lower,
        }
    }
}

impl<T> IndexMut<Surface> for SurfacePair<T> {
    fn index_mut(&mut self, surface: Surface) -> &mut T {
        match surface {
            Surface::Upper => &mut self.upper,
            Surface::Lower => &mut self.lower,
        }
    }
}
