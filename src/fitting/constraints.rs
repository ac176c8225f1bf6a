//! Lineare Gleichheits-Constraints des Fits.
//!
//! Jeder Constraint ist eine Zeile `Σ a_j · z_j = b` über dem gemeinsamen
//! Unbekannten-Vektor `z = [x0, y0, x1, y1, …]` (erst Oberseite, dann Unterseite).

use glam::DVec2;

use crate::core::{Surface, SurfacePair};

/// Stetigkeitsordnung an der Vorderkante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Continuity {
    /// Keine Kopplung der Seiten
    None,
    /// Gemeinsame Tangente senkrecht zur Sehne
    G1,
    /// Zusätzlich gleiche Krümmung
    G2,
    /// Zusätzlich gleiche Krümmungsableitung
    G3,
}

impl Continuity {
    /// Höchste Ableitungsordnung, die die Bedingung berührt.
    pub fn order(self) -> usize {
        match self {
            Continuity::None => 0,
            Continuity::G1 => 1,
            Continuity::G2 => 2,
            Continuity::G3 => 3,
        }
    }

    /// Mindestgrad, ab dem die Bedingung erzwungen wird.
    pub fn min_degree(self) -> usize {
        match self {
            Continuity::None | Continuity::G1 => 1,
            Continuity::G2 => 4,
            Continuity::G3 => 5,
        }
    }

    /// Nächstniedrigere Ordnung.
    pub fn lower(self) -> Self {
        match self {
            Continuity::G3 => Continuity::G2,
            Continuity::G2 => Continuity::G1,
            Continuity::G1 | Continuity::None => Continuity::None,
        }
    }
}

/// Position der Kontrollpunkt-Koordinaten im Unbekannten-Vektor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VariableLayout {
    counts: SurfacePair<usize>,
}

impl VariableLayout {
    pub(crate) fn new(counts: SurfacePair<usize>) -> Self {
        Self { counts }
    }

    pub(crate) fn len(&self) -> usize {
        2 * (self.counts.upper + self.counts.lower)
    }

    pub(crate) fn count(&self, surface: Surface) -> usize {
        self.counts[surface]
    }

    /// Index der Koordinate `axis` (0 = x, 1 = y) von Kontrollpunkt `cp`.
    pub(crate) fn index(&self, surface: Surface, cp: usize, axis: usize) -> usize {
        let offset = match surface {
            Surface::Upper => 0,
            Surface::Lower => 2 * self.counts.upper,
        };
        offset + 2 * cp + axis
    }
}

/// Eine lineare Gleichheitsbedingung.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Constraint {
    pub terms: Vec<(usize, f64)>,
    pub target: f64,
}

/// Sammlung der Gleichheitsbedingungen eines Fit-Aufrufs.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub(crate) fn len(&self) -> usize {
        self.constraints.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Fixiert Kontrollpunkt `cp` auf `point` (zwei Zeilen).
    pub(crate) fn pin_point(
        &mut self,
        layout: &VariableLayout,
        surface: Surface,
        cp: usize,
        point: DVec2,
    ) {
        for (axis, target) in [(0, point.x), (1, point.y)] {
            self.constraints.push(Constraint {
                terms: vec![(layout.index(surface, cp, axis), 1.0)],
                target,
            });
        }
    }

    /// Stetigkeit an der Vorderkante bis zur Ordnung `continuity`.
    ///
    /// `basis_ders[s][k][j]` ist die k-te Ableitung der Basisfunktion `j` am
    /// Kurvenanfang. Mit Sehnenrichtung `c` und Normale `n = perp(c)`:
    /// - G1: `C'_s · c = 0` je Seite
    /// - G2: `(C'_o + C'_u) · n = 0` und `(C''_o − C''_u) · c = 0`
    /// - G3: `(C''_o − C''_u) · n = 0` und `(C'''_o + C'''_u) · c = 0`
    pub(crate) fn leading_edge_continuity(
        &mut self,
        layout: &VariableLayout,
        basis_ders: &SurfacePair<Vec<Vec<f64>>>,
        continuity: Continuity,
        chord_dir: DVec2,
    ) {
        if continuity == Continuity::None {
            return;
        }
        let normal = chord_dir.perp();

        for surface in Surface::ALL {
            let mut terms = Vec::new();
            derivative_terms(layout, basis_ders, surface, 1, chord_dir, 1.0, &mut terms);
            self.push_homogeneous(terms);
        }

        if continuity >= Continuity::G2 {
            self.coupled(layout, basis_ders, 1, normal, 1.0);
            self.coupled(layout, basis_ders, 2, chord_dir, -1.0);
        }
        if continuity >= Continuity::G3 {
            self.coupled(layout, basis_ders, 2, normal, -1.0);
            self.coupled(layout, basis_ders, 3, chord_dir, 1.0);
        }
    }

    /// Letzte zwei Kontrollpunkte kolinear zu `tangent`: `(P_{n−1} − P_{n−2}) × t = 0`.
    pub(crate) fn trailing_edge_tangency(
        &mut self,
        layout: &VariableLayout,
        surface: Surface,
        tangent: DVec2,
    ) {
        let n = layout.count(surface);
        let terms = vec![
            (layout.index(surface, n - 1, 0), tangent.y),
            (layout.index(surface, n - 2, 0), -tangent.y),
            (layout.index(surface, n - 1, 1), -tangent.x),
            (layout.index(surface, n - 2, 1), tangent.x),
        ];
        self.push_homogeneous(terms);
    }

    /// Größte absolute Verletzung aller Bedingungen für die Lösung `z`.
    pub(crate) fn max_residual(&self, z: &[f64]) -> f64 {
        self.constraints
            .iter()
            .map(|c| {
                let lhs: f64 = c.terms.iter().map(|&(i, a)| a * z[i]).sum();
                (lhs - c.target).abs() / c.target.abs().max(1.0)
            })
            .fold(0.0, f64::max)
    }

    fn coupled(
        &mut self,
        layout: &VariableLayout,
        basis_ders: &SurfacePair<Vec<Vec<f64>>>,
        order: usize,
        direction: DVec2,
        lower_sign: f64,
    ) {
        let mut terms = Vec::new();
        derivative_terms(layout, basis_ders, Surface::Upper, order, direction, 1.0, &mut terms);
        derivative_terms(
            layout,
            basis_ders,
            Surface::Lower,
            order,
            direction,
            lower_sign,
            &mut terms,
        );
        self.push_homogeneous(terms);
    }

    fn push_homogeneous(&mut self, terms: Vec<(usize, f64)>) {
        self.constraints.push(Constraint {
            terms,
            target: 0.0,
        });
    }
}

/// Terme von `sign · C^(order)(0) · direction` für eine Seite.
fn derivative_terms(
    layout: &VariableLayout,
    basis_ders: &SurfacePair<Vec<Vec<f64>>>,
    surface: Surface,
    order: usize,
    direction: DVec2,
    sign: f64,
    terms: &mut Vec<(usize, f64)>,
) {
    for (j, &coeff) in basis_ders[surface][order].iter().enumerate() {
        if coeff == 0.0 {
            continue;
        }
        terms.push((layout.index(surface, j, 0), sign * coeff * direction.x));
        terms.push((layout.index(surface, j, 1), sign * coeff * direction.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_places_lower_after_upper() {
        let layout = VariableLayout::new(SurfacePair::new(5, 7));
        assert_eq!(layout.len(), 24);
        assert_eq!(layout.index(Surface::Upper, 4, 1), 9);
        assert_eq!(layout.index(Surface::Lower, 0, 0), 10);
        assert_eq!(layout.index(Surface::Lower, 6, 1), 23);
    }

    #[test]
    fn continuity_orders_are_monotonic() {
        assert!(Continuity::G3 > Continuity::G2);
        assert_eq!(Continuity::G3.lower(), Continuity::G2);
        assert_eq!(Continuity::G1.lower(), Continuity::None);
        assert_eq!(Continuity::G2.min_degree(), 4);
        assert_eq!(Continuity::G3.order(), 3);
    }

    #[test]
    fn tangency_row_vanishes_for_colinear_points() {
        let layout = VariableLayout::new(SurfacePair::new(3, 3));
        let mut set = ConstraintSet::default();
        set.trailing_edge_tangency(&layout, Surface::Upper, DVec2::new(1.0, -0.5));

        let mut z = vec![0.0; layout.len()];
        // P1 = (0.5, 0.25), P2 = (1.5, -0.25): Differenz (1, -0.5)
        z[2] = 0.5;
        z[3] = 0.25;
        z[4] = 1.5;
        z[5] = -0.25;
        assert!(set.max_residual(&z) < 1e-15);

        z[5] = 0.0;
        assert!(set.max_residual(&z) > 0.1);
    }

    #[test]
    fn leading_edge_rows_grow_with_order() {
        let layout = VariableLayout::new(SurfacePair::new(6, 6));
        let ders = SurfacePair::splat(vec![vec![1.0; 6]; 4]);

        let mut counts = Vec::new();
        for continuity in [
            Continuity::None,
            Continuity::G1,
            Continuity::G2,
            Continuity::G3,
        ] {
            let mut set = ConstraintSet::default();
            set.leading_edge_continuity(&layout, &ders, continuity, DVec2::X);
            counts.push(set.len());
        }
        assert_eq!(counts, vec![0, 2, 4, 6]);
    }
}
