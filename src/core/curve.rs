//! B-Spline-Kurve einer Profil-Seite.
//!
//! Nicht-rationale, geklemmte B-Splines beliebigen Grades. Die Basis-Routinen
//! folgen den Standard-Algorithmen (Spannensuche per Bisektion, Basisfunktionen
//! inkl. Ableitungen über die `ndu`-Tabelle, Boehm-Knoteneinfügung).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::KnotVectorError;

/// Eine geklemmte B-Spline-Kurve in der Ebene.
///
/// Invarianten (durch [`SurfaceCurve::new`] geprüft):
/// - `degree ≥ 1`
/// - `knots.len() == control_points.len() + degree + 1`
/// - Knoten nicht fallend, Randknoten `degree + 1`-fach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCurve {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<DVec2>,
}

impl SurfaceCurve {
    /// Erstellt eine Kurve nach Prüfung des Knotenvektors.
    pub fn new(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<DVec2>,
    ) -> Result<Self, KnotVectorError> {
        validate_knot_vector(degree, control_points.len(), &knots)?;
        Ok(Self {
            degree,
            knots,
            control_points,
        })
    }

    /// Polynomgrad.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Knotenvektor.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Kontrollpunkte.
    pub fn control_points(&self) -> &[DVec2] {
        &self.control_points
    }

    /// Anzahl Kontrollpunkte.
    pub fn num_control_points(&self) -> usize {
        self.control_points.len()
    }

    pub(crate) fn control_points_mut(&mut self) -> &mut [DVec2] {
        &mut self.control_points
    }

    /// Parameterbereich `[knots[p], knots[n]]`.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.control_points.len()],
        )
    }

    /// Erster Kontrollpunkt (= Kurvenanfang bei geklemmten Knoten).
    pub fn first_point(&self) -> DVec2 {
        self.control_points[0]
    }

    /// Letzter Kontrollpunkt (= Kurvenende bei geklemmten Knoten).
    pub fn last_point(&self) -> DVec2 {
        self.control_points[self.control_points.len() - 1]
    }

    /// Verschiedene Knotenwerte (Spannengrenzen) in aufsteigender Reihenfolge.
    pub fn breakpoints(&self) -> Vec<f64> {
        distinct_values(&self.knots)
    }

    /// Anzahl nicht-leerer Knotenspannen.
    pub fn span_count(&self) -> usize {
        self.breakpoints().len().saturating_sub(1)
    }

    /// Vielfachheit des Knotenwerts `u` im Knotenvektor (exakter Vergleich).
    pub fn knot_multiplicity(&self, u: f64) -> usize {
        self.knots.iter().filter(|&&k| k == u).count()
    }

    /// Kurvenpunkt bei Parameter `u` (wird auf den Parameterbereich begrenzt).
    pub fn point_at(&self, u: f64) -> DVec2 {
        self.derivatives_at(u, 0)[0]
    }

    /// Kurvenpunkt und Ableitungen bis Ordnung `order` bei `u`.
    ///
    /// Index 0 ist der Punkt selbst, Index `k` die k-te Ableitung.
    pub fn derivatives_at(&self, u: f64, order: usize) -> Vec<DVec2> {
        let (a, b) = self.domain();
        let u = u.clamp(a, b);
        let n = self.control_points.len();
        let p = self.degree;
        let span = find_span(&self.knots, p, n, u);
        let basis = basis_function_derivatives(&self.knots, p, span, u, order);

        basis
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold(DVec2::ZERO, |acc, (j, &weight)| {
                        acc + self.control_points[span - p + j] * weight
                    })
            })
            .collect()
    }

    /// Vorzeichenbehaftete Krümmung `κ = (x'y'' − y'x'') / |C'|³`.
    pub fn curvature_at(&self, u: f64) -> f64 {
        let ders = self.derivatives_at(u, 2);
        signed_curvature(ders[1], ders[2])
    }

    /// Fügt den Knoten `u` einmal ein (Boehm); die Kurvenform bleibt exakt erhalten.
    ///
    /// Gibt `false` zurück, wenn `u` nicht im offenen Parameterbereich liegt oder
    /// die Vielfachheit bereits den Grad erreicht hat.
    pub fn insert_knot(&mut self, u: f64) -> bool {
        let (a, b) = self.domain();
        let p = self.degree;
        if !(u > a && u < b) {
            return false;
        }
        let s = self.knot_multiplicity(u);
        if s >= p {
            return false;
        }

        let n = self.control_points.len();
        let k = find_span(&self.knots, p, n, u);

        let mut inserted = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let point = if i + p <= k {
                self.control_points[i]
            } else if i + s <= k {
                let alpha = (u - self.knots[i]) / (self.knots[i + p] - self.knots[i]);
                self.control_points[i] * alpha + self.control_points[i - 1] * (1.0 - alpha)
            } else {
                self.control_points[i - 1]
            };
            inserted.push(point);
        }

        self.knots.insert(k + 1, u);
        self.control_points = inserted;
        true
    }
}

/// Prüft die Struktur eines Knotenvektors.
pub fn validate_knot_vector(
    degree: usize,
    num_control_points: usize,
    knots: &[f64],
) -> Result<(), KnotVectorError> {
    if degree == 0 {
        return Err(KnotVectorError::InvalidDegree(degree));
    }
    let expected = num_control_points + degree + 1;
    if knots.len() != expected {
        return Err(KnotVectorError::InconsistentLength {
            expected,
            actual: knots.len(),
        });
    }
    if let Some(index) = knots.iter().position(|k| !k.is_finite()) {
        return Err(KnotVectorError::NonFinite { index });
    }
    if let Some(index) = knots.windows(2).position(|w| w[1] < w[0]) {
        return Err(KnotVectorError::Decreasing { index: index + 1 });
    }

    let first = knots[0];
    let last = knots[knots.len() - 1];
    if first >= last {
        return Err(KnotVectorError::Degenerate);
    }
    // Endknoten genau `degree + 1`-fach
    let tail_start = knots.len() - degree - 1;
    let head_clamped = knots[..=degree].iter().all(|&k| k == first) && knots[degree + 1] > first;
    let tail_clamped =
        knots[tail_start..].iter().all(|&k| k == last) && knots[tail_start - 1] < last;
    if !head_clamped || !tail_clamped {
        return Err(KnotVectorError::NotClamped);
    }
    Ok(())
}

/// Geklemmter, gleichmäßiger Knotenvektor auf `[0, 1]` für `n` Kontrollpunkte.
///
/// Voraussetzung: `n > degree`.
pub fn clamped_uniform_knots(num_control_points: usize, degree: usize) -> Vec<f64> {
    let spans = num_control_points - degree;
    let mut knots = Vec::with_capacity(num_control_points + degree + 1);
    knots.extend(std::iter::repeat_n(0.0, degree + 1));
    knots.extend((1..spans).map(|i| i as f64 / spans as f64));
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    knots
}

/// Sucht die Knotenspanne `k` mit `knots[k] ≤ u < knots[k+1]`.
///
/// Am rechten Rand wird die letzte nicht-leere Spanne geliefert.
pub fn find_span(knots: &[f64], degree: usize, num_control_points: usize, u: f64) -> usize {
    let n = num_control_points;
    if u >= knots[n] {
        return n - 1;
    }
    if u <= knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = n;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

/// Basisfunktionen und deren Ableitungen bis Ordnung `order` an `u`.
///
/// Ergebnis `ders[k][j]` ist die k-te Ableitung von `N_{span-p+j,p}(u)`.
/// Ableitungen oberhalb des Grades sind null.
pub fn basis_function_derivatives(
    knots: &[f64],
    degree: usize,
    span: usize,
    u: f64,
    order: usize,
) -> Vec<Vec<f64>> {
    let p = degree;
    let nd = order.min(p);

    let mut ndu = vec![vec![0.0; p + 1]; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    ndu[0][0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    let mut ders = vec![vec![0.0; p + 1]; order + 1];
    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }

    // Ableitungen über die Koeffizienten-Rekursion (zwei alternierende Zeilen)
    let mut a = vec![vec![0.0; p + 1]; 2];
    for r in 0..=p {
        let (mut s1, mut s2) = (0usize, 1usize);
        a[0][0] = 1.0;
        for k in 1..=nd {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = p - k;
            if rk >= 0 {
                let rk = rk as usize;
                a[s2][0] = a[s1][0] / ndu[pk + 1][rk];
                d = a[s2][0] * ndu[rk][pk];
            }
            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r as isize - 1 <= pk as isize {
                k - 1
            } else {
                p - r
            };
            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][idx];
                d += a[s2][j] * ndu[idx][pk];
            }
            if r <= pk {
                a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                d += a[s2][k] * ndu[r][pk];
            }
            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    let mut factor = p as f64;
    for k in 1..=nd {
        for value in ders[k].iter_mut() {
            *value *= factor;
        }
        factor *= (p - k) as f64;
    }
    ders
}

/// Vorzeichenbehaftete Krümmung aus erster und zweiter Ableitung.
///
/// Liefert 0 bei verschwindender Tangente.
pub fn signed_curvature(d1: DVec2, d2: DVec2) -> f64 {
    let speed_sq = d1.length_squared();
    if speed_sq <= f64::EPSILON * f64::EPSILON {
        return 0.0;
    }
    d1.perp_dot(d2) / (speed_sq * speed_sq.sqrt())
}

pub(crate) fn distinct_values(knots: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = Vec::with_capacity(knots.len());
    for &k in knots {
        if values.last().is_none_or(|&last| k > last) {
            values.push(k);
        }
    }
    values
}
