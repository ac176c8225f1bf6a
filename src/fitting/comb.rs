//! Krümmungskamm zur Visualisierung der Kurvenqualität.
//!
//! Pro Knotenspanne eine Gruppe von Haaren `(p, p + s·κ·n)`, lazy erzeugt.

use glam::DVec2;

use crate::core::curve::signed_curvature;
use crate::core::SurfaceCurve;

/// Ein Haar des Kamms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombHair {
    /// Kurvenparameter
    pub parameter: f64,
    /// Vorzeichenbehaftete Krümmung
    pub curvature: f64,
    /// Fußpunkt auf der Kurve
    pub base: DVec2,
    /// Spitze des Haars
    pub tip: DVec2,
}

/// Haare einer Knotenspanne.
#[derive(Debug, Clone, PartialEq)]
pub struct CombSpan {
    /// Index der nicht-leeren Knotenspanne
    pub span_index: usize,
    /// Haare in Parameter-Reihenfolge
    pub hairs: Vec<CombHair>,
}

impl CombSpan {
    /// Verbindungslinie der Haarspitzen.
    pub fn tip_polyline(&self) -> Vec<DVec2> {
        self.hairs.iter().map(|h| h.tip).collect()
    }
}

/// Iterator über die Kamm-Gruppen einer Kurve.
#[derive(Debug, Clone)]
pub struct CurvatureComb<'a> {
    curve: &'a SurfaceCurve,
    breaks: Vec<f64>,
    points_per_segment: usize,
    scale: f64,
    next_span: usize,
}

/// Erzeugt den Krümmungskamm von `curve`.
///
/// `points_per_segment` Haare je Knotenspanne (mindestens 2, Spannengrenzen
/// eingeschlossen), Haarlänge `scale · κ`.
pub fn comb(curve: &SurfaceCurve, points_per_segment: usize, scale: f64) -> CurvatureComb<'_> {
    CurvatureComb {
        curve,
        breaks: curve.breakpoints(),
        points_per_segment: points_per_segment.max(2),
        scale,
        next_span: 0,
    }
}

impl Iterator for CurvatureComb<'_> {
    type Item = CombSpan;

    fn next(&mut self) -> Option<CombSpan> {
        let span_index = self.next_span;
        if span_index + 1 >= self.breaks.len() {
            return None;
        }
        self.next_span += 1;

        let (start, end) = (self.breaks[span_index], self.breaks[span_index + 1]);
        let last = (self.points_per_segment - 1) as f64;
        let hairs = (0..self.points_per_segment)
            .map(|i| {
                let parameter = start + (end - start) * i as f64 / last;
                hair(self.curve, parameter, self.scale)
            })
            .collect();

        Some(CombSpan { span_index, hairs })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.breaks.len().saturating_sub(self.next_span + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurvatureComb<'_> {}

fn hair(curve: &SurfaceCurve, parameter: f64, scale: f64) -> CombHair {
    let ders = curve.derivatives_at(parameter, 2);
    let curvature = signed_curvature(ders[1], ders[2]);
    let normal = ders[1].perp().normalize_or_zero();
    CombHair {
        parameter,
        curvature,
        base: ders[0],
        tip: ders[0] + normal * (scale * curvature),
    }
}
