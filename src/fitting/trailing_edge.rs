//! Umkehrbares Aufdicken und Schärfen der Hinterkante.

use glam::DVec2;

use crate::core::{EditError, SurfaceModel, SurfacePair};

/// Öffnet die Hinterkante auf `fraction` × Sehnenlänge.
///
/// Die letzten Kontrollpunkte werden symmetrisch entlang der Sehnennormalen
/// verschoben (je halbe Dicke). Wiederholte Aufrufe ersetzen den Versatz,
/// statt ihn aufzuaddieren.
pub fn thicken(model: &mut SurfaceModel, fraction: f64) -> Result<(), EditError> {
    if !(fraction.is_finite() && (0.0..1.0).contains(&fraction)) {
        return Err(EditError::InvalidThickness(fraction));
    }
    if !model.is_fitted() {
        return Err(EditError::NotFitted);
    }
    offset_trailing_edge(model, fraction);
    log::debug!("Hinterkante aufgedickt auf {:.2}% der Sehne", fraction * 100.0);
    Ok(())
}

/// Schließt die Hinterkante: beide Endpunkte auf die gemeinsame Mitte.
pub fn sharpen(model: &mut SurfaceModel) -> Result<(), EditError> {
    let baseline = model.te_baseline;
    let Some(curves) = model.curves.as_mut() else {
        return Err(EditError::NotFitted);
    };

    let ends = baseline.unwrap_or_else(|| {
        SurfacePair::new(curves.upper.last_point(), curves.lower.last_point())
    });
    let mid = (ends.upper + ends.lower) * 0.5;
    for curve in [&mut curves.upper, &mut curves.lower] {
        if let Some(last) = curve.control_points_mut().last_mut() {
            *last = mid;
        }
    }

    model.te_baseline = None;
    model.te_thickness = None;
    model.recompute_sharp_trailing_edge();
    Ok(())
}

/// Setzt den Hinterkanten-Versatz relativ zur gespeicherten Basis.
///
/// Erwartet ein gefittetes Modell und einen geprüften Anteil.
pub(crate) fn offset_trailing_edge(model: &mut SurfaceModel, fraction: f64) {
    let baseline = model.te_baseline;
    let Some(curves) = model.curves.as_mut() else {
        return;
    };

    let baseline = baseline.unwrap_or_else(|| {
        SurfacePair::new(curves.upper.last_point(), curves.lower.last_point())
    });
    let base = (baseline.upper + baseline.lower) * 0.5;
    let chord = base - curves.upper.first_point();
    let normal = chord.perp().normalize_or_zero();
    let half = 0.5 * fraction * chord.length();

    if let Some(last) = curves.upper.control_points_mut().last_mut() {
        *last = base + normal * half;
    }
    if let Some(last) = curves.lower.control_points_mut().last_mut() {
        *last = base - normal * half;
    }

    model.te_baseline = Some(baseline);
    model.te_thickness = Some(fraction);
    model.recompute_sharp_trailing_edge();
}

/// Tangentenrichtung an der Hinterkante aus den letzten `count` Punkten.
///
/// Mittelt die Sekanten vom jeweiligen Punkt zum letzten Punkt; zeigt in
/// Richtung Hinterkante. `None` bei weniger als zwei Punkten oder
/// verschwindender Richtung.
pub fn trailing_edge_tangent(points: &[DVec2], count: usize) -> Option<DVec2> {
    let last = *points.last()?;
    let count = count.clamp(2, points.len().max(2));
    let start = points.len().checked_sub(count)?;
    let sum: DVec2 = points[start..points.len() - 1]
        .iter()
        .map(|p| last - *p)
        .sum();
    sum.try_normalize()
}
