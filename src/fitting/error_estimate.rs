//! Fehlerabschätzung zwischen gefitteter Kurve und Referenzpunkten.
//!
//! Bewusst eine Näherung: statt des exakten Lotfußpunkts wird der nächste von
//! dicht verteilten Kurven-Samples über einen KD-Tree gesucht.

use glam::DVec2;

use crate::core::{ErrorEstimate, SampleIndex, Surface, SurfaceCurve, SurfaceModel, SurfacePair};

/// Standard-Anzahl der Kurven-Samples.
pub const DEFAULT_SAMPLE_COUNT: usize = 35_000;
/// Untergrenze der Sample-Anzahl.
pub const MIN_SAMPLE_COUNT: usize = 30_000;

/// Schätzt den Abstand der Referenzpunkte zur Kurve mit Standard-Sampling.
///
/// `None` bei leerer Referenz.
pub fn estimate(curve: &SurfaceCurve, reference: &[DVec2]) -> Option<ErrorEstimate> {
    estimate_with_samples(curve, reference, DEFAULT_SAMPLE_COUNT)
}

/// Wie [`estimate`], mit wählbarer Sample-Anzahl (mindestens [`MIN_SAMPLE_COUNT`]).
pub fn estimate_with_samples(
    curve: &SurfaceCurve,
    reference: &[DVec2],
    sample_count: usize,
) -> Option<ErrorEstimate> {
    if reference.is_empty() {
        return None;
    }

    let index = SampleIndex::sample_curve(curve, sample_count.max(MIN_SAMPLE_COUNT));
    let mut sum_sq = 0.0;
    let mut max_error = f64::NEG_INFINITY;
    let mut max_index = 0;
    let mut parameter_at_max = 0.0;

    for (i, point) in reference.iter().enumerate() {
        let hit = index.nearest(*point)?;
        sum_sq += hit.distance * hit.distance;
        if hit.distance > max_error {
            max_error = hit.distance;
            max_index = i;
            parameter_at_max = hit.parameter;
        }
    }

    Some(ErrorEstimate {
        sum_sq,
        rms: (sum_sq / reference.len() as f64).sqrt(),
        max_error,
        max_index,
        parameter_at_max,
    })
}

/// Aktualisiert die Fehlerwerte beider Seiten im Modell.
///
/// Ohne Referenzdaten oder ohne Fit werden die Werte geleert.
pub fn update_model_errors(model: &mut SurfaceModel, sample_count: usize) {
    let errors = match (model.curves(), model.reference()) {
        (Some(curves), Some(reference)) => SurfacePair::from_fn(|s| {
            estimate_with_samples(&curves[s], &reference.points[s], sample_count)
        }),
        _ => SurfacePair::default(),
    };

    for surface in Surface::ALL {
        if let Some(e) = &errors[surface] {
            log::debug!(
                "{}: max. Abweichung {:.3e} an Punkt {}, RMS {:.3e}",
                surface,
                e.max_error,
                e.max_index,
                e.rms
            );
        }
    }
    model.last_error = errors;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clamped_uniform_knots;
    use approx::assert_relative_eq;

    fn arch() -> SurfaceCurve {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.1),
            DVec2::new(0.5, 0.15),
            DVec2::new(1.0, 0.1),
            DVec2::new(1.0, 0.0),
        ];
        SurfaceCurve::new(3, clamped_uniform_knots(5, 3), points).expect("gültige Kurve erwartet")
    }

    #[test]
    fn points_on_curve_have_negligible_error() {
        let curve = arch();
        let reference: Vec<DVec2> = (0..20).map(|i| curve.point_at(i as f64 / 19.0)).collect();

        let estimate = estimate(&curve, &reference).expect("Ergebnis erwartet");
        assert!(estimate.max_error < 1e-4);
        assert!(estimate.rms <= estimate.max_error);
    }

    #[test]
    fn offset_point_is_reported_as_maximum() {
        let curve = arch();
        let on_curve = curve.point_at(0.4);
        let d1 = curve.derivatives_at(0.4, 1)[1].normalize();
        let off = on_curve + d1.perp() * 0.01;
        let reference = vec![curve.point_at(0.1), off, curve.point_at(0.8)];

        let estimate = estimate(&curve, &reference).expect("Ergebnis erwartet");
        assert_eq!(estimate.max_index, 1);
        assert_relative_eq!(estimate.max_error, 0.01, epsilon = 1e-4);
        assert_relative_eq!(estimate.parameter_at_max, 0.4, epsilon = 1e-3);
        assert!(estimate.sum_sq >= estimate.max_error * estimate.max_error);
    }

    #[test]
    fn empty_reference_yields_no_estimate() {
        assert!(estimate(&arch(), &[]).is_none());
    }

    #[test]
    fn model_without_reference_clears_errors() {
        let mut model = SurfaceModel::from_curves("ohne Referenz", arch(), arch());
        update_model_errors(&mut model, DEFAULT_SAMPLE_COUNT);
        assert!(model.last_error(Surface::Upper).is_none());
        assert!(model.last_error(Surface::Lower).is_none());
    }
}
