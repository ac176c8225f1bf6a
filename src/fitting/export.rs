//! Export-Sicht für externe CAD-Writer (skaliert auf Sehnenlänge in mm).

use glam::DVec2;

use super::bezier::{decompose_curve, BezierSegment};
use crate::core::{ExportError, SurfaceCurve, SurfaceModel, SurfacePair};

/// Eine Seite in Export-Koordinaten.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSurface {
    /// Polynomgrad
    pub degree: usize,
    /// Knotenvektor (unskaliert)
    pub knots: Vec<f64>,
    /// Kontrollpunkte in mm
    pub control_points: Vec<DVec2>,
    /// Bezier-Segmente in mm
    pub segments: Vec<BezierSegment>,
}

/// Beide Seiten plus ggf. Verbindungslinie der stumpfen Hinterkante.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportView {
    /// Sehnenlänge in mm
    pub chord_length_mm: f64,
    /// Seiten in mm
    pub surfaces: SurfacePair<ExportSurface>,
    /// Linie oben → unten an einer stumpfen Hinterkante
    pub te_connector: Option<(DVec2, DVec2)>,
}

/// Baut die Export-Sicht des Modells.
pub fn export_view(model: &SurfaceModel, chord_length_mm: f64) -> Result<ExportView, ExportError> {
    if !(chord_length_mm.is_finite() && chord_length_mm > 0.0) {
        return Err(ExportError::InvalidChordLength(chord_length_mm));
    }
    let curves = model.curves().ok_or(ExportError::NotFitted)?;

    let surfaces = curves
        .as_ref()
        .map(|curve| scaled_surface(curve, chord_length_mm));

    let te_connector = if model.sharp_trailing_edge() {
        None
    } else {
        let upper = curves.upper.last_point() * chord_length_mm;
        let lower = curves.lower.last_point() * chord_length_mm;
        (upper != lower).then_some((upper, lower))
    };

    log::info!(
        "Export vorbereitet: {:.2} mm Sehne, Grad {}/{}, {}/{} Bezier-Segmente",
        chord_length_mm,
        surfaces.upper.degree,
        surfaces.lower.degree,
        surfaces.upper.segments.len(),
        surfaces.lower.segments.len()
    );

    Ok(ExportView {
        chord_length_mm,
        surfaces,
        te_connector,
    })
}

fn scaled_surface(curve: &SurfaceCurve, scale: f64) -> ExportSurface {
    let segments = decompose_curve(curve)
        .into_iter()
        .map(|segment| BezierSegment {
            control_points: segment.control_points.iter().map(|p| *p * scale).collect(),
            interval: segment.interval,
        })
        .collect();

    ExportSurface {
        degree: curve.degree(),
        knots: curve.knots().to_vec(),
        control_points: curve.control_points().iter().map(|p| *p * scale).collect(),
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clamped_uniform_knots;
    use crate::fitting::trailing_edge::thicken;
    use approx::assert_relative_eq;

    fn model() -> SurfaceModel {
        let upper = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.05),
            DVec2::new(0.4, 0.09),
            DVec2::new(0.8, 0.04),
            DVec2::new(1.0, 0.0),
        ];
        let lower = upper.iter().map(|p| DVec2::new(p.x, -0.5 * p.y)).collect();
        SurfaceModel::from_curves(
            "export",
            SurfaceCurve::new(3, clamped_uniform_knots(5, 3), upper).expect("gültige Kurve"),
            SurfaceCurve::new(3, clamped_uniform_knots(5, 3), lower).expect("gültige Kurve"),
        )
    }

    #[test]
    fn control_points_are_scaled_by_chord_length() {
        let view = export_view(&model(), 200.0).expect("Export erwartet");

        let upper = &view.surfaces.upper;
        assert_relative_eq!(upper.control_points[2].x, 80.0, epsilon = 1e-12);
        assert_relative_eq!(upper.control_points[2].y, 18.0, epsilon = 1e-12);
        assert_eq!(upper.knots, clamped_uniform_knots(5, 3));
        assert_eq!(upper.segments.len(), 2);
        assert!(view.te_connector.is_none());
    }

    #[test]
    fn blunt_trailing_edge_gets_connector() {
        let mut model = model();
        thicken(&mut model, 0.01).expect("Aufdicken erwartet");
        let view = export_view(&model, 100.0).expect("Export erwartet");

        let (upper, lower) = view.te_connector.expect("Verbindungslinie erwartet");
        assert_relative_eq!((upper - lower).length(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_requests_are_rejected() {
        assert_eq!(
            export_view(&model(), 0.0),
            Err(ExportError::InvalidChordLength(0.0))
        );
        assert_eq!(
            export_view(&SurfaceModel::new(), 200.0),
            Err(ExportError::NotFitted)
        );
    }
}
