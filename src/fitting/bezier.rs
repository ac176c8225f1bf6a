//! Zerlegung einer B-Spline-Kurve in Bezier-Segmente.
//!
//! Jeder innere Knoten wird per Boehm-Einfügung auf Vielfachheit `degree`
//! angehoben; danach ist Segment `i` genau `cps[i·p ..= i·p + p]`.

use glam::DVec2;

use crate::core::{DecomposeError, SurfaceCurve};

/// Ein Bezier-Segment mit seinem Parameterintervall in der Ursprungskurve.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierSegment {
    /// `degree + 1` Kontrollpunkte
    pub control_points: Vec<DVec2>,
    /// Parameterintervall `[start, end]` im Knotenbereich der Ursprungskurve
    pub interval: (f64, f64),
}

impl BezierSegment {
    /// Grad des Segments.
    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    /// Auswertung per de Casteljau bei lokalem Parameter `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f64) -> DVec2 {
        let mut points = self.control_points.clone();
        for level in 1..points.len() {
            for i in 0..points.len() - level {
                points[i] = points[i].lerp(points[i + 1], t);
            }
        }
        points[0]
    }

    /// Lokaler Parameter eines globalen Kurvenparameters `u`.
    pub fn local_parameter(&self, u: f64) -> f64 {
        let (start, end) = self.interval;
        (u - start) / (end - start)
    }
}

/// Zerlegt die Kurve `(control_points, knots, degree)` in Bezier-Segmente.
pub fn decompose(
    control_points: &[DVec2],
    knots: &[f64],
    degree: usize,
) -> Result<Vec<BezierSegment>, DecomposeError> {
    let curve = SurfaceCurve::new(degree, knots.to_vec(), control_points.to_vec())?;
    Ok(decompose_curve(&curve))
}

/// Zerlegt eine bereits geprüfte Kurve.
pub fn decompose_curve(curve: &SurfaceCurve) -> Vec<BezierSegment> {
    let p = curve.degree();
    let breaks = curve.breakpoints();
    let mut refined = curve.clone();

    for &knot in &breaks[1..breaks.len() - 1] {
        while refined.knot_multiplicity(knot) < p {
            if !refined.insert_knot(knot) {
                break;
            }
        }
    }

    let points = refined.control_points();
    breaks
        .windows(2)
        .enumerate()
        .map(|(i, w)| BezierSegment {
            control_points: points[i * p..=i * p + p].to_vec(),
            interval: (w[0], w[1]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clamped_uniform_knots;
    use approx::assert_relative_eq;

    fn wavy(n: usize, degree: usize) -> (Vec<DVec2>, Vec<f64>) {
        let points = (0..n)
            .map(|i| {
                let x = i as f64 / (n - 1) as f64;
                DVec2::new(x, 0.1 * (7.0 * x).sin())
            })
            .collect();
        (points, clamped_uniform_knots(n, degree))
    }

    #[test]
    fn segments_reproduce_spline() {
        let (points, knots) = wavy(9, 4);
        let curve = SurfaceCurve::new(4, knots.clone(), points.clone()).expect("gültige Kurve");
        let segments = decompose(&points, &knots, 4).expect("Zerlegung erwartet");

        assert_eq!(segments.len(), curve.span_count());
        for segment in &segments {
            assert_eq!(segment.degree(), 4);
            let (start, end) = segment.interval;
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let expected = curve.point_at(start + t * (end - start));
                let actual = segment.point_at(t);
                assert_relative_eq!(actual.x, expected.x, epsilon = 1e-9);
                assert_relative_eq!(actual.y, expected.y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn segments_join_end_to_end() {
        let (points, knots) = wavy(11, 3);
        let segments = decompose(&points, &knots, 3).expect("Zerlegung erwartet");

        for pair in segments.windows(2) {
            assert_eq!(pair[0].control_points.last(), pair[1].control_points.first());
        }
        assert_eq!(segments[0].control_points[0], points[0]);
        assert_eq!(
            segments.last().and_then(|s| s.control_points.last()),
            points.last()
        );
    }

    #[test]
    fn single_span_curve_is_its_own_segment() {
        let (points, knots) = wavy(5, 4);
        let segments = decompose(&points, &knots, 4).expect("Zerlegung erwartet");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].control_points, points);
    }

    #[test]
    fn degenerate_knot_vector_is_rejected() {
        let points = vec![DVec2::ZERO, DVec2::X, DVec2::Y];
        assert_eq!(
            decompose(&points, &[0.5; 6], 2),
            Err(DecomposeError::DegenerateKnotVector)
        );
    }

    #[test]
    fn inconsistent_length_is_rejected() {
        let points = vec![DVec2::ZERO, DVec2::X, DVec2::Y];
        assert!(matches!(
            decompose(&points, &[0.0, 0.0, 1.0, 1.0], 2),
            Err(DecomposeError::InvalidKnotVector(_))
        ));
    }

    #[test]
    fn local_parameter_maps_interval() {
        let segment = BezierSegment {
            control_points: vec![DVec2::ZERO, DVec2::X],
            interval: (0.25, 0.75),
        };
        assert_relative_eq!(segment.local_parameter(0.5), 0.5);
    }
}
