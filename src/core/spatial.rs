//! Spatial-Index (KD-Tree) über dichten Kurven-Samples.

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::SurfaceCurve;

/// Ein abgetasteter Kurvenpunkt mit seinem Parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Kurvenparameter
    pub parameter: f64,
    /// Position in der Ebene
    pub position: DVec2,
}

/// Ergebnis einer Nächster-Nachbar-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMatch {
    /// Parameter des nächsten Samples
    pub parameter: f64,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

/// Read-only Spatial-Index über den Samples einer Kurve.
#[derive(Debug, Clone)]
pub struct SampleIndex {
    tree: KdTree<f64, 2>,
    samples: Vec<CurveSample>,
}

impl SampleIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            samples: Vec::new(),
        }
    }

    /// Baut den Index aus Samples; intern nach x sortiert.
    pub fn from_samples(mut samples: Vec<CurveSample>) -> Self {
        samples.sort_by(|a, b| {
            a.position
                .x
                .total_cmp(&b.position.x)
                .then(a.parameter.total_cmp(&b.parameter))
        });

        let entries: Vec<[f64; 2]> = samples
            .iter()
            .map(|s| [s.position.x, s.position.y])
            .collect();
        let tree: KdTree<f64, 2> = (&entries).into();

        Self { tree, samples }
    }

    /// Tastet `curve` an `count` gleichverteilten Parametern ab.
    ///
    /// Der letzte Parameter wird um `1e-12` (relativ zum Bereich) vor das Ende
    /// gezogen, damit er in der letzten Spanne liegt.
    pub fn sample_curve(curve: &SurfaceCurve, count: usize) -> Self {
        let (a, b) = curve.domain();
        let width = b - a;
        let upper = b - 1e-12 * width;
        let count = count.max(2);

        let samples = (0..count)
            .map(|i| {
                let t = i as f64 / (count - 1) as f64;
                let parameter = (a + t * width).min(upper);
                CurveSample {
                    parameter,
                    position: curve.point_at(parameter),
                }
            })
            .collect();

        Self::from_samples(samples)
    }

    /// Anzahl indexierter Samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// `true`, wenn keine Samples im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Findet das nächste Sample zum Suchpunkt.
    pub fn nearest(&self, query: DVec2) -> Option<SampleMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self.tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        let sample = self.samples.get(result.item as usize)?;

        Some(SampleMatch {
            parameter: sample.parameter,
            distance: result.distance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::curve::clamped_uniform_knots;
    use approx::assert_relative_eq;

    fn sample_points() -> Vec<CurveSample> {
        vec![
            CurveSample {
                parameter: 0.5,
                position: DVec2::new(10.0, 0.0),
            },
            CurveSample {
                parameter: 0.0,
                position: DVec2::new(0.0, 0.0),
            },
            CurveSample {
                parameter: 0.25,
                position: DVec2::new(4.0, 3.0),
            },
        ]
    }

    #[test]
    fn nearest_returns_parameter_of_closest_sample() {
        let index = SampleIndex::from_samples(sample_points());
        let nearest = index
            .nearest(DVec2::new(3.9, 2.9))
            .expect("Treffer erwartet");

        assert_relative_eq!(nearest.parameter, 0.25);
        assert!(nearest.distance < 0.2);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = SampleIndex::empty();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.nearest(DVec2::ZERO).is_none());
    }

    #[test]
    fn curve_sampling_stays_inside_last_span() {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.3, 0.2),
            DVec2::new(0.7, 0.15),
            DVec2::new(1.0, 0.0),
        ];
        let curve = SurfaceCurve::new(2, clamped_uniform_knots(4, 2), points)
            .expect("gültige Kurve erwartet");
        let index = SampleIndex::sample_curve(&curve, 101);

        assert_eq!(index.len(), 101);
        let end = index
            .nearest(DVec2::new(1.0, 0.0))
            .expect("Treffer erwartet");
        assert!(end.parameter < 1.0);
        assert_relative_eq!(end.parameter, 1.0, epsilon = 1e-11);
        assert!(end.distance < 1e-10);
    }
}
