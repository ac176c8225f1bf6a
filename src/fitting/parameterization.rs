//! Parametrisierung geordneter Profilpunkte.

use glam::DVec2;

use crate::core::DataError;

/// Ordnet jedem Punkt einen Parameter in `[0, 1]` zu.
///
/// `u_i = ((x_i − x_0) / (x_last − x_0))^e`. Ein Exponent unter 1 verdichtet
/// die Parameter an der Vorderkante. Erwartet streng steigende x-Werte.
pub fn parameterize(points: &[DVec2], exponent: f64) -> Result<Vec<f64>, DataError> {
    if points.len() < 2 {
        return Err(DataError::TooFewPoints {
            count: points.len(),
        });
    }
    if !(exponent.is_finite() && exponent > 0.0) {
        return Err(DataError::InvalidExponent(exponent));
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(DataError::NonFinite { index });
    }

    let x0 = points[0].x;
    let range = points[points.len() - 1].x - x0;
    if range == 0.0 {
        return Err(DataError::ZeroRange);
    }
    if let Some(index) = points.windows(2).position(|w| w[1].x <= w[0].x) {
        return Err(DataError::NonMonotonic { index: index + 1 });
    }

    let last = points.len() - 1;
    Ok(points
        .iter()
        .enumerate()
        .map(|(i, p)| match i {
            0 => 0.0,
            i if i == last => 1.0,
            _ => ((p.x - x0) / range).clamp(0.0, 1.0).powf(exponent),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parameters_start_at_zero_and_end_at_one() {
        let points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(0.25, 0.05),
            DVec2::new(1.0, 0.0),
        ];
        let u = parameterize(&points, 0.5).expect("gültige Punkte erwartet");

        assert_eq!(u[0], 0.0);
        assert_eq!(u[2], 1.0);
        assert_relative_eq!(u[1], 0.5);
    }

    #[test]
    fn parameters_are_strictly_increasing() {
        let points: Vec<DVec2> = (0..50)
            .map(|i| {
                let x = (i as f64 / 49.0).powi(2);
                DVec2::new(x, 0.1 * x.sqrt() * (1.0 - x))
            })
            .collect();
        let u = parameterize(&points, 0.5).expect("gültige Punkte erwartet");

        assert!(u.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn exponent_one_is_chord_fraction() {
        let points = [DVec2::new(2.0, 0.0), DVec2::new(3.0, 1.0), DVec2::new(6.0, 0.0)];
        let u = parameterize(&points, 1.0).expect("gültige Punkte erwartet");
        assert_relative_eq!(u[1], 0.25);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert_eq!(
            parameterize(&[DVec2::ZERO], 0.5),
            Err(DataError::TooFewPoints { count: 1 })
        );
        assert_eq!(
            parameterize(&[DVec2::ZERO, DVec2::new(0.0, 1.0)], 0.5),
            Err(DataError::ZeroRange)
        );
        assert_eq!(
            parameterize(
                &[DVec2::ZERO, DVec2::new(0.6, 0.0), DVec2::new(0.4, 0.0), DVec2::X],
                0.5
            ),
            Err(DataError::NonMonotonic { index: 2 })
        );
        assert_eq!(
            parameterize(&[DVec2::ZERO, DVec2::new(f64::NAN, 0.0)], 0.5),
            Err(DataError::NonFinite { index: 1 })
        );
        assert_eq!(
            parameterize(&[DVec2::ZERO, DVec2::X], -1.0),
            Err(DataError::InvalidExponent(-1.0))
        );
    }
}
