//! Krümmungsadaptive Punktverteilung für die Darstellung.

use glam::DVec2;

use crate::core::curve::signed_curvature;
use crate::core::SurfaceCurve;

/// Verteilt `count` Punkte entlang `curve`.
///
/// Dichte `(1 − w) · ds/L + w · |κ| ds/K` mit Bogenlänge `L` und
/// Gesamtdrehung `K`: `w = 0` ergibt gleiche Bogenlängen-Abstände, `w = 1`
/// gleiche Tangenten-Drehwinkel. Beide Kurvenenden sind immer enthalten.
pub fn adaptive_parameters(curve: &SurfaceCurve, count: usize, curvature_weight: f64) -> Vec<f64> {
    let count = count.max(2);
    let weight = curvature_weight.clamp(0.0, 1.0);
    let (a, b) = curve.domain();

    let grid_len = (count * 8).max(1000);
    let grid: Vec<f64> = (0..grid_len)
        .map(|i| a + (b - a) * i as f64 / (grid_len - 1) as f64)
        .collect();

    let (speed, turning): (Vec<f64>, Vec<f64>) = grid
        .iter()
        .map(|&u| {
            let ders = curve.derivatives_at(u, 2);
            let speed = ders[1].length();
            (speed, signed_curvature(ders[1], ders[2]).abs() * speed)
        })
        .unzip();

    let length = integrate(&grid, &speed);
    let total_turning = integrate(&grid, &turning);
    let weight = if total_turning > 0.0 && total_turning.is_finite() {
        weight
    } else {
        0.0
    };
    if !(length > 0.0 && length.is_finite()) {
        return uniform(a, b, count);
    }

    let density: Vec<f64> = speed
        .iter()
        .zip(&turning)
        .map(|(&s, &t)| {
            let arc = (1.0 - weight) * s / length;
            if weight > 0.0 {
                arc + weight * t / total_turning
            } else {
                arc
            }
        })
        .collect();

    let mut cumulative = Vec::with_capacity(grid_len);
    cumulative.push(0.0);
    for i in 1..grid_len {
        let step = 0.5 * (density[i] + density[i - 1]) * (grid[i] - grid[i - 1]);
        cumulative.push(cumulative[i - 1] + step);
    }
    let total = cumulative[grid_len - 1];
    if !(total > 0.0 && total.is_finite()) {
        return uniform(a, b, count);
    }

    let mut params = Vec::with_capacity(count);
    let mut cursor = 1;
    for k in 0..count {
        let target = total * k as f64 / (count - 1) as f64;
        while cursor < grid_len - 1 && cumulative[cursor] < target {
            cursor += 1;
        }
        let (c0, c1) = (cumulative[cursor - 1], cumulative[cursor]);
        let t = if c1 > c0 { (target - c0) / (c1 - c0) } else { 0.0 };
        params.push(grid[cursor - 1] + t.clamp(0.0, 1.0) * (grid[cursor] - grid[cursor - 1]));
    }
    params[0] = a;
    params[count - 1] = b;
    params
}

/// Punkte zu [`adaptive_parameters`].
pub fn adaptive_points(curve: &SurfaceCurve, count: usize, curvature_weight: f64) -> Vec<DVec2> {
    adaptive_parameters(curve, count, curvature_weight)
        .into_iter()
        .map(|u| curve.point_at(u))
        .collect()
}

fn integrate(grid: &[f64], values: &[f64]) -> f64 {
    grid.windows(2)
        .zip(values.windows(2))
        .map(|(g, v)| 0.5 * (v[0] + v[1]) * (g[1] - g[0]))
        .sum()
}

fn uniform(a: f64, b: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| a + (b - a) * i as f64 / (count - 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clamped_uniform_knots;

    fn nose_heavy() -> SurfaceCurve {
        let points = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.04),
            DVec2::new(0.1, 0.08),
            DVec2::new(0.5, 0.09),
            DVec2::new(1.0, 0.0),
        ];
        SurfaceCurve::new(3, clamped_uniform_knots(5, 3), points).expect("gültige Kurve erwartet")
    }

    #[test]
    fn parameters_cover_domain_in_order() {
        let params = adaptive_parameters(&nose_heavy(), 50, 0.85);
        assert_eq!(params.len(), 50);
        assert_eq!(params[0], 0.0);
        assert_eq!(params[49], 1.0);
        assert!(params.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn curvature_weight_concentrates_points_at_nose() {
        let curve = nose_heavy();
        let near_nose = |params: &[f64]| {
            params
                .iter()
                .filter(|&&u| curve.point_at(u).x < 0.05)
                .count()
        };

        let uniform = adaptive_parameters(&curve, 100, 0.0);
        let adaptive = adaptive_parameters(&curve, 100, 0.85);
        assert!(near_nose(&adaptive) > near_nose(&uniform));
    }

    #[test]
    fn zero_weight_gives_even_arc_length() {
        let points = vec![DVec2::ZERO, DVec2::new(0.2, 0.0), DVec2::new(1.0, 0.0)];
        let line = SurfaceCurve::new(2, clamped_uniform_knots(3, 2), points)
            .expect("gültige Kurve erwartet");
        let pts = adaptive_points(&line, 11, 0.0);

        for (i, p) in pts.iter().enumerate() {
            assert!((p.x - i as f64 / 10.0).abs() < 1e-3);
        }
    }
}
