//! Gemeinsame Profil-Testdaten für die Integrationstests.
#![allow(dead_code)]

use airfoil_spline_fitter::core::FitInput;
use glam::DVec2;
use std::f64::consts::PI;

/// Kosinus-verteilte x-Werte in `[0, 1]`.
pub fn cosine_spacing(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 0.5 * (1.0 - (PI * i as f64 / (count - 1) as f64).cos()))
        .collect()
}

/// Symmetrische Kreisbögen durch (0,0), (0.5, ±t), (1,0).
pub fn biconvex(count: usize, thickness: f64) -> FitInput {
    let radius = (0.25 + thickness * thickness) / (2.0 * thickness);
    let center_y = thickness - radius;
    let xs = cosine_spacing(count);
    let upper: Vec<DVec2> = xs
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let y = if i == 0 || i == count - 1 {
                0.0
            } else {
                center_y + (radius * radius - (x - 0.5).powi(2)).sqrt()
            };
            DVec2::new(x, y)
        })
        .collect();
    let lower = upper.iter().map(|p| DVec2::new(p.x, -p.y)).collect();
    FitInput::new(upper, lower)
}

/// Halbellipsen mit Halbachsen `upper`/`lower` in y-Richtung.
pub fn ellipses(count: usize, upper: f64, lower: f64) -> FitInput {
    let surface = |half_axis: f64| -> Vec<DVec2> {
        (0..count)
            .map(|i| {
                let beta = PI * i as f64 / (count - 1) as f64;
                let y = if i == 0 || i == count - 1 {
                    0.0
                } else {
                    half_axis * beta.sin()
                };
                DVec2::new(0.5 * (1.0 - beta.cos()), y)
            })
            .collect()
    };
    FitInput::new(surface(upper), surface(-lower))
}

/// Kreis mit Radius 0.5 um (0.5, 0).
pub fn semicircle(count: usize) -> FitInput {
    ellipses(count, 0.5, 0.5)
}

/// 2D-Kreuzprodukt.
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Ableitung der Krümmung nach der Bogenlänge.
pub fn curvature_slope(ders: &[DVec2]) -> f64 {
    let (d1, d2, d3) = (ders[1], ders[2], ders[3]);
    let speed_sq = d1.length_squared();
    let num = cross(d1, d2);
    let dnum = cross(d1, d3);
    let dk_du = dnum / speed_sq.powf(1.5) - 3.0 * num * d1.dot(d2) / speed_sq.powf(2.5);
    dk_du / speed_sq.sqrt()
}
