//! Writer für `.bsp`-Dateien.

use anyhow::{Context, Result};

use super::section_prefix;
use crate::core::{Surface, SurfaceModel};

/// Schreibt ein gefittetes Modell im `.bsp`-Format.
///
/// Zahlen mit 10 Nachkommastellen, Feldbreite 13.
pub fn write_bsp(model: &SurfaceModel) -> Result<String> {
    let curves = model
        .curves()
        .context("BSP-Export ohne gefittete Kurven nicht möglich")?;

    let mut output = String::new();
    let name = if model.name.trim().is_empty() {
        "Airfoil"
    } else {
        model.name.trim()
    };
    output.push_str(name);
    output.push('\n');

    for surface in Surface::ALL {
        let prefix = section_prefix(surface);
        let curve = &curves[surface];

        output.push_str(&format!("{} Start\n", prefix));
        for p in curve.control_points() {
            output.push_str(&format!("{:13.10} {:13.10}\n", p.x, p.y));
        }
        output.push_str(&format!("{} End\n", prefix));

        output.push_str(&format!("{} Knots Start\n", prefix));
        for k in curve.knots() {
            output.push_str(&format!("{:13.10}\n", k));
        }
        output.push_str(&format!("{} Knots End\n", prefix));
    }

    Ok(output)
}
