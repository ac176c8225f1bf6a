//! Parser für `.bsp`-Dateien.

use anyhow::{bail, Context, Result};
use glam::DVec2;

use super::section_prefix;
use crate::core::{Surface, SurfaceCurve, SurfaceModel, SurfacePair};

/// Mindestanzahl nicht-leerer Zeilen einer gültigen Datei
/// (Name + 8 Marker).
const MIN_LINES: usize = 9;

/// Parsed ein Kurvenmodell aus dem Inhalt einer `.bsp`-Datei.
///
/// Der Grad jeder Seite ergibt sich aus `Knoten − Kontrollpunkte − 1`.
/// Das Ergebnis hat keine Referenzdaten und damit keine Fehlerwerte.
pub fn parse_bsp(content: &str) -> Result<SurfaceModel> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < MIN_LINES {
        bail!(
            "BSP-Datei zu kurz oder fehlerhaft: {} Zeilen, mindestens {} erwartet",
            lines.len(),
            MIN_LINES
        );
    }

    let name = lines[0].to_string();
    let curves = SurfacePair::from_fn(|surface| parse_surface(&lines, surface)).transpose()?;

    log::info!(
        "BSP geladen: '{}', Grad {}/{}, {}/{} Kontrollpunkte",
        name,
        curves.upper.degree(),
        curves.lower.degree(),
        curves.upper.num_control_points(),
        curves.lower.num_control_points()
    );

    let SurfacePair { upper, lower } = curves;
    Ok(SurfaceModel::from_curves(name, upper, lower))
}

fn parse_surface(lines: &[&str], surface: Surface) -> Result<SurfaceCurve> {
    let prefix = section_prefix(surface);
    let knot_label = format!("{} Knots", prefix);

    let cp_rows = parse_rows(
        slice_section(lines, &format!("{} Start", prefix), &format!("{} End", prefix))?,
        2,
        prefix,
    )?;
    let knot_rows = parse_rows(
        slice_section(
            lines,
            &format!("{} Start", knot_label),
            &format!("{} End", knot_label),
        )?,
        1,
        &knot_label,
    )?;

    let control_points: Vec<DVec2> = cp_rows.iter().map(|row| DVec2::new(row[0], row[1])).collect();
    let knots: Vec<f64> = knot_rows.iter().map(|row| row[0]).collect();

    let degree = knots
        .len()
        .checked_sub(control_points.len() + 1)
        .filter(|&degree| degree >= 1)
        .with_context(|| {
            format!(
                "Sektion '{}': {} Knoten passen zu keinem Grad ≥ 1 bei {} Kontrollpunkten",
                knot_label,
                knots.len(),
                control_points.len()
            )
        })?;

    SurfaceCurve::new(degree, knots, control_points)
        .with_context(|| format!("Ungültiger Knotenvektor in Sektion '{}'", knot_label))
}

/// Zeilen zwischen `start` und dem nächsten `end`-Marker.
fn slice_section<'a>(lines: &[&'a str], start: &str, end: &str) -> Result<Vec<&'a str>> {
    let Some(start_idx) = lines.iter().position(|line| *line == start) else {
        bail!("Sektions-Marker '{}' fehlt", start);
    };
    let Some(len) = lines[start_idx + 1..].iter().position(|line| *line == end) else {
        bail!("Sektions-Marker '{}' fehlt", end);
    };
    Ok(lines[start_idx + 1..start_idx + 1 + len].to_vec())
}

fn parse_rows(lines: Vec<&str>, columns: usize, section: &str) -> Result<Vec<Vec<f64>>> {
    if lines.is_empty() {
        bail!("Sektion '{}' ist leer", section);
    }
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| -> Result<Vec<f64>> {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != columns {
                bail!(
                    "Sektion '{}' Zeile {}: {} Spalten, {} erwartet",
                    section,
                    idx + 1,
                    parts.len(),
                    columns
                );
            }
            parts
                .iter()
                .map(|part| {
                    part.parse::<f64>().with_context(|| {
                        format!(
                            "Ungültiger Zahlenwert in Sektion '{}' Zeile {}: {}",
                            section,
                            idx + 1,
                            line
                        )
                    })
                })
                .collect()
        })
        .collect()
}
