//! Fehlergesteuerte Knoten-Verfeinerung mit anschließendem Neu-Fit.
//!
//! Ein Knoten wird nur übernommen, wenn die maximale Abweichung der
//! verfeinerten Seite danach nicht größer ist als vorher.

use super::error_estimate::{estimate_with_samples, DEFAULT_SAMPLE_COUNT};
use super::fitter::{fit_with_knots, FitReport};
use super::trailing_edge::offset_trailing_edge;
use crate::core::{RefineError, Surface, SurfaceCurve, SurfaceModel};

/// Spannenbreite, unter der nicht mehr mittig geteilt wird.
pub const KNOT_RESOLUTION: f64 = 1e-4;

/// Einstellungen einer Verfeinerung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Spannenbreite, unter der die Nachbarspanne geteilt wird
    pub resolution: f64,
    /// Kurven-Samples für den Fehlervergleich
    pub sample_count: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            resolution: KNOT_RESOLUTION,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// Ergebnis einer Verfeinerung.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineReport {
    /// Verfeinerte Seite
    pub surface: Surface,
    /// Eingefügter Knotenwert
    pub knot: f64,
    /// Maximale Abweichung der Seite vor der Verfeinerung
    pub max_error_before: f64,
    /// Maximale Abweichung der Seite danach (nie größer als vorher)
    pub max_error_after: f64,
    /// Bericht des Neu-Fits
    pub fit: FitReport,
}

/// Index der Spanne zwischen `breaks[i]` und `breaks[i + 1]`, die `target` enthält.
fn enclosing_span(breaks: &[f64], target: f64) -> usize {
    breaks
        .partition_point(|&k| k <= target)
        .saturating_sub(1)
        .min(breaks.len() - 2)
}

/// Wählt den einzufügenden Knoten für einen Ziel-Parameter.
///
/// Mitte der umschließenden Knotenspanne; ist diese schmaler als
/// `resolution`, die Mitte der breiteren Nachbarspanne.
pub fn choose_knot(
    curve: &SurfaceCurve,
    target: f64,
    resolution: f64,
) -> Result<f64, RefineError> {
    let (a, b) = curve.domain();
    if !(target >= a && target <= b) {
        return Err(RefineError::ParameterOutOfRange(target));
    }

    let breaks = curve.breakpoints();
    let last_span = breaks.len() - 2;
    let span = enclosing_span(&breaks, target);
    let width = |i: usize| breaks[i + 1] - breaks[i];
    let midpoint = |i: usize| 0.5 * (breaks[i] + breaks[i + 1]);

    if width(span) >= resolution {
        return Ok(midpoint(span));
    }

    let left = if span > 0 { width(span - 1) } else { 0.0 };
    let right = if span < last_span { width(span + 1) } else { 0.0 };
    let knot = if left > right {
        midpoint(span - 1)
    } else if right > 0.0 {
        midpoint(span + 1)
    } else {
        midpoint(span)
    };
    Ok(knot)
}

/// Knotenpositionen in Prüfreihenfolge.
///
/// Zuerst [`choose_knot`], dann die Mitten der umschließenden Spanne und
/// ihrer Nachbarn, zuletzt die Viertelpunkte der umschließenden Spanne.
/// Spannen schmaler als `resolution` werden nie geteilt.
pub fn knot_candidates(
    curve: &SurfaceCurve,
    target: f64,
    resolution: f64,
) -> Result<Vec<f64>, RefineError> {
    let mut candidates = vec![choose_knot(curve, target, resolution)?];

    let breaks = curve.breakpoints();
    let last_span = breaks.len() - 2;
    let span = enclosing_span(&breaks, target);
    let width = |i: usize| breaks[i + 1] - breaks[i];

    let neighbours = [
        Some(span),
        span.checked_sub(1),
        (span < last_span).then_some(span + 1),
    ];
    let mut knots: Vec<f64> = neighbours
        .into_iter()
        .flatten()
        .filter(|&i| width(i) >= resolution)
        .map(|i| 0.5 * (breaks[i] + breaks[i + 1]))
        .collect();
    if width(span) >= 4.0 * resolution {
        knots.push(breaks[span] + 0.25 * width(span));
        knots.push(breaks[span] + 0.75 * width(span));
    }

    for knot in knots {
        if candidates.iter().all(|&k| (k - knot).abs() >= resolution) {
            candidates.push(knot);
        }
    }
    Ok(candidates)
}

/// Fügt auf `surface` einen Knoten nahe `target` ein und fittet neu.
///
/// Die Seite erhält genau einen Kontrollpunkt mehr; Grad, Stetigkeit und
/// Tangenz-Flags des letzten Fits bleiben erhalten. Eine angewandte
/// Hinterkantendicke wird danach erneut aufgebracht.
pub fn refine(
    model: &mut SurfaceModel,
    surface: Surface,
    target: f64,
) -> Result<RefineReport, RefineError> {
    refine_with(model, surface, target, RefineConfig::default())
}

/// Wie [`refine`], mit eigener Mindestbreite und Sample-Anzahl.
///
/// Die Kandidaten aus [`knot_candidates`] werden der Reihe nach gefittet;
/// übernommen wird der erste, der die maximale Abweichung von `surface`
/// nicht erhöht. Gelingt das keinem, bleibt das Modell unverändert und
/// das Ergebnis ist [`RefineError::NoImprovement`] (oder der Fehler des
/// ersten Neu-Fits, falls keiner gelang).
pub fn refine_with(
    model: &mut SurfaceModel,
    surface: Surface,
    target: f64,
    config: RefineConfig,
) -> Result<RefineReport, RefineError> {
    let curves = model.curves().ok_or(RefineError::NotFitted)?;
    let (Some(reference), Some(settings)) = (model.reference(), model.settings()) else {
        return Err(RefineError::NoReferenceData);
    };

    let previous = estimate_with_samples(
        &curves[surface],
        &reference.points[surface],
        config.sample_count,
    )
    .ok_or(RefineError::NoReferenceData)?
    .max_error;
    let candidates = knot_candidates(&curves[surface], target, config.resolution)?;
    let base_knots = curves.as_ref().map(|c| c.knots().to_vec());
    let reference = reference.clone();
    let settings = *settings;
    let thickness = model.te_thickness();

    let mut best_rejected: Option<f64> = None;
    let mut first_failure: Option<RefineError> = None;

    for knot in candidates {
        let mut knots = base_knots.clone();
        let position = knots[surface].partition_point(|&k| k <= knot);
        knots[surface].insert(position, knot);

        let mut candidate = model.clone();
        let fit = match fit_with_knots(&mut candidate, reference.clone(), settings, knots) {
            Ok(fit) => fit,
            Err(e) => {
                log::debug!("{}: Knoten bei u={:.5} nicht fitbar: {}", surface, knot, e);
                first_failure.get_or_insert(e.into());
                continue;
            }
        };
        if let Some(fraction) = thickness {
            offset_trailing_edge(&mut candidate, fraction);
        }

        let after = candidate
            .curve(surface)
            .and_then(|c| {
                estimate_with_samples(c, &reference.points[surface], config.sample_count)
            })
            .ok_or(RefineError::NoReferenceData)?
            .max_error;
        if after > previous {
            log::debug!(
                "{}: Knoten bei u={:.5} verworfen, max. Abweichung {:.3e} > {:.3e}",
                surface,
                knot,
                after,
                previous
            );
            best_rejected = Some(best_rejected.map_or(after, |best| best.min(after)));
            continue;
        }

        *model = candidate;
        log::debug!(
            "{}: Knoten bei u={:.5} eingefügt, jetzt {} Kontrollpunkte",
            surface,
            knot,
            fit.control_points[surface]
        );
        return Ok(RefineReport {
            surface,
            knot,
            max_error_before: previous,
            max_error_after: after,
            fit,
        });
    }

    Err(match (best_rejected, first_failure) {
        (Some(best), _) => RefineError::NoImprovement { previous, best },
        (None, Some(failure)) => failure,
        (None, None) => RefineError::NoImprovement {
            previous,
            best: previous,
        },
    })
}

/// Verfeinert `surface` an der Stelle der größten Abweichung.
pub fn refine_at_max_error(
    model: &mut SurfaceModel,
    surface: Surface,
    config: RefineConfig,
) -> Result<RefineReport, RefineError> {
    let curve = model.curve(surface).ok_or(RefineError::NotFitted)?;
    let reference = model.reference().ok_or(RefineError::NoReferenceData)?;
    let estimate = estimate_with_samples(curve, &reference.points[surface], config.sample_count)
        .ok_or(RefineError::NoReferenceData)?;

    refine_with(model, surface, estimate.parameter_at_max, config)
}
