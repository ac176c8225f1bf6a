//! Constraint-basierter Least-Squares-Fit beider Profil-Seiten.
//!
//! Beide Seiten werden gemeinsam in einem KKT-System gelöst:
//!
//! ```text
//! [ 2H  Cᵀ ] [ z ]   [ 2g ]
//! [ C   0  ] [ μ ] = [ d  ]
//! ```
//!
//! `H` und `g` stammen aus den Normalgleichungen der Datenpunkte (plus
//! Glättungsstrafe auf zweiten Differenzen), `C z = d` sind die
//! Gleichheits-Constraints aus [`super::constraints`].

use glam::DVec2;
use nalgebra::{DMatrix, DVector};

use super::constraints::{ConstraintSet, Continuity, VariableLayout};
use super::parameterization::parameterize;
use crate::core::curve::{basis_function_derivatives, clamped_uniform_knots, find_span};
use crate::core::curve::validate_knot_vector;
use crate::core::{FitError, FitInput, FitSettings, Surface, SurfaceCurve, SurfaceModel};
use crate::core::{SurfacePair, DEFAULT_PARAM_EXPONENT};

/// Abstand, unter dem die Vorderkanten-Punkte beider Seiten als identisch gelten.
pub const LEADING_EDGE_TOLERANCE: f64 = 1e-9;
/// Relative Constraint-Verletzung, ab der eine Lösung als unbrauchbar gilt.
const CONSTRAINT_RESIDUAL_LIMIT: f64 = 1e-6;
/// Singulärwerte unter diesem Anteil des größten gelten als null.
const RANK_TOLERANCE: f64 = 1e-10;

/// Art des Fit-Aufrufs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitMode {
    /// Neuer Fit: Standard-Exponent, angeforderte Kontrollpunktzahlen
    Fresh,
    /// Neuer Fit mit eigenem Exponenten für beide Seiten
    FreshWithExponent(f64),
    /// Erneuter Fit: Exponenten, aktuelle (ggf. asymmetrische) Zahlen und
    /// Knotenvektoren behalten
    Refit,
}

/// Automatische Anpassung gegenüber der Anforderung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitAdjustment {
    /// G3 wurde angefordert, G2 daher mit aktiviert
    G3ImpliesG2,
    /// Grad reicht für die angeforderte Stetigkeit nicht aus
    ContinuityLimitedByDegree {
        requested: Continuity,
        applied: Continuity,
    },
    /// Zu wenige Kontrollpunkte für die angeforderte Stetigkeit
    ContinuityLimitedByControlPoints {
        requested: Continuity,
        applied: Continuity,
    },
    /// Vorderkanten-Punkte fallen nicht zusammen, Seiten ungekoppelt
    LeadingEdgeNotShared,
    /// Hinterkanten-Tangenz angefordert, aber nicht anwendbar
    TeTangencyUnavailable,
    /// Einzelne Spanne erzwingt `Grad + 1` Kontrollpunkte
    SingleSpanControlPoints { surface: Surface, used: usize },
}

/// Zusammenfassung eines erfolgreichen Fits.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Verwendeter Grad
    pub degree: usize,
    /// Kontrollpunkte je Seite
    pub control_points: SurfacePair<usize>,
    /// Knotenspannen je Seite
    pub spans: SurfacePair<usize>,
    /// Angeforderte Stetigkeit an der Vorderkante
    pub requested_continuity: Continuity,
    /// Tatsächlich erzwungene Stetigkeit
    pub continuity: Continuity,
    /// Hinterkanten-Tangenz erzwungen
    pub te_tangency_applied: bool,
    /// Automatische Anpassungen
    pub adjustments: Vec<FitAdjustment>,
}

/// Fittet beide Seiten und übernimmt das Ergebnis ins Modell.
///
/// Bei Fehler bleibt das Modell unverändert. Fehlerwerte werden geleert;
/// die Abschätzung übernimmt [`super::error_estimate::update_model_errors`].
///
/// Im Modus [`FitMode::Refit`] bleiben eingefügte Knoten erhalten, solange
/// der Grad gleich bleibt; sonst werden gleichmäßige Knoten für die
/// aktuellen Anzahlen erzeugt.
pub fn fit(
    model: &mut SurfaceModel,
    input: FitInput,
    settings: FitSettings,
    mode: FitMode,
) -> Result<FitReport, FitError> {
    let (exponents, counts, knots) = match mode {
        FitMode::Fresh => (
            SurfacePair::splat(DEFAULT_PARAM_EXPONENT),
            settings.control_points,
            None,
        ),
        FitMode::FreshWithExponent(exponent) => (
            SurfacePair::splat(exponent),
            settings.control_points,
            None,
        ),
        FitMode::Refit => (
            model.param_exponent,
            model
                .control_point_counts()
                .unwrap_or(settings.control_points),
            current_knots(model, settings.degree),
        ),
    };
    let settings = FitSettings {
        control_points: counts,
        ..settings
    };

    let (curves, report) =
        fit_curves(&input, &settings, exponents, model.smoothing_weight, knots)?;
    let settings = FitSettings {
        control_points: report.control_points,
        ..settings
    };
    apply(model, input, settings, exponents, curves);
    Ok(report)
}

/// Knotenvektoren des Modells, falls beide Seiten den Grad `degree` haben.
fn current_knots(model: &SurfaceModel, degree: usize) -> Option<SurfacePair<Vec<f64>>> {
    let curves = model.curves()?;
    if curves.iter().any(|(_, c)| c.degree() != degree) {
        return None;
    }
    Some(curves.as_ref().map(|c| c.knots().to_vec()))
}

/// Fit mit vorgegebenen Knotenvektoren (Knoten-Verfeinerung).
pub(crate) fn fit_with_knots(
    model: &mut SurfaceModel,
    input: FitInput,
    settings: FitSettings,
    knots: SurfacePair<Vec<f64>>,
) -> Result<FitReport, FitError> {
    let exponents = model.param_exponent;
    let (curves, report) = fit_curves(
        &input,
        &settings,
        exponents,
        model.smoothing_weight,
        Some(knots),
    )?;
    let settings = FitSettings {
        control_points: report.control_points,
        ..settings
    };
    apply(model, input, settings, exponents, curves);
    Ok(report)
}

fn apply(
    model: &mut SurfaceModel,
    input: FitInput,
    settings: FitSettings,
    exponents: SurfacePair<f64>,
    curves: SurfacePair<SurfaceCurve>,
) {
    model.curves = Some(curves);
    model.param_exponent = exponents;
    model.reference = Some(input);
    model.settings = Some(FitSettings {
        enforce_g2: settings.enforce_g2 || settings.enforce_g3,
        ..settings
    });
    model.te_baseline = None;
    model.te_thickness = None;
    model.last_error = SurfacePair::default();
    model.recompute_sharp_trailing_edge();
}

/// Reiner Fit ohne Modell: liefert beide Kurven und den Bericht.
///
/// `knots` überschreibt die gleichmäßigen Knotenvektoren; die
/// Kontrollpunktzahlen ergeben sich dann aus deren Länge.
pub fn fit_curves(
    input: &FitInput,
    settings: &FitSettings,
    exponents: SurfacePair<f64>,
    smoothing_weight: f64,
    knots: Option<SurfacePair<Vec<f64>>>,
) -> Result<(SurfacePair<SurfaceCurve>, FitReport), FitError> {
    let degree = settings.degree;
    if degree == 0 {
        return Err(FitError::InvalidDegree(degree));
    }
    let mut adjustments = Vec::new();

    let params = SurfacePair::from_fn(|s| {
        parameterize(&input.points[s], exponents[s])
            .map_err(|source| FitError::Data { surface: s, source })
    })
    .transpose()?;

    let knots = match knots {
        Some(knots) => {
            for (surface, k) in knots.iter() {
                let n = k.len().saturating_sub(degree + 1);
                if n <= degree {
                    return Err(FitError::UnderDetermined {
                        surface,
                        control_points: n,
                        degree,
                    });
                }
                validate_knot_vector(degree, n, k)
                    .map_err(|source| FitError::InvalidKnotVector { surface, source })?;
            }
            knots
        }
        None => {
            let counts = SurfacePair::from_fn(|s| {
                if settings.single_span {
                    let used = degree + 1;
                    if settings.control_points[s] != used {
                        adjustments.push(FitAdjustment::SingleSpanControlPoints {
                            surface: s,
                            used,
                        });
                    }
                    used
                } else {
                    settings.control_points[s]
                }
            });
            for (surface, &n) in counts.iter() {
                if n <= degree {
                    return Err(FitError::UnderDetermined {
                        surface,
                        control_points: n,
                        degree,
                    });
                }
            }
            counts.map(|n| clamped_uniform_knots(n, degree))
        }
    };
    let counts = knots.as_ref().map(|k| k.len() - degree - 1);
    let layout = VariableLayout::new(counts);

    // ── Constraint-Auswahl ──────────────────────────────────────────

    let points = &input.points;
    let le = SurfacePair::from_fn(|s| points[s][0]);
    let te_data = SurfacePair::from_fn(|s| points[s][points[s].len() - 1]);
    let te_mid = (te_data.upper + te_data.lower) * 0.5;

    let tangents = input
        .te_tangents
        .filter(|t| t.upper.length_squared() > 0.0 && t.lower.length_squared() > 0.0);
    let min_count = counts.upper.min(counts.lower);
    let te_tangency = settings.enforce_te_tangency && tangents.is_some() && min_count >= 3;
    if settings.enforce_te_tangency && !te_tangency {
        adjustments.push(FitAdjustment::TeTangencyUnavailable);
    }

    let requested = if settings.enforce_g3 {
        if !settings.enforce_g2 {
            adjustments.push(FitAdjustment::G3ImpliesG2);
        }
        Continuity::G3
    } else if settings.enforce_g2 {
        Continuity::G2
    } else {
        Continuity::G1
    };

    let mut continuity = requested;
    while continuity > Continuity::G1 && degree < continuity.min_degree() {
        continuity = continuity.lower();
    }
    if continuity != requested {
        adjustments.push(FitAdjustment::ContinuityLimitedByDegree {
            requested,
            applied: continuity,
        });
    }

    // Vorderkante nutzt CPs 0..=k, Hinterkante 1 bzw. 2 CPs
    let te_cps = if te_tangency { 2 } else { 1 };
    let by_degree = continuity;
    while continuity > Continuity::None && min_count < continuity.order() + 1 + te_cps {
        continuity = continuity.lower();
    }
    if continuity != by_degree {
        adjustments.push(FitAdjustment::ContinuityLimitedByControlPoints {
            requested: by_degree,
            applied: continuity,
        });
    }

    if le.upper.distance(le.lower) > LEADING_EDGE_TOLERANCE {
        if continuity != Continuity::None {
            adjustments.push(FitAdjustment::LeadingEdgeNotShared);
        }
        continuity = Continuity::None;
    }

    let mut constraints = ConstraintSet::default();
    for surface in Surface::ALL {
        let n = counts[surface];
        let te_target = if input.thickened {
            te_data[surface]
        } else {
            te_mid
        };
        constraints.pin_point(&layout, surface, 0, le[surface]);
        constraints.pin_point(&layout, surface, n - 1, te_target);
    }

    if continuity != Continuity::None {
        let chord_dir = (te_mid - le.upper).normalize_or_zero();
        let basis_ders = knots.as_ref().map(|k| {
            let start = k[degree];
            basis_function_derivatives(k, degree, degree, start, continuity.order())
        });
        constraints.leading_edge_continuity(&layout, &basis_ders, continuity, chord_dir);
    }

    if let (true, Some(tangents)) = (te_tangency, tangents) {
        for surface in Surface::ALL {
            constraints.trailing_edge_tangency(&layout, surface, tangents[surface].normalize());
        }
    }

    log::debug!(
        "Fit: Grad {}, CPs {}/{}, Stetigkeit {:?}, TE-Tangenz {}, {} Constraints",
        degree,
        counts.upper,
        counts.lower,
        continuity,
        te_tangency,
        constraints.len()
    );

    // ── Normalgleichungen und KKT-Lösung ────────────────────────────

    let unknowns = layout.len();
    let (hessian, gradient) =
        normal_equations(&layout, &knots, degree, points, &params, smoothing_weight);
    let z = solve_kkt(&hessian, &gradient, &constraints, unknowns)?;

    let curves = SurfacePair::from_fn(|s| {
        let control_points = (0..counts[s])
            .map(|i| DVec2::new(z[layout.index(s, i, 0)], z[layout.index(s, i, 1)]))
            .collect();
        SurfaceCurve::new(degree, knots[s].clone(), control_points)
            .map_err(|source| FitError::InvalidKnotVector { surface: s, source })
    })
    .transpose()?;

    let report = FitReport {
        degree,
        control_points: counts,
        spans: SurfacePair::new(curves.upper.span_count(), curves.lower.span_count()),
        requested_continuity: requested,
        continuity,
        te_tangency_applied: te_tangency,
        adjustments,
    };
    Ok((curves, report))
}

/// Baut `H` und `g` der Normalgleichungen inkl. Glättungsstrafe.
fn normal_equations(
    layout: &VariableLayout,
    knots: &SurfacePair<Vec<f64>>,
    degree: usize,
    points: &SurfacePair<Vec<DVec2>>,
    params: &SurfacePair<Vec<f64>>,
    smoothing_weight: f64,
) -> (DMatrix<f64>, DVector<f64>) {
    let unknowns = layout.len();
    let mut hessian = DMatrix::<f64>::zeros(unknowns, unknowns);
    let mut gradient = DVector::<f64>::zeros(unknowns);

    for surface in Surface::ALL {
        let k = &knots[surface];
        let n = layout.count(surface);
        let (a, b) = (k[degree], k[n]);

        for (&u, point) in params[surface].iter().zip(&points[surface]) {
            let t = a + u * (b - a);
            let span = find_span(k, degree, n, t);
            let basis = &basis_function_derivatives(k, degree, span, t, 0)[0];
            let first = span - degree;

            for axis in 0..2 {
                let value = if axis == 0 { point.x } else { point.y };
                for (r, &br) in basis.iter().enumerate() {
                    let row = layout.index(surface, first + r, axis);
                    gradient[row] += br * value;
                    for (c, &bc) in basis.iter().enumerate() {
                        let col = layout.index(surface, first + c, axis);
                        hessian[(row, col)] += br * bc;
                    }
                }
            }
        }

        if smoothing_weight > 0.0 {
            const SECOND_DIFF: [f64; 3] = [1.0, -2.0, 1.0];
            for i in 0..n.saturating_sub(2) {
                for axis in 0..2 {
                    for (r, wr) in SECOND_DIFF.iter().enumerate() {
                        let row = layout.index(surface, i + r, axis);
                        for (c, wc) in SECOND_DIFF.iter().enumerate() {
                            let col = layout.index(surface, i + c, axis);
                            hessian[(row, col)] += smoothing_weight * wr * wc;
                        }
                    }
                }
            }
        }
    }

    (hessian, gradient)
}

/// Löst das KKT-System per Singulärwertzerlegung.
///
/// Constraint-Zeilen werden auf Maximalbetrag 1 skaliert. Ein Rangdefekt
/// (Kontrollpunkte ohne Datenpunkte in ihrem Träger) wird als
/// [`FitError::RankDeficient`] gemeldet statt einer beliebigen Lösung.
fn solve_kkt(
    hessian: &DMatrix<f64>,
    gradient: &DVector<f64>,
    constraints: &ConstraintSet,
    unknowns: usize,
) -> Result<Vec<f64>, FitError> {
    let size = unknowns + constraints.len();
    let mut kkt = DMatrix::<f64>::zeros(size, size);
    let mut rhs = DVector::<f64>::zeros(size);

    kkt.view_mut((0, 0), (unknowns, unknowns))
        .copy_from(&(hessian * 2.0));
    rhs.rows_mut(0, unknowns).copy_from(&(gradient * 2.0));

    for (row, constraint) in constraints.iter().enumerate() {
        let r = unknowns + row;
        let scale = constraint
            .terms
            .iter()
            .map(|&(_, coeff)| coeff.abs())
            .fold(0.0, f64::max);
        let scale = if scale > 0.0 { scale } else { 1.0 };
        for &(col, coeff) in &constraint.terms {
            kkt[(r, col)] += coeff / scale;
            kkt[(col, r)] += coeff / scale;
        }
        rhs[r] = constraint.target / scale;
    }

    let svd = kkt.svd(true, true);
    let tolerance = RANK_TOLERANCE * svd.singular_values.max();
    let rank = svd.rank(tolerance);
    if rank < size {
        log::debug!("KKT-System mit Rangdefekt: Rang {} von {}", rank, size);
        return Err(FitError::RankDeficient { rank, size });
    }

    let solution = svd.solve(&rhs, tolerance).map_err(|e| {
        log::debug!("KKT-Lösung fehlgeschlagen ({}x{}): {}", size, size, e);
        FitError::SingularSystem
    })?;

    let z: Vec<f64> = solution.iter().take(unknowns).copied().collect();
    if z.iter().any(|v| !v.is_finite()) {
        log::debug!("KKT-Lösung enthält nicht endliche Werte");
        return Err(FitError::SingularSystem);
    }
    let residual = constraints.max_residual(&z);
    if residual > CONSTRAINT_RESIDUAL_LIMIT {
        log::debug!("KKT-Lösung verletzt Constraints (Residuum {:e})", residual);
        return Err(FitError::SingularSystem);
    }
    Ok(z)
}
