//! `airfoil-bsp-info`: Kurzbericht zu einem gespeicherten Kurvenmodell.
//!
//! Aufruf: `airfoil-bsp-info <datei.bsp>`

use std::path::PathBuf;

use airfoil_spline_fitter::fitting::{comb, decompose_curve, export_view};
use airfoil_spline_fitter::{AppController, AppState, FitCommand, FitterOptions, Surface};
use anyhow::Context;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("airfoil-bsp-info v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("Aufruf: airfoil-bsp-info <datei.bsp>")?;

    let options = FitterOptions::load_from_file(&FitterOptions::config_path());
    let mut state = AppState::with_options(options);
    let mut controller = AppController::new();
    controller.handle_command(&mut state, FitCommand::LoadBsp { path })?;

    print_report(&state)
}

fn print_report(state: &AppState) -> anyhow::Result<()> {
    let model = &state.model;
    let curves = model.curves().context("Kein Modell geladen")?;

    println!("Profil: {}", model.name);
    for surface in Surface::ALL {
        let curve = &curves[surface];
        let (start, _) = curve.domain();
        let max_comb = comb(curve, state.options.comb_density, 1.0)
            .flat_map(|span| span.hairs)
            .map(|hair| hair.curvature.abs())
            .fold(0.0_f64, f64::max);

        println!("{}:", surface);
        println!("  Grad:               {}", curve.degree());
        println!("  Kontrollpunkte:     {}", curve.num_control_points());
        println!("  Knotenspannen:      {}", curve.span_count());
        println!("  Bezier-Segmente:    {}", decompose_curve(curve).len());
        println!("  Krümmung Vorderk.:  {:.6}", curve.curvature_at(start));
        println!("  max. |Krümmung|:    {:.6}", max_comb);
    }

    if model.sharp_trailing_edge() {
        println!("Hinterkante: spitz");
    } else {
        let view = export_view(model, state.options.chord_length_mm)?;
        if let Some((upper, lower)) = view.te_connector {
            println!(
                "Hinterkante: stumpf, {:.3} mm bei {:.1} mm Sehne",
                (upper - lower).length(),
                view.chord_length_mm
            );
        }
    }
    Ok(())
}
