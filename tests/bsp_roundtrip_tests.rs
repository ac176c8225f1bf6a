mod common;

use airfoil_spline_fitter::core::{FitSettings, Surface, SurfaceModel};
use airfoil_spline_fitter::fitting::{fit, FitMode};
use airfoil_spline_fitter::{parse_bsp, write_bsp};
use common::biconvex;

fn fitted_model() -> SurfaceModel {
    let mut model = SurfaceModel::new();
    model.name = "Bikonvex 10%".to_string();
    fit(
        &mut model,
        biconvex(61, 0.1),
        FitSettings::symmetric(4, 9),
        FitMode::Fresh,
    )
    .expect("Fit sollte gelingen");
    model
}

#[test]
fn test_bsp_roundtrip_preserves_control_points_and_knots() {
    let model = fitted_model();
    let dir = tempfile::tempdir().expect("Temp-Verzeichnis sollte anlegbar sein");
    let path = dir.path().join("bikonvex.bsp");

    let written = write_bsp(&model).expect("BSP-Export fehlgeschlagen");
    std::fs::write(&path, &written).expect("Schreiben fehlgeschlagen");
    let content = std::fs::read_to_string(&path).expect("Lesen fehlgeschlagen");
    let reloaded = parse_bsp(&content).expect("Re-Parsing fehlgeschlagen");

    assert_eq!(reloaded.name, model.name);
    assert_eq!(reloaded.degree(), Some(4));
    assert!(reloaded.reference().is_none());
    assert!(reloaded.last_max_error(Surface::Upper).is_none());

    for surface in Surface::ALL {
        let original = model.curve(surface).expect("Originalkurve erwartet");
        let loaded = reloaded.curve(surface).expect("geladene Kurve erwartet");
        assert_eq!(loaded.num_control_points(), 9);
        assert_eq!(loaded.knots().len(), original.knots().len());

        for (a, b) in original.control_points().iter().zip(loaded.control_points()) {
            assert!((a.x - b.x).abs() <= 1e-10 && (a.y - b.y).abs() <= 1e-10);
        }
        for (a, b) in original.knots().iter().zip(loaded.knots()) {
            assert!((a - b).abs() <= 1e-10);
        }
    }
}

#[test]
fn test_written_bsp_is_stable_after_second_roundtrip() {
    let first = write_bsp(&fitted_model()).expect("BSP-Export fehlgeschlagen");
    let reparsed = parse_bsp(&first).expect("Re-Parsing fehlgeschlagen");
    let second = write_bsp(&reparsed).expect("zweiter Export fehlgeschlagen");

    assert_eq!(first, second);
}

#[test]
fn test_bsp_with_mismatched_knot_count_is_rejected() {
    let written = write_bsp(&fitted_model()).expect("BSP-Export fehlgeschlagen");
    // Einen Knoten der Oberseite entfernen
    let broken = written.replacen("Top Knots Start\n 0.0000000000\n", "Top Knots Start\n", 1);

    assert!(parse_bsp(&broken).is_err());
}
