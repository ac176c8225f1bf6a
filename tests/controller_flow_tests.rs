mod common;

use airfoil_spline_fitter::app::ProgressStage;
use airfoil_spline_fitter::core::{FitSettings, Surface};
use airfoil_spline_fitter::fitting::trailing_edge_tangent;
use airfoil_spline_fitter::shared::FitterOptions;
use airfoil_spline_fitter::{AppController, AppState, FitCommand, FitSession, SessionError};
use common::{cross, ellipses, semicircle};

fn state_with_input() -> AppState {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    controller
        .handle_command(
            &mut state,
            FitCommand::SetInput {
                input: semicircle(61),
            },
        )
        .expect("SetInput sollte ohne Fehler durchlaufen");
    state
}

#[test]
fn test_fit_with_defaults_fits_and_logs_command() {
    let mut controller = AppController::new();
    let mut state = state_with_input();

    controller
        .handle_command(&mut state, FitCommand::FitWithDefaults)
        .expect("FitWithDefaults sollte ohne Fehler durchlaufen");

    assert!(state.is_fitted());
    assert_eq!(state.control_point_counts(), (9, 9));
    assert!(state.model.last_max_error(Surface::Upper).is_some());
    assert!(state.last_fit_report.is_some());

    let last = state
        .command_log
        .last()
        .expect("Es sollte ein Command geloggt sein");
    match last {
        FitCommand::FitWithDefaults => {}
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}

#[test]
fn test_refit_without_input_fails_and_keeps_state() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    let result = controller.handle_command(&mut state, FitCommand::Refit);

    assert!(result.is_err());
    assert!(!state.is_fitted());
    assert!(state
        .status_message
        .as_deref()
        .is_some_and(|msg| msg.contains("Refit")));
    assert_eq!(state.command_log.len(), 1);
}

#[test]
fn test_refine_at_max_error_adds_control_point_to_one_surface() {
    let mut controller = AppController::new();
    let mut state = state_with_input();
    controller
        .handle_command(&mut state, FitCommand::FitWithDefaults)
        .expect("Fit sollte ohne Fehler durchlaufen");
    let before_error = state
        .model
        .last_max_error(Surface::Lower)
        .expect("Fehlerwert erwartet");

    controller
        .handle_command(
            &mut state,
            FitCommand::RefineAtMaxError {
                surface: Surface::Lower,
            },
        )
        .expect("Verfeinerung sollte ohne Fehler durchlaufen");

    assert_eq!(state.control_point_counts(), (9, 10));
    let after_error = state
        .model
        .last_max_error(Surface::Lower)
        .expect("Fehlerwert erwartet");
    assert!(after_error <= before_error + 1e-9);
}

#[test]
fn test_refit_keeps_asymmetric_counts_after_exponent_change() {
    let mut controller = AppController::new();
    let mut state = state_with_input();
    controller
        .handle_command(&mut state, FitCommand::FitWithDefaults)
        .expect("Fit sollte ohne Fehler durchlaufen");
    controller
        .handle_command(
            &mut state,
            FitCommand::RefineAtMaxError {
                surface: Surface::Upper,
            },
        )
        .expect("Verfeinerung sollte ohne Fehler durchlaufen");
    let refined_knots = state
        .model
        .curve(Surface::Upper)
        .expect("Kurve erwartet")
        .knots()
        .to_vec();

    controller
        .handle_command(
            &mut state,
            FitCommand::SetParamExponent {
                surface: Surface::Upper,
                exponent: 0.6,
            },
        )
        .expect("Exponent sollte ohne Fehler übernommen werden");

    assert_eq!(state.control_point_counts(), (10, 9));
    assert_eq!(state.model.param_exponent(Surface::Upper), 0.6);
    assert_eq!(state.model.param_exponent(Surface::Lower), 0.5);
    assert_eq!(
        state.model.curve(Surface::Upper).expect("Kurve erwartet").knots(),
        refined_knots.as_slice()
    );
}

#[test]
fn test_fresh_fit_uses_configured_param_exponent() {
    let mut controller = AppController::new();
    let mut state = state_with_input();
    let options = FitterOptions {
        default_param_exponent: 0.6,
        ..FitterOptions::default()
    };
    controller
        .handle_command(&mut state, FitCommand::ApplyOptions { options })
        .expect("Optionen sollten übernommen werden");

    controller
        .handle_command(&mut state, FitCommand::FitWithDefaults)
        .expect("Fit sollte ohne Fehler durchlaufen");

    assert_eq!(state.model.param_exponent(Surface::Upper), 0.6);
    assert_eq!(state.model.param_exponent(Surface::Lower), 0.6);
}

#[test]
fn test_changing_te_vector_points_refits_with_new_tangent() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let input = ellipses(61, 0.12, 0.06);
    controller
        .handle_command(
            &mut state,
            FitCommand::SetInput {
                input: input.clone(),
            },
        )
        .expect("SetInput sollte ohne Fehler durchlaufen");
    let mut settings = FitSettings::symmetric(4, 9);
    settings.enforce_te_tangency = true;
    controller
        .handle_command(&mut state, FitCommand::Fit { settings })
        .expect("Fit sollte ohne Fehler durchlaufen");

    let options = FitterOptions {
        te_vector_points: 4,
        ..state.options.clone()
    };
    controller
        .handle_command(&mut state, FitCommand::ApplyOptions { options })
        .expect("Optionen mit Refit sollten übernommen werden");

    assert_eq!(state.options.te_vector_points, 4);
    let report = state.last_fit_report.as_ref().expect("Bericht erwartet");
    assert!(report.te_tangency_applied);
    for surface in Surface::ALL {
        let tangent = trailing_edge_tangent(&input.points[surface], 4).expect("Tangente erwartet");
        let cps = state
            .model
            .curve(surface)
            .expect("Kurve erwartet")
            .control_points();
        let last_leg = cps[cps.len() - 1] - cps[cps.len() - 2];
        assert!(cross(last_leg.normalize(), tangent).abs() < 1e-9);
    }
}

#[test]
fn test_invalid_exponent_is_rejected_without_change() {
    let mut controller = AppController::new();
    let mut state = state_with_input();
    controller
        .handle_command(&mut state, FitCommand::FitWithDefaults)
        .expect("Fit sollte ohne Fehler durchlaufen");
    let before = state.model.clone();

    let result = controller.handle_command(
        &mut state,
        FitCommand::SetParamExponent {
            surface: Surface::Lower,
            exponent: -1.0,
        },
    );

    assert!(result.is_err());
    assert_eq!(state.model, before);
}

#[test]
fn test_g2_request_on_degree_three_is_reported_as_adjustment() {
    let mut controller = AppController::new();
    let mut state = state_with_input();
    let mut settings = FitSettings::symmetric(3, 9);
    settings.enforce_g2 = true;

    controller
        .handle_command(&mut state, FitCommand::Fit { settings })
        .expect("Fit sollte ohne Fehler durchlaufen");

    let report = state.last_fit_report.as_ref().expect("Bericht erwartet");
    assert!(!report.adjustments.is_empty());
    assert_eq!(report.degree, 3);
}

#[test]
fn test_save_and_load_bsp_through_controller() {
    let mut controller = AppController::new();
    let mut state = state_with_input();
    controller
        .handle_command(&mut state, FitCommand::FitWithDefaults)
        .expect("Fit sollte ohne Fehler durchlaufen");

    let dir = tempfile::tempdir().expect("Temp-Verzeichnis sollte anlegbar sein");
    let path = dir.path().join("halbkreis.bsp");
    controller
        .handle_command(
            &mut state,
            FitCommand::SaveBsp {
                path: Some(path.clone()),
            },
        )
        .expect("Speichern sollte ohne Fehler durchlaufen");
    assert_eq!(state.current_file_path.as_deref(), Some(path.as_path()));

    let mut fresh = AppState::new();
    controller
        .handle_command(&mut fresh, FitCommand::LoadBsp { path })
        .expect("Laden sollte ohne Fehler durchlaufen");

    assert_eq!(fresh.control_point_counts(), (9, 9));
    assert!(fresh.model.reference().is_none());
}

#[test]
fn test_load_missing_file_reports_error() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let dir = tempfile::tempdir().expect("Temp-Verzeichnis sollte anlegbar sein");

    let result = controller.handle_command(
        &mut state,
        FitCommand::LoadBsp {
            path: dir.path().join("fehlt.bsp"),
        },
    );

    assert!(result.is_err());
    assert!(!state.is_fitted());
    assert!(state.current_file_path.is_none());
}

#[test]
fn test_session_rejects_concurrent_request_and_keeps_running_one() {
    let mut state = AppState::new();
    state.input = Some(ellipses(61, 0.12, 0.06));
    let session = FitSession::new(state);

    let reader = session.read();
    let handle = session
        .submit(FitCommand::FitWithDefaults)
        .expect("erste Operation sollte starten");
    let rejected = session.submit(FitCommand::Sharpen);
    assert!(matches!(rejected, Err(SessionError::Busy)));
    drop(reader);

    handle.wait().expect("laufende Operation sollte gelingen");
    let snapshot = session.snapshot();
    assert!(snapshot.is_fitted());
    assert_eq!(snapshot.command_log.len(), 1);

    let stages: Vec<ProgressStage> = session
        .drain_progress()
        .into_iter()
        .map(|p| p.stage)
        .collect();
    assert_eq!(stages.last(), Some(&ProgressStage::Finished));
}
