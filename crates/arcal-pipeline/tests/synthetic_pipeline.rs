//! End-to-end properties of the calibration pipeline on synthetic data.

use arcal_core::synthetic::{poses_yaw_y_z, project_view_all, project_views_all};
use arcal_core::{ChessboardTarget, Distortion, Intrinsics, Iso3, PinholeCamera, Pose};
use arcal_optim::SolveOptions;
use arcal_pipeline::{
    calibrate, estimate_pose, project_points, CalibrateOptions, CalibrationError,
    CalibrationExport, CalibrationSession,
};
use nalgebra::{Rotation3, Translation3};

fn target() -> ChessboardTarget {
    ChessboardTarget::new(5, 7, 0.03)
}

fn ideal_camera() -> PinholeCamera {
    PinholeCamera::new(
        Intrinsics::new(820.0, 800.0, 640.0, 360.0),
        Distortion::zero(),
    )
}

#[test]
fn pose_roundtrip_identity_without_distortion() {
    let camera = ideal_camera();
    let board = target().object_points();

    let rot = Rotation3::from_euler_angles(0.25, -0.1, 0.15);
    let iso_gt = Iso3::from_parts(Translation3::new(0.04, -0.03, 0.75), rot.into());
    let pose_gt = Pose::from_isometry(&iso_gt);

    let view = project_view_all(&camera, &iso_gt, &board).unwrap();
    let estimate = estimate_pose(
        &view.points_3d,
        &view.points_2d,
        &camera,
        &SolveOptions::default(),
    )
    .unwrap();

    assert!(
        (estimate.pose.rvec - pose_gt.rvec).norm() < 1e-6,
        "rvec error {}",
        (estimate.pose.rvec - pose_gt.rvec).norm()
    );
    assert!(
        (estimate.pose.tvec - pose_gt.tvec).norm() < 1e-6,
        "tvec error {}",
        (estimate.pose.tvec - pose_gt.tvec).norm()
    );
    assert!(estimate.rms_error < 1e-8);
}

#[test]
fn calibration_recovers_known_camera_and_exports() {
    let cam_gt = PinholeCamera::new(
        Intrinsics::new(800.0, 780.0, 640.0, 360.0),
        Distortion::from_coefficients(&[-0.1, 0.01, 0.001, -0.001]),
    );
    let board = target().object_points();
    let isos = poses_yaw_y_z(4, -0.2, 0.12, 0.5, 0.1);
    let views = project_views_all(&cam_gt, &board, &isos).unwrap();

    let result = calibrate(&views, &CalibrateOptions::default()).unwrap();

    assert!(result.rms_error < 1e-4, "rms {}", result.rms_error);
    assert!((result.camera.intrinsics.fx - 800.0).abs() < 1.0);
    assert!((result.camera.intrinsics.fy - 780.0).abs() < 1.0);
    assert!((result.camera.distortion.k1 + 0.1).abs() < 0.01);
    assert!((result.camera.distortion.p1 - 0.001).abs() < 0.001);

    // Recovered poses match the synthetic ones.
    for (pose, iso_gt) in result.poses.iter().zip(isos.iter()) {
        let pose_gt = Pose::from_isometry(iso_gt);
        assert!((pose.tvec - pose_gt.tvec).norm() < 1e-3);
        assert!((pose.rvec - pose_gt.rvec).norm() < 1e-3);
    }

    let export = CalibrationExport::from(&result);
    assert_eq!(export.rotation_vectors.len(), 4);
    assert_eq!(export.translation_vectors.len(), 4);
    assert_eq!(export.distortion_coefficients.len(), 5);
    assert!((export.camera_matrix[0][0] - result.camera.intrinsics.fx).abs() < 1e-12);
}

#[test]
fn two_well_conditioned_samples_meet_the_floor() {
    let cam_gt = ideal_camera();
    let board = target().object_points();

    // Two genuinely different orientations: tilt about Y, then about X.
    let isos = vec![
        Iso3::from_parts(
            Translation3::new(0.05, 0.0, 0.8),
            Rotation3::from_euler_angles(0.0, 0.3, 0.0).into(),
        ),
        Iso3::from_parts(
            Translation3::new(-0.05, 0.08, 1.1),
            Rotation3::from_euler_angles(0.3, 0.0, 0.0).into(),
        ),
    ];
    let views = project_views_all(&cam_gt, &board, &isos).unwrap();

    let result = calibrate(&views, &CalibrateOptions::default()).unwrap();
    assert!(result.rms_error < 1e-4, "rms {}", result.rms_error);
    assert!((result.camera.intrinsics.fx - 820.0).abs() < 2.0);
    assert!((result.camera.intrinsics.fy - 800.0).abs() < 2.0);
}

#[test]
fn single_sample_fails_with_insufficient_samples() {
    let cam_gt = ideal_camera();
    let board = target().object_points();
    let isos = poses_yaw_y_z(1, 0.2, 0.0, 0.7, 0.0);
    let views = project_views_all(&cam_gt, &board, &isos).unwrap();

    assert!(matches!(
        calibrate(&views, &CalibrateOptions::default()),
        Err(CalibrationError::InsufficientSamples(1))
    ));
}

#[test]
fn projection_is_pure_and_reports_behind_camera_points() {
    let camera = ideal_camera();
    let pose = Pose::from_isometry(&Iso3::from_parts(
        Translation3::new(0.0, 0.0, 1.0),
        Rotation3::identity().into(),
    ));

    let points = vec![
        arcal_core::Pt3::new(0.0, 0.0, 0.0),
        arcal_core::Pt3::new(0.1, 0.1, 0.2),
        arcal_core::Pt3::new(0.0, 0.0, -2.0),
    ];

    let first = project_points(&camera, &pose, &points);
    let second = project_points(&camera, &pose, &points);
    assert_eq!(first, second);

    assert_eq!(first.len(), points.len());
    assert!(first[0].is_some());
    assert!(first[1].is_some());
    assert!(first[2].is_none());
}

#[test]
fn session_drives_the_full_live_loop() {
    let cam_gt = PinholeCamera::new(
        Intrinsics::new(800.0, 780.0, 640.0, 360.0),
        Distortion::from_coefficients(&[-0.05, 0.005, 0.0, 0.0]),
    );
    let board = target().object_points();
    let isos = poses_yaw_y_z(3, -0.15, 0.12, 0.55, 0.12);
    let views = project_views_all(&cam_gt, &board, &isos).unwrap();

    let mut session = CalibrationSession::new(target(), 1280, 720);
    for view in &views {
        session
            .add_sample(view.points_3d.clone(), view.points_2d.clone())
            .unwrap();
    }
    assert_eq!(session.sample_count(), 3);

    session.calibrate(&CalibrateOptions::default()).unwrap();

    // A live frame from a new viewpoint.
    let live_iso = Iso3::from_parts(
        Translation3::new(0.02, -0.04, 0.9),
        Rotation3::from_euler_angles(0.1, 0.2, -0.05).into(),
    );
    let live_view = project_view_all(&cam_gt, &live_iso, &board).unwrap();

    let estimate = session
        .estimate_pose(&live_view.points_2d, &SolveOptions::default())
        .unwrap();
    let pose_gt = Pose::from_isometry(&live_iso);

    assert!(estimate.rms_error < 1e-4, "rms {}", estimate.rms_error);
    assert!((estimate.pose.tvec - pose_gt.tvec).norm() < 1e-3);
    assert!((estimate.pose.rvec - pose_gt.rvec).norm() < 1e-3);
}
