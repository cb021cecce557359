//! Planar calibration with synthetic data.
//!
//! Demonstrates the basic workflow end to end:
//! 1. Generate noiseless views of a chessboard from a known camera
//! 2. Accumulate them in a calibration session
//! 3. Solve for intrinsics, distortion, and per-view poses
//! 4. Export the persisted calibration document
//!
//! Run with: `cargo run -p arcal --example planar_synthetic`

use anyhow::Result;
use arcal::core::synthetic::{poses_yaw_y_z, project_views_all};
use arcal::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Planar Calibration (Synthetic Data) ===\n");

    // Ground-truth camera.
    let k_gt = Intrinsics::new(800.0, 780.0, 640.0, 360.0);
    let dist_gt = Distortion::from_coefficients(&[-0.1, 0.01, 0.001, -0.001]);
    let cam_gt = PinholeCamera::new(k_gt, dist_gt);

    println!("Ground truth:");
    println!(
        "  Intrinsics: fx={:.1}, fy={:.1}, cx={:.1}, cy={:.1}",
        k_gt.fx, k_gt.fy, k_gt.cx, k_gt.cy
    );
    println!(
        "  Distortion: k1={:.4}, k2={:.4}, p1={:.4}, p2={:.4}\n",
        dist_gt.k1, dist_gt.k2, dist_gt.p1, dist_gt.p2
    );

    // Synthetic calibration data: a 9x6 board seen from 5 viewpoints.
    let target = ChessboardTarget::new(9, 6, 0.025);
    let board_points = target.object_points();
    let poses = poses_yaw_y_z(5, -0.2, 0.1, 0.5, 0.08);
    let views = project_views_all(&cam_gt, &board_points, &poses)?;

    println!(
        "Generated {} views with {} points each\n",
        views.len(),
        board_points.len()
    );

    let mut session = CalibrationSession::new(target, 1280, 720);
    for view in views {
        session.add_sample(view.points_3d, view.points_2d)?;
    }

    let result = session.calibrate(&CalibrateOptions::default())?;

    println!("--- Calibration Result ---");
    let k = result.camera.intrinsics;
    let d = result.camera.distortion;
    println!(
        "  Intrinsics: fx={:.1}, fy={:.1}, cx={:.1}, cy={:.1}",
        k.fx, k.fy, k.cx, k.cy
    );
    println!(
        "  Distortion: k1={:.4}, k2={:.4}, p1={:.4}, p2={:.4}, k3={:.4}",
        d.k1, d.k2, d.p1, d.p2, d.k3
    );
    println!("  RMS reprojection error: {:.2e} px", result.rms_error);
    println!(
        "  Error vs GT: fx={:.3}%, fy={:.3}%\n",
        100.0 * (k.fx - k_gt.fx).abs() / k_gt.fx,
        100.0 * (k.fy - k_gt.fy).abs() / k_gt.fy
    );

    let export = CalibrationExport::from(result);
    println!("--- Persisted Document ---");
    println!("{}", export.to_json()?);

    Ok(())
}
