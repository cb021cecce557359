//! Two-stage planar camera calibration.
//!
//! Stage 1 (linear): a normalized DLT homography per view, Zhang's
//! closed-form intrinsics from the homography set, and a pose per view by
//! homography decomposition; distortion starts at zero. Stage 2
//! (nonlinear): joint Levenberg-Marquardt refinement of intrinsics,
//! distortion, and all per-view poses against the full reprojection
//! residual.

use arcal_core::{CorrespondenceView, Distortion, PinholeCamera, Pose, Real};
use arcal_linear::{dlt_homography, intrinsics_from_homographies, pose_from_homography};
use arcal_optim::{refine_planar_intrinsics, LmBackend, PlanarIntrinsicsProblem, SolveOptions};
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Minimum number of accumulated samples for a calibration solve.
pub const MIN_CALIBRATION_SAMPLES: usize = 2;
/// Minimum number of points per view.
pub const MIN_VIEW_POINTS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct CalibrateOptions {
    pub solve: SolveOptions,
}

/// Output of one successful calibration run, created atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Refined intrinsics and distortion.
    pub camera: PinholeCamera,
    /// One refined pose per input sample, in sample order.
    pub poses: Vec<Pose>,
    /// Root-mean-square reprojection error over all points of all
    /// samples, in pixels.
    pub rms_error: Real,
}

/// Validate the per-view pairing invariants shared by calibration and
/// pose estimation.
pub(crate) fn check_view(world: usize, image: usize) -> Result<(), CalibrationError> {
    if world != image {
        return Err(CalibrationError::MismatchedCorrespondence { world, image });
    }
    if world < MIN_VIEW_POINTS {
        return Err(CalibrationError::TooFewPoints {
            got: world,
            min: MIN_VIEW_POINTS,
        });
    }
    Ok(())
}

/// Solve for shared intrinsics, distortion, and one pose per sample.
///
/// Requires at least [`MIN_CALIBRATION_SAMPLES`] samples with varying
/// target orientation. Near-parallel view sets are not pre-checked; they
/// surface as a `DegenerateConfiguration` from the linear stage or as a
/// non-convergent refinement.
pub fn calibrate(
    samples: &[CorrespondenceView],
    opts: &CalibrateOptions,
) -> Result<CalibrationResult, CalibrationError> {
    if samples.len() < MIN_CALIBRATION_SAMPLES {
        return Err(CalibrationError::InsufficientSamples(samples.len()));
    }
    for view in samples {
        check_view(view.points_3d.len(), view.points_2d.len())?;
    }

    // Stage 1: linear initialization.
    let mut homographies = Vec::with_capacity(samples.len());
    for (idx, view) in samples.iter().enumerate() {
        let h = dlt_homography(&view.planar_points(), &view.points_2d).map_err(|e| {
            CalibrationError::DegenerateConfiguration(format!("homography for view {idx}: {e}"))
        })?;
        homographies.push(h);
    }

    let intrinsics = intrinsics_from_homographies(&homographies)
        .map_err(|e| CalibrationError::DegenerateConfiguration(e.to_string()))?;
    let kmtx = intrinsics.k_matrix();

    let mut poses0 = Vec::with_capacity(samples.len());
    for (idx, h) in homographies.iter().enumerate() {
        let iso = pose_from_homography(&kmtx, h).map_err(|e| {
            CalibrationError::DegenerateConfiguration(format!("pose for view {idx}: {e}"))
        })?;
        poses0.push(Pose::from_isometry(&iso));
    }

    let camera0 = PinholeCamera::new(intrinsics, Distortion::zero());
    log::debug!(
        "linear init: fx={:.1} fy={:.1} cx={:.1} cy={:.1} over {} views",
        intrinsics.fx,
        intrinsics.fy,
        intrinsics.cx,
        intrinsics.cy,
        samples.len()
    );

    // Stage 2: joint nonlinear refinement.
    let problem = PlanarIntrinsicsProblem::new(samples.to_vec())
        .map_err(|e| CalibrationError::DegenerateConfiguration(e.to_string()))?;
    let (camera, poses, report) =
        refine_planar_intrinsics(&LmBackend, &problem, &camera0, &poses0, &opts.solve)
            .map_err(|e| CalibrationError::DegenerateConfiguration(e.to_string()))?;

    if !report.converged {
        return Err(CalibrationError::DegenerateConfiguration(
            "refinement did not converge".into(),
        ));
    }

    let rms_error = rms_reprojection_error(&camera, &poses, samples)?;
    log::debug!(
        "calibration converged in {} evaluations, rms {:.4} px",
        report.iterations,
        rms_error
    );

    Ok(CalibrationResult {
        camera,
        poses,
        rms_error,
    })
}

/// RMS pixel distance between projected target points and their detected
/// positions, over all points of all samples.
pub fn rms_reprojection_error(
    camera: &PinholeCamera,
    poses: &[Pose],
    samples: &[CorrespondenceView],
) -> Result<Real, CalibrationError> {
    let mut sum_sq = 0.0;
    let mut count = 0usize;

    for (view, pose) in samples.iter().zip(poses.iter()) {
        let iso = pose.to_isometry();
        for (pw, uv) in view.iter() {
            let pc = iso.transform_point(pw);
            let proj = camera.project_point(&pc).ok_or_else(|| {
                CalibrationError::DegenerateConfiguration(
                    "target point behind camera after refinement".into(),
                )
            })?;
            sum_sq += (proj - *uv).norm_squared();
            count += 1;
        }
    }

    if count == 0 {
        return Ok(0.0);
    }
    Ok((sum_sq / count as Real).sqrt())
}
