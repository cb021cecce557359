//! Single-view pose estimation against known intrinsics.

use arcal_core::{PinholeCamera, Pose, Pt2, Pt3, Real};
use arcal_linear::{dlt_homography, points_collinear, pose_from_homography};
use arcal_optim::{refine_pose, LmBackend, PoseRefineProblem, SolveOptions};
use serde::{Deserialize, Serialize};

use crate::calibrate::check_view;
use crate::error::CalibrationError;

/// A refined pose together with its per-view RMS reprojection error.
///
/// The error is reported, not judged: any sanity bound on it belongs to
/// the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseEstimate {
    pub pose: Pose,
    pub rms_error: Real,
}

/// Estimate the target's pose in one view, given the current camera model.
///
/// Linear stage: the observed pixels are undistorted, a plane homography
/// is fit against them, and the homography is decomposed against K.
/// Nonlinear stage: the six pose parameters are refined by damped least
/// squares on the full (distorted) reprojection residual.
pub fn estimate_pose(
    world: &[Pt3],
    image: &[Pt2],
    camera: &PinholeCamera,
    opts: &SolveOptions,
) -> Result<PoseEstimate, CalibrationError> {
    check_view(world.len(), image.len())?;

    let planar: Vec<Pt2> = world.iter().map(|p| Pt2::new(p.x, p.y)).collect();
    if points_collinear(&planar) {
        return Err(CalibrationError::DegeneratePose(
            "target points are collinear".into(),
        ));
    }

    // The homography model is distortion-free, so fit it against
    // undistorted pixel positions.
    let undistorted: Vec<Pt2> = image
        .iter()
        .map(|px| {
            let n = camera.backproject_pixel(px);
            camera.intrinsics.normalized_to_pixel(&n)
        })
        .collect();

    let h = dlt_homography(&planar, &undistorted)
        .map_err(|e| CalibrationError::DegeneratePose(e.to_string()))?;
    let iso0 = pose_from_homography(&camera.intrinsics.k_matrix(), &h)
        .map_err(|e| CalibrationError::DegeneratePose(e.to_string()))?;

    let problem = PoseRefineProblem::new(*camera, world.to_vec(), image.to_vec())
        .map_err(|e| CalibrationError::DegeneratePose(e.to_string()))?;
    let (pose, report) = refine_pose(&LmBackend, &problem, &Pose::from_isometry(&iso0), opts);

    if !report.converged {
        return Err(CalibrationError::DegeneratePose(
            "refinement did not converge".into(),
        ));
    }

    let rms_error = view_rms(camera, &pose, world, image)?;
    log::trace!(
        "pose estimate: |rvec|={:.4} tz={:.4} rms={:.4} px",
        pose.rvec.norm(),
        pose.tvec.z,
        rms_error
    );

    Ok(PoseEstimate { pose, rms_error })
}

fn view_rms(
    camera: &PinholeCamera,
    pose: &Pose,
    world: &[Pt3],
    image: &[Pt2],
) -> Result<Real, CalibrationError> {
    let iso = pose.to_isometry();
    let mut sum_sq = 0.0;

    for (pw, uv) in world.iter().zip(image.iter()) {
        let pc = iso.transform_point(pw);
        let proj = camera.project_point(&pc).ok_or_else(|| {
            CalibrationError::DegeneratePose("target point behind camera".into())
        })?;
        sum_sq += (proj - *uv).norm_squared();
    }

    Ok((sum_sq / world.len() as Real).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcal_core::synthetic::project_view_all;
    use arcal_core::{ChessboardTarget, Distortion, Intrinsics, Iso3};
    use nalgebra::{Rotation3, Translation3};

    fn camera() -> PinholeCamera {
        PinholeCamera::new(
            Intrinsics::new(800.0, 780.0, 640.0, 360.0),
            Distortion::from_coefficients(&[-0.05, 0.005, 0.0, 0.0]),
        )
    }

    #[test]
    fn recovers_synthetic_pose_with_distortion() {
        let cam = camera();
        let board = ChessboardTarget::new(5, 7, 0.03).object_points();
        let rot = Rotation3::from_euler_angles(0.2, -0.15, 0.1);
        let iso_gt = Iso3::from_parts(Translation3::new(0.03, -0.05, 0.7), rot.into());
        let view = project_view_all(&cam, &iso_gt, &board).unwrap();

        let estimate = estimate_pose(
            &view.points_3d,
            &view.points_2d,
            &cam,
            &SolveOptions::default(),
        )
        .unwrap();

        let pose_gt = Pose::from_isometry(&iso_gt);
        assert!(estimate.rms_error < 1e-6, "rms {}", estimate.rms_error);
        assert!((estimate.pose.rvec - pose_gt.rvec).norm() < 1e-6);
        assert!((estimate.pose.tvec - pose_gt.tvec).norm() < 1e-6);
    }

    #[test]
    fn collinear_points_rejected() {
        let cam = camera();
        let world: Vec<Pt3> = (0..4).map(|i| Pt3::new(i as Real * 0.05, 0.0, 0.0)).collect();
        let image: Vec<Pt2> = (0..4)
            .map(|i| Pt2::new(600.0 + i as Real * 40.0, 360.0))
            .collect();

        assert!(matches!(
            estimate_pose(&world, &image, &cam, &SolveOptions::default()),
            Err(CalibrationError::DegeneratePose(_))
        ));
    }

    #[test]
    fn three_points_rejected() {
        let cam = camera();
        let world = vec![
            Pt3::new(0.0, 0.0, 0.0),
            Pt3::new(0.1, 0.0, 0.0),
            Pt3::new(0.0, -0.1, 0.0),
        ];
        let image = vec![
            Pt2::new(600.0, 360.0),
            Pt2::new(680.0, 360.0),
            Pt2::new(600.0, 440.0),
        ];

        assert!(matches!(
            estimate_pose(&world, &image, &cam, &SolveOptions::default()),
            Err(CalibrationError::TooFewPoints { got: 3, min: 4 })
        ));
    }
}
