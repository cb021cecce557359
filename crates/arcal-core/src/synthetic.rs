//! Synthetic target poses and projected views.
//!
//! Helpers for building noiseless calibration data from a known camera:
//! generate simple camera poses, project the target through the camera,
//! and produce [`CorrespondenceView`] instances for tests and examples.

use anyhow::{bail, Result};
use nalgebra::{Translation3, UnitQuaternion};

use crate::math::{Iso3, Pt3, Real, Vec3};
use crate::models::PinholeCamera;
use crate::observation::CorrespondenceView;

/// Generate `n_views` poses with a yaw ramp around +Y and a Z translation
/// ramp. A convenient default for planar targets: the board stays in front
/// of the camera while the viewpoint varies.
pub fn poses_yaw_y_z(
    n_views: usize,
    yaw_start_rad: Real,
    yaw_step_rad: Real,
    z_start: Real,
    z_step: Real,
) -> Vec<Iso3> {
    (0..n_views)
        .map(|view_idx| {
            let yaw = yaw_start_rad + yaw_step_rad * view_idx as Real;
            let rotation = UnitQuaternion::from_scaled_axis(Vec3::new(0.0, 1.0, 0.0) * yaw);
            let translation = Vec3::new(0.0, 0.0, z_start + z_step * view_idx as Real);
            Iso3::from_parts(Translation3::from(translation), rotation)
        })
        .collect()
}

/// Project a planar target into the camera, requiring every point to be
/// projectable. `cam_from_target` maps target-frame points into the
/// camera frame.
pub fn project_view_all(
    camera: &PinholeCamera,
    cam_from_target: &Iso3,
    target_points: &[Pt3],
) -> Result<CorrespondenceView> {
    let mut pixels = Vec::with_capacity(target_points.len());
    for (idx, pw) in target_points.iter().enumerate() {
        let pc = cam_from_target.transform_point(pw);
        let Some(uv) = camera.project_point(&pc) else {
            bail!("point {idx} not projectable (z={:.6})", pc.z);
        };
        pixels.push(uv);
    }

    CorrespondenceView::new(target_points.to_vec(), pixels)
}

/// Project multiple views, requiring every point to be projectable in
/// every view.
pub fn project_views_all(
    camera: &PinholeCamera,
    target_points: &[Pt3],
    cam_from_target: &[Iso3],
) -> Result<Vec<CorrespondenceView>> {
    cam_from_target
        .iter()
        .map(|pose| project_view_all(camera, pose, target_points))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Distortion, Intrinsics};
    use crate::target::ChessboardTarget;

    #[test]
    fn projected_views_pair_up() {
        let cam = PinholeCamera::new(
            Intrinsics::new(800.0, 800.0, 640.0, 360.0),
            Distortion::zero(),
        );
        let board = ChessboardTarget::new(3, 4, 0.05).object_points();
        let poses = poses_yaw_y_z(2, 0.0, 0.1, 1.0, 0.2);

        let views = project_views_all(&cam, &board, &poses).unwrap();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.len() == board.len()));
    }

    #[test]
    fn view_behind_camera_is_rejected() {
        let cam = PinholeCamera::new(
            Intrinsics::new(800.0, 800.0, 640.0, 360.0),
            Distortion::zero(),
        );
        let board = ChessboardTarget::new(2, 2, 0.05).object_points();
        let behind = Iso3::from_parts(
            Translation3::new(0.0, 0.0, -1.0),
            UnitQuaternion::identity(),
        );
        assert!(project_view_all(&cam, &behind, &board).is_err());
    }
}
