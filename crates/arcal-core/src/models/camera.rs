use serde::{Deserialize, Serialize};

use super::{Distortion, Intrinsics};
use crate::math::{Pt2, Pt3, Real, Vec2};

/// Points closer to the camera plane than this are not projectable.
pub const MIN_PROJECTION_DEPTH: Real = 1e-9;

/// Pinhole camera: intrinsics plus lens distortion.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PinholeCamera {
    pub intrinsics: Intrinsics,
    pub distortion: Distortion,
}

impl PinholeCamera {
    pub fn new(intrinsics: Intrinsics, distortion: Distortion) -> Self {
        Self {
            intrinsics,
            distortion,
        }
    }

    /// Project a camera-frame point into pixel coordinates.
    ///
    /// Returns `None` when the point lies at or behind the camera plane
    /// (`z <= MIN_PROJECTION_DEPTH`); such points must be reported rather
    /// than mapped to garbage pixel coordinates.
    pub fn project_point(&self, p_cam: &Pt3) -> Option<Pt2> {
        if p_cam.z <= MIN_PROJECTION_DEPTH {
            return None;
        }
        let n = Vec2::new(p_cam.x / p_cam.z, p_cam.y / p_cam.z);
        Some(self.map_normalized(&n))
    }

    /// Map normalized sensor-plane coordinates through distortion and
    /// intrinsics. Used by solver residuals, which perform the perspective
    /// divide themselves and must stay differentiable near the optimum.
    pub fn map_normalized(&self, n: &Vec2) -> Pt2 {
        self.intrinsics.normalized_to_pixel(&self.distortion.distort(n))
    }

    /// Undo intrinsics and distortion: pixel coordinates back to
    /// undistorted normalized sensor-plane coordinates.
    pub fn backproject_pixel(&self, pixel: &Pt2) -> Vec2 {
        self.distortion
            .undistort(&self.intrinsics.pixel_to_normalized(pixel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PinholeCamera {
        PinholeCamera::new(
            Intrinsics::new(800.0, 780.0, 640.0, 360.0),
            Distortion {
                k1: -0.1,
                k2: 0.01,
                p1: 0.001,
                p2: -0.001,
                k3: 0.0,
            },
        )
    }

    #[test]
    fn point_on_optical_axis_hits_principal_point() {
        let cam = camera();
        let px = cam.project_point(&Pt3::new(0.0, 0.0, 2.0)).unwrap();
        assert!((px.x - 640.0).abs() < 1e-12);
        assert!((px.y - 360.0).abs() < 1e-12);
    }

    #[test]
    fn behind_camera_is_not_projectable() {
        let cam = camera();
        assert!(cam.project_point(&Pt3::new(0.1, 0.1, -1.0)).is_none());
        assert!(cam.project_point(&Pt3::new(0.1, 0.1, 0.0)).is_none());
    }

    #[test]
    fn backproject_inverts_projection() {
        let cam = camera();
        let p = Pt3::new(0.2, -0.1, 1.5);
        let px = cam.project_point(&p).unwrap();
        let n = cam.backproject_pixel(&px);
        assert!((n.x - p.x / p.z).abs() < 1e-9);
        assert!((n.y - p.y / p.z).abs() < 1e-9);
    }
}
