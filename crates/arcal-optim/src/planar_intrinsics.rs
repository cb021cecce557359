//! Joint refinement of intrinsics, distortion, and per-view poses.
//!
//! The parameter vector is
//! `[fx, fy, cx, cy, k1, k2, p1, p2, k3, (rvec, tvec) x N]`; the residual
//! vector stacks the (u, v) reprojection errors of every point of every
//! view.

use anyhow::{ensure, Result};
use arcal_core::{
    CorrespondenceView, Distortion, Intrinsics, PinholeCamera, Pose, Real, Vec2, Vec3,
};
use nalgebra::DVector;

use crate::problem::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};

/// Shared camera block: 4 intrinsic + 5 distortion parameters.
pub const CAMERA_DIM: usize = 9;
/// Per-view pose block: axis-angle rotation + translation.
pub const POSE_DIM: usize = 6;

/// Nonlinear refinement problem for planar intrinsics and per-view poses.
#[derive(Debug, Clone)]
pub struct PlanarIntrinsicsProblem {
    views: Vec<CorrespondenceView>,
}

impl PlanarIntrinsicsProblem {
    pub fn new(views: Vec<CorrespondenceView>) -> Result<Self> {
        ensure!(!views.is_empty(), "need at least one view for refinement");
        for (i, v) in views.iter().enumerate() {
            ensure!(
                v.points_3d.len() == v.points_2d.len(),
                "view {} has mismatched point counts",
                i
            );
            ensure!(v.len() >= 4, "view {} has too few points (need >=4)", i);
        }
        Ok(Self { views })
    }

    pub fn views(&self) -> &[CorrespondenceView] {
        &self.views
    }

    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    pub fn param_dim(&self) -> usize {
        CAMERA_DIM + POSE_DIM * self.num_views()
    }

    pub fn residual_dim(&self) -> usize {
        self.views.iter().map(|v| 2 * v.len()).sum()
    }
}

/// Pack camera parameters and per-view poses into a parameter vector.
pub fn pack_camera_params(camera: &PinholeCamera, poses: &[Pose]) -> DVector<Real> {
    let mut x = DVector::zeros(CAMERA_DIM + POSE_DIM * poses.len());

    let k = &camera.intrinsics;
    x[0] = k.fx;
    x[1] = k.fy;
    x[2] = k.cx;
    x[3] = k.cy;

    // Distortion in the canonical [k1, k2, p1, p2, k3] order.
    for (i, c) in camera.distortion.coefficients().iter().enumerate() {
        x[4 + i] = *c;
    }

    for (i, pose) in poses.iter().enumerate() {
        let idx = CAMERA_DIM + POSE_DIM * i;
        x[idx] = pose.rvec.x;
        x[idx + 1] = pose.rvec.y;
        x[idx + 2] = pose.rvec.z;
        x[idx + 3] = pose.tvec.x;
        x[idx + 4] = pose.tvec.y;
        x[idx + 5] = pose.tvec.z;
    }

    x
}

/// Decode a parameter vector back into a camera and per-view poses.
pub fn unpack_camera_params(x: &DVector<Real>, n_views: usize) -> (PinholeCamera, Vec<Pose>) {
    debug_assert_eq!(x.len(), CAMERA_DIM + POSE_DIM * n_views);

    let intrinsics = Intrinsics::new(x[0], x[1], x[2], x[3]);
    let distortion = Distortion::from_coefficients(&[x[4], x[5], x[6], x[7], x[8]]);
    let camera = PinholeCamera::new(intrinsics, distortion);

    let mut poses = Vec::with_capacity(n_views);
    for i in 0..n_views {
        let idx = CAMERA_DIM + POSE_DIM * i;
        poses.push(Pose::new(
            Vec3::new(x[idx], x[idx + 1], x[idx + 2]),
            Vec3::new(x[idx + 3], x[idx + 4], x[idx + 5]),
        ));
    }

    (camera, poses)
}

impl NllsProblem for PlanarIntrinsicsProblem {
    fn num_params(&self) -> usize {
        self.param_dim()
    }

    fn num_residuals(&self) -> usize {
        self.residual_dim()
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        let (camera, poses) = unpack_camera_params(x, self.num_views());

        let mut r = DVector::zeros(self.residual_dim());
        let mut offset = 0;

        for (view, pose) in self.views.iter().zip(poses.iter()) {
            let iso = pose.to_isometry();
            for (pw, uv) in view.iter() {
                let pc = iso.transform_point(pw);
                let n = Vec2::new(pc.x / pc.z, pc.y / pc.z);
                let proj = camera.map_normalized(&n);

                r[offset] = uv.x - proj.x;
                r[offset + 1] = uv.y - proj.y;
                offset += 2;
            }
        }

        r
    }
}

/// Refine camera intrinsics, distortion, and per-view poses.
///
/// Returns the refined camera, the refined poses, and the solve report.
pub fn refine_planar_intrinsics<B: NllsSolverBackend>(
    backend: &B,
    problem: &PlanarIntrinsicsProblem,
    camera0: &PinholeCamera,
    poses0: &[Pose],
    opts: &SolveOptions,
) -> Result<(PinholeCamera, Vec<Pose>, SolveReport)> {
    ensure!(
        poses0.len() == problem.num_views(),
        "pose count ({}) must match view count ({})",
        poses0.len(),
        problem.num_views()
    );

    let x0 = pack_camera_params(camera0, poses0);
    let (x_opt, report) = backend.solve(problem, x0, opts);
    let (camera, poses) = unpack_camera_params(&x_opt, problem.num_views());

    Ok((camera, poses, report))
}
