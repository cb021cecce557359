//! Single-view pose refinement with fixed intrinsics and distortion.
//!
//! Same reprojection residual as the joint problem, but only the six pose
//! parameters `[rvec, tvec]` are free.

use anyhow::{ensure, Result};
use arcal_core::{PinholeCamera, Pose, Pt2, Pt3, Real, Vec2, Vec3};
use nalgebra::DVector;

use crate::planar_intrinsics::POSE_DIM;
use crate::problem::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};

/// Reprojection problem over a single view's pose.
#[derive(Debug, Clone)]
pub struct PoseRefineProblem {
    camera: PinholeCamera,
    world: Vec<Pt3>,
    image: Vec<Pt2>,
}

impl PoseRefineProblem {
    pub fn new(camera: PinholeCamera, world: Vec<Pt3>, image: Vec<Pt2>) -> Result<Self> {
        ensure!(
            world.len() == image.len(),
            "3D / 2D point counts must match: {} vs {}",
            world.len(),
            image.len()
        );
        ensure!(world.len() >= 4, "need at least 4 points, got {}", world.len());
        Ok(Self {
            camera,
            world,
            image,
        })
    }

    fn pack(pose: &Pose) -> DVector<Real> {
        DVector::from_column_slice(&[
            pose.rvec.x,
            pose.rvec.y,
            pose.rvec.z,
            pose.tvec.x,
            pose.tvec.y,
            pose.tvec.z,
        ])
    }

    fn unpack(x: &DVector<Real>) -> Pose {
        Pose::new(
            Vec3::new(x[0], x[1], x[2]),
            Vec3::new(x[3], x[4], x[5]),
        )
    }
}

impl NllsProblem for PoseRefineProblem {
    fn num_params(&self) -> usize {
        POSE_DIM
    }

    fn num_residuals(&self) -> usize {
        2 * self.world.len()
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        let iso = Self::unpack(x).to_isometry();

        let mut r = DVector::zeros(self.num_residuals());
        for (i, (pw, uv)) in self.world.iter().zip(self.image.iter()).enumerate() {
            let pc = iso.transform_point(pw);
            let n = Vec2::new(pc.x / pc.z, pc.y / pc.z);
            let proj = self.camera.map_normalized(&n);

            r[2 * i] = uv.x - proj.x;
            r[2 * i + 1] = uv.y - proj.y;
        }
        r
    }
}

/// Refine a single view's pose against the fixed camera model.
pub fn refine_pose<B: NllsSolverBackend>(
    backend: &B,
    problem: &PoseRefineProblem,
    pose0: &Pose,
    opts: &SolveOptions,
) -> (Pose, SolveReport) {
    let (x_opt, report) = backend.solve(problem, PoseRefineProblem::pack(pose0), opts);
    (PoseRefineProblem::unpack(&x_opt), report)
}
