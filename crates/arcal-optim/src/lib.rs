//! Nonlinear least-squares refinement for `arcal-rs`.
//!
//! A single damped-least-squares abstraction ([`NllsProblem`] +
//! [`LmBackend`]) serves both refinement stages: the joint
//! intrinsics/distortion/poses problem of the calibrator and the
//! 6-parameter single-view problem of the pose estimator.

pub mod lm;
pub mod planar_intrinsics;
pub mod pose_refine;
pub mod problem;

pub use lm::LmBackend;
pub use planar_intrinsics::{
    pack_camera_params, refine_planar_intrinsics, unpack_camera_params, PlanarIntrinsicsProblem,
    CAMERA_DIM, POSE_DIM,
};
pub use pose_refine::{refine_pose, PoseRefineProblem};
pub use problem::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport};
