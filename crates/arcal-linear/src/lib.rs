//! Closed-form initialization algorithms for planar camera calibration.
//!
//! These solvers provide the linear stage of calibration: plane-to-image
//! homographies, Zhang-style intrinsics from a set of homographies, and
//! pose recovery by homography decomposition. Their output seeds the
//! nonlinear refinement in `arcal-optim`.

pub mod homography;
pub mod math;
pub mod planar_pose;
pub mod zhang;

pub use homography::{dlt_homography, HomographyError};
pub use math::{apply_homography, normalize_points_2d, points_collinear};
pub use planar_pose::{pose_from_homography, PlanarPoseError};
pub use zhang::{intrinsics_from_homographies, ZhangError};
