//! High-level entry crate for the `arcal-rs` toolbox.
//!
//! Planar camera calibration plus AR wireframe overlay: accumulate
//! chessboard observations across views, solve for intrinsics and lens
//! distortion, estimate per-frame target poses, and project 3D wireframe
//! geometry into the image through the calibrated model.
//!
//! # Typical flow
//!
//! ```no_run
//! use arcal::prelude::*;
//!
//! # fn detect_corners() -> Detection { Detection::NotFound }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let target = ChessboardTarget::new(9, 6, 1.0);
//! let mut session = CalibrationSession::new(target, 1280, 720);
//!
//! // On explicit user confirmation of a detected frame:
//! session.add_detection(detect_corners())?;
//! session.add_detection(detect_corners())?;
//!
//! // Solve and publish.
//! let result = session.calibrate(&CalibrateOptions::default())?;
//! println!("rms = {:.4} px", result.rms_error);
//!
//! // Per live frame: pose + overlay.
//! # let frame_corners: Vec<arcal::core::Pt2> = vec![];
//! let estimate = session.estimate_pose(&frame_corners, &SolveOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module organization
//!
//! - [`core`]: math types, camera model, target model, observations
//! - [`linear`]: closed-form initialization (homography, Zhang, pose)
//! - [`optim`]: damped least-squares refinement problems
//! - [`pipeline`]: session, calibrator, pose estimator, projector, export
//! - [`prelude`]: convenient re-exports for common use

/// Core math types, camera models, and the target model.
pub mod core {
    pub use arcal_core::*;
}

/// Closed-form initialization algorithms.
pub mod linear {
    pub use arcal_linear::*;
}

/// Nonlinear least-squares refinement.
pub mod optim {
    pub use arcal_optim::*;
}

/// Session, calibration, pose estimation, projection, and export.
pub mod pipeline {
    pub use arcal_pipeline::*;
}

/// Convenient re-exports for common use cases.
pub mod prelude {
    pub use crate::core::{
        ChessboardTarget, CorrespondenceView, Distortion, Intrinsics, PinholeCamera, Pose, Pt2,
        Pt3, Real, Vec2, Vec3,
    };
    pub use crate::optim::SolveOptions;
    pub use crate::pipeline::{
        calibrate, estimate_pose, polyline_segments, project_model, project_points,
        CalibrateOptions, CalibrationError, CalibrationExport, CalibrationResult,
        CalibrationSession, Detection, GridShape, PatternDetector, PoseEstimate, WireframeModel,
    };
}
