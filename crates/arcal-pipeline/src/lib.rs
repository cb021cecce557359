//! Calibration pipeline for `arcal-rs`.
//!
//! Ties the linear initialization and nonlinear refinement stages into the
//! user-facing operations: a [`CalibrationSession`] accumulating target
//! observations, the two-stage [`calibrate`] solve, single-view
//! [`estimate_pose`], and the deterministic [`projector`] used both for
//! reprojection-error checks and AR wireframe overlays.

pub mod calibrate;
pub mod detect;
pub mod error;
pub mod export;
pub mod model;
pub mod pose;
pub mod projector;
pub mod session;

pub use calibrate::{calibrate, CalibrateOptions, CalibrationResult};
pub use detect::{Detection, GridShape, PatternDetector};
pub use error::CalibrationError;
pub use export::CalibrationExport;
pub use model::WireframeModel;
pub use pose::{estimate_pose, PoseEstimate};
pub use projector::{polyline_segments, project_model, project_points};
pub use session::CalibrationSession;
