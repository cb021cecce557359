//! Error kinds of the calibration pipeline.
//!
//! Every variant is a local, recoverable condition reported to the
//! immediate caller; none of them should abort a surrounding frame loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The detector found no calibration pattern in the frame. Skip it.
    #[error("calibration pattern not found in frame")]
    NotFound,

    /// Paired point lists of different lengths. An integration error;
    /// the call fails without corrupting any accumulated state.
    #[error("mismatched correspondence lengths: {world} world vs {image} image points")]
    MismatchedCorrespondence { world: usize, image: usize },

    /// A single view carries fewer points than the solvers can work with.
    #[error("need at least {min} points, got {got}")]
    TooFewPoints { got: usize, min: usize },

    /// Calibration invoked below the two-sample floor. Gather more views
    /// and retry.
    #[error("need at least 2 calibration samples, got {0}")]
    InsufficientSamples(usize),

    /// The calibration solve was ill-conditioned or did not converge.
    /// Any previously published result stays valid.
    #[error("degenerate calibration configuration: {0}")]
    DegenerateConfiguration(String),

    /// The pose solve was underdetermined or did not converge.
    #[error("degenerate pose estimate: {0}")]
    DegeneratePose(String),
}
